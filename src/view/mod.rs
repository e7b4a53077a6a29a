//! View module: Projecting wrapped lines onto a fixed-size grid.
//!
//! This module contains:
//! - [`ScrollWindow`]: Scroll offset with tail-following
//! - [`ChangeGate`]: Redraw suppression for unchanged frames
//! - [`Pane`]: Wrap, window and gate combined into one pipeline
//!
//! # Data flow
//!
//! ```text
//! document text ──wrap──▶ lines ──window──▶ visible ──gate──▶ Frame
//! ```

mod gate;
mod pane;
mod scroll;

pub use gate::ChangeGate;
pub use pane::{Frame, Pane};
pub use scroll::ScrollWindow;
