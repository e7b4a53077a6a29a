//! # Pocket Writer
//!
//! A wrap-and-scroll text engine for pocket word processors and chat
//! appliances with tiny character displays.
//!
//! The display is a fixed grid, typically 18 columns by 5 rows. Document
//! text is word-wrapped to the grid width, a scroll window picks which
//! lines are visible, and a change gate suppresses repaints of frames
//! that look the same as the last one.
//!
//! ## Core Concepts
//!
//! - **Word wrapping**: Break at the last whitespace in reach, hard-break long words
//! - **Tail following**: The view sticks to the newest line until the user scrolls up
//! - **Change gate**: Identical frames are never sent to the panel twice
//! - **Batched input**: Keystrokes are applied on a timer tick, scrolling is immediate
//! - **Actor model**: Input, rendering and reply streaming each get a thread
//!
//! ## Example
//!
//! ```rust
//! use pocket_writer::Pane;
//!
//! let mut pane = Pane::new(10, 2);
//! pane.refresh("the quick brown fox jumps");
//!
//! // The window follows the tail.
//! assert_eq!(pane.visible(), ["brown fox", "jumps"]);
//!
//! // First frame is always painted, an identical one is not.
//! assert!(pane.take_frame().is_some());
//! assert!(pane.take_frame().is_none());
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod config;
pub mod display;
pub mod document;
pub mod error;
pub mod input;
pub mod session;
pub mod text;
pub mod view;

// Re-exports for convenience
pub use actor::{Engine, EngineConfig, LoopExit, RenderCommand, StreamEvent};
pub use config::{Config, Profile};
pub use display::{Display, MemoryDisplay, TerminalDisplay};
pub use document::EditBuffer;
pub use error::{Error, Result};
pub use input::{InputBuffer, InputEvent};
pub use session::{ChatSession, EditSession, SessionState};
pub use text::wrap;
pub use view::{ChangeGate, Frame, Pane, ScrollWindow};
