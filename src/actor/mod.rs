//! Actor Model: Message-passing concurrency for the display engine.
//!
//! This module implements a small actor system using crossbeam channels:
//! - **Input Actor**: Polls terminal events, forwards them to the loop
//! - **Render Actor**: Owns the display, paints frames
//! - **Stream Actor**: Produces reply text, stops when cancelled
//! - **Application Loop**: Owns the session, the only writer of its state
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     InputEvent      ┌──────────────┐
//! │ Input Thread │ ──────────────────▶ │              │
//! └──────────────┘                     │  App Loop    │
//!                                      │  (session)   │
//! ┌──────────────┐    RenderCommand    │              │
//! │Render Thread │ ◀────────────────── │              │
//! └──────────────┘                     └──────────────┘
//!                                            ▲
//!                                            │ StreamEvent
//!                                      ┌──────────────┐
//!                                      │Stream Thread │
//!                                      └──────────────┘
//! ```

mod engine;
mod event_loop;
mod input;
mod messages;
mod renderer;
mod stream;

pub use engine::{Engine, EngineConfig};
pub use event_loop::{notice_frame, run_chat, run_editor, LoopExit};
pub use input::{convert_key, convert_paste, InputActor};
pub use messages::{RenderCommand, StreamEvent};
pub use renderer::{RenderStats, RendererActor};
pub use stream::{ChunkSource, ScriptedSource, StreamActor};
