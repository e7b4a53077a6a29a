//! Input module: The event alphabet and edit batching.

mod batch;
mod event;

pub use batch::{FlushReport, InputBuffer};
pub use event::{EditOp, InputEvent};
