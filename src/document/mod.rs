//! Document module: The text a session edits and persists.

mod edit_buffer;

pub use edit_buffer::EditBuffer;
