//! Display module: Where frames end up.
//!
//! The engine never touches pixels. It hands [`Frame`]s to a [`Display`],
//! which may be a real panel driver, the terminal-hosted emulation in
//! [`TerminalDisplay`], or the recording [`MemoryDisplay`].

mod memory;
mod terminal;

pub use memory::{FrameLog, MemoryDisplay};
pub use terminal::TerminalDisplay;

use crate::view::Frame;
use std::io;

/// A fixed character grid that can show one frame at a time.
pub trait Display: Send {
    /// Grid size as `(columns, rows)`.
    fn grid(&self) -> (usize, usize);

    /// Replace what is shown with `frame`.
    ///
    /// Rows past the end of `frame.lines` are blanked.
    fn paint(&mut self, frame: &Frame) -> io::Result<()>;

    /// Blank the whole display.
    fn clear(&mut self) -> io::Result<()>;
}

impl<D: Display + ?Sized> Display for Box<D> {
    fn grid(&self) -> (usize, usize) {
        (**self).grid()
    }

    fn paint(&mut self, frame: &Frame) -> io::Result<()> {
        (**self).paint(frame)
    }

    fn clear(&mut self) -> io::Result<()> {
        (**self).clear()
    }
}
