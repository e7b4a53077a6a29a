//! Input buffer: Batching edit operations between re-wraps.
//!
//! Re-wrapping and repainting a slow display once per keystroke wastes
//! most of the work when keys arrive in bursts. The session queues edits
//! here and applies them on a timer tick instead.

use super::event::EditOp;
use crate::document::EditBuffer;
use std::collections::VecDeque;

/// What a [`InputBuffer::flush`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Operations that changed the document.
    pub applied: usize,
    /// Inserts dropped because the document was full.
    pub dropped: usize,
    /// Backspaces on an already empty document.
    pub ignored: usize,
}

impl FlushReport {
    /// Check if the document changed.
    pub const fn changed(&self) -> bool {
        self.applied > 0
    }
}

/// FIFO queue of pending edit operations.
#[derive(Debug, Default)]
pub struct InputBuffer {
    /// Pending operations in arrival order.
    queue: VecDeque<EditOp>,
}

impl InputBuffer {
    /// Create an empty input buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an operation.
    pub fn push(&mut self, op: EditOp) {
        self.queue.push_back(op);
    }

    /// Number of pending operations.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Check if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop all pending operations without applying them.
    pub fn discard(&mut self) -> usize {
        let count = self.queue.len();
        self.queue.clear();
        count
    }

    /// Apply every pending operation to `buffer` in arrival order.
    ///
    /// The queue is empty afterwards.
    pub fn flush(&mut self, buffer: &mut EditBuffer) -> FlushReport {
        let mut report = FlushReport::default();
        for op in self.queue.drain(..) {
            let changed = match op {
                EditOp::Insert(c) => buffer.insert_char(c),
                EditOp::Newline => buffer.insert_newline(),
                EditOp::Backspace => buffer.backspace(),
            };
            match (changed, op) {
                (true, _) => report.applied += 1,
                (false, EditOp::Backspace) => report.ignored += 1,
                (false, _) => report.dropped += 1,
            }
        }
        report
    }
}
