//! In-memory display that records every frame it is asked to paint.

use super::Display;
use crate::view::Frame;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared handle to the frames a [`MemoryDisplay`] has painted.
#[derive(Debug, Clone, Default)]
pub struct FrameLog {
    frames: Arc<Mutex<Vec<Frame>>>,
}

impl FrameLog {
    fn lock(&self) -> MutexGuard<'_, Vec<Frame>> {
        self.frames.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Number of frames painted.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if nothing was painted.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// The most recent frame.
    pub fn last(&self) -> Option<Frame> {
        self.lock().last().cloned()
    }

    /// All frames painted so far.
    pub fn frames(&self) -> Vec<Frame> {
        self.lock().clone()
    }
}

/// A display that keeps frames instead of showing them.
#[derive(Debug)]
pub struct MemoryDisplay {
    columns: usize,
    rows: usize,
    log: FrameLog,
}

impl MemoryDisplay {
    /// Create a display and a handle for reading what it painted.
    pub fn new(columns: usize, rows: usize) -> (Self, FrameLog) {
        let log = FrameLog::default();
        let display = Self {
            columns,
            rows,
            log: log.clone(),
        };
        (display, log)
    }
}

impl Display for MemoryDisplay {
    fn grid(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    fn paint(&mut self, frame: &Frame) -> io::Result<()> {
        self.log.lock().push(frame.clone());
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.log.lock().push(Frame::new(Vec::new(), 0));
        Ok(())
    }
}
