//! Edit session: The word-processor state machine.
//!
//! ```text
//!          open / new_document          save (ok)
//!   Idle ───────────────────▶ Editing ──────────▶ Saving ──▶ Idle
//!     ▲                         │  ▲                 │
//!     └──────── cancel ─────────┘  └── save failed ──┘
//! ```
//!
//! Edits are queued in an [`InputBuffer`] and applied on [`flush`], so a
//! burst of keystrokes costs one re-wrap. Scrolling is applied at once.
//!
//! [`flush`]: EditSession::flush

use super::SessionState;
use crate::config::Config;
use crate::document::EditBuffer;
use crate::error::{Error, Result};
use crate::input::{EditOp, FlushReport, InputBuffer, InputEvent};
use crate::view::{Frame, Pane};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// How [`EditSession::open`] obtained its document.
#[derive(Debug)]
pub enum LoadStatus {
    /// The file was read into the buffer.
    Loaded,
    /// The file does not exist yet; editing starts empty.
    Created,
    /// The file could not be read; editing starts empty.
    Failed(Error),
}

/// What the caller should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    /// Keep going.
    Continue,
    /// The document was saved and the session closed.
    Saved,
    /// The document was discarded and the session closed.
    Discarded,
}

/// A single-document editing session.
#[derive(Debug)]
pub struct EditSession {
    /// Lifecycle state.
    state: SessionState,
    /// The document.
    document: EditBuffer,
    /// Edits waiting for the next flush.
    pending: InputBuffer,
    /// Wrapped view of the document.
    pane: Pane,
    /// Where the document is saved.
    path: Option<PathBuf>,
    /// Apply edits as they arrive instead of batching.
    immediate: bool,
}

impl EditSession {
    /// Create an idle session.
    pub fn new(config: &Config) -> Self {
        Self {
            state: SessionState::Idle,
            document: EditBuffer::new(config.max_text_length),
            pending: InputBuffer::new(),
            pane: Pane::new(config.line_width, config.viewport_height),
            path: None,
            immediate: config.buffer_interval_ms == 0,
        }
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// The document.
    pub const fn document(&self) -> &EditBuffer {
        &self.document
    }

    /// The rendering pane.
    pub const fn pane(&self) -> &Pane {
        &self.pane
    }

    /// Path the document is saved to.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of edits waiting for a flush.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Start editing the file at `path`.
    ///
    /// A missing or unreadable file is not fatal: the session starts with
    /// an empty document and the reason is returned in [`LoadStatus`].
    pub fn open(&mut self, path: impl Into<PathBuf>) -> Result<LoadStatus> {
        self.expect_state(SessionState::Idle, "open a document")?;
        let path = path.into();

        self.document.clear();
        let status = match self.document.load_file(&path) {
            Ok(()) => LoadStatus::Loaded,
            Err(e) if e.is_not_found() => LoadStatus::Created,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not load document");
                self.document.clear();
                LoadStatus::Failed(e)
            }
        };

        self.begin(path);
        Ok(status)
    }

    /// Start editing an empty document that will be saved to `path`.
    ///
    /// Existing content at `path` is ignored and replaced on save.
    pub fn new_document(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        self.expect_state(SessionState::Idle, "start a document")?;
        self.document.clear();
        self.begin(path.into());
        Ok(())
    }

    fn begin(&mut self, path: PathBuf) {
        info!(path = %path.display(), chars = self.document.len(), "editing");
        self.path = Some(path);
        self.pending.discard();
        self.pane.scroll_to_bottom();
        self.pane.refresh(self.document.text());
        self.pane.invalidate();
        self.state = SessionState::Editing;
    }

    /// Route one input event.
    pub fn handle(&mut self, event: InputEvent) -> Result<SessionAction> {
        self.expect_state(SessionState::Editing, "handle input")?;

        match event {
            InputEvent::ScrollUp => self.pane.scroll_up(),
            InputEvent::ScrollDown => self.pane.scroll_down(),
            InputEvent::PageUp => self.pane.page_up(),
            InputEvent::PageDown => self.pane.page_down(),
            InputEvent::Save => {
                self.save()?;
                return Ok(SessionAction::Saved);
            }
            InputEvent::Cancel => {
                self.cancel();
                return Ok(SessionAction::Discarded);
            }
            other => match EditOp::try_from(other) {
                Ok(op) => {
                    self.pending.push(op);
                    if self.immediate {
                        self.flush();
                    }
                }
                Err(ignored) => debug!(?ignored, "ignoring input"),
            },
        }
        Ok(SessionAction::Continue)
    }

    /// Apply all queued edits and re-wrap if the document changed.
    pub fn flush(&mut self) -> FlushReport {
        if self.pending.is_empty() {
            return FlushReport::default();
        }
        let report = self.pending.flush(&mut self.document);
        if report.dropped > 0 {
            debug!(dropped = report.dropped, "document full, inserts dropped");
        }
        if report.changed() {
            self.pane.refresh(self.document.text());
        }
        report
    }

    /// The frame to paint, if it differs from the last one taken.
    pub fn take_frame(&mut self) -> Option<Frame> {
        self.pane.take_frame()
    }

    /// Force the next [`take_frame`](Self::take_frame) to return a frame.
    pub fn invalidate(&mut self) {
        self.pane.invalidate();
    }

    /// Flush pending edits, write the document, and close the session.
    ///
    /// On failure the session returns to editing with the document intact.
    pub fn save(&mut self) -> Result<()> {
        self.expect_state(SessionState::Editing, "save")?;
        self.flush();
        self.state = SessionState::Saving;

        let Some(path) = self.path.as_deref() else {
            self.state = SessionState::Editing;
            return Err(Error::InvalidState {
                action: "save",
                state: "without a path",
            });
        };

        match self.document.save_file(path) {
            Ok(()) => {
                info!(path = %path.display(), chars = self.document.len(), "saved");
                self.close();
                Ok(())
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "save failed");
                self.state = SessionState::Editing;
                Err(e)
            }
        }
    }

    /// Discard the document and pending edits and close the session.
    pub fn cancel(&mut self) {
        if self.state == SessionState::Idle {
            return;
        }
        let dropped = self.pending.discard();
        info!(dropped, "editing cancelled");
        self.close();
    }

    fn close(&mut self) {
        self.document.clear();
        self.pending.discard();
        self.pane.refresh("");
        self.path = None;
        self.state = SessionState::Idle;
    }

    fn expect_state(&self, expected: SessionState, action: &'static str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(Error::InvalidState {
                action,
                state: self.state.name(),
            })
        }
    }
}
