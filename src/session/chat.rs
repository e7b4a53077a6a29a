//! Chat session: A transcript fed by streamed responses.
//!
//! The transcript goes through the same wrap/window/gate pipeline as a
//! document. The prompt being typed is shown on the last line(s) after a
//! `"> "` marker, so tail-following keeps it visible while a response
//! streams in above it.
//!
//! The session never talks to a network. On submit it hands the prompt
//! back to the caller, which starts a producer and forwards its
//! [`StreamEvent`]s here.

use crate::actor::StreamEvent;
use crate::config::Config;
use crate::document::EditBuffer;
use crate::input::{EditOp, InputBuffer, InputEvent};
use crate::view::{Frame, Pane};
use tracing::{debug, info};

/// Marker in front of user text.
pub const USER_PREFIX: &str = "> ";

/// Marker in front of a streamed response.
pub const REPLY_PREFIX: &str = "A: ";

/// Marker in front of a stream failure line.
pub const ERROR_PREFIX: &str = "[Error] ";

/// What the caller should do after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatAction {
    /// Keep going.
    Continue,
    /// Start streaming a response to `prompt`, tagging events with `stream_id`.
    Submit {
        /// Identifier the producer must put on its events.
        stream_id: u32,
        /// The submitted prompt, trimmed.
        prompt: String,
    },
    /// Leave the chat. Any running stream must be stopped first.
    Leave,
}

/// The response currently streaming in.
#[derive(Debug, Clone, Copy)]
struct ActiveStream {
    id: u32,
    started: bool,
}

/// A chat transcript plus the prompt being typed.
#[derive(Debug)]
pub struct ChatSession {
    /// Committed prompts and responses.
    transcript: EditBuffer,
    /// The prompt being typed.
    prompt: EditBuffer,
    /// Prompt edits waiting for the next flush.
    pending: InputBuffer,
    /// Wrapped view of transcript + prompt.
    pane: Pane,
    /// The response being streamed, if any.
    active: Option<ActiveStream>,
    /// Identifier for the next stream.
    next_stream_id: u32,
    /// Apply edits as they arrive instead of batching.
    immediate: bool,
    /// Reused buffer for the composed display text.
    scratch: String,
}

impl ChatSession {
    /// Create an empty chat.
    pub fn new(config: &Config) -> Self {
        let mut chat = Self {
            transcript: EditBuffer::new(config.max_text_length),
            prompt: EditBuffer::new(config.prompt_max_length),
            pending: InputBuffer::new(),
            pane: Pane::new(config.line_width, config.viewport_height),
            active: None,
            next_stream_id: 1,
            immediate: config.buffer_interval_ms == 0,
            scratch: String::new(),
        };
        chat.refresh();
        chat
    }

    /// Committed transcript text.
    pub fn transcript(&self) -> &str {
        self.transcript.text()
    }

    /// The prompt being typed.
    pub fn prompt(&self) -> &str {
        self.prompt.text()
    }

    /// The rendering pane.
    pub const fn pane(&self) -> &Pane {
        &self.pane
    }

    /// Check if a response is streaming.
    pub const fn is_streaming(&self) -> bool {
        self.active.is_some()
    }

    /// Identifier of the streaming response, if any.
    pub fn active_stream(&self) -> Option<u32> {
        self.active.map(|a| a.id)
    }

    /// Route one input event.
    pub fn handle(&mut self, event: InputEvent) -> ChatAction {
        match event {
            InputEvent::ScrollUp => self.pane.scroll_up(),
            InputEvent::ScrollDown => self.pane.scroll_down(),
            InputEvent::PageUp => self.pane.page_up(),
            InputEvent::PageDown => self.pane.page_down(),
            InputEvent::Cancel => return ChatAction::Leave,
            InputEvent::Enter | InputEvent::Save => {
                self.flush();
                return self.submit();
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
        ChatAction::Continue
    }

    /// Apply queued prompt edits.
    pub fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        if self.pending.flush(&mut self.prompt).changed() {
            self.refresh();
        }
    }

    fn submit(&mut self) -> ChatAction {
        let prompt = self.prompt.text().trim().to_owned();
        if prompt.is_empty() || self.is_streaming() {
            return ChatAction::Continue;
        }
        let needed = USER_PREFIX.chars().count() + prompt.chars().count() + 1;
        if self.transcript.capacity_left() < needed {
            debug!(
                needed,
                left = self.transcript.capacity_left(),
                "transcript full, prompt kept"
            );
            return ChatAction::Continue;
        }

        self.transcript.push_str(USER_PREFIX);
        self.transcript.push_str(&prompt);
        self.transcript.insert_newline();
        self.prompt.clear();

        let stream_id = self.next_stream_id;
        self.next_stream_id = self.next_stream_id.wrapping_add(1);
        self.active = Some(ActiveStream {
            id: stream_id,
            started: false,
        });
        info!(stream_id, chars = prompt.chars().count(), "prompt submitted");

        self.pane.scroll_to_bottom();
        self.refresh();
        ChatAction::Submit { stream_id, prompt }
    }

    /// Apply an event from a response producer.
    ///
    /// Events from any stream other than the active one are ignored.
    /// Returns whether the transcript changed.
    pub fn on_stream(&mut self, event: &StreamEvent) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if active.id != event.stream_id() {
            debug!(stream_id = event.stream_id(), "dropping stale stream event");
            return false;
        }

        match event {
            StreamEvent::Chunk { content, .. } => {
                if content.is_empty() {
                    return false;
                }
                if !active.started {
                    active.started = true;
                    self.transcript.push_str(REPLY_PREFIX);
                }
                self.transcript.push_str(content);
            }
            StreamEvent::End { stream_id } => {
                info!(stream_id, "response complete");
                self.active = None;
                self.end_line();
            }
            StreamEvent::Error { stream_id, message } => {
                info!(stream_id, %message, "response failed");
                self.active = None;
                self.end_line();
                self.transcript.push_str(ERROR_PREFIX);
                self.transcript.push_str(message);
                self.transcript.insert_newline();
            }
        }
        self.refresh();
        true
    }

    /// Forget the active stream without waiting for its end.
    ///
    /// Late events from it will be ignored.
    pub fn abandon_stream(&mut self) -> Option<u32> {
        let id = self.active.take().map(|a| a.id)?;
        self.end_line();
        self.refresh();
        Some(id)
    }

    /// The frame to paint, if it differs from the last one taken.
    pub fn take_frame(&mut self) -> Option<Frame> {
        self.pane.take_frame()
    }

    /// Force the next [`take_frame`](Self::take_frame) to return a frame.
    pub fn invalidate(&mut self) {
        self.pane.invalidate();
    }

    fn end_line(&mut self) {
        let text = self.transcript.text();
        if !text.is_empty() && !text.ends_with('\n') {
            self.transcript.insert_newline();
        }
    }

    fn refresh(&mut self) {
        self.scratch.clear();
        self.scratch.push_str(self.transcript.text());
        self.scratch.push_str(USER_PREFIX);
        self.scratch.push_str(self.prompt.text());
        self.pane.refresh(&self.scratch);
    }
}
