//! Session module: The owners of a document and its view.
//!
//! A session is the only place document state lives. Input handlers,
//! stream producers and renderers all go through it, one call at a time.

mod chat;
mod editor;

pub use chat::{ChatAction, ChatSession, ERROR_PREFIX, REPLY_PREFIX, USER_PREFIX};
pub use editor::{EditSession, LoadStatus, SessionAction};

/// Lifecycle of an editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No document open.
    #[default]
    Idle,
    /// A document is open and accepting input.
    Editing,
    /// The document is being written out.
    Saving,
}

impl SessionState {
    /// Lower-case name for messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Editing => "editing",
            Self::Saving => "saving",
        }
    }
}
