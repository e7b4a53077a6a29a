//! Message types for actor communication.
//!
//! These enums define the protocol between the application loop, the
//! renderer thread and stream producers.

use crate::view::Frame;

/// Commands sent to the render thread.
#[derive(Debug)]
pub enum RenderCommand {
    /// Show this frame.
    Paint(Frame),

    /// Blank the display.
    Clear,

    /// Shutdown the render thread.
    Shutdown,
}

/// Events from a stream producer thread.
///
/// These carry text arriving from an external source, such as a
/// chat-completion response, into the application loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A piece of text.
    Chunk {
        /// Which stream produced it.
        stream_id: u32,
        /// The text content.
        content: String,
    },

    /// The stream finished normally.
    End {
        /// Which stream finished.
        stream_id: u32,
    },

    /// The stream failed; no more events follow.
    Error {
        /// Which stream failed.
        stream_id: u32,
        /// What went wrong.
        message: String,
    },
}

impl StreamEvent {
    /// The stream this event belongs to.
    pub const fn stream_id(&self) -> u32 {
        match self {
            Self::Chunk { stream_id, .. }
            | Self::End { stream_id }
            | Self::Error { stream_id, .. } => *stream_id,
        }
    }

    /// Check if no more events will follow from this stream.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::End { .. } | Self::Error { .. })
    }
}
