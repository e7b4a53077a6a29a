//! Stream Actor: A producer thread feeding response text to the loop.
//!
//! The actor pulls chunks from a [`ChunkSource`] and forwards them as
//! [`StreamEvent`]s. Cancellation is cooperative: the flag is checked
//! between chunks, so a chunk already being fetched is allowed to finish.

use super::messages::StreamEvent;
use crossbeam_channel::Sender;
use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

/// Something that yields response text piece by piece.
///
/// `None` ends the stream normally. `Some(Err(message))` ends it with
/// a failure the user will see.
pub trait ChunkSource: Send + 'static {
    /// Block until the next piece is available.
    fn next_chunk(&mut self) -> Option<Result<String, String>>;
}

impl ChunkSource for Box<dyn ChunkSource> {
    fn next_chunk(&mut self) -> Option<Result<String, String>> {
        (**self).next_chunk()
    }
}

/// A canned response, optionally paced and optionally failing at the end.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    chunks: VecDeque<String>,
    delay: Duration,
    failure: Option<String>,
}

impl ScriptedSource {
    /// Yield `chunks` in order, then end.
    pub fn new<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            chunks: chunks.into_iter().map(Into::into).collect(),
            delay: Duration::ZERO,
            failure: None,
        }
    }

    /// A reply that repeats `prompt` back one word at a time.
    pub fn echo(prompt: &str) -> Self {
        let mut chunks = vec!["You said:".to_string()];
        chunks.extend(prompt.split_whitespace().map(|word| format!(" {word}")));
        Self::new(chunks)
    }

    /// Sleep this long before each chunk.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fail with `message` once the chunks run out.
    #[must_use]
    pub fn failing_with(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }
}

impl ChunkSource for ScriptedSource {
    fn next_chunk(&mut self) -> Option<Result<String, String>> {
        if let Some(chunk) = self.chunks.pop_front() {
            if !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
            return Some(Ok(chunk));
        }
        self.failure.take().map(Err)
    }
}

/// Handle to a running producer thread.
pub struct StreamActor {
    /// Identifier stamped on every event.
    stream_id: u32,
    /// Handle to the producer thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to stop between chunks.
    cancel: Arc<AtomicBool>,
}

impl StreamActor {
    /// Spawn a producer for `stream_id` draining `source` into `sender`.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn<S: ChunkSource>(
        stream_id: u32,
        source: S,
        sender: Sender<StreamEvent>,
    ) -> io::Result<Self> {
        let cancel = Arc::new(AtomicBool::new(false));
        let cancel_clone = cancel.clone();

        let handle = thread::Builder::new()
            .name(format!("pocket-stream-{stream_id}"))
            .spawn(move || {
                Self::run_loop(stream_id, source, &sender, &cancel_clone);
            })?;

        Ok(Self {
            stream_id,
            handle: Some(handle),
            cancel,
        })
    }

    /// The identifier on this producer's events.
    pub const fn stream_id(&self) -> u32 {
        self.stream_id
    }

    /// Ask the producer to stop before its next chunk.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// Check if the producer thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the producer thread to exit.
    ///
    /// Does not cancel; call [`cancel`](Self::cancel) first to stop early.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn run_loop<S: ChunkSource>(
        stream_id: u32,
        mut source: S,
        sender: &Sender<StreamEvent>,
        cancel: &AtomicBool,
    ) {
        debug!(stream_id, "stream started");
        loop {
            if cancel.load(Ordering::Relaxed) {
                debug!(stream_id, "stream cancelled");
                return;
            }
            let event = match source.next_chunk() {
                Some(Ok(content)) => StreamEvent::Chunk { stream_id, content },
                Some(Err(message)) => StreamEvent::Error { stream_id, message },
                None => StreamEvent::End { stream_id },
            };
            let done = event.is_terminal();
            if sender.send(event).is_err() || done {
                break;
            }
        }
        debug!(stream_id, "stream finished");
    }
}

impl Drop for StreamActor {
    fn drop(&mut self) {
        self.cancel();
    }
}
