//! Application loops: One thread owns the session.
//!
//! Each loop blocks on whichever comes first: an input event, a batching
//! tick, or (in chat) a stream event. After handling it, the session is
//! asked for a frame, which only exists when the visible text changed.
//! No session state is shared with another thread.

use super::messages::{RenderCommand, StreamEvent};
use super::stream::{ChunkSource, StreamActor};
use crate::error::{Error, Result};
use crate::input::InputEvent;
use crate::session::{ChatAction, ChatSession, EditSession, SessionAction, ERROR_PREFIX};
use crate::text::wrap;
use crate::view::Frame;
use crossbeam_channel::{never, select, tick, unbounded, Receiver, Sender};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Why a loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The document was written and the session closed.
    Saved,
    /// The document was thrown away and the session closed.
    Discarded,
    /// The user left the chat.
    Left,
    /// The input channel closed. The session is left as it was.
    InputClosed,
}

/// A tick channel, or one that never fires when batching is off.
fn ticker(interval: Duration) -> Receiver<Instant> {
    if interval.is_zero() {
        never()
    } else {
        tick(interval)
    }
}

fn paint(render: &Sender<RenderCommand>, frame: Option<Frame>) -> Result<()> {
    if let Some(frame) = frame {
        render
            .send(RenderCommand::Paint(frame))
            .map_err(|_| Error::Disconnected("render"))?;
    }
    Ok(())
}

/// A frame holding an error message, wrapped to the pane.
pub fn notice_frame(message: &str, line_width: usize, height: usize) -> Frame {
    let mut lines = wrap(&format!("{ERROR_PREFIX}{message}"), line_width);
    lines.truncate(height);
    Frame::new(lines, 0)
}

/// Drive an open editing session until it is saved, discarded, or input ends.
///
/// A failed save paints a notice instead of the document. The document
/// comes back on the next key.
///
/// # Errors
///
/// Returns [`Error::Disconnected`] if the render thread is gone.
pub fn run_editor(
    session: &mut EditSession,
    inputs: &Receiver<InputEvent>,
    interval: Duration,
    render: &Sender<RenderCommand>,
) -> Result<LoopExit> {
    let ticks = ticker(interval);
    let mut showing_notice = false;

    session.invalidate();
    paint(render, session.take_frame())?;

    loop {
        let outcome = select! {
            recv(inputs) -> event => match event {
                Ok(event) => {
                    if showing_notice {
                        showing_notice = false;
                        session.invalidate();
                    }
                    Some(session.handle(event))
                }
                Err(_) => None,
            },
            recv(ticks) -> _ => {
                session.flush();
                Some(Ok(SessionAction::Continue))
            }
        };

        match outcome {
            None => {
                info!("input closed, leaving editor");
                return Ok(LoopExit::InputClosed);
            }
            Some(Ok(SessionAction::Continue)) => {}
            Some(Ok(SessionAction::Saved)) => return Ok(LoopExit::Saved),
            Some(Ok(SessionAction::Discarded)) => return Ok(LoopExit::Discarded),
            Some(Err(e)) => {
                warn!(error = %e, "editor action failed");
                let pane = session.pane();
                let frame = notice_frame(&e.to_string(), pane.line_width(), pane.window().height());
                paint(render, Some(frame))?;
                showing_notice = true;
            }
        }

        if !showing_notice {
            paint(render, session.take_frame())?;
        }
    }
}

/// Drive a chat until the user leaves or input ends.
///
/// `responder` is called with each submitted prompt and must return the
/// source of the reply. Its chunks are produced on a [`StreamActor`]
/// thread and applied here. Leaving cancels a running reply and waits for
/// its thread before returning.
///
/// # Errors
///
/// Returns [`Error::Disconnected`] if the render thread is gone.
pub fn run_chat<F, S>(
    chat: &mut ChatSession,
    inputs: &Receiver<InputEvent>,
    interval: Duration,
    render: &Sender<RenderCommand>,
    mut responder: F,
) -> Result<LoopExit>
where
    F: FnMut(&str) -> S,
    S: ChunkSource,
{
    let ticks = ticker(interval);
    let (stream_tx, stream_rx) = unbounded::<StreamEvent>();
    let mut producer: Option<StreamActor> = None;

    chat.invalidate();
    paint(render, chat.take_frame())?;

    loop {
        let action = select! {
            recv(inputs) -> event => event.ok().map(|event| chat.handle(event)),
            recv(ticks) -> _ => {
                chat.flush();
                Some(ChatAction::Continue)
            }
            recv(stream_rx) -> event => {
                if let Ok(event) = event {
                    chat.on_stream(&event);
                    if event.is_terminal()
                        && producer.as_ref().is_some_and(|p| p.stream_id() == event.stream_id())
                    {
                        if let Some(finished) = producer.take() {
                            finished.join();
                        }
                    }
                }
                Some(ChatAction::Continue)
            }
        };

        match action {
            None => {
                info!("input closed, leaving chat");
                stop_stream(chat, &mut producer);
                return Ok(LoopExit::InputClosed);
            }
            Some(ChatAction::Continue) => {}
            Some(ChatAction::Submit { stream_id, prompt }) => {
                if let Some(stale) = producer.take() {
                    stale.cancel();
                    stale.join();
                }
                match StreamActor::spawn(stream_id, responder(&prompt), stream_tx.clone()) {
                    Ok(actor) => producer = Some(actor),
                    Err(e) => {
                        warn!(stream_id, error = %e, "could not start reply");
                        chat.on_stream(&StreamEvent::Error {
                            stream_id,
                            message: e.to_string(),
                        });
                    }
                }
            }
            Some(ChatAction::Leave) => {
                stop_stream(chat, &mut producer);
                return Ok(LoopExit::Left);
            }
        }

        paint(render, chat.take_frame())?;
    }
}

/// Cancel the running reply, wait for its thread, and drop what it left.
fn stop_stream(chat: &mut ChatSession, producer: &mut Option<StreamActor>) {
    if let Some(actor) = producer.take() {
        actor.cancel();
        actor.join();
    }
    if let Some(stream_id) = chat.abandon_stream() {
        info!(stream_id, "reply abandoned");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::session::SessionState;
    use std::thread;

    fn config() -> Config {
        Config {
            buffer_interval_ms: 0,
            ..Config::with_grid(10, 3)
        }
    }

    #[test]
    fn test_notice_frame_wraps_and_truncates() {
        let frame = notice_frame("disk is full and read only", 10, 2);
        assert_eq!(frame.lines.len(), 2);
        assert_eq!(frame.lines[0], "[Error]");
        assert_eq!(frame.offset, 0);
    }

    #[test]
    fn test_editor_loop_discards_on_cancel() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = EditSession::new(&config());
        session.new_document(dir.path().join("a.txt")).unwrap();

        let (input_tx, input_rx) = unbounded();
        let (render_tx, render_rx) = unbounded();
        for c in "hi".chars() {
            input_tx.send(InputEvent::Char(c)).unwrap();
        }
        input_tx.send(InputEvent::Cancel).unwrap();

        let exit = run_editor(&mut session, &input_rx, Duration::ZERO, &render_tx).unwrap();
        assert_eq!(exit, LoopExit::Discarded);
        assert_eq!(session.state(), SessionState::Idle);
        assert!(!dir.path().join("a.txt").exists());

        let frames: Vec<_> = render_rx.try_iter().collect();
        // Empty document, "h", "hi".
        assert_eq!(frames.len(), 3);
    }

    #[test]
    fn test_editor_loop_reports_closed_input() {
        let mut session = EditSession::new(&config());
        session.new_document("unused.txt").unwrap();
        let (input_tx, input_rx) = unbounded::<InputEvent>();
        let (render_tx, _render_rx) = unbounded();
        drop(input_tx);

        let exit = run_editor(&mut session, &input_rx, Duration::ZERO, &render_tx).unwrap();
        assert_eq!(exit, LoopExit::InputClosed);
        assert_eq!(session.state(), SessionState::Editing);
    }

    #[test]
    fn test_editor_loop_fails_without_renderer() {
        let mut session = EditSession::new(&config());
        session.new_document("unused.txt").unwrap();
        let (_input_tx, input_rx) = unbounded::<InputEvent>();
        let (render_tx, render_rx) = unbounded();
        drop(render_rx);

        let err = run_editor(&mut session, &input_rx, Duration::ZERO, &render_tx).unwrap_err();
        assert!(matches!(err, Error::Disconnected("render")));
    }

    #[test]
    fn test_chat_loop_leave_cancels_stream() {
        let mut chat = ChatSession::new(&config());
        let (input_tx, input_rx) = unbounded();
        let (render_tx, _render_rx) = unbounded();

        let handle = thread::spawn(move || {
            let slow = |_: &str| EndlessSource(Duration::from_millis(2));
            let exit = run_chat(&mut chat, &input_rx, Duration::ZERO, &render_tx, slow).unwrap();
            (exit, chat)
        });

        input_tx.send(InputEvent::Char('q')).unwrap();
        input_tx.send(InputEvent::Enter).unwrap();
        thread::sleep(Duration::from_millis(20));
        input_tx.send(InputEvent::Cancel).unwrap();

        let (exit, chat) = handle.join().unwrap();
        assert_eq!(exit, LoopExit::Left);
        assert!(!chat.is_streaming());
        assert!(chat.transcript().starts_with("> q\n"));
    }

    /// Yields "x" forever so only cancellation can stop it.
    struct EndlessSource(Duration);

    impl ChunkSource for EndlessSource {
        fn next_chunk(&mut self) -> Option<std::result::Result<String, String>> {
            thread::sleep(self.0);
            Some(Ok("x".to_string()))
        }
    }
}
