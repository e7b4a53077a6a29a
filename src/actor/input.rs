//! Input Actor: Dedicated thread for polling terminal events.
//!
//! This actor runs in its own thread and uses crossterm's event polling
//! to capture key presses, translating them into the engine's
//! [`InputEvent`] alphabet without blocking the application loop.

use crate::input::InputEvent;
use crossbeam_channel::{SendTimeoutError, Sender};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// How long one delivery attempt waits on a full channel before the
/// shutdown flag is checked again.
const SEND_SLICE: Duration = Duration::from_millis(20);

/// Input actor that polls terminal events.
pub struct InputActor {
    /// Handle to the input thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl InputActor {
    /// Spawn the input actor thread.
    ///
    /// # Arguments
    ///
    /// * `sender` - Channel to send input events to the application loop.
    /// * `poll_timeout` - How long to wait for events before checking shutdown.
    pub fn spawn(sender: Sender<InputEvent>, poll_timeout: Duration) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("pocket-input".to_string())
            .spawn(move || {
                Self::run_loop(&sender, &shutdown_clone, poll_timeout);
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the input thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the input thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main input polling loop.
    fn run_loop(sender: &Sender<InputEvent>, shutdown: &AtomicBool, poll_timeout: Duration) {
        debug!("input actor started");
        while !shutdown.load(Ordering::Relaxed) {
            // Poll with a timeout so the shutdown flag is seen promptly.
            match event::poll(poll_timeout) {
                Ok(true) => match event::read() {
                    Ok(event) => {
                        if !Self::forward(sender, event, shutdown) {
                            break;
                        }
                    }
                    Err(e) => warn!(error = %e, "failed to read terminal event"),
                },
                Ok(false) => {}
                Err(e) => warn!(error = %e, "failed to poll terminal events"),
            }
        }
        debug!("input actor stopped");
    }

    /// Translate one terminal event and send the result.
    ///
    /// Returns `false` once the receiver is gone or shutdown was requested
    /// while the channel was full.
    fn forward(sender: &Sender<InputEvent>, event: Event, shutdown: &AtomicBool) -> bool {
        match event {
            Event::Key(key) => match convert_key(key) {
                Some(input) => deliver(sender, input, shutdown),
                None => true,
            },
            Event::Paste(text) => convert_paste(&text).all(|input| deliver(sender, input, shutdown)),
            _ => true,
        }
    }
}

/// Send one event, waiting for room without ignoring shutdown.
fn deliver(sender: &Sender<InputEvent>, mut input: InputEvent, shutdown: &AtomicBool) -> bool {
    loop {
        match sender.send_timeout(input, SEND_SLICE) {
            Ok(()) => return true,
            Err(SendTimeoutError::Timeout(back)) => {
                if shutdown.load(Ordering::Relaxed) {
                    debug!("input channel full at shutdown, dropping pending input");
                    return false;
                }
                input = back;
            }
            Err(SendTimeoutError::Disconnected(_)) => return false,
        }
    }
}

impl Drop for InputActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Map a crossterm key press onto the input alphabet.
///
/// Releases and unmapped keys yield `None`.
pub fn convert_key(key: KeyEvent) -> Option<InputEvent> {
    // Only process key press events (not release or repeat)
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('s' | 'S') => Some(InputEvent::Save),
            KeyCode::Char('c' | 'C' | 'q' | 'Q') => Some(InputEvent::Cancel),
            _ => None,
        };
    }

    Some(match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::ALT) => InputEvent::Char(c),
        KeyCode::Tab => InputEvent::Char('\t'),
        KeyCode::Enter => InputEvent::Enter,
        KeyCode::Backspace => InputEvent::Backspace,
        KeyCode::Up => InputEvent::ScrollUp,
        KeyCode::Down => InputEvent::ScrollDown,
        KeyCode::PageUp => InputEvent::PageUp,
        KeyCode::PageDown => InputEvent::PageDown,
        KeyCode::Esc => InputEvent::Cancel,
        _ => return None,
    })
}

/// Turn bracketed-paste text into typed characters.
pub fn convert_paste(text: &str) -> impl Iterator<Item = InputEvent> + '_ {
    text.chars().filter(|&c| c != '\r').map(|c| match c {
        '\n' => InputEvent::Enter,
        c => InputEvent::Char(c),
    })
}
