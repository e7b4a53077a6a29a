//! Engine: Owns the terminal and the worker threads.
//!
//! The Engine is the entry point for running a session in a real
//! terminal. It switches the terminal into raw mode, spawns the input
//! and render actors, and hands out the channel ends the application
//! loops need. Dropping it stops the actors and restores the terminal.

use super::messages::RenderCommand;
use super::{InputActor, RendererActor};
use crate::display::TerminalDisplay;
use crate::input::InputEvent;
use crossbeam_channel::{bounded, Receiver, Sender};
use crossterm::{
    cursor,
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io;
use std::time::Duration;
use tracing::debug;

/// Configuration for the Engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Input poll timeout.
    pub input_poll_timeout: Duration,
    /// Whether to use alternate screen buffer.
    pub alternate_screen: bool,
    /// Terminal cell where the panel border starts.
    pub origin: (u16, u16),
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            input_poll_timeout: Duration::from_millis(10),
            alternate_screen: true,
            origin: (0, 0),
        }
    }
}

/// A running terminal session.
pub struct Engine {
    /// Configuration.
    config: EngineConfig,
    /// Input event receiver.
    input_rx: Receiver<InputEvent>,
    /// Render command sender.
    render_tx: Sender<RenderCommand>,
    /// Input actor handle.
    input_actor: Option<InputActor>,
    /// Renderer actor handle.
    renderer_actor: Option<RendererActor>,
    /// Panel size as `(columns, rows)`.
    grid: (usize, usize),
}

impl Engine {
    /// Start with the default configuration and a `columns x rows` panel.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup fails (raw mode, alternate screen, etc.).
    pub fn start(columns: usize, rows: usize) -> io::Result<Self> {
        Self::with_config(columns, rows, EngineConfig::default())
    }

    /// Start with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup fails or a thread cannot be spawned.
    /// The terminal is restored before returning.
    pub fn with_config(columns: usize, rows: usize, config: EngineConfig) -> io::Result<Self> {
        terminal::enable_raw_mode()?;

        let (input_tx, input_rx) = bounded::<InputEvent>(64);
        let (render_tx, render_rx) = bounded::<RenderCommand>(16);

        // Built before anything can fail so Drop restores the terminal.
        let mut engine = Self {
            config,
            input_rx,
            render_tx,
            input_actor: None,
            renderer_actor: None,
            grid: (columns, rows),
        };

        let mut stdout = io::stdout();
        if engine.config.alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
        }
        execute!(stdout, cursor::Hide, EnableBracketedPaste)?;

        let (x, y) = engine.config.origin;
        let display = TerminalDisplay::stdout(columns, rows).with_origin(x, y);
        engine.renderer_actor = Some(RendererActor::spawn(render_rx, display)?);
        engine.input_actor = Some(InputActor::spawn(
            input_tx,
            engine.config.input_poll_timeout,
        )?);

        debug!(columns, rows, "engine started");
        Ok(engine)
    }

    /// Panel size as `(columns, rows)`.
    pub const fn grid(&self) -> (usize, usize) {
        self.grid
    }

    /// Get the input receiver for event-driven loops.
    pub const fn inputs(&self) -> &Receiver<InputEvent> {
        &self.input_rx
    }

    /// Get the render command sender.
    pub const fn renderer(&self) -> &Sender<RenderCommand> {
        &self.render_tx
    }

    /// Blank the panel and redraw its border on the next paint.
    pub fn clear(&self) {
        let _ = self.render_tx.send(RenderCommand::Clear);
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        // Stop actors. Releasing the receiver first unblocks a pending send.
        drop(std::mem::replace(&mut self.input_rx, crossbeam_channel::never()));
        if let Some(actor) = self.input_actor.take() {
            actor.join();
        }

        let _ = self.render_tx.send(RenderCommand::Shutdown);
        if let Some(actor) = self.renderer_actor.take() {
            let stats = actor.join();
            debug!(frames = stats.frames, avg_render_us = stats.avg_render_us, "engine stopped");
        }

        // Restore terminal state
        let mut stdout = io::stdout();
        let _ = execute!(stdout, DisableBracketedPaste, cursor::Show);
        if self.config.alternate_screen {
            let _ = execute!(stdout, LeaveAlternateScreen);
        }
        let _ = terminal::disable_raw_mode();
    }
}
