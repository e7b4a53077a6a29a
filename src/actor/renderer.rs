//! Renderer Actor: Dedicated thread for painting frames.
//!
//! This actor owns the [`Display`]. It receives render commands from the
//! application loop and performs the actual output, so a slow panel
//! never stalls key handling.

use super::messages::RenderCommand;
use crate::display::Display;
use crossbeam_channel::Receiver;
use std::io;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, error};

/// Renderer actor that handles display output.
pub struct RendererActor {
    /// Handle to the render thread.
    handle: Option<JoinHandle<RenderStats>>,
}

/// Render statistics for debugging/profiling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Total frames painted.
    pub frames: u64,
    /// Total clears.
    pub clears: u64,
    /// Average paint time in microseconds.
    pub avg_render_us: u64,
    /// Last paint time in microseconds.
    pub last_render_us: u64,
}

impl RenderStats {
    fn record(&mut self, started: Instant) {
        self.frames += 1;
        self.last_render_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

        // Smoothed average
        if self.avg_render_us == 0 {
            self.avg_render_us = self.last_render_us;
        } else {
            self.avg_render_us = (self.avg_render_us * 15 + self.last_render_us) / 16;
        }
    }
}

impl RendererActor {
    /// Spawn the renderer actor thread.
    ///
    /// The thread runs until it receives [`RenderCommand::Shutdown`] or
    /// every sender is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn<D>(receiver: Receiver<RenderCommand>, display: D) -> io::Result<Self>
    where
        D: Display + 'static,
    {
        let handle = thread::Builder::new()
            .name("pocket-render".to_string())
            .spawn(move || {
                let mut display = display;
                let mut stats = RenderStats::default();
                if let Err(e) = Self::run_loop(&receiver, &mut display, &mut stats) {
                    error!(error = %e, "render thread failed");
                }
                debug!(?stats, "render thread stopped");
                stats
            })?;

        Ok(Self {
            handle: Some(handle),
        })
    }

    /// Wait for the render thread to finish and return its statistics.
    ///
    /// Send [`RenderCommand::Shutdown`] (or drop every sender) first.
    pub fn join(mut self) -> RenderStats {
        self.handle
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default()
    }

    /// Main render loop.
    fn run_loop<D: Display>(
        receiver: &Receiver<RenderCommand>,
        display: &mut D,
        stats: &mut RenderStats,
    ) -> io::Result<()> {
        while let Ok(command) = receiver.recv() {
            match command {
                RenderCommand::Paint(frame) => {
                    let started = Instant::now();
                    display.paint(&frame)?;
                    stats.record(started);
                }
                RenderCommand::Clear => {
                    display.clear()?;
                    stats.clears += 1;
                }
                RenderCommand::Shutdown => break,
            }
        }
        Ok(())
    }
}
