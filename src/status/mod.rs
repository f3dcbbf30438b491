// src/status/mod.rs

//! Pinned status line at the bottom of the terminal.
//!
//! The surface is shared by two tasks:
//! - the foreground (orchestrator + process runner) sets the text and asks for
//!   a redraw after every line of build output;
//! - a background ticker advances the spinner frame every 100 ms and redraws.
//!
//! They only share [`StatusState`]. Text and frame are separate fields with
//! a single writer each, so no lock spans both. Teardown is the one point of
//! real synchronisation: [`StatusSurface::stop`] signals the ticker and joins
//! it before the terminal is restored.

pub mod frames;
pub mod terminal;

use std::io::IsTerminal;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

pub use terminal::{CrosstermTerminal, NoopTerminal, TerminalBackend};

/// Period of the background redraw.
pub const FRAME_PERIOD: Duration = Duration::from_millis(100);

/// State read by every redraw.
#[derive(Debug, Default)]
pub struct StatusState {
    text: Mutex<String>,
    frame: AtomicUsize,
    stopped: AtomicBool,
}

impl StatusState {
    pub fn text(&self) -> String {
        self.text
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set_text(&self, text: String) {
        *self.text.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = text;
    }

    pub fn frame(&self) -> usize {
        self.frame.load(Ordering::Relaxed)
    }

    fn advance_frame(&self) {
        self.frame.fetch_add(1, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    fn mark_stopped(&self) {
        self.stopped.store(true, Ordering::Release);
    }
}

/// Cloneable handle used by the foreground to update and redraw the bar.
#[derive(Clone)]
pub struct StatusHandle {
    state: Arc<StatusState>,
    backend: Arc<dyn TerminalBackend>,
}

impl std::fmt::Debug for StatusHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusHandle")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl StatusHandle {
    /// A handle that never renders (for dry runs and tests).
    pub fn detached() -> Self {
        let state = StatusState::default();
        state.mark_stopped();
        Self {
            state: Arc::new(state),
            backend: Arc::new(NoopTerminal),
        }
    }

    /// Replace the status text. The next redraw picks it up.
    pub fn set_text(&self, text: impl Into<String>) {
        self.state.set_text(text.into());
    }

    pub fn text(&self) -> String {
        self.state.text()
    }

    /// Whether redraws currently reach the terminal.
    pub fn is_active(&self) -> bool {
        !self.state.is_stopped()
    }

    /// Render the current snapshot. A no-op once the surface is stopped.
    pub fn redraw(&self) {
        if self.state.is_stopped() {
            return;
        }
        let text = self.state.text();
        let frame = self.state.frame();
        if let Err(e) = self.backend.draw_bar(&text, frame) {
            debug!(error = %e, "status redraw failed");
        }
    }
}

struct Ticker {
    stop_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

/// Owner of the status bar lifecycle: construct at run start, `stop` at the
/// end of the run or on interruption.
pub struct StatusSurface {
    handle: StatusHandle,
    ticker: Option<Ticker>,
}

impl std::fmt::Debug for StatusSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusSurface")
            .field("handle", &self.handle)
            .field("ticking", &self.ticker.is_some())
            .finish()
    }
}

impl StatusSurface {
    /// Start a surface on stdout.
    ///
    /// Falls back to a silent surface when stdout is not an interactive
    /// terminal. Must be called from within a Tokio runtime.
    pub fn init() -> Self {
        if std::io::stdout().is_terminal() {
            Self::with_backend(Arc::new(CrosstermTerminal::new()))
        } else {
            debug!("stdout is not a terminal; status bar disabled");
            Self::with_backend(Arc::new(NoopTerminal))
        }
    }

    /// Start a surface on an explicit backend.
    ///
    /// If the backend is not interactive, or reserving the bottom row fails,
    /// the surface stays inert for the whole run.
    pub fn with_backend(backend: Arc<dyn TerminalBackend>) -> Self {
        let handle = StatusHandle {
            state: Arc::new(StatusState::default()),
            backend,
        };

        if !handle.backend.is_interactive() {
            handle.state.mark_stopped();
            return Self {
                handle,
                ticker: None,
            };
        }

        if let Err(e) = handle.backend.reserve_bottom_row() {
            warn!(error = %e, "could not reserve status row; continuing without status bar");
            handle.state.mark_stopped();
            return Self {
                handle,
                ticker: None,
            };
        }

        let ticker = spawn_ticker(handle.clone());
        Self {
            handle,
            ticker: Some(ticker),
        }
    }

    pub fn handle(&self) -> StatusHandle {
        self.handle.clone()
    }

    pub fn is_active(&self) -> bool {
        self.ticker.is_some()
    }

    /// Stop the ticker, wait for it, then restore the terminal.
    ///
    /// Idempotent; calling it on an inert surface does nothing.
    pub async fn stop(&mut self) {
        let Some(ticker) = self.ticker.take() else {
            return;
        };

        self.handle.state.mark_stopped();
        // The ticker may already have exited; a closed channel is fine.
        let _ = ticker.stop_tx.send(());
        if let Err(e) = ticker.join.await {
            warn!(error = %e, "status ticker ended abnormally");
        }

        if let Err(e) = self.handle.backend.restore() {
            warn!(error = %e, "failed to restore terminal scroll region");
        }
    }
}

impl Drop for StatusSurface {
    fn drop(&mut self) {
        // Best effort for paths that never reached `stop` (e.g. a panic).
        if let Some(ticker) = self.ticker.take() {
            self.handle.state.mark_stopped();
            ticker.join.abort();
            let _ = self.handle.backend.restore();
        }
    }
}

fn spawn_ticker(handle: StatusHandle) -> Ticker {
    let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

    let join = tokio::spawn(async move {
        let mut interval = tokio::time::interval(FRAME_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = &mut stop_rx => break,
                _ = interval.tick() => {
                    handle.state.advance_frame();
                    handle.redraw();
                }
            }
        }

        debug!("status ticker stopped");
    });

    Ticker { stop_tx, join }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[derive(Debug, Default)]
    struct CountingTerminal {
        draws: AtomicUsize,
        restores: AtomicUsize,
        reserves: AtomicUsize,
        fail_reserve: bool,
    }

    impl TerminalBackend for CountingTerminal {
        fn is_interactive(&self) -> bool {
            true
        }

        fn reserve_bottom_row(&self) -> io::Result<()> {
            self.reserves.fetch_add(1, Ordering::SeqCst);
            if self.fail_reserve {
                return Err(io::Error::other("no tty"));
            }
            Ok(())
        }

        fn draw_bar(&self, _text: &str, _frame: usize) -> io::Result<()> {
            self.draws.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn restore(&self) -> io::Result<()> {
            self.restores.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn ticker_redraws_periodically() {
        let term = Arc::new(CountingTerminal::default());
        let mut surface = StatusSurface::with_backend(term.clone());
        assert!(surface.is_active());

        tokio::time::sleep(Duration::from_millis(350)).await;
        surface.stop().await;

        let draws = term.draws.load(Ordering::SeqCst);
        assert!(draws >= 2, "expected repeated ticks, got {draws}");
        assert!(surface.handle().state.frame() >= 2);
    }

    #[tokio::test]
    async fn stop_is_idempotent_and_restores_once() {
        let term = Arc::new(CountingTerminal::default());
        let mut surface = StatusSurface::with_backend(term.clone());

        surface.stop().await;
        surface.stop().await;
        drop(surface);

        assert_eq!(term.reserves.load(Ordering::SeqCst), 1);
        assert_eq!(term.restores.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn no_redraws_after_stop() {
        let term = Arc::new(CountingTerminal::default());
        let mut surface = StatusSurface::with_backend(term.clone());
        let handle = surface.handle();
        surface.stop().await;

        let before = term.draws.load(Ordering::SeqCst);
        handle.set_text("late");
        handle.redraw();
        assert_eq!(term.draws.load(Ordering::SeqCst), before);
        assert!(!handle.is_active());
    }

    #[tokio::test]
    async fn failed_reserve_leaves_surface_inert() {
        let term = Arc::new(CountingTerminal {
            fail_reserve: true,
            ..Default::default()
        });
        let mut surface = StatusSurface::with_backend(term.clone());
        assert!(!surface.is_active());

        surface.handle().redraw();
        surface.stop().await;

        assert_eq!(term.draws.load(Ordering::SeqCst), 0);
        assert_eq!(term.restores.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn set_text_does_not_draw() {
        let handle = StatusHandle::detached();
        handle.set_text("1/1 | A (esp32) | building");
        assert_eq!(handle.text(), "1/1 | A (esp32) | building");
        assert!(!handle.is_active());
    }
}
