//! Progress reporting and cooperative cancellation.
//!
//! Long-running phases report [`Progress`] through a [`ProgressSink`] and
//! poll a [`CancellationToken`] at safe points (between directory entries,
//! between copies). Progress is advisory only.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

/// Phase a progress update belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Walking the project tree.
    Scanning,
    /// Creating the consolidation directory.
    Preparing,
    /// Copying archives.
    Copying,
    /// Updating the project library.
    Registering,
}

/// A single progress update.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub phase: Phase,
    /// Overall completion in `0.0..=1.0`, if the reporter knows it.
    pub fraction: Option<f64>,
    /// Human-readable detail, e.g. the file currently handled.
    pub message: String,
}

impl Progress {
    pub fn new(phase: Phase, fraction: Option<f64>, message: impl Into<String>) -> Self {
        Self {
            phase,
            fraction,
            message: message.into(),
        }
    }
}

/// Receiver of progress updates.
pub trait ProgressSink {
    fn report(&self, progress: Progress);
}

/// A sink that drops every update.
pub struct NoOpProgress;

impl ProgressSink for NoOpProgress {
    fn report(&self, _progress: Progress) {}
}

/// Forwards updates across threads. Send errors mean the receiving side
/// has gone away, which only happens while a run is being torn down.
impl ProgressSink for Sender<Progress> {
    fn report(&self, progress: Progress) {
        let _ = self.send(progress);
    }
}

/// Shared cancellation flag.
///
/// Cloning yields a handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_token_starts_uncancelled() {
        assert!(!CancellationToken::new().is_cancelled());
    }

    #[test]
    fn test_token_clones_share_state() {
        let token = CancellationToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_channel_sink_forwards() {
        let (tx, rx) = mpsc::channel();
        tx.report(Progress::new(Phase::Copying, Some(0.5), "Copying: a.jar"));
        let received = rx.recv().unwrap();
        assert_eq!(received.phase, Phase::Copying);
        assert_eq!(received.message, "Copying: a.jar");
    }

    #[test]
    fn test_channel_sink_ignores_closed_receiver() {
        let (tx, rx) = mpsc::channel::<Progress>();
        drop(rx);
        tx.report(Progress::new(Phase::Scanning, None, "Found: a.jar"));
    }
}
