//! Orchestrator for a complete consolidation run
//!
//! Coordinates the phases and the user:
//!
//! 1. Confirm before replacing an existing consolidation directory
//! 2. Collect archives (background worker)
//! 3. Prepare the destination and copy archives (background worker)
//! 4. Register the directory as a project library (calling thread, inside
//!    the project's exclusive write section, not cancellable)
//!
//! Every run ends in exactly one [`Outcome`], reported once through
//! [`Notifier::finish`].

use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::thread;

use log::{debug, warn};

use super::collect::Collector;
use super::{materialize, register};
use crate::defaults::{consolidation_dir, LIBRARY_NAME};
use crate::error::{Error, Result};
use crate::progress::{CancellationToken, Phase, Progress};
use crate::project::ProjectService;

/// States of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Confirming,
    Scanning,
    NoFilesFound,
    Preparing,
    Copying,
    Registering,
    Done,
    Failed,
    Cancelled,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunState::NoFilesFound | RunState::Done | RunState::Failed | RunState::Cancelled
        )
    }

    /// Whether a run may move from `self` to `next`.
    pub fn can_transition_to(self, next: RunState) -> bool {
        use RunState::*;
        match (self, next) {
            (Idle, Confirming) | (Idle, Scanning) => true,
            (Confirming, Scanning) => true,
            (Scanning, NoFilesFound) | (Scanning, Preparing) => true,
            (Preparing, Copying) => true,
            (Copying, Registering) => true,
            (Registering, Done) => true,
            (Confirming | Scanning | Copying, Cancelled) => true,
            (from, Failed) => from != Idle && !from.is_terminal(),
            _ => false,
        }
    }
}

/// How a run ended.
#[derive(Debug)]
pub enum Outcome {
    /// Archives were copied and registered.
    Done {
        /// Number of archives discovered and copied.
        files: usize,
        /// Archives left out of the library because they were unreadable.
        skipped: usize,
    },
    /// The scan found nothing; nothing was written.
    NoFilesFound,
    /// The user declined or the run was cancelled.
    Cancelled,
    /// The run stopped on an error.
    Failed(Error),
}

impl Outcome {
    fn state(&self) -> RunState {
        match self {
            Outcome::Done { .. } => RunState::Done,
            Outcome::NoFilesFound => RunState::NoFilesFound,
            Outcome::Cancelled => RunState::Cancelled,
            Outcome::Failed(_) => RunState::Failed,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

/// User-facing side of a run: confirmation, progress and the final message.
pub trait Notifier {
    /// Ask whether an existing consolidation directory may be deleted and
    /// recreated.
    fn confirm_overwrite(&self, dir: &Path) -> Result<bool>;

    /// Advisory progress update.
    fn progress(&self, progress: &Progress);

    /// Called exactly once per run with the terminal outcome.
    fn finish(&self, outcome: &Outcome);
}

/// One consolidation run over a project root.
pub struct Consolidator<'a> {
    root: PathBuf,
    dest: PathBuf,
    library: String,
    service: &'a dyn ProjectService,
    notifier: &'a dyn Notifier,
    cancel: CancellationToken,
    history: Vec<RunState>,
}

impl<'a> Consolidator<'a> {
    pub fn new(
        root: impl Into<PathBuf>,
        service: &'a dyn ProjectService,
        notifier: &'a dyn Notifier,
    ) -> Self {
        let root = root.into();
        let dest = consolidation_dir(&root);
        Self {
            root,
            dest,
            library: LIBRARY_NAME.to_string(),
            service,
            notifier,
            cancel: CancellationToken::new(),
            history: vec![RunState::Idle],
        }
    }

    /// Use an externally owned cancellation token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// The consolidation directory this run writes.
    pub fn destination(&self) -> &Path {
        &self.dest
    }

    /// States visited so far, starting with `Idle`.
    pub fn history(&self) -> &[RunState] {
        &self.history
    }

    fn state(&self) -> RunState {
        self.history.last().copied().unwrap_or(RunState::Idle)
    }

    fn transition(&mut self, next: RunState) {
        let current = self.state();
        if !current.can_transition_to(next) {
            warn!("Unexpected run transition {:?} -> {:?}", current, next);
        }
        debug!("Run state {:?} -> {:?}", current, next);
        self.history.push(next);
    }

    /// Execute the run and report its outcome.
    pub fn run(&mut self) -> Outcome {
        let outcome = match self.execute() {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancellation() => Outcome::Cancelled,
            Err(e) => Outcome::Failed(e),
        };
        if self.state() != outcome.state() {
            self.transition(outcome.state());
        }
        self.notifier.finish(&outcome);
        outcome
    }

    fn execute(&mut self) -> Result<Outcome> {
        let confirmed = if self.dest.exists() {
            self.transition(RunState::Confirming);
            if !self.notifier.confirm_overwrite(&self.dest)? {
                return Err(Error::DestinationConflict {
                    path: self.dest.clone(),
                });
            }
            true
        } else {
            false
        };

        self.transition(RunState::Scanning);
        self.notifier.progress(&Progress::new(
            Phase::Scanning,
            Some(0.1),
            "Scanning for archives...",
        ));
        let collector = Collector::new(&self.root).exclude(self.dest.clone());
        let cancel = self.cancel.clone();
        let discovery = self.off_thread(move |tx| collector.discover(&cancel, tx))?;
        if discovery.cancelled {
            return Err(Error::Cancelled);
        }
        if discovery.files.is_empty() {
            self.transition(RunState::NoFilesFound);
            return Ok(Outcome::NoFilesFound);
        }
        debug!("Discovered {} archive(s)", discovery.files.len());

        self.transition(RunState::Preparing);
        self.notifier.progress(&Progress::new(
            Phase::Preparing,
            Some(0.3),
            format!("Creating {}...", self.dest.display()),
        ));
        let dest = self.dest.clone();
        self.off_thread(move |_| materialize::prepare_destination(&dest, confirmed))??;

        self.transition(RunState::Copying);
        self.notifier.progress(&Progress::new(
            Phase::Copying,
            Some(0.5),
            "Copying archives...",
        ));
        let files = discovery.files;
        let dest = self.dest.clone();
        let cancel = self.cancel.clone();
        let copied =
            self.off_thread(move |tx| materialize::materialize(&files, &dest, &cancel, tx))??;

        self.transition(RunState::Registering);
        self.notifier.progress(&Progress::new(
            Phase::Registering,
            Some(0.8),
            format!("Registering library '{}'...", self.library),
        ));
        let registration = register::register(self.service, &self.library, &self.dest)?;
        self.notifier.progress(&Progress::new(
            Phase::Registering,
            Some(1.0),
            format!("Library '{}' registered", self.library),
        ));

        self.transition(RunState::Done);
        Ok(Outcome::Done {
            files: copied.len(),
            skipped: registration.skipped.len(),
        })
    }

    /// Run `job` on a worker thread, forwarding its progress to the notifier
    /// from the calling thread until it finishes.
    fn off_thread<T, F>(&self, job: F) -> Result<T>
    where
        T: Send,
        F: FnOnce(&Sender<Progress>) -> T + Send,
    {
        let (tx, rx) = mpsc::channel();
        thread::scope(|scope| {
            let handle = scope.spawn(move || job(&tx));
            for progress in rx.iter() {
                self.notifier.progress(&progress);
            }
            handle
                .join()
                .map_err(|_| Error::Io(io::Error::other("worker thread panicked")))
        })
    }
}
