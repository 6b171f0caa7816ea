//! # Consolidate Command Implementation
//!
//! Runs a full consolidation over the project root:
//! 1. Confirm before replacing an existing `all-in-one/` directory
//! 2. Collect every `.jar` under the root
//! 3. Copy them into `all-in-one/`, renaming repeats
//! 4. Register `all-in-one/` as a library for every module
//!
//! Progress is drawn with `indicatif`, the confirmation prompt uses
//! `dialoguer`. Without a terminal, and without `--yes`, an existing
//! directory is left alone and the run is reported as cancelled.
//!
//! Ctrl-C requests cancellation. Scanning and copying stop at the next file
//! and the run ends with the cancelled message; registration, once started,
//! runs to completion.

use anyhow::{Context, Result};
use clap::Args;
use dialoguer::{theme::ColorfulTheme, Confirm};
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::ReportedFailure;

use jarlibs::defaults::LIBRARY_NAME;
use jarlibs::output::{archives, emoji, user_can_confirm, OutputConfig};
use jarlibs::phases::{Consolidator, Notifier, Outcome};
use jarlibs::progress::{CancellationToken, Progress};
use jarlibs::project::ProjectStore;

/// Arguments for the consolidate command
#[derive(Args, Debug)]
pub struct ConsolidateArgs {
    /// Project root (defaults to the current directory)
    #[arg(long, value_name = "PATH", env = "JARLIBS_ROOT")]
    pub root: Option<PathBuf>,

    /// Replace an existing all-in-one directory without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Hide progress output; the final message is always shown
    #[arg(short, long)]
    pub quiet: bool,
}

/// Terminal front end for a run.
struct TerminalNotifier<'a> {
    output: &'a OutputConfig,
    root: PathBuf,
    assume_yes: bool,
    bar: ProgressBar,
}

impl<'a> TerminalNotifier<'a> {
    fn new(output: &'a OutputConfig, root: &Path, assume_yes: bool, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(100);
            let style = ProgressStyle::with_template("{bar:30} {pos:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            bar.set_style(style);
            bar
        };

        Self {
            output,
            root: root.to_path_buf(),
            assume_yes,
            bar,
        }
    }
}

impl Notifier for TerminalNotifier<'_> {
    fn confirm_overwrite(&self, dir: &Path) -> jarlibs::error::Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        if !user_can_confirm() {
            self.bar.suspend(|| {
                println!(
                    "{} {} already exists. Re-run with --yes to replace it.",
                    emoji(self.output, "⚠️ ", "[WARN]"),
                    dir.display()
                );
            });
            return Ok(false);
        }

        self.bar.suspend(|| {
            Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(format!(
                    "{} already exists. Delete it and create it again?",
                    dir.display()
                ))
                .default(false)
                .interact()
                .map_err(|e| jarlibs::error::Error::Io(io::Error::other(e.to_string())))
        })
    }

    fn progress(&self, progress: &Progress) {
        if let Some(fraction) = progress.fraction {
            self.bar.set_position((fraction.clamp(0.0, 1.0) * 100.0).round() as u64);
        }
        self.bar.set_message(progress.message.clone());
    }

    fn finish(&self, outcome: &Outcome) {
        self.bar.finish_and_clear();
        match outcome {
            Outcome::Done { files, skipped } => {
                println!(
                    "{} Processed {}",
                    emoji(self.output, "✅", "[OK]"),
                    archives(*files)
                );
                println!(
                    "   Library '{}' registered for every module",
                    LIBRARY_NAME
                );
                if *skipped > 0 {
                    println!(
                        "{} {} could not be added to the library (see log)",
                        emoji(self.output, "⚠️ ", "[WARN]"),
                        archives(*skipped)
                    );
                }
            }
            Outcome::NoFilesFound => {
                println!(
                    "{} No .jar files found under {}",
                    emoji(self.output, "ℹ️ ", "[INFO]"),
                    self.root.display()
                );
            }
            Outcome::Cancelled => {
                println!("{} Cancelled", emoji(self.output, "🚫", "[CANCELLED]"));
            }
            Outcome::Failed(e) => {
                eprintln!(
                    "{} Consolidation failed: {}",
                    emoji(self.output, "❌", "[ERROR]"),
                    e
                );
            }
        }
    }
}

/// Execute the consolidate command
pub fn execute(args: ConsolidateArgs, output: &OutputConfig) -> Result<()> {
    let root = match args.root {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    if !root.is_dir() {
        return Err(hints::root_not_found(&root));
    }
    let root = std::path::absolute(&root)
        .with_context(|| format!("Failed to resolve {}", root.display()))?;

    if !args.quiet {
        println!(
            "{} Consolidating archives under {}",
            emoji(output, "🔍", "[SCAN]"),
            root.display()
        );
    }

    let store = ProjectStore::new(&root);
    let notifier = TerminalNotifier::new(output, &root, args.yes, args.quiet);
    let outcome = Consolidator::new(&root, &store, &notifier)
        .with_cancellation(interrupt_token())
        .run();

    match outcome {
        Outcome::Failed(e) => Err(ReportedFailure(e).into()),
        _ => Ok(()),
    }
}

/// Token cancelled by Ctrl-C. The handler is installed on first use.
fn interrupt_token() -> CancellationToken {
    static TOKEN: OnceLock<CancellationToken> = OnceLock::new();
    TOKEN
        .get_or_init(|| {
            let token = CancellationToken::new();
            let on_interrupt = token.clone();
            if let Err(e) = ctrlc::set_handler(move || on_interrupt.cancel()) {
                warn!("Ctrl-C will not cancel the run: {}", e);
            }
            token
        })
        .clone()
}

mod hints {
    use std::path::Path;

    /// Error for a project root that does not exist or is not a directory.
    pub fn root_not_found(path: &Path) -> anyhow::Error {
        anyhow::anyhow!(
            "Project root not found: {path}\n\n\
             hint: Run jarlibs from inside your project\n\
             hint: Use --root to point at the project directory\n\
             hint: Set the JARLIBS_ROOT environment variable",
            path = path.display()
        )
    }
}
