//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;

use crate::commands;

/// jarlibs - Gather every .jar in a project into one library
#[derive(Parser, Debug)]
#[command(name = "jarlibs")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        default_value = "warn",
        env = "JARLIBS_LOG"
    )]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Copy every .jar under the project into all-in-one/ and register it as a library
    Consolidate(commands::consolidate::ConsolidateArgs),

    /// Show the all-in-one library registration and the modules using it
    Info(commands::info::InfoArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);
        let output = jarlibs::output::OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Consolidate(args) => commands::consolidate::execute(args, &output),
            Commands::Info(args) => commands::info::execute(args, &output),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Route `log` output to stderr. `RUST_LOG` takes precedence over the flag.
fn init_logging(level: &str) {
    let filter = level.parse::<LevelFilter>().unwrap_or(LevelFilter::Warn);
    let mut builder = env_logger::Builder::new();
    builder.filter_level(filter).format_timestamp(None);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    // A logger may already be installed when running under a test harness
    let _ = builder.try_init();
}
