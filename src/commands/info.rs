//! # Info Command Implementation
//!
//! Reports the current state of the consolidated library: its classpath
//! roots, the modules that depend on it and how many archives sit in
//! `all-in-one/`. Nothing is modified.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use jarlibs::defaults::{consolidation_dir, is_archive_name, LIBRARY_NAME};
use jarlibs::output::{archives, emoji, OutputConfig};
use jarlibs::project::{ProjectMetadata, ProjectStore};

/// Arguments for the info command
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Project root (defaults to the current directory)
    #[arg(long, value_name = "PATH", env = "JARLIBS_ROOT")]
    pub root: Option<PathBuf>,

    /// Print a JSON document instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct InfoReport {
    root: PathBuf,
    metadata: PathBuf,
    library: String,
    registered: bool,
    classes: Vec<String>,
    modules: Vec<String>,
    archives: usize,
}

impl InfoReport {
    fn build(root: PathBuf, store: &ProjectStore, metadata: &ProjectMetadata) -> Self {
        let library = metadata.libraries.iter().find(|l| l.name == LIBRARY_NAME);
        let modules = metadata
            .modules
            .iter()
            .filter(|m| m.dependencies.iter().any(|d| d == LIBRARY_NAME))
            .map(|m| m.name.clone())
            .collect();

        Self {
            archives: count_archives(&root),
            metadata: store.path().to_path_buf(),
            library: LIBRARY_NAME.to_string(),
            registered: library.is_some(),
            classes: library.map(|l| l.classes.clone()).unwrap_or_default(),
            modules,
            root,
        }
    }
}

fn count_archives(root: &std::path::Path) -> usize {
    std::fs::read_dir(consolidation_dir(root))
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
                .filter(|e| is_archive_name(&e.file_name().to_string_lossy()))
                .count()
        })
        .unwrap_or(0)
}

/// Execute the info command
pub fn execute(args: InfoArgs, output: &OutputConfig) -> Result<()> {
    let root = match args.root {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    let root = std::path::absolute(&root)
        .with_context(|| format!("Failed to resolve {}", root.display()))?;

    let store = ProjectStore::new(&root);
    let metadata = store.load()?;
    let report = InfoReport::build(root, &store, &metadata);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, output);
    }
    Ok(())
}

fn print_report(report: &InfoReport, output: &OutputConfig) {
    println!(
        "{} Project: {}",
        emoji(output, "📦", "[PROJECT]"),
        report.root.display()
    );
    println!("   Metadata: {}", report.metadata.display());
    println!(
        "   Consolidated: {}",
        archives(report.archives)
    );

    if !report.registered {
        println!(
            "{} Library '{}' is not registered",
            emoji(output, "ℹ️ ", "[INFO]"),
            report.library
        );
        return;
    }

    println!(
        "{} Library '{}' ({} roots)",
        emoji(output, "📚", "[LIBRARY]"),
        report.library,
        report.classes.len()
    );
    for class in &report.classes {
        println!("   {}", class);
    }
    if report.modules.is_empty() {
        println!("   Used by no module");
    } else {
        println!("   Used by: {}", report.modules.join(", "));
    }
}
