// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Revision history commands
//!
//! Commands: list, report, compare

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use msreview_core::application::VersionStore;
use msreview_core::infrastructure::document_source::load_document;
use msreview_core::infrastructure::repositories::JsonFileVersionRepository;

#[derive(Subcommand)]
pub enum HistoryCommand {
    /// List tracked versions
    List {
        /// Project directory holding revision_history.json
        #[arg(value_name = "PROJECT_DIR")]
        project_dir: PathBuf,
    },

    /// Print the markdown revision report
    Report {
        #[arg(value_name = "PROJECT_DIR")]
        project_dir: PathBuf,

        /// Version texts to re-attach so change summaries can be computed
        #[arg(long = "version-file", value_name = "FILE")]
        version_files: Vec<PathBuf>,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare two versions
    Compare {
        #[arg(value_name = "PROJECT_DIR")]
        project_dir: PathBuf,

        /// Older version number
        #[arg(value_name = "A")]
        version_a: u32,

        /// Newer version number
        #[arg(value_name = "B")]
        version_b: u32,

        /// Text of each compared version; matched by content hash
        #[arg(long = "version-file", value_name = "FILE", required = true)]
        version_files: Vec<PathBuf>,
    },
}

pub async fn handle_command(command: HistoryCommand) -> Result<()> {
    match command {
        HistoryCommand::List { project_dir } => list(&project_dir).await,
        HistoryCommand::Report {
            project_dir,
            version_files,
            output,
        } => report(&project_dir, &version_files, output).await,
        HistoryCommand::Compare {
            project_dir,
            version_a,
            version_b,
            version_files,
        } => compare(&project_dir, version_a, version_b, &version_files).await,
    }
}

async fn open_store(project_dir: &Path, version_files: &[PathBuf]) -> Result<VersionStore> {
    let repository = Arc::new(JsonFileVersionRepository::new(project_dir));
    let mut store = VersionStore::open(repository)
        .await
        .with_context(|| format!("Failed to open revision history in {:?}", project_dir))?;

    for path in version_files {
        let document = load_document(path, None).await?;
        match store.attach_content(&document) {
            Some(n) => println!("{}", format!("Attached {} as version {}", path.display(), n).dimmed()),
            None => println!(
                "{}",
                format!("⚠ {} matches no tracked version", path.display()).yellow()
            ),
        }
    }

    Ok(store)
}

async fn list(project_dir: &Path) -> Result<()> {
    let store = open_store(project_dir, &[]).await?;

    if store.is_empty() {
        println!("No versions tracked in {}", project_dir.display());
        return Ok(());
    }

    println!("{}", format!("{} version(s):", store.len()).bold());
    for version in store.versions() {
        let status = if version.is_reviewed() {
            "reviewed".green()
        } else {
            "pending".yellow()
        };
        println!(
            "  v{}  {}  {}  {}  [{}]",
            version.version_number,
            version.created_at.format("%Y-%m-%d %H:%M"),
            version.content_hash.dimmed(),
            version.title,
            status
        );
        if let Some(path) = &version.review_artifact_path {
            println!("       review: {}", path.display());
        }
    }

    Ok(())
}

async fn report(project_dir: &Path, version_files: &[PathBuf], output: Option<PathBuf>) -> Result<()> {
    let store = open_store(project_dir, version_files).await?;
    let report = store.revision_report();

    match output {
        Some(path) => {
            std::fs::write(&path, report)
                .with_context(|| format!("Failed to write report to {:?}", path))?;
            println!("{}", format!("✓ Report written: {}", path.display()).green());
        }
        None => println!("{}", report),
    }

    Ok(())
}

async fn compare(project_dir: &Path, version_a: u32, version_b: u32, version_files: &[PathBuf]) -> Result<()> {
    let store = open_store(project_dir, version_files).await?;
    let diff = store
        .compare(version_a, version_b)
        .with_context(|| format!("Cannot compare versions {} and {}", version_a, version_b))?;

    println!("{}", format!("Version {} → {}", version_a, version_b).bold());
    if diff.is_identical() {
        println!("{}", "✓ No changes between these versions".green());
        return Ok(());
    }
    println!("{}", diff.summary());

    Ok(())
}
