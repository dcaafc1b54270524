// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Review artifacts written to the output directory.
//!
//! A finished run leaves `<name>.json` (array of `{agent, message}` turns)
//! and `<name>.md` (one `## agent` section per turn). Reports such as the
//! mentor guidance or the revision history are plain Markdown files.

use crate::domain::transcript::{Transcript, Turn};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedTranscript {
    pub json_path: PathBuf,
    pub markdown_path: PathBuf,
}

pub async fn save_transcript(dir: &Path, name: &str, transcript: &Transcript) -> Result<SavedTranscript> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create output directory {:?}", dir))?;

    let json_path = dir.join(format!("{}.json", name));
    let json = serde_json::to_string_pretty(transcript).context("Failed to serialize transcript")?;
    tokio::fs::write(&json_path, json)
        .await
        .with_context(|| format!("Failed to write {:?}", json_path))?;

    let markdown_path = dir.join(format!("{}.md", name));
    tokio::fs::write(&markdown_path, transcript_markdown(transcript))
        .await
        .with_context(|| format!("Failed to write {:?}", markdown_path))?;

    info!("Review saved to {:?}", markdown_path);

    Ok(SavedTranscript {
        json_path,
        markdown_path,
    })
}

pub fn transcript_markdown(transcript: &Transcript) -> String {
    transcript
        .turns()
        .iter()
        .map(|turn| format!("## {}\n\n{}\n\n", turn.name, turn.text))
        .collect()
}

pub async fn save_text(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }
    tokio::fs::write(path, text)
        .await
        .with_context(|| format!("Failed to write {:?}", path))
}

/// Summary (last message) of a transcript saved by `save_transcript`
pub async fn load_summary(json_path: &Path) -> Result<Option<String>> {
    let content = tokio::fs::read_to_string(json_path)
        .await
        .with_context(|| format!("Failed to read review {:?}", json_path))?;
    let turns: Vec<Turn> = serde_json::from_str(&content)
        .with_context(|| format!("{:?} is not a saved review transcript", json_path))?;
    Ok(turns.into_iter().last().map(|t| t.text))
}
