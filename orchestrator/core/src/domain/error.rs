// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Review Error Taxonomy
//
// Every failure a review run or the version store can surface. All variants
// are fatal to the operation that raised them; nothing here is retried.

use crate::domain::llm::LLMError;
use crate::domain::repository::RepositoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReviewError {
    /// Malformed roster, raised before any backend call
    #[error("Invalid team: {0}")]
    InvalidTeam(String),

    /// Version index outside `[1, count]`; the store is left unmodified
    #[error("Version {requested} is out of range (store holds {count} version(s))")]
    OutOfRange { requested: u32, count: usize },

    #[error("Unknown tool requested by model: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for tool '{tool}': {reason}")]
    InvalidToolArguments { tool: String, reason: String },

    #[error("Backend call failed: {0}")]
    Backend(#[from] LLMError),

    #[error("Failed to persist revision history: {0}")]
    Persistence(#[from] RepositoryError),

    /// Version was reloaded from history without its document text
    #[error("Content of version {0} is not available; re-ingest the document to compare it")]
    ContentUnavailable(u32),

    #[error("Document does not match version {version}: expected hash {expected}, got {actual}")]
    ContentMismatch {
        version: u32,
        expected: String,
        actual: String,
    },

    #[error("Prompt rendering failed: {0}")]
    Prompt(String),
}
