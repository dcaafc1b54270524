// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Repository Interfaces
//!
//! Persistence contract for the revision history aggregate, following the
//! DDD Repository pattern: interface defined in the domain layer,
//! implemented in `crate::infrastructure::repositories`.
//!
//! | Trait | Aggregate | Implementations |
//! |-------|-----------|----------------|
//! | `VersionRepository` | `RevisionHistory` | `JsonFileVersionRepository`, `InMemoryVersionRepository` |
//!
//! Persistence is total: `save` always receives the complete history and
//! replaces whatever was stored before. There is no locking; one writer per
//! project directory is assumed.

use crate::domain::revision::RevisionHistory;
use async_trait::async_trait;

#[async_trait]
pub trait VersionRepository: Send + Sync {
    /// Stored history, or `None` when nothing was saved yet
    async fn load(&self) -> Result<Option<RevisionHistory>, RepositoryError>;

    /// Replace the stored history
    async fn save(&self, history: &RevisionHistory) -> Result<(), RepositoryError>;
}

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Repository error: {0}")]
    Unknown(String),
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Serialization(err.to_string())
    }
}
