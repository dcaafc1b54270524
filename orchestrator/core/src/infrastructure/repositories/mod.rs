// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Repository Implementations
//!
//! This module provides infrastructure implementations of the repository
//! abstraction defined in the domain layer, following the Repository pattern
//! from DDD.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Persist and reload the revision history
//! - **Pattern:** Repository (DDD), Adapter (Hexagonal Architecture)
//!
//! # Available Implementations
//!
//! - **JsonFileVersionRepository** - `revision_history.json` in a project directory
//! - **InMemoryVersionRepository** - Thread-safe storage for tests and one-off runs
//!
//! # Usage
//!
//! ```no_run
//! # async fn example() -> anyhow::Result<()> {
//! use std::sync::Arc;
//! use msreview_core::application::version_store::VersionStore;
//! use msreview_core::infrastructure::repositories::JsonFileVersionRepository;
//!
//! let repo = JsonFileVersionRepository::new("revision_project");
//! let store = VersionStore::open(Arc::new(repo)).await?;
//! println!("{} version(s) tracked", store.len());
//! # Ok(())
//! # }
//! ```

pub mod json_file;

pub use json_file::JsonFileVersionRepository;

use crate::domain::repository::{RepositoryError, VersionRepository};
use crate::domain::revision::RevisionHistory;
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

#[derive(Clone, Default)]
pub struct InMemoryVersionRepository {
    history: Arc<RwLock<Option<RevisionHistory>>>,
}

impl InMemoryVersionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository that already holds `history`
    pub fn with_history(history: RevisionHistory) -> Self {
        Self {
            history: Arc::new(RwLock::new(Some(history))),
        }
    }
}

#[async_trait]
impl VersionRepository for InMemoryVersionRepository {
    async fn load(&self) -> Result<Option<RevisionHistory>, RepositoryError> {
        let history = self
            .history
            .read()
            .map_err(|e| RepositoryError::Unknown(e.to_string()))?;
        Ok(history.clone())
    }

    async fn save(&self, history: &RevisionHistory) -> Result<(), RepositoryError> {
        let mut stored = self
            .history
            .write()
            .map_err(|e| RepositoryError::Unknown(e.to_string()))?;
        *stored = Some(history.clone());
        Ok(())
    }
}
