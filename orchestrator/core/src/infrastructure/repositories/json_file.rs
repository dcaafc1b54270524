// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! JSON file repository for the revision history.
//!
//! The whole history lives in `<project_dir>/revision_history.json` and is
//! rewritten on every save. The project directory is created on first save.

use crate::domain::repository::{RepositoryError, VersionRepository};
use crate::domain::revision::RevisionHistory;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const HISTORY_FILE: &str = "revision_history.json";

#[derive(Debug, Clone)]
pub struct JsonFileVersionRepository {
    project_dir: PathBuf,
}

impl JsonFileVersionRepository {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
        }
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn history_path(&self) -> PathBuf {
        self.project_dir.join(HISTORY_FILE)
    }
}

#[async_trait]
impl VersionRepository for JsonFileVersionRepository {
    async fn load(&self) -> Result<Option<RevisionHistory>, RepositoryError> {
        let path = self.history_path();
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        debug!("Loading revision history from {:?}", path);
        let history = serde_json::from_str(&content)?;
        Ok(Some(history))
    }

    async fn save(&self, history: &RevisionHistory) -> Result<(), RepositoryError> {
        tokio::fs::create_dir_all(&self.project_dir).await?;

        let path = self.history_path();
        let json = serde_json::to_string_pretty(history)?;
        tokio::fs::write(&path, json).await?;

        debug!("Saved {} version(s) to {:?}", history.versions.len(), path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::Document;
    use crate::domain::revision::DocumentVersion;

    #[tokio::test]
    async fn test_missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileVersionRepository::new(dir.path().join("project"));
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_creates_directory_and_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileVersionRepository::new(dir.path().join("nested").join("project"));

        let document = Document::from_text("Some manuscript text", Some("Title"));
        let history = RevisionHistory::from_versions(&[DocumentVersion::new(1, &document, None)]);
        repo.save(&history).await.unwrap();

        assert!(repo.history_path().exists());
        let loaded = repo.load().await.unwrap().unwrap();
        assert_eq!(loaded, history);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(HISTORY_FILE), "{not json").unwrap();

        let repo = JsonFileVersionRepository::new(dir.path());
        assert!(matches!(
            repo.load().await,
            Err(RepositoryError::Serialization(_))
        ));
    }
}
