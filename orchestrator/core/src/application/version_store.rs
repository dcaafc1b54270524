// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Version Store
//!
//! Append-only list of submitted document versions. Each mutation rewrites
//! the complete history through the `VersionRepository`; a failed write is
//! returned to the caller and the in-memory store keeps the change.
//!
//! Versions reloaded from a repository carry metadata only. Their text can
//! be re-attached with `restore_content` / `attach_content` when the same
//! document is ingested again, which re-enables diffing against them.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Revision tracking, diffing and revision reports
//! - **Integration:** `VersionRepository` (JSON file or in-memory)

use crate::domain::diff::{diff, RevisionDiff};
use crate::domain::document::Document;
use crate::domain::error::ReviewError;
use crate::domain::repository::VersionRepository;
use crate::domain::revision::{DocumentVersion, RevisionHistory};
use crate::domain::text::{truncate_chars, truncate_with_marker};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_MAX_SUMMARY_CHARS: usize = 2000;
const REPORT_SECTION_CHARS: usize = 1000;

pub struct VersionStore {
    repository: Arc<dyn VersionRepository>,
    versions: Vec<DocumentVersion>,
}

impl VersionStore {
    /// Load whatever history the repository holds
    pub async fn open(repository: Arc<dyn VersionRepository>) -> Result<Self, ReviewError> {
        let versions: Vec<DocumentVersion> = match repository.load().await? {
            Some(history) => history
                .versions
                .into_iter()
                .map(DocumentVersion::from_record)
                .collect(),
            None => Vec::new(),
        };

        if !versions.is_empty() {
            info!("Loaded revision history with {} version(s)", versions.len());
        }

        Ok(Self {
            repository,
            versions,
        })
    }

    pub fn versions(&self) -> &[DocumentVersion] {
        &self.versions
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn latest(&self) -> Option<&DocumentVersion> {
        self.versions.last()
    }

    /// Append the next version and persist
    pub async fn add_version(
        &mut self,
        document: &Document,
        author_response: Option<String>,
    ) -> Result<DocumentVersion, ReviewError> {
        let version_number = self.versions.len() as u32 + 1;
        let version = DocumentVersion::new(version_number, document, author_response);
        self.versions.push(version.clone());

        info!(
            "Tracking version {} of \"{}\" ({})",
            version_number, document.title, document.content_hash
        );

        self.persist().await?;
        Ok(version)
    }

    /// Attach a finished review to a version and persist
    pub async fn add_review(
        &mut self,
        version_number: u32,
        summary: impl Into<String>,
        artifact_path: Option<PathBuf>,
    ) -> Result<(), ReviewError> {
        let index = self.index(version_number)?;
        let version = &mut self.versions[index];
        version.review_summary = Some(summary.into());
        version.review_artifact_path = artifact_path;

        debug!("Attached review to version {}", version_number);
        self.persist().await
    }

    /// Re-attach text to a metadata-only version; the hashes must match
    pub fn restore_content(&mut self, version_number: u32, document: &Document) -> Result<(), ReviewError> {
        let index = self.index(version_number)?;
        let version = &mut self.versions[index];

        if version.content_hash != document.content_hash {
            return Err(ReviewError::ContentMismatch {
                version: version_number,
                expected: version.content_hash.clone(),
                actual: document.content_hash.clone(),
            });
        }

        version.content = Some(document.full_text.clone());
        Ok(())
    }

    /// Restore the first content-less version whose hash matches `document`
    pub fn attach_content(&mut self, document: &Document) -> Option<u32> {
        let version = self
            .versions
            .iter_mut()
            .find(|v| !v.has_content() && v.content_hash == document.content_hash)?;
        version.content = Some(document.full_text.clone());
        Some(version.version_number)
    }

    /// Diff two versions (`a` is the older side of the report)
    pub fn compare(&self, version_a: u32, version_b: u32) -> Result<RevisionDiff, ReviewError> {
        let a = &self.versions[self.index(version_a)?];
        let b = &self.versions[self.index(version_b)?];

        match (&a.content, &b.content) {
            (Some(text_a), Some(text_b)) => Ok(diff(text_a, text_b)),
            (None, _) => Err(ReviewError::ContentUnavailable(version_a)),
            (_, None) => Err(ReviewError::ContentUnavailable(version_b)),
        }
    }

    /// Review summaries of all versions, in version order
    pub fn previous_summaries(&self) -> Vec<String> {
        self.versions
            .iter()
            .filter_map(|v| v.review_summary.clone())
            .collect()
    }

    /// Context block for reviewers of the latest version; empty on first submission
    pub fn revision_context(&self, max_summary_chars: usize) -> String {
        let count = self.versions.len();
        if count <= 1 {
            return String::new();
        }

        let mut parts = vec![format!("This manuscript is on revision {}.", count)];

        for version in &self.versions[..count - 1] {
            let n = version.version_number;
            if let Some(summary) = &version.review_summary {
                parts.push(format!("\n### Version {} Review Summary", n));
                parts.push(truncate_chars(summary, max_summary_chars).to_string());
            }
            if let Some(response) = &version.author_response {
                parts.push(format!("\n### Authors' Response to Version {} Review", n));
                parts.push(truncate_chars(response, max_summary_chars).to_string());
            }
        }

        parts.extend(self.changes_section(count as u32));

        parts.join("\n\n")
    }

    /// Revision notice plus the changes since the previous version, without
    /// the earlier review summaries; empty on first submission
    pub fn latest_changes(&self) -> String {
        let count = self.versions.len();
        if count <= 1 {
            return String::new();
        }

        let mut parts = vec![format!("This manuscript is on revision {}.", count)];
        parts.extend(self.changes_section(count as u32));
        parts.join("\n\n")
    }

    /// Markdown report of every version with its review and changes
    pub fn revision_report(&self) -> String {
        let mut lines = vec!["# Manuscript Revision History".to_string(), String::new()];

        for version in &self.versions {
            let n = version.version_number;
            lines.push(format!("## Version {}", n));
            lines.push(format!("- **Title:** {}", version.title));
            lines.push(format!("- **Hash:** {}", version.content_hash));
            lines.push(format!(
                "- **Timestamp:** {}",
                version.created_at.format("%Y-%m-%d %H:%M")
            ));

            if let Some(summary) = &version.review_summary {
                lines.push("\n### Review Summary".to_string());
                lines.push(truncate_with_marker(summary, REPORT_SECTION_CHARS, "..."));
            }
            if let Some(response) = &version.author_response {
                lines.push("\n### Author Response".to_string());
                lines.push(truncate_with_marker(response, REPORT_SECTION_CHARS, "..."));
            }
            if n > 1 {
                lines.push(format!("\n### Changes from Version {}", n - 1));
                lines.push(self.change_summary(n - 1, n));
            }
            lines.push(String::new());
        }

        lines.join("\n")
    }

    fn changes_section(&self, latest: u32) -> [String; 2] {
        [
            "\n### Changes from Previous Version".to_string(),
            self.change_summary(latest - 1, latest),
        ]
    }

    fn change_summary(&self, version_a: u32, version_b: u32) -> String {
        match self.compare(version_a, version_b) {
            Ok(diff) => diff.summary(),
            Err(_) => format!(
                "Diff unavailable: the text of version {} or {} was not re-ingested.",
                version_a, version_b
            ),
        }
    }

    fn index(&self, version_number: u32) -> Result<usize, ReviewError> {
        if version_number == 0 || version_number as usize > self.versions.len() {
            return Err(ReviewError::OutOfRange {
                requested: version_number,
                count: self.versions.len(),
            });
        }
        Ok(version_number as usize - 1)
    }

    async fn persist(&self) -> Result<(), ReviewError> {
        let history = RevisionHistory::from_versions(&self.versions);
        self.repository.save(&history).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repositories::InMemoryVersionRepository;

    const V1: &str = "Background. We studied the effect of compound X on neuronal survival in culture.";
    const V2: &str = "Background. We studied the effect of compound X on neuronal survival in culture and in a mouse model of stroke.";

    async fn store() -> VersionStore {
        VersionStore::open(Arc::new(InMemoryVersionRepository::new()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_versions_are_numbered_sequentially() {
        let mut store = store().await;
        for i in 1..=3 {
            let doc = Document::from_text(format!("text {}", i), Some("Paper"));
            let version = store.add_version(&doc, None).await.unwrap();
            assert_eq!(version.version_number, i);
        }
        assert_eq!(store.len(), 3);
        assert_eq!(store.latest().unwrap().version_number, 3);
    }

    #[tokio::test]
    async fn test_add_review_out_of_range_leaves_store_untouched() {
        let mut store = store().await;
        store
            .add_version(&Document::from_text(V1, Some("Paper")), None)
            .await
            .unwrap();

        for n in [0, 2] {
            let err = store.add_review(n, "summary", None).await.unwrap_err();
            assert!(matches!(err, ReviewError::OutOfRange { requested, count: 1 } if requested == n));
        }
        assert!(store.previous_summaries().is_empty());

        store.add_review(1, "Major revisions", None).await.unwrap();
        assert_eq!(store.previous_summaries(), vec!["Major revisions".to_string()]);
    }

    #[tokio::test]
    async fn test_revision_context() {
        let mut store = store().await;
        store
            .add_version(&Document::from_text(V1, Some("Paper")), None)
            .await
            .unwrap();
        assert_eq!(store.revision_context(DEFAULT_MAX_SUMMARY_CHARS), "");

        store.add_review(1, "Needs an in vivo model.", None).await.unwrap();
        store
            .add_version(
                &Document::from_text(V2, Some("Paper")),
                Some("We added a stroke model.".to_string()),
            )
            .await
            .unwrap();

        let context = store.revision_context(DEFAULT_MAX_SUMMARY_CHARS);
        assert!(context.starts_with("This manuscript is on revision 2."));
        assert!(context.contains("### Version 1 Review Summary\n\nNeeds an in vivo model."));
        assert!(context.contains("### Changes from Previous Version"));
        assert!(context.contains("**Similarity Score:**"));
        // the response belongs to version 2, which is not summarized
        assert!(!context.contains("Authors' Response"));
    }

    #[tokio::test]
    async fn test_latest_changes_leaves_out_review_summaries() {
        let mut store = store().await;
        store
            .add_version(&Document::from_text(V1, Some("Paper")), None)
            .await
            .unwrap();
        assert_eq!(store.latest_changes(), "");

        store.add_review(1, "Needs an in vivo model.", None).await.unwrap();
        store
            .add_version(&Document::from_text(V2, Some("Paper")), None)
            .await
            .unwrap();

        let changes = store.latest_changes();
        assert!(changes.starts_with("This manuscript is on revision 2."));
        assert!(changes.contains("### Changes from Previous Version"));
        assert!(changes.contains("**Similarity Score:**"));
        assert!(!changes.contains("Needs an in vivo model."));
    }

    #[tokio::test]
    async fn test_compare_out_of_range() {
        let mut store = store().await;
        store
            .add_version(&Document::from_text(V1, None), None)
            .await
            .unwrap();
        assert!(matches!(
            store.compare(1, 5),
            Err(ReviewError::OutOfRange { requested: 5, .. })
        ));
    }

    #[tokio::test]
    async fn test_restore_content_checks_hash() {
        let mut store = store().await;
        let doc = Document::from_text(V1, None);
        store.add_version(&doc, None).await.unwrap();
        store.versions[0].content = None;

        let other = Document::from_text(V2, None);
        assert!(matches!(
            store.restore_content(1, &other),
            Err(ReviewError::ContentMismatch { version: 1, .. })
        ));
        assert_eq!(store.attach_content(&other), None);
        assert_eq!(store.attach_content(&doc), Some(1));
        assert!(store.versions()[0].has_content());
    }

    #[tokio::test]
    async fn test_revision_report() {
        let mut store = store().await;
        store
            .add_version(&Document::from_text(V1, Some("Compound X")), None)
            .await
            .unwrap();
        store.add_review(1, "r".repeat(1500), None).await.unwrap();
        store
            .add_version(&Document::from_text(V2, Some("Compound X")), None)
            .await
            .unwrap();

        let report = store.revision_report();
        assert!(report.starts_with("# Manuscript Revision History\n\n## Version 1"));
        assert!(report.contains("- **Title:** Compound X"));
        assert!(report.contains(&format!("{}...", "r".repeat(1000))));
        assert!(!report.contains(&"r".repeat(1001)));
        assert!(report.contains("### Changes from Version 1"));
    }
}
