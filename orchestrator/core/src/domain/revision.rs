// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Document versions and their persisted form.
//
// A DocumentVersion is created when a submission is ingested and is only
// ever touched again once, when the finished review is attached. The
// persisted record intentionally omits the document text: versions reloaded
// from history carry metadata only until the document is re-ingested.

use crate::domain::document::Document;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentVersion {
    /// 1-based, gap-free
    pub version_number: u32,
    pub title: String,

    /// `None` for versions reloaded from history
    pub content: Option<String>,
    pub content_hash: String,
    pub review_summary: Option<String>,
    pub author_response: Option<String>,
    pub review_artifact_path: Option<PathBuf>,
    pub created_at: DateTime<Utc>,
}

impl DocumentVersion {
    pub fn new(version_number: u32, document: &Document, author_response: Option<String>) -> Self {
        Self {
            version_number,
            title: document.title.clone(),
            content: Some(document.full_text.clone()),
            content_hash: document.content_hash.clone(),
            review_summary: None,
            author_response: author_response.filter(|r| !r.trim().is_empty()),
            review_artifact_path: None,
            created_at: Utc::now(),
        }
    }

    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    pub fn is_reviewed(&self) -> bool {
        self.review_summary.is_some()
    }

    pub fn to_record(&self) -> VersionRecord {
        VersionRecord {
            version_number: self.version_number,
            version_hash: self.content_hash.clone(),
            title: self.title.clone(),
            review_summary: self.review_summary.clone(),
            author_response: self.author_response.clone(),
            review_path: self
                .review_artifact_path
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            timestamp: self.created_at,
        }
    }

    /// Metadata-only version rebuilt from a persisted record
    pub fn from_record(record: VersionRecord) -> Self {
        Self {
            version_number: record.version_number,
            title: record.title,
            content: None,
            content_hash: record.version_hash,
            review_summary: record.review_summary,
            author_response: record.author_response,
            review_artifact_path: record.review_path.map(PathBuf::from),
            created_at: record.timestamp,
        }
    }
}

/// One entry of `revision_history.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub version_number: u32,
    pub version_hash: String,
    pub title: String,
    pub review_summary: Option<String>,
    pub author_response: Option<String>,
    pub review_path: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Whole persisted history; rewritten on every mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionHistory {
    #[serde(default)]
    pub versions: Vec<VersionRecord>,
    pub last_updated: DateTime<Utc>,
}

impl RevisionHistory {
    pub fn from_versions(versions: &[DocumentVersion]) -> Self {
        Self {
            versions: versions.iter().map(DocumentVersion::to_record).collect(),
            last_updated: Utc::now(),
        }
    }
}
