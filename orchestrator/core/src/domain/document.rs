// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Document
//!
//! A manuscript as the review core sees it: extracted text plus the
//! bookkeeping fields the version store needs (title, abstract, content hash).
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Value object produced by document sources (text files, PDF extractors)

use crate::domain::text::truncate_chars;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

pub const UNTITLED: &str = "Untitled Manuscript";

/// Default character budget of [`Document::review_context`]
pub const DEFAULT_REVIEW_CONTEXT_CHARS: usize = 50_000;

const ABSTRACT_MARKERS: [&str; 2] = ["abstract", "summary"];
const ABSTRACT_END_MARKERS: [&str; 5] = ["introduction", "keywords", "background", "1.", "1 "];
const MIN_ABSTRACT_CHARS: usize = 100;
const MAX_ABSTRACT_CHARS: usize = 5_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub full_text: String,
    pub abstract_text: String,

    /// First 16 hex characters of the SHA-256 of `full_text`
    pub content_hash: String,
}

impl Document {
    /// Build a document from raw text. Without an explicit title the first
    /// plausible heading line is used.
    pub fn from_text(text: impl Into<String>, title: Option<&str>) -> Self {
        let full_text = text.into();
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| detect_title(&full_text));

        Self {
            abstract_text: extract_abstract(&full_text),
            content_hash: content_hash(&full_text),
            title,
            full_text,
        }
    }

    /// Title, abstract and full text capped at `max_chars` characters
    pub fn review_context(&self, max_chars: usize) -> String {
        let abstract_text = if self.abstract_text.is_empty() {
            "(No abstract found)"
        } else {
            &self.abstract_text
        };
        let overhead = self.title.chars().count() + self.abstract_text.chars().count() + 100;
        let body = truncate_chars(&self.full_text, max_chars.saturating_sub(overhead));

        let context = format!(
            "# {}\n\n## Abstract\n{}\n\n## Full Text\n{}",
            self.title, abstract_text, body
        );

        if context.chars().count() > max_chars {
            format!(
                "{}\n\n[Text truncated due to length...]",
                truncate_chars(&context, max_chars)
            )
        } else {
            context
        }
    }

    /// File-name friendly stem: title prefix plus content hash
    pub fn artifact_stem(&self) -> String {
        let safe_title: String = self
            .title
            .chars()
            .take(50)
            .map(|c| if c.is_alphanumeric() || c == '-' || c == ' ' { c } else { '_' })
            .collect();
        format!("{}_{}", safe_title.trim().replace(' ', "_"), self.content_hash)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Manuscript: {} (version: {})", self.title, self.content_hash)
    }
}

pub fn content_hash(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    hex::encode(digest)[..16].to_string()
}

fn detect_title(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(5)
        .find(|line| (11..200).contains(&line.chars().count()))
        .map(|line| line.trim_start_matches('#').trim().to_string())
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Heuristic abstract detection: text between an "abstract"/"summary" marker
/// and the next section marker, kept only when long enough to be real.
fn extract_abstract(text: &str) -> String {
    // ASCII lowercasing keeps byte offsets valid for slicing `text`
    let lower = text.to_ascii_lowercase();

    for marker in ABSTRACT_MARKERS {
        let Some(start) = lower.find(marker) else {
            continue;
        };
        let search_from = start + marker.len();
        let end = ABSTRACT_END_MARKERS
            .iter()
            .filter_map(|m| lower[search_from..].find(m).map(|i| i + search_from))
            .min()
            .unwrap_or(text.len());

        let mut candidate = text[start..end].trim();
        if let Some((first, rest)) = candidate.split_once('\n') {
            if ABSTRACT_MARKERS.contains(&first.trim().to_ascii_lowercase().as_str()) {
                candidate = rest.trim();
            }
        }

        if candidate.chars().count() > MIN_ABSTRACT_CHARS {
            return truncate_chars(candidate, MAX_ABSTRACT_CHARS).to_string();
        }
    }

    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAPER: &str = "Synaptic vesicle recycling in cortical neurons\n\nAbstract\nWe report that \
synaptic vesicle recycling in cortical neurons depends on a previously uncharacterized \
adaptor protein whose loss slows endocytosis by half.\n\nIntroduction\nVesicle recycling is essential.";

    #[test]
    fn test_hash_is_sixteen_hex_chars() {
        let doc = Document::from_text("hello", None);
        assert_eq!(doc.content_hash.len(), 16);
        assert!(doc.content_hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(doc.content_hash, content_hash("hello"));
        assert_ne!(doc.content_hash, content_hash("hello!"));
    }

    #[test]
    fn test_title_detection() {
        let doc = Document::from_text(PAPER, None);
        assert_eq!(doc.title, "Synaptic vesicle recycling in cortical neurons");

        let doc = Document::from_text(PAPER, Some("Given Title"));
        assert_eq!(doc.title, "Given Title");

        let doc = Document::from_text("short\nlines\nonly", None);
        assert_eq!(doc.title, UNTITLED);
    }

    #[test]
    fn test_abstract_extraction() {
        let doc = Document::from_text(PAPER, None);
        assert!(doc.abstract_text.starts_with("We report"));
        assert!(!doc.abstract_text.contains("Introduction"));
    }

    #[test]
    fn test_short_abstract_is_ignored() {
        let doc = Document::from_text("Abstract\nToo short.\nIntroduction\n...", None);
        assert!(doc.abstract_text.is_empty());
    }

    #[test]
    fn test_review_context_truncation() {
        let long = "word ".repeat(5_000);
        let doc = Document::from_text(long, Some("Long"));

        let context = doc.review_context(1_000);
        assert!(context.starts_with("# Long"));
        assert!(context.contains("(No abstract found)"));
        assert!(context.chars().count() <= 1_000 + 40);

        let full = doc.review_context(DEFAULT_REVIEW_CONTEXT_CHARS);
        assert!(!full.contains("[Text truncated"));
    }

    #[test]
    fn test_artifact_stem() {
        let doc = Document::from_text("x", Some("A/B: test"));
        assert_eq!(doc.artifact_stem(), format!("A_B__test_{}", doc.content_hash));
    }
}
