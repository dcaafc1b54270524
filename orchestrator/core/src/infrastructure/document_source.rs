// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Plain-text document source.
//!
//! Loads `.txt` / `.md` manuscripts (or any extension-less text file) into a
//! [`Document`]. PDF extraction is not provided; PDFs are rejected with a
//! hint to convert them first.

use crate::domain::document::Document;
use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::info;

pub async fn load_document(path: &Path, title: Option<&str>) -> Result<Document> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    if extension.as_deref() == Some("pdf") {
        bail!(
            "PDF text extraction is not supported: convert {:?} to .txt or .md first",
            path
        );
    }

    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read manuscript {:?}", path))?;

    if text.trim().is_empty() {
        bail!("Manuscript {:?} is empty", path);
    }

    let document = Document::from_text(text, title);
    info!("Loaded {}", document);
    Ok(document)
}

/// Optional companion text such as an author response; blank files count as absent
pub async fn load_optional_text(path: Option<&Path>) -> Result<Option<String>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {:?}", path))?;
    Ok(Some(text).filter(|t| !t.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_markdown_manuscript() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paper.md");
        std::fs::write(&path, "# Compound X protects neurons\n\nBody text.").unwrap();

        let document = load_document(&path, None).await.unwrap();
        assert_eq!(document.title, "Compound X protects neurons");
    }

    #[tokio::test]
    async fn test_pdf_is_rejected() {
        let err = load_document(Path::new("paper.PDF"), None).await.unwrap_err();
        assert!(err.to_string().contains("not supported"));
    }

    #[tokio::test]
    async fn test_optional_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("response.txt");
        std::fs::write(&path, "   \n").unwrap();

        assert_eq!(load_optional_text(None).await.unwrap(), None);
        assert_eq!(load_optional_text(Some(&path)).await.unwrap(), None);
    }
}
