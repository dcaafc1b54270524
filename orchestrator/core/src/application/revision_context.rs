// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Revision context for resubmitted manuscripts.
//
// Pure formatting: earlier review summaries, the authors' response and the
// version store's latest changes are combined into the block the opening
// prompt embeds ahead of the manuscript.

use crate::application::prompts::{format_author_response, format_previous_reviews};

const REVISED_NOTICE: &str =
    "This is a REVISED manuscript. Please evaluate how well the authors have addressed previous concerns.\n\n";

#[derive(Debug, Clone, Default)]
pub struct RevisionContextBuilder {
    previous_reviews: Vec<String>,
    author_response: Option<String>,
    store_context: Option<String>,
}

impl RevisionContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous_reviews(mut self, reviews: Vec<String>) -> Self {
        self.previous_reviews = reviews;
        self
    }

    pub fn author_response(mut self, response: Option<String>) -> Self {
        self.author_response = response;
        self
    }

    /// Output of `VersionStore::latest_changes`
    pub fn store_context(mut self, context: impl Into<String>) -> Self {
        self.store_context = Some(context.into()).filter(|c| !c.trim().is_empty());
        self
    }

    /// Empty when there is no previous review
    pub fn build(&self) -> String {
        if self.previous_reviews.is_empty() {
            return String::new();
        }

        let mut block = String::from(REVISED_NOTICE);
        block.push_str(&format_previous_reviews(&self.previous_reviews));
        if let Some(response) = &self.author_response {
            block.push_str(&format_author_response(response));
        }
        if let Some(context) = &self.store_context {
            block.push_str(context);
            block.push_str("\n\n");
        }
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_submission_has_no_context() {
        let context = RevisionContextBuilder::new()
            .author_response(Some("We fixed it.".to_string()))
            .store_context("This manuscript is on revision 1.")
            .build();
        assert_eq!(context, "");
    }

    #[test]
    fn test_revised_manuscript_block() {
        let context = RevisionContextBuilder::new()
            .previous_reviews(vec!["Add controls.".to_string()])
            .author_response(Some("Controls added.".to_string()))
            .store_context("This manuscript is on revision 2.")
            .build();

        assert!(context.starts_with("This is a REVISED manuscript."));
        assert!(context.contains("[begin review 1]\n\nAdd controls.\n\n[end review 1]"));
        assert!(context.contains("[begin author response]\n\nControls added.\n\n[end author response]"));
        assert!(context.ends_with("This manuscript is on revision 2.\n\n"));
    }

    #[test]
    fn test_blank_store_context_is_skipped() {
        let context = RevisionContextBuilder::new()
            .previous_reviews(vec!["Add controls.".to_string()])
            .store_context("  ")
            .build();
        assert!(context.ends_with("[end review 1]\n\n"));
    }
}
