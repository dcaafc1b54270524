// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Revision Diff Engine
//!
//! Computes what changed between two manuscript versions:
//!
//! 1. A word-level edit script from `similar` (Myers).
//! 2. Consecutive edits between two equalities are collapsed into one
//!    delete/insert run.
//! 3. Semantic cleanup: an equality no longer than the edits on both of its
//!    sides is folded into them, repeated until stable. This turns a string
//!    of one-word edits separated by single spaces into one coherent
//!    replaced passage.
//! 4. Runs are classified as additions, deletions or substitutions.
//!
//! The edit distance is the sum over runs of `max(inserted, deleted)` chars;
//! similarity is `1 - distance / max(len_a, len_b)` clamped to `[0, 1]`.
//!
//! Texts are diffed in a canonical order (lexicographically smaller first)
//! and the result is flipped back, so `diff(a, b)` and `diff(b, a)` always
//! agree on similarity.

use serde::{Deserialize, Serialize};
use similar::{Algorithm, ChangeTag, TextDiff};
use std::time::Duration;

use crate::domain::text::truncate_chars;

/// Fragments shorter than this (after trimming) are not reported
pub const MIN_FRAGMENT_CHARS: usize = 20;

const SUMMARY_ITEMS: usize = 5;
const SUMMARY_ITEM_CHARS: usize = 200;
const DIFF_DEADLINE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionDiff {
    /// Passages present only in the newer text
    pub additions: Vec<String>,

    /// Passages present only in the older text
    pub deletions: Vec<String>,

    /// (old, new) pairs that replaced each other; both halves also appear
    /// in `deletions` / `additions` when significant
    pub substitutions: Vec<(String, String)>,

    pub similarity: f64,
}

impl RevisionDiff {
    pub fn is_identical(&self) -> bool {
        self.similarity >= 1.0
    }

    /// Markdown change summary used in revision context and reports
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();

        if !self.additions.is_empty() {
            parts.push(format!("**Additions ({}):**", self.additions.len()));
            for addition in self.additions.iter().take(SUMMARY_ITEMS) {
                parts.push(format!("  + {}...", truncate_chars(addition, SUMMARY_ITEM_CHARS)));
            }
            if self.additions.len() > SUMMARY_ITEMS {
                parts.push(format!(
                    "  ... and {} more additions",
                    self.additions.len() - SUMMARY_ITEMS
                ));
            }
        }

        if !self.deletions.is_empty() {
            parts.push(format!("\n**Deletions ({}):**", self.deletions.len()));
            for deletion in self.deletions.iter().take(SUMMARY_ITEMS) {
                parts.push(format!("  - {}...", truncate_chars(deletion, SUMMARY_ITEM_CHARS)));
            }
            if self.deletions.len() > SUMMARY_ITEMS {
                parts.push(format!(
                    "  ... and {} more deletions",
                    self.deletions.len() - SUMMARY_ITEMS
                ));
            }
        }

        parts.push(format!("\n{}", self.similarity_line()));
        parts.join("\n")
    }

    /// e.g. `**Similarity Score:** 87.5%`
    pub fn similarity_line(&self) -> String {
        format!("**Similarity Score:** {:.1}%", self.similarity * 100.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Chunk {
    Equal(String),
    Edit { deleted: String, inserted: String },
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Diff two texts. Pure and infallible.
pub fn diff(text_a: &str, text_b: &str) -> RevisionDiff {
    if text_a == text_b {
        return RevisionDiff {
            additions: Vec::new(),
            deletions: Vec::new(),
            substitutions: Vec::new(),
            similarity: 1.0,
        };
    }

    let swapped = text_a > text_b;
    let (old, new) = if swapped { (text_b, text_a) } else { (text_a, text_b) };

    let mut chunks = edit_runs(old, new);
    cleanup_semantic(&mut chunks);

    let distance: usize = chunks
        .iter()
        .map(|chunk| match chunk {
            Chunk::Equal(_) => 0,
            Chunk::Edit { deleted, inserted } => char_len(deleted).max(char_len(inserted)),
        })
        .sum();
    let max_len = char_len(old).max(char_len(new));
    let similarity = if max_len == 0 {
        1.0
    } else {
        (1.0 - distance as f64 / max_len as f64).clamp(0.0, 1.0)
    };

    let mut additions = Vec::new();
    let mut deletions = Vec::new();
    let mut substitutions = Vec::new();

    for chunk in chunks {
        let Chunk::Edit { deleted, inserted } = chunk else {
            continue;
        };
        // Flip back to the caller's orientation
        let (removed, added) = if swapped { (inserted, deleted) } else { (deleted, inserted) };
        let removed = removed.trim().to_string();
        let added = added.trim().to_string();
        let removed_significant = char_len(&removed) >= MIN_FRAGMENT_CHARS;
        let added_significant = char_len(&added) >= MIN_FRAGMENT_CHARS;

        if !removed.is_empty() && !added.is_empty() && (removed_significant || added_significant) {
            substitutions.push((removed.clone(), added.clone()));
        }
        if removed_significant {
            deletions.push(removed);
        }
        if added_significant {
            additions.push(added);
        }
    }

    RevisionDiff {
        additions,
        deletions,
        substitutions,
        similarity,
    }
}

/// Word-level edit script with every run between equalities collapsed into
/// a single delete/insert pair
fn edit_runs(old: &str, new: &str) -> Vec<Chunk> {
    let text_diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .timeout(DIFF_DEADLINE)
        .diff_words(old, new);

    let mut chunks: Vec<Chunk> = Vec::new();
    for change in text_diff.iter_all_changes() {
        let tag = change.tag();
        let value = change.value();

        match (tag, chunks.last_mut()) {
            (ChangeTag::Equal, Some(Chunk::Equal(text))) => {
                text.push_str(value);
                continue;
            }
            (ChangeTag::Delete, Some(Chunk::Edit { deleted, .. })) => {
                deleted.push_str(value);
                continue;
            }
            (ChangeTag::Insert, Some(Chunk::Edit { inserted, .. })) => {
                inserted.push_str(value);
                continue;
            }
            _ => {}
        }

        chunks.push(match tag {
            ChangeTag::Equal => Chunk::Equal(value.to_string()),
            ChangeTag::Delete => Chunk::Edit {
                deleted: value.to_string(),
                inserted: String::new(),
            },
            ChangeTag::Insert => Chunk::Edit {
                deleted: String::new(),
                inserted: value.to_string(),
            },
        });
    }
    chunks
}

/// Fold short equalities into the edits around them until nothing changes
fn cleanup_semantic(chunks: &mut Vec<Chunk>) {
    loop {
        let mut merged = false;

        for i in 1..chunks.len().saturating_sub(1) {
            let (
                Chunk::Edit {
                    deleted: left_del,
                    inserted: left_ins,
                },
                Chunk::Equal(equal),
                Chunk::Edit {
                    deleted: right_del,
                    inserted: right_ins,
                },
            ) = (&chunks[i - 1], &chunks[i], &chunks[i + 1])
            else {
                continue;
            };

            let equal_len = char_len(equal);
            let left_len = char_len(left_del).max(char_len(left_ins));
            let right_len = char_len(right_del).max(char_len(right_ins));
            if equal_len > left_len || equal_len > right_len {
                continue;
            }

            let combined = Chunk::Edit {
                deleted: format!("{}{}{}", left_del, equal, right_del),
                inserted: format!("{}{}{}", left_ins, equal, right_ins),
            };
            chunks.splice(i - 1..=i + 1, std::iter::once(combined));
            merged = true;
            break;
        }

        if !merged {
            return;
        }
    }
}
