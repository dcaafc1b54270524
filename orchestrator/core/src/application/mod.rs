// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod discussion;
pub mod mentor;
pub mod prompts;
pub mod review;
pub mod revision_context;
pub mod team_suggester;
pub mod version_store;

// Re-export use cases for convenience
pub use discussion::{DiscussionInput, DiscussionOrchestrator, DiscussionOutcome, DiscussionPhase, DiscussionSettings};
pub use mentor::{Mentor, MentorReport};
pub use review::{ReviewOptions, ReviewRequest, ReviewRun, ReviewService};
pub use team_suggester::{LlmTeamSuggester, StaticTeamSuggester, TeamSuggester};
pub use version_store::VersionStore;
