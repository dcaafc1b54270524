// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Review Use Case
//!
//! End-to-end review of one submission:
//!
//! 1. Track the document in the version store (when revision tracking is on)
//!    and re-attach the text of earlier versions that were supplied again
//! 2. Build the revision context from earlier reviews, the author response
//!    and the changes since the previous version
//! 3. Assemble the team (explicit, suggested or default)
//! 4. Run the discussion and write the transcript artifacts
//! 5. Attach the summary to the tracked version and refresh the revision report
//! 6. Optionally produce mentor guidance
//!
//! A failed discussion returns before step 5, so nothing is committed to
//! the version store for that run.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Orchestrates document, store, discussion and artifacts
//! - **Integration:** Called by the CLI `review` command

use crate::application::discussion::{DiscussionInput, DiscussionOrchestrator, DiscussionOutcome};
use crate::application::mentor::{Mentor, MentorReport};
use crate::application::revision_context::RevisionContextBuilder;
use crate::application::team_suggester::TeamSuggester;
use crate::application::version_store::VersionStore;
use crate::domain::config::ReviewType;
use crate::domain::document::{Document, DEFAULT_REVIEW_CONTEXT_CHARS};
use crate::domain::personas::PanelDefaults;
use crate::domain::team::Team;
use crate::infrastructure::artifacts;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub const REVISION_REPORT_FILE: &str = "revision_report.md";

#[derive(Debug, Clone)]
pub struct ReviewOptions {
    pub output_dir: PathBuf,
    pub num_reviewers: usize,
    pub max_document_chars: usize,
}

impl Default for ReviewOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("reviews"),
            num_reviewers: 3,
            max_document_chars: DEFAULT_REVIEW_CONTEXT_CHARS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReviewRequest {
    pub document: Document,
    pub review_type: ReviewType,
    pub author_response: Option<String>,

    /// Reviews supplied by hand; used when no version store is attached
    pub previous_reviews: Vec<String>,

    /// Earlier versions' texts, matched to tracked versions by content hash
    pub prior_documents: Vec<Document>,

    /// Explicit team; skips suggestion
    pub team: Option<Team>,
}

impl ReviewRequest {
    pub fn new(document: Document, review_type: ReviewType) -> Self {
        Self {
            document,
            review_type,
            author_response: None,
            previous_reviews: Vec::new(),
            prior_documents: Vec::new(),
            team: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReviewRun {
    pub run_id: Uuid,
    pub team: Team,
    pub outcome: DiscussionOutcome,
    pub transcript_json: PathBuf,
    pub transcript_markdown: PathBuf,

    /// Version the review was attached to, when tracking
    pub version_number: Option<u32>,
    pub revision_report: Option<PathBuf>,

    /// `None` when the mentor is disabled or failed
    pub mentor_report: Option<MentorReport>,
    pub mentor_report_path: Option<PathBuf>,
}

pub struct ReviewService {
    orchestrator: DiscussionOrchestrator,
    suggester: Arc<dyn TeamSuggester>,
    defaults: PanelDefaults,
    options: ReviewOptions,
    mentor: Option<Mentor>,
    version_store: Option<VersionStore>,
    project_dir: Option<PathBuf>,
}

impl ReviewService {
    pub fn new(
        orchestrator: DiscussionOrchestrator,
        suggester: Arc<dyn TeamSuggester>,
        defaults: PanelDefaults,
        options: ReviewOptions,
    ) -> Self {
        Self {
            orchestrator,
            suggester,
            defaults,
            options,
            mentor: None,
            version_store: None,
            project_dir: None,
        }
    }

    pub fn with_mentor(mut self, mentor: Mentor) -> Self {
        self.mentor = Some(mentor);
        self
    }

    /// Enable revision tracking; the report is written to `project_dir`
    pub fn with_version_store(mut self, store: VersionStore, project_dir: impl Into<PathBuf>) -> Self {
        self.version_store = Some(store);
        self.project_dir = Some(project_dir.into());
        self
    }

    pub fn version_store(&self) -> Option<&VersionStore> {
        self.version_store.as_ref()
    }

    pub async fn run(&mut self, request: ReviewRequest) -> Result<ReviewRun> {
        let run_id = Uuid::new_v4();
        let document = &request.document;
        info!("Review run {} for {}", run_id, document);

        let (version_number, previous_reviews, store_context) = match self.version_store.as_mut() {
            Some(store) => {
                for prior in &request.prior_documents {
                    if let Some(n) = store.attach_content(prior) {
                        info!("Restored text of version {}", n);
                    }
                }

                let version = store
                    .add_version(document, request.author_response.clone())
                    .await
                    .context("Failed to track document version")?;

                let mut reviews = request.previous_reviews.clone();
                reviews.extend(store.previous_summaries());
                (
                    Some(version.version_number),
                    reviews,
                    // summaries are already in `reviews`
                    store.latest_changes(),
                )
            }
            None => (None, request.previous_reviews.clone(), String::new()),
        };

        if !previous_reviews.is_empty() {
            info!("Found {} previous review(s)", previous_reviews.len());
        }

        let revision_context = RevisionContextBuilder::new()
            .previous_reviews(previous_reviews)
            .author_response(request.author_response.clone())
            .store_context(store_context)
            .build();

        let manuscript = document.review_context(self.options.max_document_chars);
        let team = match request.team.clone() {
            Some(team) => team,
            None => self.assemble_team(request.review_type, &manuscript).await,
        };

        let input = DiscussionInput {
            manuscript,
            criteria: self.defaults.criteria.clone(),
            revision_context,
        };
        let outcome = self.orchestrator.run(&team, &input).await?;

        let saved = artifacts::save_transcript(
            &self.options.output_dir,
            &document.artifact_stem(),
            &outcome.transcript,
        )
        .await?;

        let mut revision_report = None;
        if let (Some(store), Some(n)) = (self.version_store.as_mut(), version_number) {
            store
                .add_review(n, outcome.summary.clone(), Some(saved.json_path.clone()))
                .await
                .context("Failed to attach review to tracked version")?;

            if let Some(project_dir) = &self.project_dir {
                let path = project_dir.join(REVISION_REPORT_FILE);
                artifacts::save_text(&path, &store.revision_report()).await?;
                info!("Saved revision report to {:?}", path);
                revision_report = Some(path);
            }
        }

        let (mentor_report, mentor_report_path) = self.mentor_guidance(&outcome.summary, &document.artifact_stem()).await;

        Ok(ReviewRun {
            run_id,
            team,
            outcome,
            transcript_json: saved.json_path,
            transcript_markdown: saved.markdown_path,
            version_number,
            revision_report,
            mentor_report,
            mentor_report_path,
        })
    }

    async fn assemble_team(&self, review_type: ReviewType, manuscript: &str) -> Team {
        match review_type {
            ReviewType::Panel => {
                let participants = self
                    .suggester
                    .suggest_team(manuscript, self.options.num_reviewers)
                    .await;
                Team::panel(self.defaults.editor.clone(), participants)
            }
            ReviewType::Individual => {
                let primary = self
                    .suggester
                    .suggest_team(manuscript, 1)
                    .await
                    .into_iter()
                    .next()
                    .or_else(|| self.defaults.reviewers.first().cloned())
                    .unwrap_or_else(|| self.defaults.editor.clone());
                Team::individual(primary, self.defaults.critic.clone())
            }
        }
    }

    /// Mentor failures are logged and reported as absent guidance
    async fn mentor_guidance(&self, summary: &str, stem: &str) -> (Option<MentorReport>, Option<PathBuf>) {
        let Some(mentor) = &self.mentor else {
            return (None, None);
        };
        if summary.trim().is_empty() {
            return (None, None);
        }

        let report = match mentor.advise(summary).await {
            Ok(report) => report,
            Err(e) => {
                warn!("Scientific mentor failed, continuing without guidance: {}", e);
                return (None, None);
            }
        };

        let path = self.options.output_dir.join(format!("{}_mentor.md", stem));
        match artifacts::save_text(&path, &report.to_markdown()).await {
            Ok(()) => (Some(report), Some(path)),
            Err(e) => {
                warn!("Could not save mentor report: {:#}", e);
                (Some(report), None)
            }
        }
    }
}
