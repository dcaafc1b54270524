// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! End-to-end review runs: artifacts, revision tracking across two
//! submissions, and nothing committed when the discussion fails.

mod common;

use common::{tool_request, CannedSearch, ScriptedBackend};
use msreview_core::application::{
    DiscussionOrchestrator, DiscussionSettings, Mentor, ReviewOptions, ReviewRequest,
    ReviewService, StaticTeamSuggester, VersionStore,
};
use msreview_core::domain::config::ReviewType;
use msreview_core::domain::document::Document;
use msreview_core::domain::personas::PanelDefaults;
use msreview_core::domain::team::Team;
use msreview_core::domain::tool::ToolExecutor;
use msreview_core::infrastructure::artifacts;
use msreview_core::infrastructure::repositories::JsonFileVersionRepository;
use std::path::Path;
use std::sync::Arc;

const DRAFT_1: &str = "Tau and memory\n\nWe knocked down tau in adult mice and observed improved spatial memory in the water maze.";
const DRAFT_2: &str = "Tau and memory\n\nWe knocked down tau in adult mice and observed improved spatial memory in the water maze. A second cohort replicated the effect with blinded scoring.";

fn service(backend: Arc<ScriptedBackend>, tools: ToolExecutor, output_dir: &Path) -> ReviewService {
    let defaults = PanelDefaults::biomedical("m");
    let orchestrator = DiscussionOrchestrator::new(
        backend,
        tools,
        DiscussionSettings {
            num_rounds: 1,
            temperature: 0.2,
        },
    );
    ReviewService::new(
        orchestrator,
        Arc::new(StaticTeamSuggester::new(defaults.reviewers.clone())),
        defaults,
        ReviewOptions {
            output_dir: output_dir.to_path_buf(),
            num_reviewers: 3,
            max_document_chars: 50_000,
        },
    )
}

async fn tracked(service: ReviewService, project_dir: &Path) -> ReviewService {
    let store = VersionStore::open(Arc::new(JsonFileVersionRepository::new(project_dir)))
        .await
        .unwrap();
    service.with_version_store(store, project_dir)
}

#[tokio::test]
async fn test_tracked_panel_review_across_two_submissions() {
    let tmp = tempfile::tempdir().unwrap();
    let output_dir = tmp.path().join("reviews");
    let project_dir = tmp.path().join("project");

    let backend = Arc::new(ScriptedBackend::new());
    let defaults = PanelDefaults::biomedical("m");
    let mut service = tracked(
        service(backend.clone(), ToolExecutor::disabled(), &output_dir)
            .with_mentor(Mentor::new(backend.clone(), defaults.mentor.clone(), 0.2)),
        &project_dir,
    )
    .await;

    let first = service
        .run(ReviewRequest::new(Document::from_text(DRAFT_1, None), ReviewType::Panel))
        .await
        .unwrap();

    // editor + 3 reviewers, closing editor turn, then the mentor
    assert_eq!(backend.call_count(), 6);
    assert_eq!(first.team.size(), 4);
    assert_eq!(first.version_number, Some(1));
    assert_eq!(first.outcome.summary, "answer 5");
    assert!(first.transcript_json.exists());
    assert!(first.transcript_markdown.exists());
    assert_eq!(
        artifacts::load_summary(&first.transcript_json).await.unwrap().as_deref(),
        Some("answer 5")
    );
    assert!(first.revision_report.as_ref().unwrap().exists());
    assert_eq!(first.mentor_report.as_ref().unwrap().guidance, "answer 6");
    assert!(first.mentor_report_path.as_ref().unwrap().exists());

    let mut second_request = ReviewRequest::new(Document::from_text(DRAFT_2, None), ReviewType::Panel);
    second_request.author_response = Some("We added a blinded replication cohort.".to_string());
    let second = service.run(second_request).await.unwrap();

    assert_eq!(second.version_number, Some(2));

    // the seed of the second discussion carries the revision context
    let seed = backend.requests()[6].messages[1].content_str().to_string();
    assert!(seed.contains("This is a REVISED manuscript."));
    assert!(seed.contains("[begin review 1]\n\nanswer 5\n\n[end review 1]"));
    assert!(seed.contains("We added a blinded replication cohort."));
    assert!(seed.contains("This manuscript is on revision 2."));
    assert!(seed.contains("### Changes from Previous Version"));
    assert_eq!(seed.matches("answer 5").count(), 1);
    assert_eq!(seed.matches("We added a blinded replication cohort.").count(), 1);

    let store = service.version_store().unwrap();
    assert_eq!(store.len(), 2);
    assert!(store.versions().iter().all(|v| v.is_reviewed()));

    let report = std::fs::read_to_string(second.revision_report.unwrap()).unwrap();
    assert!(report.contains("## Version 2"));
    assert!(report.contains("### Changes from Version 1"));
}

#[tokio::test]
async fn test_failed_discussion_commits_no_review() {
    let tmp = tempfile::tempdir().unwrap();
    let output_dir = tmp.path().join("reviews");
    let project_dir = tmp.path().join("project");

    let backend = Arc::new(ScriptedBackend::with_script(vec![tool_request("web_browse", "{}")]));
    let tools = ToolExecutor::new(Some(Arc::new(CannedSearch)));
    let mut service = tracked(service(backend.clone(), tools, &output_dir), &project_dir).await;

    let result = service
        .run(ReviewRequest::new(Document::from_text(DRAFT_1, None), ReviewType::Panel))
        .await;

    assert!(result.is_err());
    assert_eq!(backend.call_count(), 1);
    assert!(!output_dir.exists());

    let store = service.version_store().unwrap();
    assert_eq!(store.len(), 1);
    assert!(!store.latest().unwrap().is_reviewed());
    assert!(!project_dir.join("revision_report.md").exists());
}

#[tokio::test]
async fn test_untracked_individual_review_with_manual_history() {
    let tmp = tempfile::tempdir().unwrap();
    let backend = Arc::new(ScriptedBackend::new());
    let mut service = service(backend.clone(), ToolExecutor::disabled(), tmp.path());

    let mut request = ReviewRequest::new(Document::from_text(DRAFT_2, None), ReviewType::Individual);
    request.previous_reviews = vec!["Blinding is missing.".to_string()];
    let run = service.run(request).await.unwrap();

    assert!(matches!(run.team, Team::Individual { .. }));
    assert_eq!(run.team.lead().title, "Methodology Reviewer");
    assert_eq!(run.version_number, None);
    assert!(run.revision_report.is_none());
    assert!(run.mentor_report.is_none());

    // primary, critic, primary
    assert_eq!(backend.call_count(), 3);
    let opening = backend.requests()[0].messages[1].content_str().to_string();
    assert!(opening.contains("[begin review 1]\n\nBlinding is missing.\n\n[end review 1]"));
}

#[tokio::test]
async fn test_explicit_team_skips_suggestion() {
    let tmp = tempfile::tempdir().unwrap();
    let backend = Arc::new(ScriptedBackend::new());
    let mut service = service(backend.clone(), ToolExecutor::disabled(), tmp.path());

    let defaults = PanelDefaults::biomedical("m");
    let team = Team::panel(defaults.editor.clone(), vec![defaults.reviewers[1].clone()]);
    let mut request = ReviewRequest::new(Document::from_text(DRAFT_1, None), ReviewType::Panel);
    request.team = Some(team.clone());

    let run = service.run(request).await.unwrap();
    assert_eq!(run.team, team);
    assert_eq!(backend.call_count(), 3);
}
