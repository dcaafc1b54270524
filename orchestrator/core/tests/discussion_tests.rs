// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Discussion orchestrator behaviour against a scripted backend: turn
//! counts, roster validation and the tool-call flow.

mod common;

use common::{tool_request, CannedSearch, ScriptedBackend};
use msreview_core::application::{DiscussionInput, DiscussionOrchestrator, DiscussionSettings};
use msreview_core::domain::error::ReviewError;
use msreview_core::domain::llm::{ChatResponse, ChatRole, LLMError};
use msreview_core::domain::personas;
use msreview_core::domain::team::Team;
use msreview_core::domain::tool::ToolExecutor;
use msreview_core::domain::transcript::Speaker;
use std::sync::Arc;

fn input() -> DiscussionInput {
    DiscussionInput {
        manuscript: "# Tau and memory\n\nWe knocked down tau in mice.".to_string(),
        criteria: personas::biomedical_review_criteria(),
        revision_context: String::new(),
    }
}

fn panel() -> Team {
    Team::panel(
        personas::editor("m"),
        vec![
            personas::methodology_reviewer("m"),
            personas::domain_expert("m"),
            personas::presentation_reviewer("m"),
        ],
    )
}

fn orchestrator(backend: Arc<ScriptedBackend>, tools: ToolExecutor, num_rounds: u32) -> DiscussionOrchestrator {
    DiscussionOrchestrator::new(
        backend,
        tools,
        DiscussionSettings {
            num_rounds,
            temperature: 0.2,
        },
    )
}

#[tokio::test]
async fn test_panel_two_rounds_produces_nine_agent_turns() {
    let backend = Arc::new(ScriptedBackend::new());
    let outcome = orchestrator(backend.clone(), ToolExecutor::disabled(), 2)
        .run(&panel(), &input())
        .await
        .unwrap();

    let agent_turns: Vec<_> = outcome.transcript.agent_turns().collect();
    assert_eq!(agent_turns.len(), 9);
    assert_eq!(backend.call_count(), 9);

    // seed + one prompt per agent turn + the answers
    assert_eq!(outcome.transcript.len(), 1 + 9 * 2);

    let last = outcome.transcript.turns().last().unwrap();
    assert_eq!(last.speaker, Speaker::Coordinator);
    assert_eq!(last.name, "Editor");
    assert_eq!(outcome.summary, "answer 9");
    assert!(outcome.tokens.input > 0);
    assert_eq!(outcome.tokens.tool, 0);
}

#[tokio::test]
async fn test_duplicate_participant_rejected_before_any_call() {
    let backend = Arc::new(ScriptedBackend::new());
    let team = Team::panel(
        personas::editor("m"),
        vec![personas::domain_expert("m"), personas::domain_expert("m")],
    );

    let err = orchestrator(backend.clone(), ToolExecutor::disabled(), 1)
        .run(&team, &input())
        .await
        .unwrap_err();

    assert!(matches!(err, ReviewError::InvalidTeam(_)));
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn test_tool_call_is_executed_and_followed_up() {
    let backend = Arc::new(ScriptedBackend::with_script(vec![
        ChatResponse::text("m", "Opening remarks."),
        tool_request("pubmed_search", r#"{"query": "tau knockdown memory", "num_articles": 1}"#),
    ]));
    let team = Team::panel(personas::editor("m"), vec![personas::domain_expert("m")]);
    let tools = ToolExecutor::new(Some(Arc::new(CannedSearch)));

    let outcome = orchestrator(backend.clone(), tools, 1)
        .run(&team, &input())
        .await
        .unwrap();

    // seed, editor prompt, editor, expert prompt, tool, expert, final prompt, editor
    let turns = outcome.transcript.turns();
    assert_eq!(turns.len(), 8);
    assert_eq!(turns[4].speaker, Speaker::Tool);
    assert!(turns[4].text.contains("[begin article 1]"));
    assert!(turns[4].text.contains("tau knockdown memory"));
    assert_eq!(turns[5].speaker, Speaker::Participant);
    assert_eq!(turns[5].text, "answer 3");
    assert!(outcome.tokens.tool > 0);

    let requests = backend.requests();
    assert_eq!(requests.len(), 4);
    assert_eq!(requests[1].tools.len(), 1);

    // the follow-up sees the tool exchange but is offered no tools
    let follow_up = &requests[2];
    assert!(follow_up.tools.is_empty());
    let n = follow_up.messages.len();
    assert_eq!(follow_up.messages[n - 2].role, ChatRole::Assistant);
    assert_eq!(follow_up.messages[n - 2].tool_calls.len(), 1);
    assert_eq!(follow_up.messages[n - 1].role, ChatRole::Tool);
    assert_eq!(
        follow_up.messages[n - 1].tool_call_id.as_deref(),
        Some(follow_up.messages[n - 2].tool_calls[0].id.as_str())
    );
}

#[tokio::test]
async fn test_unknown_tool_aborts_the_discussion() {
    let backend = Arc::new(ScriptedBackend::with_script(vec![tool_request(
        "web_browse",
        r#"{"url": "https://example.org"}"#,
    )]));
    let tools = ToolExecutor::new(Some(Arc::new(CannedSearch)));

    let err = orchestrator(backend.clone(), tools, 1)
        .run(&panel(), &input())
        .await
        .unwrap_err();

    assert!(matches!(err, ReviewError::UnknownTool(name) if name == "web_browse"));
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn test_backend_failure_aborts_without_retry() {
    let backend = Arc::new(ScriptedBackend::failing_on_call(3));

    let err = orchestrator(backend.clone(), ToolExecutor::disabled(), 2)
        .run(&panel(), &input())
        .await
        .unwrap_err();

    assert!(matches!(err, ReviewError::Backend(LLMError::Network(_))));
    assert_eq!(backend.call_count(), 3);
}

#[tokio::test]
async fn test_individual_review_with_zero_rounds() {
    let backend = Arc::new(ScriptedBackend::new());
    let team = Team::individual(personas::domain_expert("m"), personas::scientific_critic("m"));

    let outcome = orchestrator(backend.clone(), ToolExecutor::disabled(), 0)
        .run(&team, &input())
        .await
        .unwrap();

    // only the primary reviewer speaks, with the opening prompt
    assert_eq!(backend.call_count(), 1);
    let turns = outcome.transcript.turns();
    assert_eq!(turns.len(), 2);
    assert!(turns[0].text.starts_with("This is an individual review session"));
    assert_eq!(turns[1].speaker, Speaker::Participant);
}
