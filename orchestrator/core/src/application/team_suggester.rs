// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Team Suggester
//!
//! Chooses the participants of a panel review. `LlmTeamSuggester` asks the
//! backend for reviewer profiles tailored to the manuscript; any backend or
//! parse failure falls back to the default reviewers, so suggesting a team
//! never fails.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Pluggable reviewer selection with deterministic fallback

use crate::domain::agent::Agent;
use crate::domain::llm::{ChatMessage, ChatRequest, LLMProvider};
use crate::domain::personas::CONSISTENT_TEMPERATURE;
use crate::domain::text::truncate_chars;
use crate::infrastructure::prompt_template_engine::render_simple;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{info, warn};

/// Manuscript characters shown to the backend
pub const MAX_ANALYSIS_CHARS: usize = 15_000;

const SYSTEM_PROMPT: &str = "You are an expert at identifying the ideal peer reviewers for scientific manuscripts. You understand the nuances of different research fields and can identify the specific expertise needed to properly evaluate a paper.";

const ANALYSIS_TEMPLATE: &str = r#"Analyze this scientific manuscript and identify {{num_reviewers}} specialized reviewer profiles that would be ideal for peer review.

Consider:
1. The main research techniques/methods used (e.g., proteomics, CRISPR, imaging, behavioral assays)
2. The biological/scientific domain (e.g., neuroscience, cancer biology, immunology)
3. Any specialized expertise needed (e.g., bioinformatics, specific animal models, clinical relevance)

For each reviewer, provide:
- A specific title (e.g., "Proteomics Specialist" not just "Methodology Reviewer")
- Their precise expertise relevant to THIS manuscript
- Their goal in reviewing this specific paper
- Their role in evaluating specific aspects

Return your response as a JSON array with exactly {{num_reviewers}} reviewer objects.
Each object must have these exact fields: "title", "expertise", "goal", "role"

Example format:
[
  {
    "title": "Synaptic Biology Expert",
    "expertise": "synaptic vesicle dynamics, SNARE complex function, and presynaptic protein interactions",
    "goal": "evaluate the accuracy of synaptic biology claims and the appropriateness of synaptic assays",
    "role": "assess whether the synaptic phenotypes are properly characterized and interpreted in the context of current literature"
  },
  ...
]

Here is the manuscript to analyze:

{{manuscript}}

Return ONLY the JSON array, no other text."#;

#[async_trait]
pub trait TeamSuggester: Send + Sync {
    /// Up to `k` distinct participants for a panel reviewing `document_text`
    async fn suggest_team(&self, document_text: &str, k: usize) -> Vec<Agent>;
}

/// Always returns the default reviewers
pub struct StaticTeamSuggester {
    reviewers: Vec<Agent>,
}

impl StaticTeamSuggester {
    pub fn new(reviewers: Vec<Agent>) -> Self {
        Self { reviewers }
    }
}

#[async_trait]
impl TeamSuggester for StaticTeamSuggester {
    async fn suggest_team(&self, _document_text: &str, k: usize) -> Vec<Agent> {
        self.reviewers.iter().take(k).cloned().collect()
    }
}

#[derive(Debug, Deserialize)]
struct ReviewerProfile {
    title: String,
    expertise: String,
    goal: String,
    role: String,
}

pub struct LlmTeamSuggester {
    backend: Arc<dyn LLMProvider>,
    model_id: String,
    fallback: Vec<Agent>,
}

impl LlmTeamSuggester {
    /// `fallback` tops up short answers and replaces failed ones
    pub fn new(backend: Arc<dyn LLMProvider>, model_id: impl Into<String>, fallback: Vec<Agent>) -> Self {
        Self {
            backend,
            model_id: model_id.into(),
            fallback,
        }
    }

    fn defaults(&self, k: usize) -> Vec<Agent> {
        self.fallback.iter().take(k).cloned().collect()
    }

    async fn request_profiles(&self, document_text: &str, k: usize) -> anyhow::Result<Vec<ReviewerProfile>> {
        let vars = HashMap::from([
            ("num_reviewers".to_string(), k.to_string()),
            (
                "manuscript".to_string(),
                truncate_chars(document_text, MAX_ANALYSIS_CHARS).to_string(),
            ),
        ]);
        let prompt = render_simple(ANALYSIS_TEMPLATE, &vars)?;

        let request = ChatRequest::new(
            &self.model_id,
            vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
        )
        .with_temperature(CONSISTENT_TEMPERATURE);

        let response = self.backend.complete(&request).await?;
        parse_profiles(response.text.as_deref().unwrap_or_default())
    }
}

#[async_trait]
impl TeamSuggester for LlmTeamSuggester {
    async fn suggest_team(&self, document_text: &str, k: usize) -> Vec<Agent> {
        let profiles = match self.request_profiles(document_text, k).await {
            Ok(profiles) => profiles,
            Err(e) => {
                warn!("Could not generate reviewer suggestions, using defaults: {:#}", e);
                return self.defaults(k);
            }
        };

        let mut titles = HashSet::new();
        let mut team: Vec<Agent> = profiles
            .into_iter()
            .filter(|p| titles.insert(p.title.clone()))
            .take(k)
            .map(|p| Agent::new(p.title, p.expertise, p.goal, p.role, &self.model_id))
            .collect();

        for reviewer in &self.fallback {
            if team.len() >= k {
                break;
            }
            if titles.insert(reviewer.title.clone()) {
                team.push(reviewer.clone());
            }
        }

        info!(
            "Generated reviewer panel: {}",
            team.iter()
                .map(|a| a.title.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        team
    }
}

/// JSON array from a bare or fenced answer; malformed entries are skipped
fn parse_profiles(text: &str) -> anyhow::Result<Vec<ReviewerProfile>> {
    let json = extract_json(text);
    let values: Vec<serde_json::Value> = serde_json::from_str(json.trim())?;

    Ok(values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<ReviewerProfile>(value) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!("Skipping malformed reviewer profile: {}", e);
                None
            }
        })
        .collect())
}

fn extract_json(text: &str) -> &str {
    let fenced = text
        .split_once("```json")
        .or_else(|| text.split_once("```"))
        .map(|(_, rest)| rest);

    match fenced {
        Some(rest) => rest.split_once("```").map(|(body, _)| body).unwrap_or(rest),
        None => text,
    }
}
