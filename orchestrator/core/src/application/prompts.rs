// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Review Prompts
//!
//! Turn prompts for both discussion shapes plus the formatting helpers that
//! wrap manuscript text, criteria, earlier reviews and author responses in
//! the delimiters the personas are told to expect.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Build every prompt the discussion orchestrator sends
//! - **Integration:** `PromptTemplateEngine` renders the templates below

use crate::domain::agent::Agent;
use crate::domain::error::ReviewError;
use crate::infrastructure::prompt_template_engine::{PromptContext, PromptTemplateEngine};

pub const SYNTHESIS_TASK: &str = "synthesize the points raised by each reviewer, identify the most critical issues, and determine the overall assessment of the manuscript";

pub const SUMMARY_TASK: &str = "summarize the review discussion, provide specific recommendations for the authors, and give a final publication recommendation";

pub const REVIEW_STRUCTURE: &str = "Your review should follow this structure:

### Summary
Provide a brief summary of the manuscript's main findings and contributions.

### Major Strengths
List the key strengths of the manuscript (2-4 points).

### Major Weaknesses
List the significant weaknesses that must be addressed (2-4 points).

### Minor Issues
List minor issues or suggestions for improvement.

### Conclusions Assessment
Evaluate each major conclusion of the manuscript:

#### Conclusions Supported by the Data
List conclusions that ARE adequately supported by the presented evidence. For each, briefly explain what data supports it.

#### Conclusions NOT Supported by the Data
List conclusions that are NOT adequately supported, overstated, or require additional evidence. For each:
- State the claim made by the authors
- Explain why the current data is insufficient
- Specify what additional data or analysis would be needed

### Specific Comments
Provide detailed, line-by-line or section-by-section feedback.

### Recommendation
Provide one of: Accept, Minor Revisions, Major Revisions, or Reject.
Justify your recommendation based on the above assessment.";

const PANEL_START: &str = "This is a manuscript review meeting to evaluate a scientific paper for publication. \
The review panel consists of the {{lead}} and the following reviewers: {{roster}}.\n\n\
{{revision_context}}{{manuscript}}{{criteria}}\
The {{lead}} will convene the meeting and provide initial impressions. \
Then, each reviewer will provide their assessment one-by-one. \
After all reviewers have given their input, the {{lead}} will {{synthesis_task}}. \
This will continue for {{num_rounds}} round(s). \
Finally, the {{lead}} will {{summary_task}}.";

const COORDINATOR_INITIAL: &str = "{{agent}}, please provide your initial impressions of the manuscript \
and highlight the key areas you would like the reviewers to focus on.";

const COORDINATOR_INTERMEDIATE: &str = "This concludes round {{round}} of {{num_rounds}} of the review discussion. \
{{agent}}, please {{synthesis_task}}.";

const COORDINATOR_FINAL: &str = "{{agent}}, please {{summary_task}}.\n\n\
{{criteria}}Your summary should take the following form:\n\n{{structure}}";

const PARTICIPANT: &str = "{{agent}}, please provide your assessment of the manuscript (round {{round}} of {{num_rounds}}). \
Focus on your area of expertise. \
If you do not have anything new or relevant to add, you may say \"pass\". \
You may respectfully disagree with other reviewers if you have a different perspective.";

const INDIVIDUAL_START: &str = "This is an individual review session with {{agent}} to evaluate a scientific manuscript.\n\n\
{{revision_context}}{{manuscript}}{{criteria}}\
{{agent}}, please provide your comprehensive review of this manuscript.\n\n{{structure}}";

const CRITIC: &str = "{{lead}}, please critique {{agent}}'s review. \
Is the review thorough and fair? Are there important issues the reviewer missed? \
Is the feedback specific and actionable? \
Suggest improvements to make the review more helpful to the authors. \
Only provide feedback; do not write the review yourself.";

const INDIVIDUAL_REVISION: &str = "{{agent}}, please revise your review based on {{lead}}'s feedback. \
Address the issues raised and improve your review accordingly.";

/// Numbered list, blank line between items
pub fn format_numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn format_manuscript(text: &str) -> String {
    format!(
        "Here is the manuscript to review:\n\n[begin manuscript]\n\n{}\n\n[end manuscript]\n\n",
        text
    )
}

/// Empty when there are no criteria
pub fn format_criteria(criteria: &[String], intro: &str) -> String {
    if criteria.is_empty() {
        return String::new();
    }
    format!("{}\n\n{}\n\n", intro, format_numbered(criteria))
}

pub fn format_previous_reviews(reviews: &[String]) -> String {
    if reviews.is_empty() {
        return String::new();
    }
    let blocks = reviews
        .iter()
        .enumerate()
        .map(|(i, review)| format!("[begin review {n}]\n\n{review}\n\n[end review {n}]", n = i + 1))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("Here are the previous reviews of this manuscript:\n\n{}\n\n", blocks)
}

pub fn format_author_response(response: &str) -> String {
    if response.trim().is_empty() {
        return String::new();
    }
    format!(
        "Here is the authors' response to previous reviews:\n\n[begin author response]\n\n{}\n\n[end author response]\n\n",
        response
    )
}

/// Renders the turn prompts of both discussion shapes
pub struct ReviewPrompts {
    engine: PromptTemplateEngine,
}

impl ReviewPrompts {
    pub fn new() -> Self {
        Self {
            engine: PromptTemplateEngine::new(),
        }
    }

    /// Opening turn of a panel discussion
    pub fn panel_start(
        &self,
        coordinator: &Agent,
        participants: &[Agent],
        manuscript: &str,
        criteria: &[String],
        revision_context: &str,
        num_rounds: u32,
    ) -> Result<String, ReviewError> {
        let roster = participants
            .iter()
            .map(|p| p.title.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let mut context = tasks(PromptContext::new())
            .lead(&coordinator.title)
            .roster(roster)
            .revision_context(revision_context)
            .manuscript(format_manuscript(manuscript))
            .criteria(format_criteria(
                criteria,
                "Please evaluate the manuscript on the following criteria:",
            ));
        context.num_rounds = Some(num_rounds);

        self.render(PANEL_START, &context)
    }

    pub fn coordinator_initial(&self, coordinator: &Agent) -> Result<String, ReviewError> {
        self.render(COORDINATOR_INITIAL, &PromptContext::new().agent(&coordinator.title))
    }

    /// `completed_round` is the 1-based round that just ended
    pub fn coordinator_intermediate(
        &self,
        coordinator: &Agent,
        completed_round: u32,
        num_rounds: u32,
    ) -> Result<String, ReviewError> {
        let context = tasks(PromptContext::new())
            .agent(&coordinator.title)
            .round(completed_round, num_rounds);
        self.render(COORDINATOR_INTERMEDIATE, &context)
    }

    pub fn coordinator_final(
        &self,
        coordinator: &Agent,
        criteria: &[String],
    ) -> Result<String, ReviewError> {
        let context = tasks(PromptContext::new())
            .agent(&coordinator.title)
            .criteria(format_criteria(
                criteria,
                "As a reminder, here are the review criteria that must be addressed:",
            ))
            .extra("structure", serde_json::json!(REVIEW_STRUCTURE));
        self.render(COORDINATOR_FINAL, &context)
    }

    pub fn participant(
        &self,
        participant: &Agent,
        round: u32,
        num_rounds: u32,
    ) -> Result<String, ReviewError> {
        let context = PromptContext::new()
            .agent(&participant.title)
            .round(round, num_rounds);
        self.render(PARTICIPANT, &context)
    }

    /// Full review request given to the primary reviewer in round 0
    pub fn individual_start(
        &self,
        primary: &Agent,
        manuscript: &str,
        criteria: &[String],
        revision_context: &str,
    ) -> Result<String, ReviewError> {
        let context = PromptContext::new()
            .agent(&primary.title)
            .revision_context(revision_context)
            .manuscript(format_manuscript(manuscript))
            .criteria(format_criteria(
                criteria,
                "Please evaluate the manuscript on the following criteria:",
            ))
            .extra("structure", serde_json::json!(REVIEW_STRUCTURE));
        self.render(INDIVIDUAL_START, &context)
    }

    pub fn critic(&self, critic: &Agent, primary: &Agent) -> Result<String, ReviewError> {
        let context = PromptContext::new().lead(&critic.title).agent(&primary.title);
        self.render(CRITIC, &context)
    }

    pub fn individual_revision(&self, critic: &Agent, primary: &Agent) -> Result<String, ReviewError> {
        let context = PromptContext::new().lead(&critic.title).agent(&primary.title);
        self.render(INDIVIDUAL_REVISION, &context)
    }

    fn render(&self, template: &str, context: &PromptContext) -> Result<String, ReviewError> {
        self.engine
            .render(template, context)
            .map_err(|e| ReviewError::Prompt(format!("{:#}", e)))
    }
}

impl Default for ReviewPrompts {
    fn default() -> Self {
        Self::new()
    }
}

fn tasks(context: PromptContext) -> PromptContext {
    context
        .extra("synthesis_task", serde_json::json!(SYNTHESIS_TASK))
        .extra("summary_task", serde_json::json!(SUMMARY_TASK))
}
