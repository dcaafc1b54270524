// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Post-review guidance.
//
// One extra backend call turns a finished review summary into a revision
// plan for the authors. Callers treat it as optional: a failure here must
// never fail the review it follows.

use crate::domain::agent::Agent;
use crate::domain::error::ReviewError;
use crate::domain::llm::{ChatMessage, ChatRequest, LLMProvider};
use crate::domain::transcript::{estimate_tokens, TokenAccounting};
use std::sync::Arc;
use tracing::info;

const MENTOR_SYSTEM_PROMPT: &str = "You are an experienced scientific mentor helping authors respond to peer review.
Your role is to provide practical, actionable guidance that helps authors:
1. Understand the core concerns behind reviewer comments
2. Prioritize which issues to address first
3. Develop both textual revisions and experimental plans

You should be supportive but realistic about what can be achieved. When experiments are suggested,
consider feasibility, time, and resources. Always aim to help the authors produce the strongest
possible revision while being mindful of practical constraints.

Structure your advice to be clear and actionable, with specific recommendations the authors can follow.";

const GUIDANCE_STRUCTURE: &str = "Please provide your mentorship guidance in the following structure:

## Executive Summary
Briefly summarize the overall reviewer sentiment and the key issues that must be addressed for successful revision.

## Priority Assessment
Categorize the reviewer concerns by priority:
- **Critical (Must Address)**: Issues that will likely result in rejection if not addressed
- **Important (Should Address)**: Issues that significantly strengthen the paper
- **Minor (Nice to Address)**: Issues that are suggestions or polish

## Textual Revisions
For each major concern, provide specific guidance on how to revise the text:

### [Concern Category 1]
**Reviewer Concern**: [Summarize the concern]
**Recommended Textual Changes**:
- Specific text additions, deletions, or modifications
- Suggested wording or framing
- Where in the manuscript to make changes
**Example Language**: [Provide example text where helpful]

### [Concern Category 2]
[Continue for each major textual concern...]

## Experimental Recommendations
For concerns that require additional data or experiments:

### [Experimental Need 1]
**Reviewer Concern**: [What data/validation is needed]
**Recommended Experiments**:
- Specific experiments to perform
- Expected outcomes and how they address the concern
- Estimated difficulty/time (low/medium/high)
- Alternative approaches if primary experiment is not feasible

**If Not Feasible**: Suggested textual approach to acknowledge limitation

### [Experimental Need 2]
[Continue for each experimental need...]

## Response Letter Strategy
Provide guidance on how to structure the response to reviewers:
- Key points to emphasize
- Tone recommendations
- How to handle disagreements professionally

## Revision Checklist
A prioritized checklist of all changes to make:
- [ ] Critical item 1
- [ ] Critical item 2
- [ ] Important item 1
- [ ] Important item 2
- [ ] Minor item 1
[etc.]

## Estimated Revision Scope
Provide a realistic assessment:
- **Textual revisions only**: What can be achieved with writing changes alone
- **With additional analyses**: What becomes possible with reanalysis of existing data
- **With new experiments**: Full scope if all suggested experiments are performed

Please be specific, practical, and supportive in your guidance.";

const REPORT_HEADER: &str =
    "# Scientific Mentor Report\n\n*Guidance for Addressing Reviewer Concerns*\n\n---\n\n";

#[derive(Debug, Clone)]
pub struct MentorReport {
    pub guidance: String,
    pub tokens: TokenAccounting,
}

impl MentorReport {
    /// Markdown document written next to the review transcript
    pub fn to_markdown(&self) -> String {
        format!("{}{}", REPORT_HEADER, self.guidance)
    }
}

pub struct Mentor {
    backend: Arc<dyn LLMProvider>,
    persona: Agent,
    temperature: f32,
}

impl Mentor {
    pub fn new(backend: Arc<dyn LLMProvider>, persona: Agent, temperature: f32) -> Self {
        Self {
            backend,
            persona,
            temperature,
        }
    }

    pub async fn advise(&self, review_summary: &str) -> Result<MentorReport, ReviewError> {
        info!("Generating {} guidance", self.persona.title);

        let messages = vec![
            ChatMessage::system(format!(
                "{}\n\n{}",
                MENTOR_SYSTEM_PROMPT,
                self.persona.render_persona()
            )),
            ChatMessage::user(guidance_prompt(review_summary)),
        ];
        let input: u64 = messages.iter().map(|m| estimate_tokens(m.content_str())).sum();

        let request = ChatRequest::new(&self.persona.model_id, messages).with_temperature(self.temperature);
        let guidance = self.backend.complete(&request).await?.text.unwrap_or_default();

        let mut tokens = TokenAccounting::default();
        tokens.record_call(input, estimate_tokens(&guidance));

        Ok(MentorReport { guidance, tokens })
    }
}

fn guidance_prompt(review_summary: &str) -> String {
    format!(
        "As a scientific mentor, please review the following peer review feedback and provide comprehensive guidance to help the authors address the reviewer concerns.

## Review Summary

{}

---

{}",
        review_summary, GUIDANCE_STRUCTURE
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::{ChatResponse, ChatRole, LLMError};
    use crate::domain::personas;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingBackend {
        last: Mutex<Option<ChatRequest>>,
    }

    #[async_trait::async_trait]
    impl LLMProvider for RecordingBackend {
        async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LLMError> {
            *self.last.lock().unwrap() = Some(request.clone());
            Ok(ChatResponse::text(&request.model, "Prioritize the stroke model."))
        }
    }

    struct FailingBackend;

    #[async_trait::async_trait]
    impl LLMProvider for FailingBackend {
        async fn complete(&self, _request: &ChatRequest) -> Result<ChatResponse, LLMError> {
            Err(LLMError::RateLimit)
        }
    }

    #[tokio::test]
    async fn test_advise_builds_guidance_request() {
        let backend = Arc::new(RecordingBackend::default());
        let mentor = Mentor::new(backend.clone(), personas::scientific_mentor("mentor-model"), 0.2);

        let report = mentor.advise("Major revisions: add in vivo data.").await.unwrap();
        assert_eq!(report.guidance, "Prioritize the stroke model.");
        assert!(report.tokens.input > 0);
        assert!(report.to_markdown().starts_with("# Scientific Mentor Report"));

        let request = backend.last.lock().unwrap().clone().unwrap();
        assert_eq!(request.model, "mentor-model");
        assert_eq!(request.messages[0].role, ChatRole::System);
        assert!(request.messages[0].content_str().contains("You are a Scientific Mentor"));
        assert!(request.messages[1].content_str().contains("Major revisions: add in vivo data."));
        assert!(request.messages[1].content_str().contains("## Revision Checklist"));
    }

    #[tokio::test]
    async fn test_advise_surfaces_backend_error() {
        let mentor = Mentor::new(Arc::new(FailingBackend), personas::scientific_mentor("m"), 0.2);
        let err = mentor.advise("summary").await.unwrap_err();
        assert!(matches!(err, ReviewError::Backend(LLMError::RateLimit)));
    }
}
