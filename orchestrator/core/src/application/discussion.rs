// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Discussion Orchestrator
//!
//! Drives a review team through `num_rounds` discussion rounds plus one
//! closing round, recording every prompt, answer and tool output in the
//! transcript and replaying the whole shared history to the backend on
//! every turn.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Turn-taking, tool dispatch, deterministic termination
//! - **Integration:** `LLMProvider` (backend) + `ToolExecutor` (literature search)
//!
//! # Turn order
//!
//! Rounds are numbered `0..=num_rounds`. Every round walks the team in its
//! speaking order; the closing round stops after the lead (coordinator or
//! primary reviewer) has answered. Calls are awaited strictly in sequence
//! and failures are never retried here.

use crate::application::prompts::ReviewPrompts;
use crate::domain::agent::Agent;
use crate::domain::error::ReviewError;
use crate::domain::llm::{ChatMessage, ChatRequest, LLMProvider, ToolSchema};
use crate::domain::personas::CONSISTENT_TEMPERATURE;
use crate::domain::team::{Seat, Team};
use crate::domain::tool::ToolExecutor;
use crate::domain::transcript::{estimate_tokens, Speaker, TokenAccounting, Transcript};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Lifecycle of one discussion run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscussionPhase {
    Seeding,
    /// 1-based discussion round
    RoundInProgress(u32),
    Finalizing,
    Complete,
}

impl fmt::Display for DiscussionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscussionPhase::Seeding => write!(f, "seeding"),
            DiscussionPhase::RoundInProgress(round) => write!(f, "round {}", round),
            DiscussionPhase::Finalizing => write!(f, "finalizing"),
            DiscussionPhase::Complete => write!(f, "complete"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscussionSettings {
    pub num_rounds: u32,
    pub temperature: f32,
}

impl Default for DiscussionSettings {
    fn default() -> Self {
        Self {
            num_rounds: 1,
            temperature: CONSISTENT_TEMPERATURE,
        }
    }
}

/// What the team is asked to review
#[derive(Debug, Clone, Default)]
pub struct DiscussionInput {
    /// Manuscript text as embedded in the prompts
    pub manuscript: String,
    pub criteria: Vec<String>,
    /// Prior reviews, author response and changes; empty for a first submission
    pub revision_context: String,
}

#[derive(Debug, Clone)]
pub struct DiscussionOutcome {
    pub transcript: Transcript,
    /// Text of the last transcript entry
    pub summary: String,
    pub tokens: TokenAccounting,
}

/// Shared conversation state of a run in progress
#[derive(Default)]
struct Conversation {
    transcript: Transcript,
    messages: Vec<ChatMessage>,
    tool_tokens: u64,
}

impl Conversation {
    fn push_prompt(&mut self, prompt: String) {
        self.messages.push(ChatMessage::user(prompt.clone()));
        self.transcript.push_user(prompt);
    }
}

pub struct DiscussionOrchestrator {
    backend: Arc<dyn LLMProvider>,
    tools: ToolExecutor,
    prompts: ReviewPrompts,
    settings: DiscussionSettings,
}

impl DiscussionOrchestrator {
    pub fn new(backend: Arc<dyn LLMProvider>, tools: ToolExecutor, settings: DiscussionSettings) -> Self {
        Self {
            backend,
            tools,
            prompts: ReviewPrompts::new(),
            settings,
        }
    }

    pub fn settings(&self) -> DiscussionSettings {
        self.settings
    }

    /// Run the whole discussion; the team is validated before any backend call
    pub async fn run(
        &self,
        team: &Team,
        input: &DiscussionInput,
    ) -> Result<DiscussionOutcome, ReviewError> {
        team.validate()?;

        let num_rounds = self.settings.num_rounds;
        let mut conversation = Conversation::default();

        info!(
            "Starting {} review with {} agents over {} round(s) (+ final round)",
            team.kind(),
            team.size(),
            num_rounds
        );

        self.enter(DiscussionPhase::Seeding);
        if let Team::Panel {
            coordinator,
            participants,
        } = team
        {
            let seed = self.prompts.panel_start(
                coordinator,
                participants,
                &input.manuscript,
                &input.criteria,
                &input.revision_context,
                num_rounds,
            )?;
            conversation.push_prompt(seed);
        }

        for round in 0..=num_rounds {
            let closing = round == num_rounds;
            self.enter(if closing {
                DiscussionPhase::Finalizing
            } else {
                DiscussionPhase::RoundInProgress(round + 1)
            });

            for (seat, agent) in team.speaking_order() {
                let prompt = self.turn_prompt(team, seat, agent, round, input)?;
                conversation.push_prompt(prompt);
                self.take_turn(&mut conversation, seat, agent).await?;

                if closing {
                    break;
                }
            }
        }

        self.enter(DiscussionPhase::Complete);

        let Conversation {
            transcript,
            tool_tokens,
            ..
        } = conversation;
        let tokens = transcript.token_accounting(tool_tokens);
        let summary = transcript.summary().unwrap_or_default().to_string();

        info!(
            "Discussion finished: {} transcript entries, ~{} input / ~{} output tokens",
            transcript.len(),
            tokens.input,
            tokens.output
        );

        Ok(DiscussionOutcome {
            transcript,
            summary,
            tokens,
        })
    }

    fn enter(&self, phase: DiscussionPhase) {
        info!("Discussion phase: {}", phase);
    }

    fn turn_prompt(
        &self,
        team: &Team,
        seat: Seat,
        agent: &Agent,
        round: u32,
        input: &DiscussionInput,
    ) -> Result<String, ReviewError> {
        let num_rounds = self.settings.num_rounds;

        match (team, seat) {
            // with zero rounds the opening round is also the closing one
            (_, Seat::Coordinator) if round == 0 => self.prompts.coordinator_initial(agent),
            (_, Seat::Coordinator) if round == num_rounds => {
                self.prompts.coordinator_final(agent, &input.criteria)
            }
            (_, Seat::Coordinator) => {
                self.prompts
                    .coordinator_intermediate(agent, round, num_rounds)
            }
            (_, Seat::Participant) => self.prompts.participant(agent, round + 1, num_rounds),
            (_, Seat::Primary) if round == 0 => self.prompts.individual_start(
                agent,
                &input.manuscript,
                &input.criteria,
                &input.revision_context,
            ),
            (Team::Individual { critic, .. }, Seat::Primary) => {
                self.prompts.individual_revision(critic, agent)
            }
            (Team::Individual { primary, .. }, Seat::Critic) => self.prompts.critic(agent, primary),
            (Team::Panel { .. }, seat) => Err(ReviewError::InvalidTeam(format!(
                "seat {:?} does not exist in a panel",
                seat
            ))),
        }
    }

    async fn take_turn(
        &self,
        conversation: &mut Conversation,
        seat: Seat,
        agent: &Agent,
    ) -> Result<(), ReviewError> {
        info!("{} is responding", agent.title);

        let request = self.request(agent, &conversation.messages, self.tools.schemas());
        let response = self.backend.complete(&request).await?;

        let text = if response.requests_tools() {
            let mut outputs = Vec::with_capacity(response.tool_calls.len());
            for call in &response.tool_calls {
                outputs.push(self.tools.execute(call).await?);
            }
            conversation.tool_tokens += outputs.iter().map(|o| estimate_tokens(o)).sum::<u64>();

            conversation.messages.push(ChatMessage::assistant_tool_calls(
                response.text.clone(),
                response.tool_calls.clone(),
            ));
            for (call, output) in response.tool_calls.iter().zip(&outputs) {
                conversation
                    .messages
                    .push(ChatMessage::tool(&call.id, output.as_str()));
            }
            conversation.transcript.push_tool(outputs.join("\n\n"));

            // Follow-up answer without tools so the turn always ends in text
            let follow_up = self.request(agent, &conversation.messages, Vec::new());
            self.backend.complete(&follow_up).await?.text.unwrap_or_default()
        } else {
            response.text.unwrap_or_default()
        };

        conversation.messages.push(ChatMessage::assistant(text.clone()));
        conversation
            .transcript
            .push_agent(speaker_for(seat), &agent.title, text);

        Ok(())
    }

    fn request(&self, agent: &Agent, history: &[ChatMessage], tools: Vec<ToolSchema>) -> ChatRequest {
        let messages: Vec<ChatMessage> = std::iter::once(agent.system_message())
            .chain(history.iter().cloned())
            .collect();

        debug!(
            "Requesting {} with {} messages ({} tools)",
            agent.model_id,
            messages.len(),
            tools.len()
        );

        ChatRequest::new(&agent.model_id, messages)
            .with_temperature(self.settings.temperature)
            .with_tools(tools)
    }
}

fn speaker_for(seat: Seat) -> Speaker {
    match seat {
        Seat::Coordinator => Speaker::Coordinator,
        Seat::Participant | Seat::Primary => Speaker::Participant,
        Seat::Critic => Speaker::Critic,
    }
}
