// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Transcript
//!
//! Ordered, append-only record of one review run. Insertion order is the
//! conversation itself: prompts (`User`), agent answers, and tool outputs in
//! exactly the order they were produced.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Run history, summary extraction and token accounting

use serde::{Deserialize, Serialize};

pub const USER_NAME: &str = "User";
pub const TOOL_NAME: &str = "Tool";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Coordinator,
    Participant,
    Tool,
    Critic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,

    /// "User", "Tool" or the acting agent's title
    #[serde(rename = "agent")]
    pub name: String,

    #[serde(rename = "message")]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.push(Speaker::User, USER_NAME, text);
    }

    pub fn push_tool(&mut self, text: impl Into<String>) {
        self.push(Speaker::Tool, TOOL_NAME, text);
    }

    pub fn push_agent(&mut self, speaker: Speaker, agent_title: &str, text: impl Into<String>) {
        self.push(speaker, agent_title, text);
    }

    fn push(&mut self, speaker: Speaker, name: &str, text: impl Into<String>) {
        self.turns.push(Turn {
            speaker,
            name: name.to_string(),
            text: text.into(),
        });
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Canonical review summary: the text of the last entry
    pub fn summary(&self) -> Option<&str> {
        self.turns.last().map(|t| t.text.as_str())
    }

    /// Answers produced by agents (prompts and tool outputs excluded)
    pub fn agent_turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns
            .iter()
            .filter(|t| !matches!(t.speaker, Speaker::User | Speaker::Tool))
    }

    /// Replay the transcript: every non-prompt entry counts as one call whose
    /// input is everything before it and whose output is the entry itself.
    pub fn token_accounting(&self, tool_tokens: u64) -> TokenAccounting {
        let mut accounting = TokenAccounting {
            tool: tool_tokens,
            ..TokenAccounting::default()
        };
        let mut prefix_tokens = 0u64;

        for turn in &self.turns {
            let turn_tokens = estimate_tokens(&turn.text);
            if turn.speaker != Speaker::User {
                accounting.record_call(prefix_tokens, turn_tokens);
            }
            prefix_tokens += turn_tokens;
        }

        accounting
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAccounting {
    pub input: u64,
    pub output: u64,
    pub tool: u64,
    pub max_single_call: u64,
}

impl TokenAccounting {
    pub fn record_call(&mut self, input: u64, output: u64) {
        self.input += input;
        self.output += output;
        self.max_single_call = self.max_single_call.max(input + output);
    }
}

/// Rough token estimate: one token per four characters, rounded up
pub fn estimate_tokens(text: &str) -> u64 {
    (text.chars().count() as u64).div_ceil(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abc"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn test_summary_is_last_entry() {
        let mut transcript = Transcript::new();
        assert!(transcript.summary().is_none());

        transcript.push_user("opening");
        transcript.push_agent(Speaker::Coordinator, "Editor", "final verdict");
        assert_eq!(transcript.summary(), Some("final verdict"));
    }

    #[test]
    fn test_token_accounting_replay() {
        let mut transcript = Transcript::new();
        transcript.push_user("aaaa"); // 1
        transcript.push_agent(Speaker::Coordinator, "Editor", "bbbbbbbb"); // 2
        transcript.push_user("cccc"); // 1
        transcript.push_tool("dddd"); // 1
        transcript.push_agent(Speaker::Participant, "Reviewer", "eeee"); // 1

        let accounting = transcript.token_accounting(7);

        // calls: (1 -> 2), (4 -> 1), (5 -> 1)
        assert_eq!(accounting.input, 1 + 4 + 5);
        assert_eq!(accounting.output, 2 + 1 + 1);
        assert_eq!(accounting.max_single_call, 6);
        assert_eq!(accounting.tool, 7);
    }

    #[test]
    fn test_serializes_as_agent_message_pairs() {
        let mut transcript = Transcript::new();
        transcript.push_agent(Speaker::Critic, "Scientific Critic", "needs more detail");
        let json = serde_json::to_value(&transcript).unwrap();

        assert_eq!(json[0]["agent"], "Scientific Critic");
        assert_eq!(json[0]["message"], "needs more detail");
        assert_eq!(json[0]["speaker"], "critic");
    }

    #[test]
    fn test_agent_turns_exclude_prompts_and_tools() {
        let mut transcript = Transcript::new();
        transcript.push_user("prompt");
        transcript.push_tool("output");
        transcript.push_agent(Speaker::Participant, "A", "answer");
        assert_eq!(transcript.agent_turns().count(), 1);
    }
}
