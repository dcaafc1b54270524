// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Agent Role Descriptor
//!
//! An [`Agent`] is one seat at the review table: a title, an area of
//! expertise, a goal, a role description and the backing model identifier.
//! Agents are immutable value objects. Equality and hashing are structural
//! over all five fields, which makes them usable as uniqueness keys when a
//! team is validated.
//!
//! The persona handed to the model as the system message is a deterministic
//! rendering of the four descriptive fields ([`Agent::render_persona`]).

use crate::domain::llm::ChatMessage;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Agent {
    pub title: String,
    pub expertise: String,
    pub goal: String,
    pub role: String,
    pub model_id: String,
}

impl Agent {
    pub fn new(
        title: impl Into<String>,
        expertise: impl Into<String>,
        goal: impl Into<String>,
        role: impl Into<String>,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            expertise: expertise.into(),
            goal: goal.into(),
            role: role.into(),
            model_id: model_id.into(),
        }
    }

    /// Same descriptor backed by a different model
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn render_persona(&self) -> String {
        format!(
            "You are a {} with expertise in {}. Your goal is to {}. Your role is to {}.",
            self.title, self.expertise, self.goal, self.role
        )
    }

    /// Persona wrapped as the leading system message of every call
    pub fn system_message(&self) -> ChatMessage {
        ChatMessage::system(self.render_persona())
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn reviewer() -> Agent {
        Agent::new(
            "Methodology Reviewer",
            "experimental design",
            "ensure the methods are sound",
            "critically evaluate the statistics",
            "gpt-4o",
        )
    }

    #[test]
    fn test_persona_contains_all_fields() {
        let persona = reviewer().render_persona();
        assert!(persona.contains("Methodology Reviewer"));
        assert!(persona.contains("experimental design"));
        assert!(persona.contains("ensure the methods are sound"));
        assert!(persona.contains("critically evaluate the statistics"));
    }

    #[test]
    fn test_persona_is_deterministic() {
        assert_eq!(reviewer().render_persona(), reviewer().render_persona());
    }

    #[test]
    fn test_structural_identity() {
        let mut set = HashSet::new();
        set.insert(reviewer());
        set.insert(reviewer());
        assert_eq!(set.len(), 1);

        // A different backing model makes a different agent
        set.insert(reviewer().with_model("gpt-4o-mini"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display_is_title() {
        assert_eq!(reviewer().to_string(), "Methodology Reviewer");
    }
}
