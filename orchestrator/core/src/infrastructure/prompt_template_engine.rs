// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Prompt Template Engine
//!
//! This module provides template rendering for review prompts, using
//! Handlebars for placeholder substitution.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Transform templates with placeholders into final prompts
//! - **Integration:** `application::prompts` → turn prompt → LLM input
//!
//! # Supported Placeholders
//!
//! - `{{agent}}` - Title of the agent being addressed
//! - `{{lead}}` - Title of the coordinator (panel) or critic (individual)
//! - `{{roster}}` - Comma-separated participant titles
//! - `{{manuscript}}` - Formatted manuscript block
//! - `{{criteria}}` - Formatted, numbered review criteria
//! - `{{revision_context}}` - Previous reviews, author response and changes
//! - `{{round}}` / `{{num_rounds}}` - Discussion round counters
//!
//! Output is plain text for the model, so HTML escaping is disabled.

use anyhow::{Context, Result};
use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Template Context
// ============================================================================

/// Context data for prompt template rendering
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub roster: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub manuscript: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub criteria: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision_context: Option<String>,

    /// Current round (1-based as shown to the model)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_rounds: Option<u32>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extras: HashMap<String, serde_json::Value>,
}

impl PromptContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn agent(mut self, title: impl Into<String>) -> Self {
        self.agent = Some(title.into());
        self
    }

    pub fn lead(mut self, title: impl Into<String>) -> Self {
        self.lead = Some(title.into());
        self
    }

    pub fn roster(mut self, roster: impl Into<String>) -> Self {
        self.roster = Some(roster.into());
        self
    }

    pub fn manuscript(mut self, manuscript: impl Into<String>) -> Self {
        self.manuscript = Some(manuscript.into());
        self
    }

    pub fn criteria(mut self, criteria: impl Into<String>) -> Self {
        self.criteria = Some(criteria.into());
        self
    }

    pub fn revision_context(mut self, context: impl Into<String>) -> Self {
        self.revision_context = Some(context.into());
        self
    }

    pub fn round(mut self, round: u32, num_rounds: u32) -> Self {
        self.round = Some(round);
        self.num_rounds = Some(num_rounds);
        self
    }

    /// Add extra field
    pub fn extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extras.insert(key.into(), value);
        self
    }
}

// ============================================================================
// Template Engine
// ============================================================================

pub struct PromptTemplateEngine {
    handlebars: Handlebars<'static>,
}

impl PromptTemplateEngine {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();

        handlebars.set_strict_mode(false); // Don't fail on missing variables
        handlebars.register_escape_fn(handlebars::no_escape);

        Self { handlebars }
    }

    /// Render a template with context
    ///
    /// # Example
    /// ```ignore
    /// let engine = PromptTemplateEngine::new();
    /// let context = PromptContext::new().agent("Editor");
    ///
    /// let prompt = engine.render("{{agent}}, please begin.", &context)?;
    /// ```
    pub fn render(&self, template: &str, context: &PromptContext) -> Result<String> {
        self.handlebars
            .render_template(template, context)
            .context("Failed to render prompt template")
    }

    /// Validate template syntax without rendering
    pub fn validate_template(&self, template: &str) -> Result<()> {
        handlebars::template::Template::compile(template)
            .map(|_| ())
            .context("Invalid Handlebars template syntax")
    }
}

impl Default for PromptTemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Convenience Functions
// ============================================================================

/// Render a template string with a simple key-value map
pub fn render_simple(template: &str, vars: &HashMap<String, String>) -> Result<String> {
    let engine = PromptTemplateEngine::new();
    let mut context = PromptContext::new();

    for (key, value) in vars {
        context
            .extras
            .insert(key.clone(), serde_json::Value::String(value.clone()));
    }

    engine.render(template, &context)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_rendering() {
        let engine = PromptTemplateEngine::new();
        let context = PromptContext::new().agent("Domain Expert").round(2, 3);

        let result = engine
            .render("{{agent}}: round {{round}} of {{num_rounds}}", &context)
            .unwrap();

        assert_eq!(result, "Domain Expert: round 2 of 3");
    }

    #[test]
    fn test_missing_variables() {
        let engine = PromptTemplateEngine::new();
        let context = PromptContext::new().agent("Editor");

        // strict mode is off, missing fields render empty
        let result = engine.render("{{agent}}|{{revision_context}}|", &context).unwrap();
        assert_eq!(result, "Editor||");
    }

    #[test]
    fn test_no_html_escaping() {
        let engine = PromptTemplateEngine::new();
        let context = PromptContext::new().manuscript("p < 0.05 & \"significant\"");

        let result = engine.render("{{manuscript}}", &context).unwrap();
        assert_eq!(result, "p < 0.05 & \"significant\"");
    }

    #[test]
    fn test_conditional_rendering() {
        let engine = PromptTemplateEngine::new();
        let template = "{{#if revision_context}}REVISED {{/if}}manuscript";

        let context = PromptContext::new().revision_context("previous reviews");
        assert_eq!(engine.render(template, &context).unwrap(), "REVISED manuscript");

        let context = PromptContext::new();
        assert_eq!(engine.render(template, &context).unwrap(), "manuscript");
    }

    #[test]
    fn test_validate_template() {
        let engine = PromptTemplateEngine::new();

        assert!(engine.validate_template("{{agent}}").is_ok());
        assert!(engine.validate_template("{{agent").is_err());
    }

    #[test]
    fn test_render_simple() {
        let mut vars = HashMap::new();
        vars.insert("summary".to_string(), "Major revisions".to_string());

        let result = render_simple("Review: {{summary}}", &vars).unwrap();
        assert_eq!(result, "Review: Major revisions");
    }
}
