// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Shared fixtures for integration tests: a scripted chat backend that
//! records every request, and a canned literature search.

#![allow(dead_code)]

use async_trait::async_trait;
use msreview_core::domain::llm::{ChatRequest, ChatResponse, LLMError, LLMProvider, ToolCall};
use msreview_core::domain::tool::{LiteratureSearch, ToolError};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Plays back queued responses, then answers "answer N" for the N-th call
#[derive(Default)]
pub struct ScriptedBackend {
    script: Mutex<VecDeque<ChatResponse>>,
    requests: Mutex<Vec<ChatRequest>>,
    fail_on_call: Option<usize>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(responses: Vec<ChatResponse>) -> Self {
        Self {
            script: Mutex::new(responses.into()),
            ..Self::default()
        }
    }

    /// Fails the `call`-th request (1-based) with a network error
    pub fn failing_on_call(call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LLMProvider for ScriptedBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LLMError> {
        let n = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len()
        };
        if self.fail_on_call == Some(n) {
            return Err(LLMError::Network("connection reset by peer".to_string()));
        }
        let scripted = self.script.lock().unwrap().pop_front();
        Ok(scripted.unwrap_or_else(|| ChatResponse::text(&request.model, format!("answer {}", n))))
    }
}

pub fn tool_request(name: &str, arguments: &str) -> ChatResponse {
    ChatResponse::tool_calls(
        "scripted",
        vec![ToolCall::function(
            format!("call_{}", uuid::Uuid::new_v4().simple()),
            name,
            arguments,
        )],
    )
}

/// Returns one fixed article for every query
pub struct CannedSearch;

#[async_trait]
impl LiteratureSearch for CannedSearch {
    async fn search(&self, query: &str, _num_articles: u32, _abstract_only: bool) -> Result<String, ToolError> {
        Ok(format!(
            "Here are the top 1 articles on PubMed Central for the query \"{}\":\n\n[begin article 1]\n\nPMCID = 42\n\nTitle = Canned\n\nBody.\n\n[end article 1]",
            query
        ))
    }
}
