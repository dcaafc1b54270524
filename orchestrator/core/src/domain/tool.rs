// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Tools the review agents may call mid-turn.
//
// Only one tool exists: a literature search over PubMed Central. The
// executor owns the registry of enabled tools; a call naming anything else
// is fatal to the run. Search failures are not: they come back to the model
// as the tool's textual output.

use crate::domain::error::ReviewError;
use crate::domain::llm::{FunctionSchema, ToolCall, ToolSchema};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

pub const LITERATURE_SEARCH_TOOL: &str = "pubmed_search";

#[async_trait]
pub trait LiteratureSearch: Send + Sync {
    /// Formatted article text for the model; never empty on success
    async fn search(
        &self,
        query: &str,
        num_articles: u32,
        abstract_only: bool,
    ) -> Result<String, ToolError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Search service error: {0}")]
    Service(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchArguments {
    pub query: String,
    pub num_articles: u32,
    #[serde(default)]
    pub abstract_only: bool,
}

pub fn literature_search_schema() -> ToolSchema {
    ToolSchema {
        kind: "function".to_string(),
        function: FunctionSchema {
            name: LITERATURE_SEARCH_TOOL.to_string(),
            description: "Search PubMed Central for biomedical articles to verify claims or find related work.".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query to use to search PubMed Central for scientific articles."
                    },
                    "num_articles": {
                        "type": "integer",
                        "description": "The number of articles to return from the search query."
                    },
                    "abstract_only": {
                        "type": "boolean",
                        "description": "Whether to return only the abstract of the articles."
                    }
                },
                "required": ["query", "num_articles"]
            }),
        },
    }
}

/// Dispatches model tool calls to the registered implementations
#[derive(Clone, Default)]
pub struct ToolExecutor {
    literature_search: Option<Arc<dyn LiteratureSearch>>,
}

impl ToolExecutor {
    pub fn new(literature_search: Option<Arc<dyn LiteratureSearch>>) -> Self {
        Self { literature_search }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.literature_search.is_some()
    }

    /// Declarations offered to the model; empty when no tool is registered
    pub fn schemas(&self) -> Vec<ToolSchema> {
        if self.is_enabled() {
            vec![literature_search_schema()]
        } else {
            Vec::new()
        }
    }

    pub async fn execute(&self, call: &ToolCall) -> Result<String, ReviewError> {
        let search = match (call.function.name.as_str(), &self.literature_search) {
            (LITERATURE_SEARCH_TOOL, Some(search)) => search,
            (name, _) => return Err(ReviewError::UnknownTool(name.to_string())),
        };

        let args: SearchArguments = serde_json::from_str(&call.function.arguments).map_err(|e| {
            ReviewError::InvalidToolArguments {
                tool: call.function.name.clone(),
                reason: e.to_string(),
            }
        })?;

        info!(
            "Searching PubMed Central for {} articles ({}) with query: \"{}\"",
            args.num_articles,
            if args.abstract_only { "abstracts" } else { "full text" },
            args.query
        );

        match search
            .search(&args.query, args.num_articles, args.abstract_only)
            .await
        {
            Ok(output) => Ok(output),
            Err(e) => {
                warn!("Literature search failed: {}", e);
                Ok(format!(
                    "Literature search failed for the query \"{}\": {}",
                    args.query, e
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSearch(Result<&'static str, &'static str>);

    #[async_trait]
    impl LiteratureSearch for FixedSearch {
        async fn search(&self, query: &str, n: u32, _abstract_only: bool) -> Result<String, ToolError> {
            match self.0 {
                Ok(text) => Ok(format!("{text} ({query}, {n})")),
                Err(e) => Err(ToolError::Service(e.to_string())),
            }
        }
    }

    fn call(name: &str, args: &str) -> ToolCall {
        ToolCall::function("call_1", name, args)
    }

    #[test]
    fn test_schema_declares_required_arguments() {
        let schema = literature_search_schema();
        assert_eq!(schema.function.name, "pubmed_search");
        assert_eq!(
            schema.function.parameters["required"],
            serde_json::json!(["query", "num_articles"])
        );
    }

    #[test]
    fn test_disabled_executor_offers_no_tools() {
        assert!(ToolExecutor::disabled().schemas().is_empty());
    }

    #[tokio::test]
    async fn test_executes_search() {
        let executor = ToolExecutor::new(Some(Arc::new(FixedSearch(Ok("articles")))));
        let output = executor
            .execute(&call(LITERATURE_SEARCH_TOOL, r#"{"query":"tau","num_articles":2}"#))
            .await
            .unwrap();
        assert_eq!(output, "articles (tau, 2)");
    }

    #[tokio::test]
    async fn test_unknown_tool_is_fatal() {
        let executor = ToolExecutor::new(Some(Arc::new(FixedSearch(Ok("articles")))));
        let err = executor.execute(&call("web_browse", "{}")).await.unwrap_err();
        assert!(matches!(err, ReviewError::UnknownTool(name) if name == "web_browse"));
    }

    #[tokio::test]
    async fn test_unregistered_search_is_unknown() {
        let err = ToolExecutor::disabled()
            .execute(&call(LITERATURE_SEARCH_TOOL, r#"{"query":"x","num_articles":1}"#))
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::UnknownTool(_)));
    }

    #[tokio::test]
    async fn test_malformed_arguments_are_fatal() {
        let executor = ToolExecutor::new(Some(Arc::new(FixedSearch(Ok("articles")))));
        let err = executor
            .execute(&call(LITERATURE_SEARCH_TOOL, r#"{"query":"x"}"#))
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::InvalidToolArguments { .. }));
    }

    #[tokio::test]
    async fn test_search_failure_becomes_tool_text() {
        let executor = ToolExecutor::new(Some(Arc::new(FixedSearch(Err("503")))));
        let output = executor
            .execute(&call(LITERATURE_SEARCH_TOOL, r#"{"query":"x","num_articles":1}"#))
            .await
            .unwrap();
        assert!(output.contains("Literature search failed"));
        assert!(output.contains("503"));
    }
}
