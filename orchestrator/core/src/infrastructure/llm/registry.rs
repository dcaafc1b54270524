// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// LLM Provider Registry - Model Alias Resolution and Provider Management
//
// Manages LLM providers and resolves model aliases to actual providers.
// The registry is itself an `LLMProvider`: requests name an alias (or a raw
// model id served by the default provider), and transient failures are
// retried with exponential backoff before the fallback provider is tried.

use crate::domain::config::{LLMProviderConfig, LLMSelection, ModelConfig, ReviewConfig};
use crate::domain::llm::{ChatRequest, ChatResponse, LLMError, LLMProvider};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::openai::OpenAIAdapter;

/// Registry for managing LLM providers and resolving model aliases
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn LLMProvider>>,
    provider_models: HashMap<String, Vec<ModelConfig>>,
    alias_map: HashMap<String, (String, ModelConfig)>, // alias -> (provider_name, model_config)
    default_provider: Option<String>,
    fallback_provider: Option<String>,
    max_retries: u32,
    retry_delay_ms: u64,
}

impl ProviderRegistry {
    /// Empty registry using the given retry and fallback policy
    pub fn new(selection: &LLMSelection) -> Self {
        Self {
            providers: HashMap::new(),
            provider_models: HashMap::new(),
            alias_map: HashMap::new(),
            default_provider: selection.default_provider.clone(),
            fallback_provider: selection.fallback_provider.clone(),
            max_retries: selection.max_retries,
            retry_delay_ms: selection.retry_delay_ms,
        }
    }

    /// Create provider registry from the review configuration
    pub fn from_config(config: &ReviewConfig) -> anyhow::Result<Self> {
        let selection = &config.spec.llm_selection;
        let mut registry = Self::new(selection);
        let timeout = Duration::from_secs(selection.request_timeout_secs);

        info!("Initializing LLM provider registry");

        for provider_config in &config.spec.llm_providers {
            if !provider_config.enabled {
                info!("Provider '{}' disabled, skipping", provider_config.name);
                continue;
            }

            info!("Initializing provider: {}", provider_config.name);

            match Self::create_provider(provider_config, timeout) {
                Ok(provider) => {
                    registry.register(&provider_config.name, provider, &provider_config.models)
                }
                Err(e) => {
                    warn!("Failed to initialize provider '{}': {}", provider_config.name, e);
                    // Continue with other providers
                }
            }
        }

        if registry.providers.is_empty() {
            anyhow::bail!("No LLM providers could be initialized; check llm_providers and API keys");
        }

        Ok(registry)
    }

    /// Add a provider and map its model aliases
    pub fn register(&mut self, name: &str, provider: Arc<dyn LLMProvider>, models: &[ModelConfig]) {
        for model_config in models {
            info!(
                "Mapping alias '{}' -> {} ({})",
                model_config.alias, model_config.model, name
            );
            self.alias_map
                .insert(model_config.alias.clone(), (name.to_string(), model_config.clone()));
        }
        self.provider_models.insert(name.to_string(), models.to_vec());
        self.providers.insert(name.to_string(), provider);
    }

    /// Create a provider instance from configuration
    fn create_provider(
        config: &LLMProviderConfig,
        timeout: Duration,
    ) -> anyhow::Result<Arc<dyn LLMProvider>> {
        let api_key = Self::resolve_api_key(&config.api_key)?;

        let provider: Arc<dyn LLMProvider> = match config.provider_type.as_str() {
            // OpenAI-compatible APIs (LM Studio, vLLM, etc.) share the adapter
            "openai" | "openai-compatible" => {
                Arc::new(OpenAIAdapter::new(config.endpoint.clone(), api_key, timeout)?)
            }
            _ => anyhow::bail!("Unsupported provider type: {}", config.provider_type),
        };

        Ok(provider)
    }

    /// Resolve API key from config (supports "env:VAR_NAME" syntax)
    fn resolve_api_key(key: &Option<String>) -> anyhow::Result<String> {
        match key.as_deref() {
            Some(k) => match k.strip_prefix("env:") {
                Some(var_name) => std::env::var(var_name)
                    .map_err(|_| anyhow::anyhow!("Environment variable not set: {}", var_name)),
                None => Ok(k.to_string()),
            },
            None => Ok(String::new()), // For local providers without auth
        }
    }

    /// Provider name and concrete model id for a requested alias or model
    fn resolve(&self, model: &str) -> Result<(String, String), LLMError> {
        if let Some((provider_name, model_config)) = self.alias_map.get(model) {
            return Ok((provider_name.clone(), model_config.model.clone()));
        }

        let default = self.default_provider.clone().or_else(|| {
            (self.providers.len() == 1)
                .then(|| self.providers.keys().next().cloned())
                .flatten()
        });

        match default {
            Some(provider_name) => Ok((provider_name, model.to_string())),
            None => Err(LLMError::ModelNotFound(format!(
                "Model alias '{}' not found",
                model
            ))),
        }
    }

    /// Model the fallback provider should serve for a request
    fn fallback_model(&self, fallback: &str, alias: &str, resolved: &str) -> String {
        let models = self.provider_models.get(fallback);
        models
            .and_then(|models| models.iter().find(|m| m.alias == alias))
            .or_else(|| models.and_then(|models| models.first()))
            .map(|m| m.model.clone())
            .unwrap_or_else(|| resolved.to_string())
    }

    /// Check health of all providers
    pub async fn health_check_all(&self) -> HashMap<String, Result<(), LLMError>> {
        let mut results = HashMap::new();

        for (name, provider) in &self.providers {
            info!("Health checking provider: {}", name);
            results.insert(name.clone(), provider.health_check().await);
        }

        results
    }

    /// Get list of available model aliases
    pub fn available_aliases(&self) -> Vec<String> {
        let mut aliases: Vec<String> = self.alias_map.keys().cloned().collect();
        aliases.sort();
        aliases
    }

    /// Check if a model alias exists
    pub fn has_alias(&self, alias: &str) -> bool {
        self.alias_map.contains_key(alias)
    }
}

#[async_trait]
impl LLMProvider for ProviderRegistry {
    /// Includes retry logic and fallback to secondary provider
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LLMError> {
        let (provider_name, model) = self.resolve(&request.model)?;

        let provider = self.providers.get(&provider_name).ok_or_else(|| {
            LLMError::Provider(format!("Provider '{}' not found", provider_name))
        })?;

        let mut resolved = request.clone();
        resolved.model = model.clone();

        let attempts = self.max_retries.max(1);
        let mut last_error = None;

        for attempt in 0..attempts {
            match provider.complete(&resolved).await {
                Ok(response) => {
                    debug!("Completion successful on attempt {}", attempt + 1);
                    return Ok(response);
                }
                Err(e) => {
                    warn!(
                        "Completion failed (attempt {}/{}): {:?}",
                        attempt + 1,
                        attempts,
                        e
                    );
                    let transient = e.is_transient();
                    last_error = Some(e);

                    if !transient || attempt + 1 == attempts {
                        break;
                    }

                    // Exponential backoff
                    tokio::time::sleep(Duration::from_millis(
                        self.retry_delay_ms.saturating_mul(2_u64.saturating_pow(attempt)),
                    ))
                    .await;
                }
            }
        }

        if let Some(fallback) = self.fallback_provider.as_deref().filter(|f| *f != provider_name) {
            if let Some(fallback_provider) = self.providers.get(fallback) {
                info!("Trying fallback provider: {}", fallback);
                let mut fallback_request = request.clone();
                fallback_request.model = self.fallback_model(fallback, &request.model, &model);
                return fallback_provider.complete(&fallback_request).await;
            }
        }

        Err(last_error.unwrap_or_else(|| LLMError::Provider("Unknown error".into())))
    }

    async fn health_check(&self) -> Result<(), LLMError> {
        for (name, result) in self.health_check_all().await {
            if let Err(e) = result {
                return Err(LLMError::Provider(format!("Provider '{}' unhealthy: {}", name, e)));
            }
        }
        Ok(())
    }
}
