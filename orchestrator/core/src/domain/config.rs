// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Review Configuration Types
//
// Defines the configuration schema for review runs, including:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - LLM provider configuration and model alias mapping
// - Retry policy for backend calls
// - Review defaults (panel shape, rounds, temperature, criteria)
// - Literature search endpoints and output locations

use crate::domain::personas::{PanelDefaults, CONSISTENT_TEMPERATURE, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const API_VERSION: &str = "100monkeys.ai/v1";
pub const KIND: &str = "ReviewConfig";
pub const CONFIG_PATH_ENV: &str = "MSREVIEW_CONFIG_PATH";

const MAX_ROUNDS: u32 = 20;

/// Top-level Kubernetes-style review configuration manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// API version (must be "100monkeys.ai/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "ReviewConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    pub spec: ReviewConfigSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfigSpec {
    #[serde(default)]
    pub llm_providers: Vec<LLMProviderConfig>,

    #[serde(default)]
    pub llm_selection: LLMSelection,

    #[serde(default)]
    pub review: ReviewSettings,

    #[serde(default)]
    pub literature_search: LiteratureSearchConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMProviderConfig {
    /// Unique provider name (e.g., "openai", "lmstudio")
    pub name: String,

    /// "openai" or "openai-compatible"
    #[serde(rename = "type")]
    pub provider_type: String,

    pub endpoint: String,

    /// API key (supports "env:VAR_NAME" for environment variables)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_true")]
    pub enabled: bool,

    pub models: Vec<ModelConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Alias agents refer to (e.g., "default", "fast")
    pub alias: String,

    /// Actual model identifier for the provider API
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMSelection {
    /// Provider used for model ids that are not a configured alias
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_provider: Option<String>,

    /// Provider tried once after the primary exhausts its retries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_provider: Option<String>,

    /// Maximum attempts per backend call
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay of the exponential backoff in milliseconds
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewType {
    Panel,
    Individual,
}

impl FromStr for ReviewType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "panel" => Ok(ReviewType::Panel),
            "individual" => Ok(ReviewType::Individual),
            other => Err(format!(
                "invalid review type '{}', expected 'panel' or 'individual'",
                other
            )),
        }
    }
}

impl fmt::Display for ReviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewType::Panel => f.write_str("panel"),
            ReviewType::Individual => f.write_str("individual"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSettings {
    #[serde(default = "default_review_type")]
    pub review_type: ReviewType,

    /// Discussion rounds before the closing round
    #[serde(default = "default_num_rounds")]
    pub num_rounds: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Model alias or identifier every persona is bound to
    #[serde(default = "default_model")]
    pub model: String,

    /// Review criteria; empty means the built-in biomedical list
    #[serde(default)]
    pub criteria: Vec<String>,

    /// Ask the backend for a panel tailored to the manuscript
    #[serde(default = "default_true")]
    pub auto_generate_reviewers: bool,

    #[serde(default = "default_num_reviewers")]
    pub num_reviewers: usize,

    /// Produce revision guidance after the review
    #[serde(default = "default_true")]
    pub run_mentor: bool,

    /// Character budget of the manuscript text embedded in prompts
    #[serde(default = "default_max_document_chars")]
    pub max_document_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiteratureSearchConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_esearch_endpoint")]
    pub esearch_endpoint: String,

    #[serde(default = "default_bioc_endpoint")]
    pub bioc_endpoint: String,

    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Where transcripts and mentor reports are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Revision tracking directory; tracking is off when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_dir: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    1000
}

fn default_request_timeout() -> u64 {
    300
}

fn default_review_type() -> ReviewType {
    ReviewType::Panel
}

fn default_num_rounds() -> u32 {
    1
}

fn default_temperature() -> f32 {
    CONSISTENT_TEMPERATURE
}

fn default_model() -> String {
    "default".to_string()
}

fn default_num_reviewers() -> usize {
    3
}

fn default_max_document_chars() -> usize {
    crate::domain::document::DEFAULT_REVIEW_CONTEXT_CHARS
}

fn default_esearch_endpoint() -> String {
    "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esearch.fcgi".to_string()
}

fn default_bioc_endpoint() -> String {
    "https://www.ncbi.nlm.nih.gov/research/bionlp/RESTful/pmcoa.cgi/BioC_JSON".to_string()
}

fn default_search_timeout() -> u64 {
    60
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("reviews")
}

impl Default for LLMSelection {
    fn default() -> Self {
        Self {
            default_provider: None,
            fallback_provider: None,
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            review_type: default_review_type(),
            num_rounds: default_num_rounds(),
            temperature: default_temperature(),
            model: default_model(),
            criteria: Vec::new(),
            auto_generate_reviewers: true,
            num_reviewers: default_num_reviewers(),
            run_mentor: true,
            max_document_chars: default_max_document_chars(),
        }
    }
}

impl Default for LiteratureSearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            esearch_endpoint: default_esearch_endpoint(),
            bioc_endpoint: default_bioc_endpoint(),
            timeout_secs: default_search_timeout(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            project_dir: None,
        }
    }
}

impl Default for ReviewConfigSpec {
    fn default() -> Self {
        Self {
            llm_providers: vec![LLMProviderConfig {
                name: "openai".to_string(),
                provider_type: "openai".to_string(),
                endpoint: "https://api.openai.com/v1".to_string(),
                api_key: Some("env:OPENAI_API_KEY".to_string()),
                enabled: true,
                models: vec![ModelConfig {
                    alias: "default".to_string(),
                    model: DEFAULT_MODEL.to_string(),
                }],
            }],
            llm_selection: LLMSelection {
                default_provider: Some("openai".to_string()),
                ..LLMSelection::default()
            },
            review: ReviewSettings::default(),
            literature_search: LiteratureSearchConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: "manuscript-review".to_string(),
                version: Some("1.0.0".to_string()),
                labels: None,
            },
            spec: ReviewConfigSpec::default(),
        }
    }
}

impl ReviewConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Discover configuration file using precedence order
    /// 1. MSREVIEW_CONFIG_PATH environment variable
    /// 2. ./msreview-config.yaml (working directory)
    /// 3. ~/.msreview/config.yaml (user home)
    pub fn discover_config() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        let cwd = PathBuf::from("./msreview-config.yaml");
        if cwd.exists() {
            return Some(cwd);
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".msreview").join("config.yaml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        None
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // Explicit CLI path must exist and parse
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path).map_err(|e| {
                anyhow::anyhow!("Failed to load config at {:?}: {}", path, e)
            })?;
            config.apply_env_overrides();
            return Ok(config);
        }

        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::info!("No configuration file found in standard locations. Using defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(model) = lookup("MSREVIEW_MODEL").filter(|m| !m.is_empty()) {
            tracing::info!("Environment override: MSREVIEW_MODEL={}", model);
            self.spec.review.model = model;
        }

        if let Some(val) = lookup("MSREVIEW_NUM_ROUNDS") {
            match val.parse::<u32>() {
                Ok(rounds) => {
                    tracing::info!("Environment override: MSREVIEW_NUM_ROUNDS={}", rounds);
                    self.spec.review.num_rounds = rounds;
                }
                Err(_) => tracing::warn!(
                    "Invalid value for MSREVIEW_NUM_ROUNDS: '{}'. Expected an integer. Ignoring.",
                    val
                ),
            }
        }

        if let Some(val) = lookup("MSREVIEW_TEMPERATURE") {
            match val.parse::<f32>() {
                Ok(temperature) => {
                    tracing::info!("Environment override: MSREVIEW_TEMPERATURE={}", temperature);
                    self.spec.review.temperature = temperature;
                }
                Err(_) => tracing::warn!(
                    "Invalid value for MSREVIEW_TEMPERATURE: '{}'. Expected a number. Ignoring.",
                    val
                ),
            }
        }

        if let Some(val) = lookup("MSREVIEW_LITERATURE_SEARCH") {
            match val.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => {
                    tracing::info!("Environment override: MSREVIEW_LITERATURE_SEARCH=true");
                    self.spec.literature_search.enabled = true;
                }
                "false" | "0" | "no" | "off" => {
                    tracing::info!("Environment override: MSREVIEW_LITERATURE_SEARCH=false");
                    self.spec.literature_search.enabled = false;
                }
                _ => tracing::warn!(
                    "Invalid value for MSREVIEW_LITERATURE_SEARCH: '{}'. Expected true/false. Ignoring.",
                    val
                ),
            }
        }
    }

    /// Default personas bound to the configured model, with configured criteria
    pub fn panel_defaults(&self) -> PanelDefaults {
        let mut defaults = PanelDefaults::biomedical(&self.spec.review.model);
        if !self.spec.review.criteria.is_empty() {
            defaults.criteria = self.spec.review.criteria.clone();
        }
        defaults
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            anyhow::bail!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version,
                API_VERSION
            );
        }

        if self.kind != KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        for provider in &self.spec.llm_providers {
            if provider.name.is_empty() {
                anyhow::bail!("LLM provider name cannot be empty");
            }

            if !matches!(provider.provider_type.as_str(), "openai" | "openai-compatible") {
                anyhow::bail!(
                    "Unsupported provider type '{}' for: {}",
                    provider.provider_type,
                    provider.name
                );
            }

            if provider.endpoint.is_empty() {
                anyhow::bail!("LLM provider endpoint cannot be empty for: {}", provider.name);
            }

            if provider.models.is_empty() {
                anyhow::bail!("LLM provider must have at least one model: {}", provider.name);
            }

            for model in &provider.models {
                if model.alias.is_empty() {
                    anyhow::bail!("Model alias cannot be empty in provider: {}", provider.name);
                }

                if model.model.is_empty() {
                    anyhow::bail!("Model identifier cannot be empty for alias: {}", model.alias);
                }
            }
        }

        let selection = &self.spec.llm_selection;
        for (label, provider) in [
            ("Default", &selection.default_provider),
            ("Fallback", &selection.fallback_provider),
        ] {
            if let Some(name) = provider {
                if !self.spec.llm_providers.iter().any(|p| &p.name == name) {
                    anyhow::bail!("{} provider '{}' not found in llm_providers", label, name);
                }
            }
        }

        if selection.max_retries == 0 {
            anyhow::bail!("llm_selection.max_retries must be at least 1");
        }

        let review = &self.spec.review;
        if review.num_rounds > MAX_ROUNDS {
            anyhow::bail!("review.num_rounds cannot exceed {}", MAX_ROUNDS);
        }

        if !(0.0..=2.0).contains(&review.temperature) {
            anyhow::bail!(
                "review.temperature must be between 0.0 and 2.0, got {}",
                review.temperature
            );
        }

        if review.model.is_empty() {
            anyhow::bail!("review.model cannot be empty");
        }

        if review.num_reviewers == 0 {
            anyhow::bail!("review.num_reviewers must be at least 1");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_manifest() {
        let config = ReviewConfig::default();
        assert_eq!(config.api_version, API_VERSION);
        assert_eq!(config.kind, KIND);
        assert_eq!(config.spec.review.num_rounds, 1);
        assert_eq!(config.spec.review.review_type, ReviewType::Panel);
        assert!(config.spec.literature_search.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_with_defaults() {
        let yaml = r#"
apiVersion: 100monkeys.ai/v1
kind: ReviewConfig
metadata:
  name: lab-reviews
spec:
  llm_providers:
    - name: local
      type: openai-compatible
      endpoint: http://localhost:1234/v1
      models:
        - alias: default
          model: qwen2.5-32b-instruct
  review:
    review_type: individual
    num_rounds: 2
"#;
        let config = ReviewConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.metadata.name, "lab-reviews");
        assert_eq!(config.spec.llm_providers[0].provider_type, "openai-compatible");
        assert!(config.spec.llm_providers[0].enabled);
        assert_eq!(config.spec.review.review_type, ReviewType::Individual);
        assert_eq!(config.spec.review.num_rounds, 2);
        assert_eq!(config.spec.review.temperature, CONSISTENT_TEMPERATURE);
        assert_eq!(config.spec.llm_selection.max_retries, 3);
        assert_eq!(config.spec.storage.output_dir, PathBuf::from("reviews"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let mut config = ReviewConfig::default();
        config.spec.review.criteria = vec!["Is it novel?".to_string()];
        config.to_yaml_file(&path).unwrap();

        let loaded = ReviewConfig::load_or_default(Some(path)).unwrap();
        assert_eq!(loaded.spec.review.criteria, vec!["Is it novel?".to_string()]);
        assert_eq!(loaded.panel_defaults().criteria.len(), 1);
    }

    #[test]
    fn test_missing_explicit_path_fails() {
        let result = ReviewConfig::load_or_default(Some(PathBuf::from("/nonexistent/msreview.yaml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides() {
        let mut config = ReviewConfig::default();
        let env: HashMap<&str, &str> = HashMap::from([
            ("MSREVIEW_MODEL", "fast"),
            ("MSREVIEW_NUM_ROUNDS", "3"),
            ("MSREVIEW_TEMPERATURE", "not-a-number"),
            ("MSREVIEW_LITERATURE_SEARCH", "off"),
        ]);
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.spec.review.model, "fast");
        assert_eq!(config.spec.review.num_rounds, 3);
        assert_eq!(config.spec.review.temperature, CONSISTENT_TEMPERATURE);
        assert!(!config.spec.literature_search.enabled);
    }

    #[test]
    fn test_validation() {
        let mut config = ReviewConfig::default();
        assert!(config.validate().is_ok());

        config.api_version = "wrong/v1".to_string();
        assert!(config.validate().is_err());
        config.api_version = API_VERSION.to_string();

        config.kind = "NodeConfig".to_string();
        assert!(config.validate().is_err());
        config.kind = KIND.to_string();

        config.spec.review.temperature = 3.5;
        assert!(config.validate().is_err());
        config.spec.review.temperature = 0.2;

        config.spec.llm_selection.fallback_provider = Some("missing".to_string());
        assert!(config.validate().is_err());
        config.spec.llm_selection.fallback_provider = None;

        config.spec.llm_providers.push(LLMProviderConfig {
            name: "anthropic".to_string(),
            provider_type: "anthropic".to_string(),
            endpoint: "https://api.anthropic.com".to_string(),
            api_key: None,
            enabled: true,
            models: vec![],
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_review_type_parsing() {
        assert_eq!("Panel".parse::<ReviewType>().unwrap(), ReviewType::Panel);
        assert_eq!("individual".parse::<ReviewType>().unwrap(), ReviewType::Individual);
        assert!("committee".parse::<ReviewType>().is_err());
    }
}
