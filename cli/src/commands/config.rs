// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use msreview_core::domain::config::{ReviewConfig, CONFIG_PATH_ENV};

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./msreview-config.yaml)
        #[arg(short, long, default_value = "./msreview-config.yaml")]
        output: PathBuf,

        /// Include examples and comments
        #[arg(long)]
        examples: bool,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
        ConfigCommand::Generate { output, examples } => generate(output, examples).await,
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = ReviewConfig::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        println!(
            "  2. {}: {}",
            CONFIG_PATH_ENV,
            std::env::var(CONFIG_PATH_ENV)
                .unwrap_or_else(|_| "(not set)".to_string())
                .dimmed()
        );
        println!("  3. ./msreview-config.yaml");
        println!("  4. ~/.msreview/config.yaml");
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!("  Name: {}", config.metadata.name);
    println!();

    // LLM providers
    println!("{}", "LLM Providers:".bold());
    for provider in &config.spec.llm_providers {
        let state = if provider.enabled { "" } else { " [disabled]" };
        println!("  {} ({}){}", provider.name.bold(), provider.provider_type, state);
        println!("    Endpoint: {}", provider.endpoint);
        println!("    Models: {}", provider.models.len());
        for model in &provider.models {
            println!("      - {} → {}", model.alias, model.model);
        }
    }
    println!();

    let selection = &config.spec.llm_selection;
    println!("{}", "LLM Selection:".bold());
    println!(
        "  Default provider: {}",
        selection.default_provider.as_deref().unwrap_or("(none)")
    );
    if let Some(fallback) = &selection.fallback_provider {
        println!("  Fallback provider: {}", fallback);
    }
    println!("  Retries: {} (base delay {} ms)", selection.max_retries, selection.retry_delay_ms);
    println!();

    let review = &config.spec.review;
    println!("{}", "Review:".bold());
    println!("  Type: {}", review.review_type);
    println!("  Rounds: {}", review.num_rounds);
    println!("  Model: {}", review.model);
    println!("  Temperature: {}", review.temperature);
    println!(
        "  Reviewers: {} ({})",
        review.num_reviewers,
        if review.auto_generate_reviewers { "generated" } else { "defaults" }
    );
    println!(
        "  Criteria: {}",
        if review.criteria.is_empty() {
            "built-in biomedical".to_string()
        } else {
            format!("{} custom", review.criteria.len())
        }
    );
    println!("  Mentor: {}", if review.run_mentor { "on" } else { "off" });
    println!(
        "  Literature search: {}",
        if config.spec.literature_search.enabled { "on" } else { "off" }
    );
    println!();

    println!("{}", "Storage:".bold());
    println!("  Output directory: {}", config.spec.storage.output_dir.display());
    match &config.spec.storage.project_dir {
        Some(dir) => println!("  Revision tracking: {}", dir.display()),
        None => println!("  Revision tracking: {}", "(off)".dimmed()),
    }

    Ok(())
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = ReviewConfig::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

async fn generate(output: PathBuf, with_examples: bool) -> Result<()> {
    if with_examples {
        let sample = include_str!("../../templates/config-with-examples.yaml");
        std::fs::write(&output, sample)
            .with_context(|| format!("Failed to write config to {:?}", output))?;
    } else {
        ReviewConfig::default()
            .to_yaml_file(&output)
            .with_context(|| format!("Failed to write config to {:?}", output))?;
    }

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_template_is_valid() {
        let config =
            ReviewConfig::from_yaml_str(include_str!("../../templates/config-with-examples.yaml"))
                .unwrap();
        assert_eq!(config.spec.llm_providers.len(), 2);
        assert!(!config.spec.llm_providers[1].enabled);
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_generate_minimal_config() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("msreview-config.yaml");

        generate(output.clone(), false).await.unwrap();

        let config = ReviewConfig::from_yaml_file(&output).unwrap();
        assert!(config.validate().is_ok());
    }
}
