// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Manuscript review command
//!
//! Loads configuration, wires the provider registry, literature search,
//! team suggester and optional version store into a `ReviewService`, then
//! reviews one manuscript file.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use msreview_core::application::{
    DiscussionOrchestrator, DiscussionSettings, LlmTeamSuggester, Mentor, ReviewOptions,
    ReviewRequest, ReviewRun, ReviewService, StaticTeamSuggester, TeamSuggester, VersionStore,
};
use msreview_core::domain::config::{ReviewConfig, ReviewType};
use msreview_core::domain::llm::LLMProvider;
use msreview_core::domain::tool::ToolExecutor;
use msreview_core::infrastructure::artifacts;
use msreview_core::infrastructure::document_source::{load_document, load_optional_text};
use msreview_core::infrastructure::llm::ProviderRegistry;
use msreview_core::infrastructure::repositories::JsonFileVersionRepository;
use msreview_core::infrastructure::PubMedSearch;

#[derive(Args, Debug)]
pub struct ReviewArgs {
    /// Manuscript to review (.txt or .md)
    #[arg(value_name = "FILE")]
    pub manuscript: PathBuf,

    /// Manuscript title (default: first line of the file)
    #[arg(long)]
    pub title: Option<String>,

    /// Review shape: panel or individual
    #[arg(long, value_name = "TYPE")]
    pub review_type: Option<ReviewType>,

    /// Number of discussion rounds before the closing round
    #[arg(long)]
    pub num_rounds: Option<u32>,

    /// Directory for transcripts and mentor reports
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Project directory holding the revision history; enables tracking
    #[arg(long)]
    pub project_dir: Option<PathBuf>,

    /// Authors' response to the previous review
    #[arg(long, value_name = "FILE")]
    pub author_response: Option<PathBuf>,

    /// Transcript JSON of an earlier review (repeatable)
    #[arg(long = "previous-review", value_name = "FILE")]
    pub previous_reviews: Vec<PathBuf>,

    /// Text of an earlier tracked version, for change summaries (repeatable)
    #[arg(long = "previous-version", value_name = "FILE")]
    pub previous_versions: Vec<PathBuf>,

    /// Disable the PubMed Central search tool
    #[arg(long)]
    pub no_pubmed: bool,

    /// Use the default reviewers instead of generating a panel
    #[arg(long)]
    pub no_auto_reviewers: bool,

    /// Skip the scientific mentor report
    #[arg(long)]
    pub no_mentor: bool,
}

impl ReviewArgs {
    /// Command-line flags take precedence over file and environment settings
    fn apply_to(&self, config: &mut ReviewConfig) {
        let review = &mut config.spec.review;
        if let Some(review_type) = self.review_type {
            review.review_type = review_type;
        }
        if let Some(num_rounds) = self.num_rounds {
            review.num_rounds = num_rounds;
        }
        if self.no_auto_reviewers {
            review.auto_generate_reviewers = false;
        }
        if self.no_mentor {
            review.run_mentor = false;
        }
        if self.no_pubmed {
            config.spec.literature_search.enabled = false;
        }

        let storage = &mut config.spec.storage;
        if let Some(dir) = &self.output_dir {
            storage.output_dir = dir.clone();
        }
        if let Some(dir) = &self.project_dir {
            storage.project_dir = Some(dir.clone());
        }
    }
}

pub async fn execute(args: ReviewArgs, config_override: Option<PathBuf>) -> Result<()> {
    let mut config = ReviewConfig::load_or_default(config_override)
        .context("Failed to load configuration")?;
    args.apply_to(&mut config);
    config
        .validate()
        .context("Configuration validation failed")?;

    let mut service = build_service(&config).await?;

    let document = load_document(&args.manuscript, args.title.as_deref()).await?;
    let mut request = ReviewRequest::new(document, config.spec.review.review_type);
    request.author_response = load_optional_text(args.author_response.as_deref()).await?;

    for path in &args.previous_reviews {
        match artifacts::load_summary(path).await? {
            Some(summary) => request.previous_reviews.push(summary),
            None => println!(
                "{}",
                format!("⚠ No summary found in {}", path.display()).yellow()
            ),
        }
    }
    for path in &args.previous_versions {
        request.prior_documents.push(load_document(path, None).await?);
    }

    println!(
        "Reviewing {} ({} review, {} round(s))",
        request.document.title.bold(),
        config.spec.review.review_type,
        config.spec.review.num_rounds
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Review panel in discussion...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = service.run(request).await;
    spinner.finish_and_clear();

    let run = result.context("Review failed")?;
    print_run(&run);
    Ok(())
}

async fn build_service(config: &ReviewConfig) -> Result<ReviewService> {
    let spec = &config.spec;

    let backend: Arc<dyn LLMProvider> = Arc::new(
        ProviderRegistry::from_config(config).context("Failed to initialize LLM providers")?,
    );

    let tools = if spec.literature_search.enabled {
        let search = PubMedSearch::new(
            spec.literature_search.esearch_endpoint.clone(),
            spec.literature_search.bioc_endpoint.clone(),
            Duration::from_secs(spec.literature_search.timeout_secs),
        )
        .context("Failed to initialize PubMed search")?;
        ToolExecutor::new(Some(Arc::new(search)))
    } else {
        ToolExecutor::disabled()
    };

    let defaults = config.panel_defaults();
    let suggester: Arc<dyn TeamSuggester> = if spec.review.auto_generate_reviewers {
        Arc::new(LlmTeamSuggester::new(
            backend.clone(),
            spec.review.model.clone(),
            defaults.reviewers.clone(),
        ))
    } else {
        Arc::new(StaticTeamSuggester::new(defaults.reviewers.clone()))
    };

    let orchestrator = DiscussionOrchestrator::new(
        backend.clone(),
        tools,
        DiscussionSettings {
            num_rounds: spec.review.num_rounds,
            temperature: spec.review.temperature,
        },
    );

    let options = ReviewOptions {
        output_dir: spec.storage.output_dir.clone(),
        num_reviewers: spec.review.num_reviewers,
        max_document_chars: spec.review.max_document_chars,
    };

    let mentor = spec
        .review
        .run_mentor
        .then(|| Mentor::new(backend.clone(), defaults.mentor.clone(), spec.review.temperature));

    let mut service = ReviewService::new(orchestrator, suggester, defaults, options);
    if let Some(mentor) = mentor {
        service = service.with_mentor(mentor);
    }

    if let Some(project_dir) = &spec.storage.project_dir {
        let repository = Arc::new(JsonFileVersionRepository::new(project_dir));
        let store = VersionStore::open(repository)
            .await
            .with_context(|| format!("Failed to open revision history in {:?}", project_dir))?;
        info!("Tracking revisions in {:?} ({} version(s))", project_dir, store.len());
        service = service.with_version_store(store, project_dir.clone());
    }

    Ok(service)
}

fn print_run(run: &ReviewRun) {
    println!("{}", "✓ Review complete".green());
    println!("  Run: {}", run.run_id);
    println!("  Team: {}", team_titles(run).join(", "));
    println!("  Transcript: {}", run.transcript_markdown.display());
    println!("  Transcript (JSON): {}", run.transcript_json.display());

    if let Some(n) = run.version_number {
        println!("  Tracked as version {}", n);
    }
    if let Some(path) = &run.revision_report {
        println!("  Revision report: {}", path.display());
    }
    if let Some(path) = &run.mentor_report_path {
        println!("  Mentor report: {}", path.display());
    }

    let tokens = run.outcome.tokens;
    println!();
    println!("{}", "Token usage (estimated):".bold());
    println!("  Input: {}", tokens.input);
    println!("  Output: {}", tokens.output);
    println!("  Tool: {}", tokens.tool);
    println!("  Largest call: {}", tokens.max_single_call);

    println!();
    println!("{}", "Summary:".bold());
    println!("{}", run.outcome.summary);
}

fn team_titles(run: &ReviewRun) -> Vec<String> {
    run.team
        .speaking_order()
        .into_iter()
        .map(|(_, agent)| agent.title.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: ReviewArgs,
    }

    #[test]
    fn test_flags_override_config() {
        let harness = Harness::parse_from([
            "msreview",
            "paper.md",
            "--review-type",
            "individual",
            "--num-rounds",
            "3",
            "--project-dir",
            "proj",
            "--no-pubmed",
            "--no-mentor",
            "--previous-review",
            "a.json",
            "--previous-review",
            "b.json",
        ]);

        let mut config = ReviewConfig::default();
        harness.args.apply_to(&mut config);

        assert_eq!(config.spec.review.review_type, ReviewType::Individual);
        assert_eq!(config.spec.review.num_rounds, 3);
        assert!(!config.spec.literature_search.enabled);
        assert!(!config.spec.review.run_mentor);
        assert!(config.spec.review.auto_generate_reviewers);
        assert_eq!(config.spec.storage.project_dir, Some(PathBuf::from("proj")));
        assert_eq!(harness.args.previous_reviews.len(), 2);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let harness = Harness::parse_from(["msreview", "paper.md"]);
        let mut config = ReviewConfig::default();
        harness.args.apply_to(&mut config);

        assert_eq!(config.spec.review, ReviewConfig::default().spec.review);
        assert!(config.spec.storage.project_dir.is_none());
    }
}
