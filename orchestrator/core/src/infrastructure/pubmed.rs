// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// PubMed Central literature search
//
// Two NCBI services back the `pubmed_search` tool: E-utilities esearch finds
// PMC ids by relevance, and the BioC JSON service returns each article's
// passages. Twice the requested number of ids are fetched so articles that
// fail to load can be skipped without coming up short.

use crate::domain::tool::{LiteratureSearch, ToolError};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

const FULL_TEXT_SECTIONS: &[&str] = &["ABSTRACT", "INTRO", "RESULTS", "DISCUSS", "CONCL", "METHODS"];

pub struct PubMedSearch {
    client: reqwest::Client,
    esearch_endpoint: String,
    bioc_endpoint: String,
}

#[derive(Deserialize)]
struct ESearchResponse {
    esearchresult: ESearchResult,
}

#[derive(Deserialize)]
struct ESearchResult {
    #[serde(default)]
    idlist: Vec<String>,
}

#[derive(Deserialize)]
struct BioCCollection {
    #[serde(default)]
    documents: Vec<BioCDocument>,
}

#[derive(Deserialize)]
struct BioCDocument {
    #[serde(default)]
    passages: Vec<BioCPassage>,
}

#[derive(Deserialize)]
struct BioCPassage {
    #[serde(default)]
    infons: PassageInfons,
    #[serde(default)]
    text: String,
}

#[derive(Deserialize, Default)]
struct PassageInfons {
    #[serde(default)]
    section_type: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

/// Title and selected passages of one article
#[derive(Debug, Clone, PartialEq)]
struct Article {
    pmcid: String,
    title: String,
    content: Vec<String>,
}

impl Article {
    fn render(&self) -> String {
        format!(
            "PMCID = {}\n\nTitle = {}\n\n{}",
            self.pmcid,
            self.title,
            self.content.join("\n")
        )
    }
}

impl PubMedSearch {
    pub fn new(
        esearch_endpoint: impl Into<String>,
        bioc_endpoint: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            esearch_endpoint: esearch_endpoint.into(),
            bioc_endpoint: bioc_endpoint.into(),
        })
    }

    async fn search_ids(&self, query: &str, retmax: u32) -> Result<Vec<String>, ToolError> {
        let retmax = retmax.to_string();
        let response = self
            .client
            .get(&self.esearch_endpoint)
            .query(&[
                ("db", "pmc"),
                ("term", query),
                ("retmax", retmax.as_str()),
                ("retmode", "json"),
                ("sort", "relevance"),
            ])
            .send()
            .await
            .map_err(|e| ToolError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ToolError::Service(format!("esearch returned HTTP {}", response.status())));
        }

        let body: ESearchResponse = response
            .json()
            .await
            .map_err(|e| ToolError::Service(format!("Failed to parse esearch response: {}", e)))?;
        Ok(body.esearchresult.idlist)
    }

    /// `None` when the article cannot be fetched or has no title
    async fn fetch_article(&self, pmcid: &str, abstract_only: bool) -> Option<Article> {
        let url = format!("{}/PMC{}/unicode", self.bioc_endpoint.trim_end_matches('/'), pmcid);

        let response = match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                warn!("BioC fetch for PMC{} returned HTTP {}", pmcid, response.status());
                return None;
            }
            Err(e) => {
                warn!("BioC fetch for PMC{} failed: {}", pmcid, e);
                return None;
            }
        };

        // Articles outside the open-access subset come back as plain text
        let collections: Vec<BioCCollection> = match response.json().await {
            Ok(collections) => collections,
            Err(e) => {
                debug!("PMC{} has no BioC document: {}", pmcid, e);
                return None;
            }
        };

        let document = collections.into_iter().next()?.documents.into_iter().next()?;
        parse_article(pmcid, document, abstract_only)
    }
}

fn parse_article(pmcid: &str, document: BioCDocument, abstract_only: bool) -> Option<Article> {
    let title = document
        .passages
        .iter()
        .find(|p| p.infons.section_type.as_deref() == Some("TITLE"))?
        .text
        .clone();

    let content = document
        .passages
        .into_iter()
        .filter(|p| matches!(p.infons.kind.as_deref(), Some("abstract" | "paragraph")))
        .filter(|p| {
            let section = p.infons.section_type.as_deref().unwrap_or_default();
            if abstract_only {
                section == "ABSTRACT"
            } else {
                FULL_TEXT_SECTIONS.contains(&section)
            }
        })
        .map(|p| p.text)
        .collect();

    Some(Article {
        pmcid: pmcid.to_string(),
        title,
        content,
    })
}

fn format_results(query: &str, articles: &[Article]) -> String {
    if articles.is_empty() {
        return format!("No articles found on PubMed Central for the query \"{}\".", query);
    }

    let blocks: String = articles
        .iter()
        .enumerate()
        .map(|(i, article)| {
            format!(
                "[begin article {n}]\n\n{}\n\n[end article {n}]",
                article.render(),
                n = i + 1
            )
        })
        .collect();

    format!(
        "Here are the top {} articles on PubMed Central for the query \"{}\":\n\n{}",
        articles.len(),
        query,
        blocks
    )
}

#[async_trait]
impl LiteratureSearch for PubMedSearch {
    async fn search(
        &self,
        query: &str,
        num_articles: u32,
        abstract_only: bool,
    ) -> Result<String, ToolError> {
        let ids = self.search_ids(query, num_articles.saturating_mul(2)).await?;

        let mut articles = Vec::new();
        for pmcid in ids {
            if articles.len() >= num_articles as usize {
                break;
            }
            if let Some(article) = self.fetch_article(&pmcid, abstract_only).await {
                articles.push(article);
            }
        }

        info!("Found {} articles on PubMed Central", articles.len());
        Ok(format_results(query, &articles))
    }
}
