// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod artifacts;
pub mod document_source;
pub mod llm;
pub mod prompt_template_engine;
pub mod pubmed;
pub mod repositories;

pub use pubmed::PubMedSearch;
