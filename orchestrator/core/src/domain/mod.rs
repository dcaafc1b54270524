// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain
//!
//! Review entities, value objects and the ports the application layer
//! depends on (`LLMProvider`, `LiteratureSearch`, `VersionRepository`).
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Pure review model with no I/O beyond trait boundaries

pub mod agent;
pub mod config;
pub mod diff;
pub mod document;
pub mod error;
pub mod llm;
pub mod personas;
pub mod repository;
pub mod revision;
pub mod team;
pub mod text;
pub mod tool;
pub mod transcript;
