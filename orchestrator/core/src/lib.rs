// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Manuscript review core
//!
//! Multi-agent peer review of scientific manuscripts with revision tracking.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Domain model, review use cases and their infrastructure adapters

pub mod domain;
pub mod application;
pub mod infrastructure;
