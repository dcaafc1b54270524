// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// LLM Provider Infrastructure - Anti-Corruption Layer Implementations
//
// Each provider adapter translates between our domain interface and external APIs.
// The registry routes model aliases to adapters and owns retry and fallback.

pub mod openai;
pub mod registry;

pub use registry::ProviderRegistry;
