// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the msreview CLI

pub mod config;
pub mod history;
pub mod review;

pub use self::config::ConfigCommand;
pub use self::history::HistoryCommand;
pub use self::review::ReviewArgs;
