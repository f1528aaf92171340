// ABOUTME: Configuration module for the substitution pipeline and its ambient services
// ABOUTME: Environment-only settings: pipeline limits, LLM sampling, media cache policy, log types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! All configuration comes from environment variables; there are no config
//! files. Collaborator endpoints are configured next to their adapters
//! (`OpenAiCompatibleConfig`, `EmbeddingConfig`).

/// Pipeline configuration loaded from the environment
pub mod environment;
/// Shared configuration enums
pub mod types;

pub use environment::{MediaCachePolicy, SwapConfig};
pub use types::{Environment, LogLevel};
