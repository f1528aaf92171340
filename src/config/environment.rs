// ABOUTME: Environment-based configuration for the exercise substitution pipeline
// ABOUTME: Retrieval and ranking limits, LLM sampling parameters, and the media cache policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::{media, ranking, retrieval};
use crate::errors::{AppError, AppResult};

/// Bounded, TTL-based eviction policy for cached media lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaCachePolicy {
    /// Maximum cached names before LRU eviction
    pub max_entries: usize,
    /// How long a cached lookup (hit or confirmed miss) stays valid
    pub ttl: Duration,
}

impl Default for MediaCachePolicy {
    fn default() -> Self {
        Self {
            max_entries: media::DEFAULT_CACHE_MAX_ENTRIES,
            ttl: Duration::from_secs(media::DEFAULT_CACHE_TTL_SECS),
        }
    }
}

impl MediaCachePolicy {
    /// Load the policy from `SWAP_MEDIA_CACHE_MAX_ENTRIES` and `SWAP_MEDIA_CACHE_TTL_SECS`
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            max_entries: env_parse_or(
                "SWAP_MEDIA_CACHE_MAX_ENTRIES",
                media::DEFAULT_CACHE_MAX_ENTRIES,
            ),
            ttl: Duration::from_secs(env_parse_or(
                "SWAP_MEDIA_CACHE_TTL_SECS",
                media::DEFAULT_CACHE_TTL_SECS,
            )),
        }
    }
}

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapConfig {
    /// Nearest neighbours requested from the vector index
    pub retrieval_top_k: usize,
    /// Candidates kept after filtering
    pub max_candidates: usize,
    /// Candidates rendered into the ranking prompt
    pub prompt_candidates: usize,
    /// Suggestions returned to the caller
    pub max_suggestions: usize,
    /// Temperature for intent extraction
    pub analyzer_temperature: f32,
    /// Temperature for suggestion ranking
    pub ranker_temperature: f32,
    /// Token budget for intent extraction
    pub analyzer_max_tokens: u32,
    /// Token budget for suggestion ranking
    pub ranker_max_tokens: u32,
    /// Model override; the provider default is used when unset
    pub model: Option<String>,
    /// Media asset cache policy
    pub media_cache: MediaCachePolicy,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            retrieval_top_k: retrieval::DEFAULT_TOP_K,
            max_candidates: retrieval::DEFAULT_MAX_CANDIDATES,
            prompt_candidates: ranking::DEFAULT_PROMPT_CANDIDATES,
            max_suggestions: ranking::DEFAULT_MAX_SUGGESTIONS,
            analyzer_temperature: ranking::DEFAULT_ANALYZER_TEMPERATURE,
            ranker_temperature: ranking::DEFAULT_RANKER_TEMPERATURE,
            analyzer_max_tokens: ranking::DEFAULT_ANALYZER_MAX_TOKENS,
            ranker_max_tokens: ranking::DEFAULT_RANKER_MAX_TOKENS,
            model: None,
            media_cache: MediaCachePolicy::default(),
        }
    }
}

impl SwapConfig {
    /// Load configuration from environment variables
    ///
    /// Unparseable values fall back to their default with a warning.
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` when the resulting limits are inconsistent.
    pub fn from_env() -> AppResult<Self> {
        let config = Self {
            retrieval_top_k: env_parse_or("SWAP_RETRIEVAL_TOP_K", retrieval::DEFAULT_TOP_K),
            max_candidates: env_parse_or("SWAP_MAX_CANDIDATES", retrieval::DEFAULT_MAX_CANDIDATES),
            prompt_candidates: env_parse_or(
                "SWAP_PROMPT_CANDIDATES",
                ranking::DEFAULT_PROMPT_CANDIDATES,
            ),
            max_suggestions: env_parse_or("SWAP_MAX_SUGGESTIONS", ranking::DEFAULT_MAX_SUGGESTIONS),
            analyzer_temperature: env_parse_or(
                "SWAP_ANALYZER_TEMPERATURE",
                ranking::DEFAULT_ANALYZER_TEMPERATURE,
            ),
            ranker_temperature: env_parse_or(
                "SWAP_RANKER_TEMPERATURE",
                ranking::DEFAULT_RANKER_TEMPERATURE,
            ),
            analyzer_max_tokens: ranking::DEFAULT_ANALYZER_MAX_TOKENS,
            ranker_max_tokens: ranking::DEFAULT_RANKER_MAX_TOKENS,
            model: env::var("SWAP_LLM_MODEL")
                .ok()
                .map(|m| m.trim().to_owned())
                .filter(|m| !m.is_empty()),
            media_cache: MediaCachePolicy::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the limits are non-zero and nest correctly
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` naming the first offending setting.
    pub fn validate(&self) -> AppResult<()> {
        let sizes = [
            ("retrieval_top_k", self.retrieval_top_k),
            ("max_candidates", self.max_candidates),
            ("prompt_candidates", self.prompt_candidates),
            ("max_suggestions", self.max_suggestions),
            ("media_cache.max_entries", self.media_cache.max_entries),
        ];
        if let Some((name, _)) = sizes.iter().find(|(_, value)| *value == 0) {
            return Err(AppError::config_invalid(format!("{name} must be greater than zero")));
        }

        if self.max_suggestions > self.prompt_candidates {
            return Err(AppError::config_invalid(format!(
                "max_suggestions ({}) exceeds prompt_candidates ({})",
                self.max_suggestions, self.prompt_candidates
            )));
        }
        if self.prompt_candidates > self.max_candidates {
            return Err(AppError::config_invalid(format!(
                "prompt_candidates ({}) exceeds max_candidates ({})",
                self.prompt_candidates, self.max_candidates
            )));
        }
        if self.max_candidates > self.retrieval_top_k {
            return Err(AppError::config_invalid(format!(
                "max_candidates ({}) exceeds retrieval_top_k ({})",
                self.max_candidates, self.retrieval_top_k
            )));
        }

        for (name, temperature) in [
            ("analyzer_temperature", self.analyzer_temperature),
            ("ranker_temperature", self.ranker_temperature),
        ] {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(AppError::config_invalid(format!(
                    "{name} must be within 0.0..=2.0, got {temperature}"
                )));
            }
        }
        Ok(())
    }
}

/// Parse an environment variable, warning and using `default` when it does not parse
fn env_parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid value '{raw}' for {key}, using default {default}");
            default
        }),
        Err(_) => default,
    }
}
