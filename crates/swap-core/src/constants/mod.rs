// ABOUTME: Constants for the exercise substitution pipeline organized by stage
// ABOUTME: Retrieval/ranking limits, similarity thresholds, and user-facing message templates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Defaults here are overridable at runtime through `SwapConfig`; the
//! message templates are fixed because callers match on them.

/// Retrieval limits
pub mod retrieval {
    /// Nearest neighbours requested from the vector index
    pub const DEFAULT_TOP_K: usize = 50;
    /// Candidates kept after filtering, bounding the ranking prompt
    pub const DEFAULT_MAX_CANDIDATES: usize = 30;
}

/// Ranking limits
pub mod ranking {
    /// Candidates rendered into the ranking prompt
    pub const DEFAULT_PROMPT_CANDIDATES: usize = 20;
    /// Maximum suggestions returned to the caller
    pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;
    /// Sampling temperature for intent extraction
    pub const DEFAULT_ANALYZER_TEMPERATURE: f32 = 0.1;
    /// Sampling temperature for suggestion ranking
    pub const DEFAULT_RANKER_TEMPERATURE: f32 = 0.3;
    /// Token budget for intent extraction
    pub const DEFAULT_ANALYZER_MAX_TOKENS: u32 = 300;
    /// Token budget for suggestion ranking
    pub const DEFAULT_RANKER_MAX_TOKENS: u32 = 1000;
}

/// Name matching
pub mod matching {
    /// Minimum shared-word ratio (relative to the larger word set) for two names to be similar
    pub const WORD_OVERLAP_THRESHOLD: f64 = 0.6;
}

/// Media asset cache
pub mod media {
    /// Default maximum cached asset lookups
    pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 1000;
    /// Default asset lookup TTL in seconds
    pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
}

/// User-facing message templates
pub mod messages {
    /// Returned when similarity fallback replaces the LLM ranking
    pub const SIMILARITY_FALLBACK_MESSAGE: &str =
        "Here are some alternatives based on similarity";
    /// Used when the ranking LLM gives no message of its own
    pub const DEFAULT_RANKED_MESSAGE: &str = "Here are some alternatives that fit your request";
    /// Tip attached to fallback suggestions
    pub const GENERIC_TIP: &str =
        "Focus on controlled form and start with a load you can manage comfortably";

    /// Message when retrieval found nothing to suggest
    #[must_use]
    pub fn no_alternatives(exercise_name: &str) -> String {
        format!(
            "Sorry, I couldn't find any suitable alternatives for {exercise_name}. \
             Try adjusting your equipment or preferences."
        )
    }

    /// Reason attached to fallback suggestions
    #[must_use]
    pub fn similarity_reason(body_part: &str) -> String {
        format!("Similar exercise targeting the same muscle group ({body_part})")
    }
}
