// ABOUTME: Canonical form of exercise names for equality, dedup, and fuzzy matching
// ABOUTME: normalize() strips punctuation and case; is_similar() adds subset and word-overlap rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashSet;

use swap_core::constants::matching::WORD_OVERLAP_THRESHOLD;

/// Canonicalize an exercise name.
///
/// Lowercases, drops every character outside `[a-z0-9 _]`, turns underscores
/// into spaces, collapses whitespace runs and trims. `"Push-up (version 2)"`
/// becomes `"pushup version 2"`.
#[must_use]
pub fn normalize(name: &str) -> String {
    let kept: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ' || *c == '_')
        .map(|c| if c == '_' { ' ' } else { c })
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized name with all spaces removed, so "pull up" and "pull-up" compare equal
#[must_use]
pub fn compact(name: &str) -> String {
    normalize(name).replace(' ', "")
}

/// Whether two names refer to the same exercise under normalization
#[must_use]
pub fn same_name(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Fuzzy exercise-name equality.
///
/// True when the normalized names are equal, when the shorter name's words
/// are a subset of the longer name's words, or when the shared words make up
/// at least [`WORD_OVERLAP_THRESHOLD`] of the larger word set.
#[must_use]
pub fn is_similar(a: &str, b: &str) -> bool {
    let left = normalize(a);
    let right = normalize(b);
    if left == right {
        return true;
    }

    let left_words: HashSet<&str> = left.split(' ').filter(|w| !w.is_empty()).collect();
    let right_words: HashSet<&str> = right.split(' ').filter(|w| !w.is_empty()).collect();
    if left_words.is_empty() || right_words.is_empty() {
        return false;
    }

    let (shorter, longer) = if left_words.len() <= right_words.len() {
        (&left_words, &right_words)
    } else {
        (&right_words, &left_words)
    };
    if shorter.is_subset(longer) {
        return true;
    }

    let shared = left_words.intersection(&right_words).count();
    let larger = left_words.len().max(right_words.len());
    shared as f64 / larger as f64 >= WORD_OVERLAP_THRESHOLD
}
