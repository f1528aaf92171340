// ABOUTME: Injury keyword table mapping reported injuries to unsafe exercise-name substrings
// ABOUTME: Fail-open: injuries that match no keyword apply no filtering at all
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::name_normalizer::{compact, normalize};

/// Default contraindication table for exercise substitution
const DEFAULT_CONTRAINDICATIONS: &[(&str, &[&str])] = &[
    (
        "back",
        &[
            "deadlift",
            "good morning",
            "bent over row",
            "squat",
            "clean",
            "snatch",
            "hyperextension",
            "back extension",
            "sit-up",
            "superman",
        ],
    ),
    (
        "shoulder",
        &[
            "overhead press",
            "lateral raise",
            "bench press",
            "dip",
            "pull-up",
            "upright row",
            "shoulder press",
            "military press",
            "arnold",
            "fly",
            "pulldown",
            "row",
        ],
    ),
    (
        "knee",
        &[
            "squat",
            "lunge",
            "leg press",
            "leg extension",
            "jump",
            "running",
            "step-up",
            "pistol",
            "sprint",
        ],
    ),
    (
        "wrist",
        &[
            "push-up",
            "plank",
            "wrist curl",
            "front squat",
            "handstand",
            "clean",
            "bench press",
        ],
    ),
    (
        "hip",
        &[
            "squat",
            "lunge",
            "deadlift",
            "hip thrust",
            "leg raise",
            "step-up",
            "split",
        ],
    ),
    (
        "ankle",
        &["jump", "running", "calf raise", "skipping", "lunge", "sprint"],
    ),
    (
        "neck",
        &["shrug", "neck", "upright row", "headstand", "overhead press"],
    ),
    (
        "elbow",
        &[
            "skull crusher",
            "triceps extension",
            "tricep extension",
            "dip",
            "curl",
            "close grip",
        ],
    ),
];

/// Unsafe-name pattern kept in both spaced and compact normalized form
#[derive(Debug, Clone)]
struct UnsafePattern {
    spaced: String,
    compact: String,
}

impl UnsafePattern {
    fn new(raw: &str) -> Self {
        Self {
            spaced: normalize(raw),
            compact: compact(raw),
        }
    }

    fn matches(&self, spaced_name: &str, compact_name: &str) -> bool {
        (!self.spaced.is_empty() && spaced_name.contains(&self.spaced))
            || (!self.compact.is_empty() && compact_name.contains(&self.compact))
    }
}

/// Injury-to-contraindication policy
#[derive(Debug, Clone)]
pub struct InjuryPolicy {
    rules: Vec<(String, Vec<UnsafePattern>)>,
}

impl Default for InjuryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_CONTRAINDICATIONS.iter().map(|(keyword, unsafe_names)| {
            (*keyword, unsafe_names.iter().copied())
        }))
    }
}

impl InjuryPolicy {
    /// Build a policy from `(injury keyword, unsafe exercise substrings)` pairs
    pub fn new<R, K, U, S>(table: R) -> Self
    where
        R: IntoIterator<Item = (K, U)>,
        K: AsRef<str>,
        U: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = table
            .into_iter()
            .map(|(keyword, unsafe_names)| {
                (
                    keyword.as_ref().trim().to_lowercase(),
                    unsafe_names
                        .into_iter()
                        .map(|name| UnsafePattern::new(name.as_ref()))
                        .collect(),
                )
            })
            .collect();
        Self { rules }
    }

    /// Injury keywords recognized in a user-reported injury string
    #[must_use]
    pub fn matched_keywords(&self, injury: &str) -> Vec<&str> {
        let lowered = injury.to_lowercase();
        self.rules
            .iter()
            .filter(|(keyword, _)| !keyword.is_empty() && lowered.contains(keyword.as_str()))
            .map(|(keyword, _)| keyword.as_str())
            .collect()
    }

    /// Whether any reported injury makes the candidate unsafe.
    ///
    /// An injury string matching no configured keyword contributes nothing.
    pub fn contraindicated<I>(&self, candidate_name: &str, injuries: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let spaced_name = normalize(candidate_name);
        let compact_name = spaced_name.replace(' ', "");

        injuries.into_iter().any(|injury| {
            let lowered = injury.as_ref().to_lowercase();
            self.rules.iter().any(|(keyword, patterns)| {
                !keyword.is_empty()
                    && lowered.contains(keyword.as_str())
                    && patterns
                        .iter()
                        .any(|pattern| pattern.matches(&spaced_name, &compact_name))
            })
        })
    }
}
