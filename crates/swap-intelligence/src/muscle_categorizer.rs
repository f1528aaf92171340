// ABOUTME: Maps free-form muscle and body-part strings to a fixed set of coarse categories
// ABOUTME: Ordered case-insensitive keyword rules; unmatched input falls into Other
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse muscle category used to compare candidates against a requested target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuscleCategory {
    /// Pectorals and serratus
    Chest,
    /// Lats, traps, rhomboids, upper back
    Back,
    /// Deltoids and rotator cuff
    Shoulders,
    /// Biceps and brachialis
    Biceps,
    /// Triceps
    Triceps,
    /// Forearms and grip
    Forearms,
    /// Quadriceps and upper legs
    Quadriceps,
    /// Hamstrings
    Hamstrings,
    /// Glutes
    Glutes,
    /// Calves and lower legs
    Calves,
    /// Abdominals and obliques
    Core,
    /// Spinal erectors and lumbar region
    LowerBack,
    /// Hip flexors, abductors, adductors
    Hips,
    /// Neck
    Neck,
    /// Anything unrecognized (including cardio)
    Other,
}

/// Keyword rules, checked in order. Specific phrases come before the generic
/// words they contain ("lower back" before "back", "biceps femoris" before "bicep").
const RULES: &[(MuscleCategory, &[&str])] = &[
    (
        MuscleCategory::LowerBack,
        &["lower back", "erector", "lumbar", "spine"],
    ),
    (
        MuscleCategory::Neck,
        &["neck", "levator scapulae", "sternocleidomastoid"],
    ),
    (
        MuscleCategory::Hamstrings,
        &["hamstring", "biceps femoris", "semitendinosus", "semimembranosus"],
    ),
    (
        MuscleCategory::Forearms,
        &["forearm", "brachioradialis", "wrist", "grip", "lower arms"],
    ),
    (MuscleCategory::Biceps, &["bicep", "brachialis"]),
    (MuscleCategory::Triceps, &["tricep"]),
    (
        MuscleCategory::Core,
        &["abdominis", "abdominal", "abs", "oblique", "core", "waist"],
    ),
    (
        MuscleCategory::Chest,
        &["pectoral", "pecs", "chest", "serratus"],
    ),
    (
        MuscleCategory::Shoulders,
        &["deltoid", "delts", "shoulder", "rotator cuff"],
    ),
    (
        MuscleCategory::Back,
        &["latissimus", "lats", "trapezius", "traps", "rhomboid", "upper back", "back"],
    ),
    (
        MuscleCategory::Quadriceps,
        &["quadricep", "quads", "rectus femoris", "vastus", "upper legs", "thigh"],
    ),
    (MuscleCategory::Glutes, &["glute"]),
    (
        MuscleCategory::Calves,
        &["calf", "calves", "gastrocnemius", "soleus", "lower legs"],
    ),
    (
        MuscleCategory::Hips,
        &["hip", "abductor", "adductor", "psoas", "iliacus"],
    ),
];

impl MuscleCategory {
    /// Categorize a free-form muscle or body-part description
    #[must_use]
    pub fn categorize(raw: &str) -> Self {
        let lowered = raw.to_lowercase();
        RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
            .map_or(Self::Other, |(category, _)| *category)
    }

    /// Whether this is a concrete category that can be used for filtering
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Other)
    }

    /// String representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Chest => "chest",
            Self::Back => "back",
            Self::Shoulders => "shoulders",
            Self::Biceps => "biceps",
            Self::Triceps => "triceps",
            Self::Forearms => "forearms",
            Self::Quadriceps => "quadriceps",
            Self::Hamstrings => "hamstrings",
            Self::Glutes => "glutes",
            Self::Calves => "calves",
            Self::Core => "core",
            Self::LowerBack => "lower_back",
            Self::Hips => "hips",
            Self::Neck => "neck",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for MuscleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
