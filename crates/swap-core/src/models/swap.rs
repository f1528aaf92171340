// ABOUTME: Swap request input, the structured intent derived from it, and the outbound response
// ABOUTME: SwapRequest, CurrentExercise, SwapIntent, SwapReason, and SwapResponse definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Suggestion;
use crate::errors::{AppError, AppResult};

/// The exercise the user wants to replace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentExercise {
    /// Exercise name as shown to the user
    pub name: String,
    /// Muscle group it trains
    #[serde(default)]
    pub muscle_group: String,
    /// Equipment it uses
    #[serde(default)]
    pub equipment: String,
    /// Prescribed sets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
    /// Prescribed reps (free-form, e.g. "8-12")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<String>,
}

/// Self-reported training experience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FitnessLevel {
    /// New to structured training
    Beginner,
    /// Regular trainee
    #[default]
    Intermediate,
    /// Experienced lifter
    Advanced,
}

impl FitnessLevel {
    /// Parse from a loosely formatted string, defaulting to intermediate
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "beginner" | "novice" => Self::Beginner,
            "advanced" | "expert" => Self::Advanced,
            _ => Self::Intermediate,
        }
    }

    /// String representation used in prompts
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

/// Input to one pipeline run. Owned by the caller and never mutated by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    /// Requesting user
    pub user_id: Uuid,
    /// Exercise to replace
    pub current_exercise: CurrentExercise,
    /// Free-text swap request ("my shoulder hurts")
    pub message: String,
    /// Equipment the user has access to
    #[serde(default)]
    pub user_equipment: BTreeSet<String>,
    /// User-reported injuries
    #[serde(default)]
    pub user_injuries: BTreeSet<String>,
    /// Training experience
    #[serde(default)]
    pub user_fitness_level: FitnessLevel,
    /// Exercises the user asked never to be suggested
    #[serde(default)]
    pub avoided_exercises: BTreeSet<String>,
}

impl SwapRequest {
    /// Create a request with empty user context
    #[must_use]
    pub fn new(user_id: Uuid, current_exercise: CurrentExercise, message: impl Into<String>) -> Self {
        Self {
            user_id,
            current_exercise,
            message: message.into(),
            user_equipment: BTreeSet::new(),
            user_injuries: BTreeSet::new(),
            user_fitness_level: FitnessLevel::default(),
            avoided_exercises: BTreeSet::new(),
        }
    }

    /// Check the request is usable
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the current exercise has no name.
    pub fn validate(&self) -> AppResult<()> {
        if self.current_exercise.name.trim().is_empty() {
            return Err(AppError::invalid_input("current exercise name is empty")
                .with_user_id(self.user_id));
        }
        Ok(())
    }
}

/// Why the user wants a different exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SwapReason {
    /// Missing or unwanted equipment
    Equipment,
    /// Pain or injury
    Injury,
    /// Too hard or too easy
    Difficulty,
    /// Wants something different
    #[default]
    Variety,
    /// Personal dislike
    Preference,
    /// Anything else
    Other,
}

impl SwapReason {
    /// Parse an LLM-provided reason; unknown values map to `Other`
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "equipment" => Self::Equipment,
            "injury" | "pain" => Self::Injury,
            "difficulty" => Self::Difficulty,
            "variety" => Self::Variety,
            "preference" => Self::Preference,
            _ => Self::Other,
        }
    }

    /// String representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Equipment => "equipment",
            Self::Injury => "injury",
            Self::Difficulty => "difficulty",
            Self::Variety => "variety",
            Self::Preference => "preference",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for SwapReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested change in difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyPreference {
    /// Regress the movement
    Easier,
    /// Keep the same challenge
    Similar,
    /// Progress the movement
    Harder,
}

impl DifficultyPreference {
    /// Parse an LLM-provided preference; unknown values yield `None`
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easier" => Some(Self::Easier),
            "similar" | "same" => Some(Self::Similar),
            "harder" => Some(Self::Harder),
            _ => None,
        }
    }

    /// String representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Easier => "easier",
            Self::Similar => "similar",
            Self::Harder => "harder",
        }
    }
}

/// Structured interpretation of a swap message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapIntent {
    /// Primary reason for the swap
    pub reason: SwapReason,
    /// Equipment constraints as phrased by the user ("no dumbbells")
    pub equipment_constraint: Option<Vec<String>>,
    /// Requested difficulty change
    pub difficulty_preference: Option<DifficultyPreference>,
    /// Muscle group the replacement should train
    pub target_muscle_group: Option<String>,
}

impl SwapIntent {
    /// Context-derived intent used when extraction fails
    #[must_use]
    pub fn default_for(current: &CurrentExercise) -> Self {
        Self {
            reason: SwapReason::Variety,
            equipment_constraint: None,
            difficulty_preference: Some(DifficultyPreference::Similar),
            target_muscle_group: non_empty(&current.muscle_group),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Outbound result of a pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapResponse {
    /// At most five explained alternatives
    pub suggestions: Vec<Suggestion>,
    /// Message for the user
    pub message: String,
    /// Set when a collaborator failure degraded the result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
