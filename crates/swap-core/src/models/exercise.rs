// ABOUTME: Exercise corpus entries and the candidate/suggestion wrappers built from them
// ABOUTME: ExerciseDocument, ExerciseMetadata, Candidate, and Suggestion definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Metadata stored next to each embedding in the vector index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ExerciseMetadata {
    /// Display name
    pub name: String,
    /// Primary target muscle (e.g. "pectorals", "quads")
    #[serde(default)]
    pub target_muscle: String,
    /// Coarse body part (e.g. "chest", "upper legs")
    #[serde(default)]
    pub body_part: String,
    /// Required equipment ("body weight" when none)
    #[serde(default)]
    pub equipment: String,
    /// Free-text instructions
    #[serde(default)]
    pub instructions: String,
    /// Difficulty label if the corpus provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

/// A read-only exercise from the indexed corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseDocument {
    /// Corpus identifier
    pub id: String,
    /// Indexed metadata
    #[serde(flatten)]
    pub metadata: ExerciseMetadata,
}

impl ExerciseDocument {
    /// Build a document from an index id and its metadata
    #[must_use]
    pub fn new(id: impl Into<String>, metadata: ExerciseMetadata) -> Self {
        Self {
            id: id.into(),
            metadata,
        }
    }

    /// Exercise display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Required equipment
    #[must_use]
    pub fn equipment(&self) -> &str {
        &self.metadata.equipment
    }

    /// Muscle description used in prompts: target muscle, or body part when absent
    #[must_use]
    pub fn muscle(&self) -> &str {
        if self.metadata.target_muscle.trim().is_empty() {
            &self.metadata.body_part
        } else {
            &self.metadata.target_muscle
        }
    }
}

/// A retrieved exercise paired with its similarity to the swap query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// The corpus entry
    #[serde(flatten)]
    pub exercise: ExerciseDocument,
    /// Similarity in `[0, 1]`, derived from cosine distance
    pub similarity: f32,
}

impl Candidate {
    /// Pair a document with a similarity score
    #[must_use]
    pub const fn new(exercise: ExerciseDocument, similarity: f32) -> Self {
        Self {
            exercise,
            similarity,
        }
    }

    /// Convert a cosine distance in `[0, 2]` to a similarity in `[0, 1]`
    #[must_use]
    pub fn similarity_from_distance(distance: f32) -> f32 {
        (1.0 - distance / 2.0).clamp(0.0, 1.0)
    }

    /// Exercise display name
    #[must_use]
    pub fn name(&self) -> &str {
        self.exercise.name()
    }
}

/// An explained candidate returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// The chosen candidate
    #[serde(flatten)]
    pub candidate: Candidate,
    /// Why this exercise fits the request
    pub reason: String,
    /// Coaching tip for performing it
    pub tip: String,
    /// Optional demonstration asset (image/gif/video URL)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_url: Option<String>,
}

impl Suggestion {
    /// Explain a candidate
    #[must_use]
    pub fn new(candidate: Candidate, reason: impl Into<String>, tip: impl Into<String>) -> Self {
        Self {
            candidate,
            reason: reason.into(),
            tip: tip.into(),
            asset_url: None,
        }
    }

    /// Exercise display name
    #[must_use]
    pub fn name(&self) -> &str {
        self.candidate.name()
    }

    /// Required equipment
    #[must_use]
    pub fn equipment(&self) -> &str {
        self.candidate.exercise.equipment()
    }
}
