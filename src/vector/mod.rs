// ABOUTME: Vector index abstraction over the embedded exercise corpus
// ABOUTME: Nearest-neighbour query by cosine distance with optional metadata equality filter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Vector Index
//!
//! How the corpus is populated and embedded is outside this crate; the
//! pipeline only queries. Matches carry cosine distance in `[0, 2]`, sorted
//! ascending (most similar first).

mod memory;

pub use memory::InMemoryVectorIndex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppResult;
use crate::models::ExerciseMetadata;

/// One nearest-neighbour hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorMatch {
    /// Corpus identifier
    pub id: String,
    /// Stored exercise metadata
    pub metadata: ExerciseMetadata,
    /// Cosine distance in `[0, 2]`
    pub distance: f32,
}

/// Case-insensitive equality filter on exercise metadata
///
/// Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataFilter {
    /// Required equipment
    pub equipment: Option<String>,
    /// Required body part
    pub body_part: Option<String>,
    /// Required target muscle
    pub target_muscle: Option<String>,
    /// Required difficulty
    pub difficulty: Option<String>,
}

impl MetadataFilter {
    /// Restrict to one equipment type
    #[must_use]
    pub fn with_equipment(mut self, equipment: impl Into<String>) -> Self {
        self.equipment = Some(equipment.into());
        self
    }

    /// Restrict to one body part
    #[must_use]
    pub fn with_body_part(mut self, body_part: impl Into<String>) -> Self {
        self.body_part = Some(body_part.into());
        self
    }

    /// Restrict to one difficulty label
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = Some(difficulty.into());
        self
    }

    /// Whether the metadata satisfies every set field
    #[must_use]
    pub fn matches(&self, metadata: &ExerciseMetadata) -> bool {
        field_matches(self.equipment.as_deref(), Some(metadata.equipment.as_str()))
            && field_matches(self.body_part.as_deref(), Some(metadata.body_part.as_str()))
            && field_matches(self.target_muscle.as_deref(), Some(metadata.target_muscle.as_str()))
            && field_matches(self.difficulty.as_deref(), metadata.difficulty.as_deref())
    }
}

fn field_matches(expected: Option<&str>, actual: Option<&str>) -> bool {
    expected.is_none_or(|expected| {
        actual.is_some_and(|actual| actual.trim().eq_ignore_ascii_case(expected.trim()))
    })
}

/// Read-only nearest-neighbour index
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Return up to `top_k` matches ordered by ascending cosine distance
    async fn query(
        &self,
        embedding: &[f32],
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> AppResult<Vec<VectorMatch>>;
}
