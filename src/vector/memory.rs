// ABOUTME: Exact in-memory cosine index over exercise documents and their embeddings
// ABOUTME: Full scan per query; ascending distance with insertion order breaking ties
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::cmp::Ordering;

use async_trait::async_trait;

use super::{MetadataFilter, VectorIndex, VectorMatch};
use crate::errors::{AppError, AppResult};
use crate::models::ExerciseDocument;

struct IndexedExercise {
    document: ExerciseDocument,
    embedding: Vec<f32>,
}

/// In-memory vector index
///
/// Suitable for tests and small corpora. Built once, then shared read-only.
#[derive(Default)]
pub struct InMemoryVectorIndex {
    entries: Vec<IndexedExercise>,
    dimensions: Option<usize>,
}

impl InMemoryVectorIndex {
    /// Create an empty index
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document with its embedding
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty embedding or one whose dimension
    /// differs from the documents already indexed.
    pub fn insert(&mut self, document: ExerciseDocument, embedding: Vec<f32>) -> AppResult<()> {
        if embedding.is_empty() {
            return Err(AppError::invalid_input(format!(
                "empty embedding for exercise '{}'",
                document.name()
            )));
        }
        match self.dimensions {
            Some(dimensions) if dimensions != embedding.len() => {
                return Err(AppError::invalid_input(format!(
                    "embedding for '{}' has {} dimensions, index uses {dimensions}",
                    document.name(),
                    embedding.len()
                )));
            }
            Some(_) => {}
            None => self.dimensions = Some(embedding.len()),
        }
        self.entries.push(IndexedExercise {
            document,
            embedding,
        });
        Ok(())
    }

    /// Number of indexed documents
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no documents
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn query(
        &self,
        embedding: &[f32],
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> AppResult<Vec<VectorMatch>> {
        if let Some(dimensions) = self.dimensions {
            if dimensions != embedding.len() {
                return Err(AppError::invalid_input(format!(
                    "query has {} dimensions, index uses {dimensions}",
                    embedding.len()
                )));
            }
        }

        let mut scored: Vec<(&IndexedExercise, f32)> = self
            .entries
            .iter()
            .filter(|entry| filter.is_none_or(|f| f.matches(&entry.document.metadata)))
            .map(|entry| (entry, cosine_distance(embedding, &entry.embedding)))
            .collect();
        // Stable sort keeps insertion order among equal distances
        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(entry, distance)| VectorMatch {
                id: entry.document.id.clone(),
                metadata: entry.document.metadata.clone(),
                distance,
            })
            .collect())
    }
}

/// Cosine distance `1 - cos(a, b)` in `[0, 2]`; zero vectors are maximally unrelated (distance 1)
fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    (1.0 - dot / (norm_a * norm_b)).clamp(0.0, 2.0)
}
