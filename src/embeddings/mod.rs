// ABOUTME: Embedding provider abstraction turning query text into a dense vector
// ABOUTME: Async trait shared across concurrent runs plus the OpenAI-compatible adapter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Embedding Provider
//!
//! The retriever embeds one query per run. The vector must live in the same
//! space as the vectors stored in the [`VectorIndex`](crate::vector::VectorIndex).

mod openai_compatible;

pub use openai_compatible::{EmbeddingConfig, OpenAiCompatibleEmbeddings};

use async_trait::async_trait;

use crate::errors::AppResult;

/// Text embedding service
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embedding model identifier
    fn model(&self) -> &str;

    /// Embed a single text
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>>;
}
