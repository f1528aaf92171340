// ABOUTME: Explicitly constructed dependency bundle handed to every swap pipeline stage
// ABOUTME: Holds the LLM, embeddings, vector index, optional media, injury rules and config
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Focused dependency injection for the substitution pipeline
//!
//! Collaborators are `Arc`-shared trait objects, so one context can serve
//! many concurrent runs and tests can swap in scripted fakes.

use std::sync::Arc;

use crate::config::SwapConfig;
use crate::embeddings::EmbeddingProvider;
use crate::intelligence::InjuryPolicy;
use crate::llm::LlmProvider;
use crate::media::MediaLookup;
use crate::vector::VectorIndex;

/// Collaborators and configuration for one or many pipeline runs
#[derive(Clone)]
pub struct SwapContext {
    llm: Arc<dyn LlmProvider>,
    embeddings: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    media: Option<Arc<dyn MediaLookup>>,
    injury_policy: Arc<InjuryPolicy>,
    config: SwapConfig,
}

impl SwapContext {
    /// Create a context without media lookup
    #[must_use]
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        embeddings: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        config: SwapConfig,
    ) -> Self {
        Self {
            llm,
            embeddings,
            index,
            media: None,
            injury_policy: Arc::new(InjuryPolicy::default()),
            config,
        }
    }

    /// Attach a media lookup used to decorate final suggestions
    #[must_use]
    pub fn with_media(mut self, media: Arc<dyn MediaLookup>) -> Self {
        self.media = Some(media);
        self
    }

    /// Replace the built-in injury contraindication table
    #[must_use]
    pub fn with_injury_policy(mut self, policy: InjuryPolicy) -> Self {
        self.injury_policy = Arc::new(policy);
        self
    }

    /// Chat-completion provider
    #[must_use]
    pub fn llm(&self) -> &dyn LlmProvider {
        self.llm.as_ref()
    }

    /// Embedding provider
    #[must_use]
    pub fn embeddings(&self) -> &dyn EmbeddingProvider {
        self.embeddings.as_ref()
    }

    /// Exercise vector index
    #[must_use]
    pub fn index(&self) -> &dyn VectorIndex {
        self.index.as_ref()
    }

    /// Media lookup, if configured
    #[must_use]
    pub fn media(&self) -> Option<&dyn MediaLookup> {
        self.media.as_deref()
    }

    /// Injury contraindication rules applied during retrieval
    #[must_use]
    pub fn injury_policy(&self) -> &InjuryPolicy {
        &self.injury_policy
    }

    /// Pipeline configuration
    #[must_use]
    pub const fn config(&self) -> &SwapConfig {
        &self.config
    }

    /// Model to request: the configured override or the provider default
    #[must_use]
    pub fn model(&self) -> &str {
        self.config
            .model
            .as_deref()
            .unwrap_or_else(|| self.llm.default_model())
    }
}
