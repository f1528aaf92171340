// ABOUTME: Main library entry point for the exercise substitution service
// ABOUTME: Wires configuration, logging, collaborator adapters, and the three-stage swap pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Exercise Swap
//!
//! Given a user's current exercise and a free-text request to replace it
//! ("my shoulder hurts", "I don't have dumbbells"), the substitution pipeline
//! infers a structured intent, retrieves and filters candidates from an
//! indexed exercise corpus, and returns at most five explained,
//! policy-compliant alternatives.
//!
//! ## Architecture
//!
//! - **Config**: Environment-only pipeline and logging configuration
//! - **LLM / Embeddings / Vector / Media**: Collaborator SPIs with concrete adapters
//! - **Context**: Explicitly constructed dependency bundle passed to every stage
//! - **Services**: The analyze → retrieve → rank pipeline
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use exercise_swap::config::SwapConfig;
//! use exercise_swap::context::SwapContext;
//! use exercise_swap::embeddings::OpenAiCompatibleEmbeddings;
//! use exercise_swap::errors::AppResult;
//! use exercise_swap::llm::OpenAiCompatibleProvider;
//! use exercise_swap::models::{CurrentExercise, SwapRequest};
//! use exercise_swap::services::exercise_swap::SubstitutionPipeline;
//! use exercise_swap::vector::InMemoryVectorIndex;
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let context = SwapContext::new(
//!         Arc::new(OpenAiCompatibleProvider::from_env()?),
//!         Arc::new(OpenAiCompatibleEmbeddings::from_env()?),
//!         Arc::new(InMemoryVectorIndex::new()),
//!         SwapConfig::from_env()?,
//!     );
//!
//!     let current = CurrentExercise {
//!         name: "Dumbbell Bench Press".to_owned(),
//!         muscle_group: "chest".to_owned(),
//!         equipment: "dumbbell".to_owned(),
//!         sets: Some(3),
//!         reps: Some("8-12".to_owned()),
//!     };
//!     let request = SwapRequest::new(Uuid::new_v4(), current, "I don't have dumbbells today");
//!
//!     let response = SubstitutionPipeline::new().run(&context, &request).await;
//!     println!("{}", response.message);
//!     Ok(())
//! }
//! ```

/// Environment-only configuration for the pipeline and logging
pub mod config;

/// Explicitly constructed collaborator bundle shared by the stages
pub mod context;

/// Embedding provider abstraction
pub mod embeddings;

/// Unified error handling re-exported from the core crate
pub mod errors;

/// LLM provider abstraction and tolerant JSON extraction
pub mod llm;

/// Structured logging setup
pub mod logging;

/// Exercise media asset lookup with bounded TTL caching
pub mod media;

/// Substitution pipeline services
pub mod services;

/// Vector index abstraction over the exercise corpus
pub mod vector;

/// Swap data model re-exported from the core crate
pub mod models {
    pub use swap_core::models::*;
}

/// Pipeline constants re-exported from the core crate
pub mod constants {
    pub use swap_core::constants::*;
}

/// Name, muscle, equipment, and injury policies re-exported from the intelligence crate
pub mod intelligence {
    pub use swap_intelligence::*;
}
