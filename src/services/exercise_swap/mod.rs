// ABOUTME: Exercise substitution service: analyzer, retriever, ranker and the pipeline runner
// ABOUTME: Turns a free-text swap request into at most a handful of safe, explained alternatives
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Exercise Swap
//!
//! ```text
//! SwapRequest -> analyze -> retrieve -> rank -> SwapResponse
//! ```
//!
//! Each stage degrades instead of failing. A broken LLM yields a default
//! intent or similarity-ordered suggestions; a broken embedding service or
//! index yields no candidates. Only two things are guaranteed about the
//! output: it names no exercise outside the filtered candidate set, and it
//! always arrives.

/// Free text to structured intent
pub mod analyzer;
/// Orchestration over a per-run state
pub mod pipeline;
/// Ranking, validation and explanation
pub mod ranker;
/// Semantic search plus deterministic safety filters
pub mod retriever;
/// Run state and stage statuses
pub mod state;

pub use analyzer::analyze;
pub use pipeline::{
    AnalyzeStage, RankStage, RetrieveStage, SubstitutionPipeline, SwapReport, SwapStage,
};
pub use ranker::rank;
pub use retriever::{build_query, filter_candidates, retrieve};
pub use state::{
    AnalysisOutcome, AnalysisStatus, PipelineStage, RankingOutcome, RankingStatus,
    RetrievalOutcome, RetrievalStatus, StateUpdate, SwapState,
};
