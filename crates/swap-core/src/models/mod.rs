// ABOUTME: Data model for exercise substitution requests, intents, and results
// ABOUTME: Re-exports SwapRequest, SwapIntent, ExerciseDocument, Candidate, and Suggestion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! - `SwapRequest`: caller-owned, immutable input to one pipeline run
//! - `SwapIntent`: structured interpretation of the user's free-text message
//! - `ExerciseDocument`: read-only corpus entry returned by the vector index
//! - `Candidate`: a document paired with its query similarity
//! - `Suggestion`: an explained candidate, the externally visible result

mod exercise;
mod swap;

pub use exercise::{Candidate, ExerciseDocument, ExerciseMetadata, Suggestion};
pub use swap::{
    CurrentExercise, DifficultyPreference, FitnessLevel, SwapIntent, SwapReason, SwapRequest,
    SwapResponse,
};
