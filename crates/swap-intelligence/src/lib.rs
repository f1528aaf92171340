// ABOUTME: Exercise matching and safety policies used to filter substitution candidates
// ABOUTME: Name normalization, muscle categorization, equipment availability, and injury rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Swap Intelligence
//!
//! Pure, total functions with no failure mode. Every predicate here is
//! evaluated against the original `SwapRequest`, never against LLM output.

/// Exercise name canonicalization and fuzzy equality
pub mod name_normalizer;

/// Free-text muscle description to coarse category mapping
pub mod muscle_categorizer;

/// Equipment availability and negation constraints
pub mod equipment_policy;

/// Injury keyword to unsafe-exercise contraindication table
pub mod injury_policy;

pub use equipment_policy::EquipmentPolicy;
pub use injury_policy::InjuryPolicy;
pub use muscle_categorizer::MuscleCategory;
pub use name_normalizer::{is_similar, normalize};
