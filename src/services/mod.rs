// ABOUTME: Domain service layer holding the exercise substitution pipeline
// ABOUTME: Protocol-agnostic business logic reusable by any transport that embeds the crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Services take a [`SwapContext`](crate::context::SwapContext) and plain
//! request models, so the same business rules apply whatever the entry point.

/// Exercise substitution: intent analysis, retrieval, ranking and orchestration
pub mod exercise_swap;
