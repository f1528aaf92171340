// ABOUTME: Core types and constants for the exercise substitution service
// ABOUTME: Foundation crate with error handling, pipeline limits, and the swap data model
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Swap Core
//!
//! Foundation crate providing shared types and constants for exercise
//! substitution. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Retrieval/ranking limits and user-facing message templates
//! - **models**: Swap requests, intents, exercise documents, candidates, and suggestions

/// Unified error handling system with standard error codes
pub mod errors;

/// Pipeline limits and message templates organized by stage
pub mod constants;

/// Swap request/response data model
pub mod models;
