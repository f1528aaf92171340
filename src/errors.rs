// ABOUTME: Unified error handling for the substitution service
// ABOUTME: Re-exports AppError, ErrorCode, and AppResult from the swap-core foundation crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! The error types live in `swap_core` so the intelligence crate and the
//! service crate share one taxonomy. This module is the path the rest of the
//! service imports from.

pub use swap_core::errors::{AppError, AppResult, ErrorCode, ErrorContext};
