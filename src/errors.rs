// ABOUTME: Re-exports the unified error types from the wellness-core crate
// ABOUTME: Keeps `crate::errors::AppError` paths stable for the server modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors

//! Unified error handling for the server crate.
//!
//! All types live in `wellness_core::errors`; this module re-exports them so
//! handlers and tests can import from one place.

pub use wellness_core::errors::{
    AppError, AppResult, ErrorCode, ErrorResponse, ProviderError,
};
