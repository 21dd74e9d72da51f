// ABOUTME: Core types and constants for the wellness insights service
// ABOUTME: Foundation crate with error handling and shared constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors

#![deny(unsafe_code)]

//! # Wellness Core
//!
//! Foundation crate shared by the insights server. It changes rarely, which
//! keeps incremental builds of the server crate fast.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode`, `ProviderError` and the JSON error body
//! - **constants**: environment variable names, defaults, and user-facing messages

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;
