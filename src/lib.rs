// ABOUTME: Main library entry point for the wellness insights API
// ABOUTME: Health-context aware LLM insights with primary/secondary provider fallback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors

#![deny(unsafe_code)]

//! # Wellness Insights
//!
//! An HTTP service that turns wellness questions into short, friendly insights
//! produced by a generative-AI provider.
//!
//! ## Pipeline
//!
//! 1. A handler validates the request body.
//! 2. The prompt library builds the prompt, optionally prefixed with the
//!    user's rendered health context and prior conversation turns.
//! 3. The LLM router calls the primary provider (Gemini) and, in `auto` mode,
//!    falls back once to the secondary provider (any OpenAI-compatible API,
//!    Together AI by default).
//! 4. The handler returns the text, or the configured apology sentinel when
//!    every provider failed. Provider failures never become HTTP errors.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use wellness_insights::config::environment::ServerConfig;
//! use wellness_insights::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("{}", config.summary());
//!     Ok(())
//! }
//! ```

/// Configuration management (environment parsing, typed enums)
pub mod config;

/// Unified error handling (re-exported from `wellness-core`)
pub mod errors;

/// Health metrics and the prompt-prefix context builder
pub mod health_context;

/// Insight service layer shared by the HTTP handlers
pub mod insights;

/// In-memory journal store
pub mod journal;

/// Graceful shutdown signalling
pub mod lifecycle;

/// LLM provider abstraction, providers, prompts, and the fallback router
pub mod llm;

/// Production logging and structured output
pub mod logging;

/// HTTP middleware (CORS, request ids)
pub mod middleware;

/// Shared server resources injected into every handler
pub mod resources;

/// `HTTP` routes organised by domain
pub mod routes;

/// HTTP server bootstrap
pub mod server;
