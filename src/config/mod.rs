// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Exposes environment loading plus the typed enums used across the server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors

//! Configuration module for the insights server
//!
//! - **Environment**: provider credentials, router policy, and HTTP settings
//! - **Types**: log level, deployment environment, and route mode enums

/// Environment and server configuration
pub mod environment;
/// Strongly typed configuration enums
pub mod types;

pub use environment::{
    load_dotenv, ApiKey, GenerationSettings, HttpConfig, ProviderConfig, RouterConfig,
    ServerConfig,
};
pub use types::{Environment, LogLevel, RouteMode};
