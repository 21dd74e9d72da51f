// ABOUTME: Shared server resources built once at startup and injected into every handler
// ABOUTME: Wires providers, router, health-context source, insight service, and journal store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors

//! Centralized resource container
//!
//! Every shared component is constructed here and handed to axum as
//! `Arc<ServerResources>` state. Nothing is a global.

use std::sync::Arc;

use tracing::info;

use crate::config::ServerConfig;
use crate::errors::AppResult;
use crate::health_context::{HealthContextSource, MockHealthContextSource};
use crate::insights::InsightService;
use crate::journal::JournalStore;
use crate::lifecycle::ShutdownSignal;
use crate::llm::{GeminiProvider, LlmProvider, LlmRouter, OpenAiCompatibleProvider};

/// Components shared by all request handlers
pub struct ServerResources {
    /// Provider router
    pub router: Arc<LlmRouter>,
    /// Insight service
    pub insights: Arc<InsightService>,
    /// Journal store
    pub journal: Arc<JournalStore>,
}

impl ServerResources {
    /// Build production resources from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be created.
    pub fn from_config(config: &ServerConfig, shutdown: ShutdownSignal) -> AppResult<Self> {
        let primary: Arc<dyn LlmProvider> = Arc::new(GeminiProvider::new(config.gemini.clone())?);
        let secondary: Arc<dyn LlmProvider> =
            Arc::new(OpenAiCompatibleProvider::together(config.together.clone())?);

        info!(
            primary = primary.name(),
            secondary = secondary.name(),
            mode = %config.router.mode,
            "LLM providers initialized"
        );

        let router = LlmRouter::new(primary, secondary, config.router.clone()).with_shutdown(shutdown);

        Ok(Self::from_parts(
            router,
            Arc::new(MockHealthContextSource::default()),
            JournalStore::seeded(),
        ))
    }

    /// Assemble resources from already-built components
    #[must_use]
    pub fn from_parts(
        router: LlmRouter,
        health_source: Arc<dyn HealthContextSource>,
        journal: JournalStore,
    ) -> Self {
        let router = Arc::new(router);
        let insights = Arc::new(InsightService::new(Arc::clone(&router), health_source));

        Self {
            router,
            insights,
            journal: Arc::new(journal),
        }
    }
}
