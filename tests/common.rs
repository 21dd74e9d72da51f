// ABOUTME: Shared test utilities for integration tests
// ABOUTME: Scripted LLM providers, router configuration, and app construction helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `wellness_insights`

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use regex::Regex;
use serde_json::Value;
use tower::ServiceExt;
use wellness_insights::{
    config::{HttpConfig, RouteMode, RouterConfig},
    errors::ProviderError,
    health_context::MockHealthContextSource,
    journal::JournalStore,
    llm::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, LlmRouter},
    resources::ServerResources,
    server::build_app,
};

/// Fallback text used by every test router
pub const TEST_FALLBACK: &str = "Sorry, I had trouble processing that.";

/// What a scripted provider does on one call
#[derive(Debug, Clone)]
pub enum Script {
    /// Answer with this text
    Reply(String),
    /// Fail with this error
    Fail(ProviderError),
    /// Sleep, then answer
    Delay(Duration, String),
}

impl Script {
    pub fn reply(text: &str) -> Self {
        Self::Reply(text.to_owned())
    }

    pub fn empty(provider: &'static str) -> Self {
        Self::Fail(ProviderError::EmptyResponse { provider })
    }

    pub fn status(provider: &'static str, status: u16) -> Self {
        Self::Fail(ProviderError::status(provider, status, "upstream error"))
    }
}

/// Provider that plays back a script and records every request it receives
pub struct ScriptedProvider {
    name: &'static str,
    capabilities: LlmCapabilities,
    script: Mutex<VecDeque<Script>>,
    default: Script,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    /// Provider that always gives the same answer
    pub fn always(name: &'static str, script: Script) -> Arc<Self> {
        Arc::new(Self {
            name,
            capabilities: LlmCapabilities::full_featured(),
            script: Mutex::new(VecDeque::new()),
            default: script,
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Provider that plays `steps` in order, then repeats `then`
    pub fn sequence(name: &'static str, steps: Vec<Script>, then: Script) -> Arc<Self> {
        Arc::new(Self {
            name,
            capabilities: LlmCapabilities::full_featured(),
            script: Mutex::new(steps.into()),
            default: then,
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Provider with restricted capabilities
    pub fn with_capabilities(
        name: &'static str,
        capabilities: LlmCapabilities,
        script: Script,
    ) -> Arc<Self> {
        Arc::new(Self {
            name,
            capabilities,
            script: Mutex::new(VecDeque::new()),
            default: script,
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Number of calls received
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Copy of every request received
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Most recent request
    pub fn last_request(&self) -> ChatRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("provider was never called")
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn display_name(&self) -> &'static str {
        self.name
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.capabilities
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());
        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.default.clone());

        let text = match step {
            Script::Reply(text) => text,
            Script::Fail(error) => return Err(error),
            Script::Delay(delay, text) => {
                tokio::time::sleep(delay).await;
                text
            }
        };

        Ok(ChatResponse {
            content: text,
            model: "scripted-model".to_owned(),
            usage: None,
            finish_reason: Some("stop".to_owned()),
        })
    }
}

/// Router settings used across tests
pub fn router_config(mode: RouteMode) -> RouterConfig {
    RouterConfig {
        mode,
        failure_pattern: Some(Regex::new("(?i)sorry, i had trouble processing").unwrap()),
        fallback_message: TEST_FALLBACK.to_owned(),
        request_timeout: Duration::from_secs(2),
    }
}

/// Auto-mode router over two scripted providers
pub fn auto_router(primary: &Arc<ScriptedProvider>, secondary: &Arc<ScriptedProvider>) -> LlmRouter {
    LlmRouter::new(
        Arc::clone(primary) as Arc<dyn LlmProvider>,
        Arc::clone(secondary) as Arc<dyn LlmProvider>,
        router_config(RouteMode::Auto),
    )
}

/// Full application over scripted providers, mock health context, and a seeded journal
pub fn test_app(primary: &Arc<ScriptedProvider>, secondary: &Arc<ScriptedProvider>) -> Router {
    test_app_with_journal(primary, secondary, JournalStore::seeded())
}

/// Full application with a caller-supplied journal store
pub fn test_app_with_journal(
    primary: &Arc<ScriptedProvider>,
    secondary: &Arc<ScriptedProvider>,
    journal: JournalStore,
) -> Router {
    let resources = Arc::new(ServerResources::from_parts(
        auto_router(primary, secondary),
        Arc::new(MockHealthContextSource::default()),
        journal,
    ));
    build_app(&resources, &HttpConfig::default())
}

/// Send a request through the app and decode the JSON body (Null when empty)
pub async fn send(app: &Router, request: Request<Body>) -> (u16, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status().as_u16();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// JSON POST request
pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    json_request("POST", uri, body)
}

/// JSON request with any method
pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Bodiless request
pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}
