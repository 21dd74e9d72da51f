// ABOUTME: Generic OpenAI-compatible chat completions provider
// ABOUTME: Secondary insight backend, Together AI by default; any compatible endpoint works
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors

//! # `OpenAI`-Compatible Provider
//!
//! Calls `POST {base}/chat/completions` with bearer authentication and returns
//! `choices[0].message.content`.
//!
//! ## Supported Backends
//!
//! - **Together AI**: <https://api.together.xyz/v1> (default)
//! - **Any `OpenAI`-compatible endpoint** via `TOGETHER_BASE_URL`

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::{non_empty_text, ChatMessage, ChatRequest, ChatResponse, LlmCapabilities, LlmProvider};
use crate::config::ProviderConfig;
use crate::errors::{AppError, ProviderError};

/// Connection establishment budget; the per-attempt budget is enforced by the router
const CONNECT_TIMEOUT_SECS: u64 = 5;

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

/// OpenAI-compatible API request structure
#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage<'a>>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

/// Message structure for OpenAI-compatible API
#[derive(Debug, Serialize)]
struct OpenAiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a ChatMessage> for OpenAiMessage<'a> {
    fn from(msg: &'a ChatMessage) -> Self {
        Self {
            role: msg.role.as_str(),
            content: &msg.content,
        }
    }
}

/// `response_format` object
#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

/// OpenAI-compatible API response structure
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    model: Option<String>,
}

/// Choice in response
#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: Option<OpenAiResponseMessage>,
    finish_reason: Option<String>,
}

/// Message in response
#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

/// Usage statistics in response
#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(rename = "prompt_tokens", default)]
    prompt: u32,
    #[serde(rename = "completion_tokens", default)]
    completion: u32,
    #[serde(rename = "total_tokens", default)]
    total: u32,
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Generic `OpenAI`-compatible LLM provider
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: ProviderConfig,
    provider_name: &'static str,
    display_name: &'static str,
    capabilities: LlmCapabilities,
}

impl Debug for OpenAiCompatibleProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("OpenAiCompatibleProvider")
            .field("provider", &self.provider_name)
            .field("base_url", &self.config.base_url.as_str())
            .field("model", &self.config.model)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl OpenAiCompatibleProvider {
    /// Create a provider with an explicit identity and capability set
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(
        provider_name: &'static str,
        display_name: &'static str,
        capabilities: LlmCapabilities,
        config: ProviderConfig,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            provider_name,
            display_name,
            capabilities,
        })
    }

    /// Together AI, which honours `response_format` for JSON mode
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn together(config: ProviderConfig) -> Result<Self, AppError> {
        Self::new(
            "together",
            "Together AI",
            LlmCapabilities::full_featured(),
            config,
        )
    }

    /// Build the API URL for a given endpoint
    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{endpoint}",
            self.config.base_url.as_str().trim_end_matches('/')
        )
    }

    fn build_request<'a>(&'a self, request: &'a ChatRequest) -> OpenAiRequest<'a> {
        let defaults = self.config.generation;
        let response_format = (request.json_mode && self.capabilities.supports_json_mode())
            .then_some(ResponseFormat {
                format_type: "json_object",
            });

        OpenAiRequest {
            model: request.model.as_deref().unwrap_or(&self.config.model),
            messages: request.messages.iter().map(OpenAiMessage::from).collect(),
            temperature: request.temperature.unwrap_or(defaults.temperature),
            top_p: request.top_p.unwrap_or(defaults.top_p),
            max_tokens: request.max_tokens.unwrap_or(defaults.max_tokens),
            response_format,
        }
    }

    fn transport_error(&self, error: reqwest::Error) -> ProviderError {
        ProviderError::Transport {
            provider: self.provider_name,
            message: error.without_url().to_string(),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        self.provider_name
    }

    fn display_name(&self) -> &'static str {
        self.display_name
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.capabilities
    }

    fn default_model(&self) -> &str {
        &self.config.model
    }

    #[instrument(skip(self, request), fields(provider = self.provider_name, model = %request.model.as_deref().unwrap_or(&self.config.model)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        let openai_request = self.build_request(request);

        debug!(
            messages = openai_request.messages.len(),
            json_mode = openai_request.response_format.is_some(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(self.api_url("chat/completions"))
            .bearer_auth(self.config.api_key.expose())
            .json(&openai_request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            warn!(status = %status, provider = self.provider_name, "Chat completion API error");
            return Err(ProviderError::status(
                self.provider_name,
                status.as_u16(),
                &response_text,
            ));
        }

        let parsed: OpenAiResponse =
            serde_json::from_str(&response_text).map_err(|e| ProviderError::InvalidResponse {
                provider: self.provider_name,
                message: e.to_string(),
            })?;

        let choice = parsed.choices.first();
        let content = non_empty_text(
            self.provider_name,
            choice
                .and_then(|c| c.message.as_ref())
                .and_then(|m| m.content.as_deref()),
        )?;

        debug!(chars = content.len(), "Received chat completion");

        Ok(ChatResponse {
            content,
            model: parsed
                .model
                .unwrap_or_else(|| openai_request.model.to_owned()),
            usage: parsed.usage.map(|u| super::TokenUsage {
                prompt_tokens: u.prompt,
                completion_tokens: u.completion,
                total_tokens: u.total,
            }),
            finish_reason: choice.and_then(|c| c.finish_reason.clone()),
        })
    }
}
