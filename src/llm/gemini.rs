// ABOUTME: Google Gemini LLM provider implementation for the generateContent API
// ABOUTME: Primary insight backend; sends the API key as a header and returns typed failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors

//! # Gemini Provider
//!
//! Implementation of the `LlmProvider` trait for Google's Gemini models via
//! `POST {base}/models/{model}:generateContent`.
//!
//! The API key is sent in the `x-goog-api-key` header so it never appears in a
//! URL, a reqwest error message, or a trace span.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::{
    non_empty_text, ChatMessage, ChatRequest, ChatResponse, LlmCapabilities, LlmProvider,
    MessageRole, TokenUsage,
};
use crate::config::ProviderConfig;
use crate::errors::{AppError, ProviderError};

/// Provider identifier used in logs and errors
const PROVIDER_NAME: &str = "gemini";

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Connection establishment budget; the per-attempt budget is enforced by the router
const CONNECT_TIMEOUT_SECS: u64 = 5;

// ============================================================================
// API Request/Response Types
// ============================================================================

/// Gemini API request structure
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    generation_config: GenerationConfig,
}

/// Content structure for Gemini API
#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ContentPart>,
}

impl GeminiContent {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(str::to_owned),
            parts: vec![ContentPart {
                text: Some(text.to_owned()),
            }],
        }
    }
}

/// Part of content; only text parts are produced or consumed
#[derive(Debug, Serialize, Deserialize)]
struct ContentPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

/// Generation configuration
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

/// Gemini API response structure
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

/// Response candidate
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

/// Usage metadata from Gemini API response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
    total_token_count: Option<u32>,
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Google Gemini LLM provider
pub struct GeminiProvider {
    client: Client,
    config: ProviderConfig,
}

impl Debug for GeminiProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiProvider")
            .field("base_url", &self.config.base_url.as_str())
            .field("model", &self.config.model)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl GeminiProvider {
    /// Create a provider from its configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ProviderConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Endpoint for a model's `generateContent` method
    fn build_url(&self, model: &str) -> String {
        format!(
            "{}/models/{model}:generateContent",
            self.config.base_url.as_str().trim_end_matches('/')
        )
    }

    /// Convert our message role to Gemini's role format
    const fn convert_role(role: MessageRole) -> &'static str {
        match role {
            MessageRole::System | MessageRole::User => "user",
            MessageRole::Assistant => "model",
        }
    }

    /// Split system instructions from the turn list
    fn convert_messages(messages: &[ChatMessage]) -> (Vec<GeminiContent>, Option<GeminiContent>) {
        let mut contents = Vec::with_capacity(messages.len());
        let mut system_parts: Vec<&str> = Vec::new();

        for message in messages {
            if message.role == MessageRole::System {
                system_parts.push(&message.content);
            } else {
                contents.push(GeminiContent::text(
                    Some(Self::convert_role(message.role)),
                    &message.content,
                ));
            }
        }

        let system_instruction =
            (!system_parts.is_empty()).then(|| GeminiContent::text(None, &system_parts.join("\n\n")));

        (contents, system_instruction)
    }

    /// Build a Gemini API request from a `ChatRequest`
    fn build_gemini_request(&self, request: &ChatRequest) -> GeminiRequest {
        let (contents, system_instruction) = Self::convert_messages(&request.messages);
        let defaults = self.config.generation;

        GeminiRequest {
            contents,
            system_instruction,
            generation_config: GenerationConfig {
                temperature: request.temperature.unwrap_or(defaults.temperature),
                top_p: request.top_p.unwrap_or(defaults.top_p),
                max_output_tokens: request.max_tokens.unwrap_or(defaults.max_tokens),
                response_mime_type: request.json_mode.then_some("application/json"),
            },
        }
    }

    /// Concatenate the text parts of the first candidate
    fn extract_content(response: &GeminiResponse) -> Result<String, ProviderError> {
        let text = response
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            });

        non_empty_text(PROVIDER_NAME, text.as_deref())
    }

    /// Convert usage metadata to our token usage format
    fn convert_usage(metadata: &UsageMetadata) -> TokenUsage {
        TokenUsage {
            prompt_tokens: metadata.prompt_token_count.unwrap_or(0),
            completion_tokens: metadata.candidates_token_count.unwrap_or(0),
            total_tokens: metadata.total_token_count.unwrap_or(0),
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn display_name(&self) -> &'static str {
        "Google Gemini"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::full_featured()
    }

    fn default_model(&self) -> &str {
        &self.config.model
    }

    #[instrument(skip(self, request), fields(provider = PROVIDER_NAME, model = %request.model.as_deref().unwrap_or(&self.config.model)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        let model = request.model.as_deref().unwrap_or(&self.config.model);
        let gemini_request = self.build_gemini_request(request);

        debug!(
            turns = gemini_request.contents.len(),
            json_mode = request.json_mode,
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.build_url(model))
            .header(API_KEY_HEADER, self.config.api_key.expose())
            .json(&gemini_request)
            .send()
            .await
            .map_err(|e| ProviderError::Transport {
                provider: PROVIDER_NAME,
                message: e.without_url().to_string(),
            })?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| ProviderError::Transport {
            provider: PROVIDER_NAME,
            message: e.without_url().to_string(),
        })?;

        if !status.is_success() {
            warn!(status = %status, "Gemini API error");
            return Err(ProviderError::status(
                PROVIDER_NAME,
                status.as_u16(),
                &response_text,
            ));
        }

        let gemini_response: GeminiResponse =
            serde_json::from_str(&response_text).map_err(|e| ProviderError::InvalidResponse {
                provider: PROVIDER_NAME,
                message: e.to_string(),
            })?;

        let content = Self::extract_content(&gemini_response)?;
        let usage = gemini_response
            .usage_metadata
            .as_ref()
            .map(Self::convert_usage);
        let finish_reason = gemini_response
            .candidates
            .first()
            .and_then(|c| c.finish_reason.clone());

        debug!(chars = content.len(), "Received Gemini response");

        Ok(ChatResponse {
            content,
            model: model.to_owned(),
            usage,
            finish_reason,
        })
    }
}
