// ABOUTME: Insight service layer shared by the HTTP handlers
// ABOUTME: Validates inputs, builds prompts, calls the LLM router, and shapes the results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors

//! # Insight Service
//!
//! Every method resolves to text: provider text or the router's fallback
//! message. Only invalid input and health-context lookup failures surface as
//! errors.

/// Dashboard insight card catalog
pub mod cards;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use wellness_core::constants::{limits, messages};

use crate::config::RouteMode;
use crate::errors::{AppError, AppResult};
use crate::health_context::{build_context, HealthContext, HealthContextSource};
use crate::journal::JournalContent;
use crate::llm::{prompts, ChatMessage, ChatRequest, LlmRouter, MessageRole, RouteOutcome};

pub use cards::{CardType, InsightCard};

/// User whose context is loaded until per-user lookup exists
pub const DEFAULT_USER_ID: &str = "mock-user-id";

/// Projected metrics for the forecast insight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastMetrics {
    /// Projected sleep score
    pub sleep_score: f64,
    /// Projected HRV in ms
    pub hrv: f64,
    /// Projected resting heart rate in bpm
    #[serde(rename = "restingHR")]
    pub resting_hr: f64,
    /// Projected daily steps
    pub steps: f64,
    /// Projected hydration in litres
    pub hydration: f64,
}

/// Current metrics for the health summary insight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetrics {
    /// Sleep score
    pub sleep_score: f64,
    /// HRV in ms
    pub hrv: f64,
    /// Resting heart rate in bpm
    #[serde(rename = "restingHR")]
    pub resting_hr: f64,
    /// Daily steps
    pub steps: f64,
    /// Vitamin D in ng/mL
    pub vitamin_d: f64,
    /// LDL cholesterol in mg/dL
    pub ldl: f64,
}

/// Two-part correlation insight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationInsight {
    /// Plain-language explanation of the relationship
    pub insight: String,
    /// What the user can do about it
    pub recommendation: String,
}

/// Shape the correlation JSON reply is decoded into
#[derive(Debug, Deserialize)]
struct CorrelationReply {
    #[serde(default)]
    insight: Option<String>,
    #[serde(default)]
    recommendation: Option<String>,
}

/// Prompt construction and routing for every insight kind
pub struct InsightService {
    router: Arc<LlmRouter>,
    health_source: Arc<dyn HealthContextSource>,
}

impl InsightService {
    /// Create the service
    #[must_use]
    pub fn new(router: Arc<LlmRouter>, health_source: Arc<dyn HealthContextSource>) -> Self {
        Self {
            router,
            health_source,
        }
    }

    /// Router used for every call
    #[must_use]
    pub fn router(&self) -> &LlmRouter {
        &self.router
    }

    /// Current health snapshot for the default user
    ///
    /// # Errors
    ///
    /// Returns an internal error if the source cannot produce a snapshot.
    pub async fn health_context(&self) -> AppResult<HealthContext> {
        self.health_source
            .load(DEFAULT_USER_ID)
            .await
            .map_err(|e| AppError::internal(format!("Failed to load health context: {}", e.message)))
    }

    /// Rendered health context for the default user
    async fn rendered_context(&self) -> AppResult<String> {
        Ok(build_context(&self.health_context().await?))
    }

    /// Free-form question, optionally prefixed with health context
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank or oversized prompt, or an
    /// internal error if the health context cannot be loaded.
    #[instrument(skip(self, prompt))]
    pub async fn ask(
        &self,
        prompt: &str,
        mode: Option<RouteMode>,
        include_context: bool,
    ) -> AppResult<String> {
        let prompt = validate_prompt("prompt", prompt)?;
        let prompt = if include_context {
            prompts::with_context(prompt, &self.rendered_context().await?)
        } else {
            prompt.to_owned()
        };

        let request = single_turn(prompt);
        let outcome = match mode {
            Some(mode) => self.router.complete_with_mode(&request, mode).await,
            None => self.router.complete(&request).await,
        };
        Ok(log_outcome("ask", outcome).into_text())
    }

    /// Multi-turn chat grounded in the health context
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank prompt or invalid history, or
    /// an internal error if the health context cannot be loaded.
    #[instrument(skip_all, fields(history_len = history.len()))]
    pub async fn chat(&self, prompt: &str, history: &[ChatMessage]) -> AppResult<String> {
        let prompt = validate_prompt("prompt", prompt)?;
        validate_history(history)?;

        let context = self.rendered_context().await?;
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(prompts::chat_system_prompt(&context)));
        messages.extend(
            history
                .iter()
                .map(|turn| ChatMessage::new(turn.role, turn.content.trim())),
        );
        messages.push(ChatMessage::user(prompt));

        let outcome = self.router.complete(&ChatRequest::new(messages)).await;
        Ok(log_outcome("chat", outcome).into_text())
    }

    /// Short insight about one journal entry
    ///
    /// # Errors
    ///
    /// Returns a validation error if the entry is invalid.
    pub async fn journal_insight(&self, entry: &JournalContent) -> AppResult<String> {
        entry.validate()?;
        let request = single_turn(prompts::journal_insight(entry));
        Ok(log_outcome("journal", self.router.complete(&request).await).into_text())
    }

    /// Insight and recommendation for the relationship between two metrics
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank label.
    pub async fn correlation(
        &self,
        x_label: &str,
        y_label: &str,
        description: Option<&str>,
    ) -> AppResult<CorrelationInsight> {
        let x_label = validate_prompt("xLabel", x_label)?;
        let y_label = validate_prompt("yLabel", y_label)?;

        let request = single_turn(prompts::correlation(x_label, y_label, description))
            .with_json_mode();

        Ok(match log_outcome("correlation", self.router.complete(&request).await) {
            RouteOutcome::Answered { text, .. } => parse_correlation(&text),
            RouteOutcome::Fallback { text } => CorrelationInsight {
                insight: text.clone(),
                recommendation: text,
            },
        })
    }

    /// Recommendation from projected metrics
    ///
    /// # Errors
    ///
    /// Returns a validation error for a negative or non-finite metric.
    pub async fn forecast(&self, metrics: &ForecastMetrics) -> AppResult<String> {
        validate_metrics(&[
            ("sleepScore", metrics.sleep_score),
            ("hrv", metrics.hrv),
            ("restingHR", metrics.resting_hr),
            ("steps", metrics.steps),
            ("hydration", metrics.hydration),
        ])?;
        let request = single_turn(prompts::forecast(metrics));
        Ok(log_outcome("forecast", self.router.complete(&request).await).into_text())
    }

    /// Summary and recommendations from current metrics
    ///
    /// # Errors
    ///
    /// Returns a validation error for a negative or non-finite metric.
    pub async fn summary(&self, metrics: &SummaryMetrics) -> AppResult<String> {
        validate_metrics(&[
            ("sleepScore", metrics.sleep_score),
            ("hrv", metrics.hrv),
            ("restingHR", metrics.resting_hr),
            ("steps", metrics.steps),
            ("vitaminD", metrics.vitamin_d),
            ("ldl", metrics.ldl),
        ])?;
        let request = single_turn(prompts::health_summary(metrics));
        Ok(log_outcome("summary", self.router.complete(&request).await).into_text())
    }

    /// Answer one dashboard card against the health context
    ///
    /// # Errors
    ///
    /// Returns an internal error if the health context cannot be loaded.
    pub async fn card_insight(&self, card: &InsightCard) -> AppResult<String> {
        let prompt = prompts::with_context(card.prompt, &self.rendered_context().await?);
        let outcome = self.router.complete(&single_turn(prompt)).await;
        Ok(log_outcome(card.key, outcome).into_text())
    }
}

/// System prompt plus one user turn
fn single_turn(prompt: String) -> ChatRequest {
    ChatRequest::new(vec![
        ChatMessage::system(prompts::system_prompt()),
        ChatMessage::user(prompt),
    ])
}

fn log_outcome(kind: &str, outcome: RouteOutcome) -> RouteOutcome {
    debug!(
        kind,
        provider = outcome.provider().unwrap_or("none"),
        fallback = outcome.is_fallback(),
        "Insight generated"
    );
    outcome
}

/// Trimmed, non-blank, bounded text field
fn validate_prompt<'a>(field: &str, value: &'a str) -> AppResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::missing_field(field));
    }
    if value.chars().count() > limits::MAX_PROMPT_CHARS {
        return Err(AppError::invalid_input(format!(
            "{field} must be at most {} characters",
            limits::MAX_PROMPT_CHARS
        )));
    }
    Ok(value)
}

fn validate_history(history: &[ChatMessage]) -> AppResult<()> {
    if history.len() > limits::MAX_HISTORY_MESSAGES {
        return Err(AppError::invalid_input(format!(
            "history must contain at most {} messages",
            limits::MAX_HISTORY_MESSAGES
        )));
    }
    for (index, turn) in history.iter().enumerate() {
        if turn.role == MessageRole::System {
            return Err(AppError::invalid_input(format!(
                "history[{index}].role must be user or assistant"
            )));
        }
        if turn.content.trim().is_empty() {
            return Err(AppError::missing_field(&format!("history[{index}].content")));
        }
    }
    Ok(())
}

fn validate_metrics(metrics: &[(&str, f64)]) -> AppResult<()> {
    for (name, value) in metrics {
        if !value.is_finite() || *value < 0.0 {
            return Err(AppError::invalid_input(format!(
                "{name} must be a non-negative number"
            )));
        }
    }
    Ok(())
}

/// Decode the correlation reply, tolerating code fences and plain text
fn parse_correlation(text: &str) -> CorrelationInsight {
    let body = strip_code_fence(text);
    let non_blank = |value: Option<String>| {
        value
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
    };

    match serde_json::from_str::<CorrelationReply>(body) {
        Ok(reply) => CorrelationInsight {
            insight: non_blank(reply.insight).unwrap_or_else(|| messages::NO_INSIGHT.to_owned()),
            recommendation: non_blank(reply.recommendation)
                .unwrap_or_else(|| messages::NO_RECOMMENDATION.to_owned()),
        },
        Err(e) => {
            debug!(error = %e, "Correlation reply was not JSON; using it as the insight");
            CorrelationInsight {
                insight: text.trim().to_owned(),
                recommendation: messages::NO_RECOMMENDATION.to_owned(),
            }
        }
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map_or(trimmed, str::trim)
}
