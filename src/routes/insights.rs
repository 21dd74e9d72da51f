// ABOUTME: Insight generation route handlers
// ABOUTME: Free-form, chat, journal, correlation, forecast, summary, and card insights
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors

//! Insight routes
//!
//! Handlers validate the body, delegate to [`InsightService`], and answer 200
//! with provider text or the fallback message. Provider failures never become
//! HTTP errors; only malformed input (400), unknown cards (404), and
//! health-context failures (500) do.
//!
//! [`InsightService`]: crate::insights::InsightService

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::json_body;
use crate::config::RouteMode;
use crate::errors::{AppError, AppResult};
use crate::health_context::{build_context, HealthContext};
use crate::insights::{cards, ForecastMetrics, InsightCard, SummaryMetrics};
use crate::journal::JournalContent;
use crate::llm::ChatMessage;
use crate::resources::ServerResources;

/// Body of `POST /api/insight`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightRequest {
    /// Question
    #[serde(default)]
    pub prompt: String,
    /// Route mode override: `primary`, `secondary`, or `auto`
    #[serde(default)]
    pub mode: Option<String>,
    /// Prefix the prompt with the user's health context
    #[serde(default)]
    pub include_context: bool,
}

/// Body of `POST /api/insight/chat`
#[derive(Debug, Deserialize)]
pub struct ChatInsightRequest {
    /// New question
    #[serde(default)]
    pub prompt: String,
    /// Prior turns, oldest first
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

/// Body of `POST /api/insight/journal`
#[derive(Debug, Deserialize)]
pub struct JournalInsightRequest {
    /// Entry to analyse
    #[serde(default)]
    pub entry: Option<JournalContent>,
}

/// Body of `POST /api/insight/correlation`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationRequest {
    /// First metric
    #[serde(default)]
    pub x_label: String,
    /// Second metric, the one the recommendation targets
    #[serde(default)]
    pub y_label: String,
    /// Optional free-text context
    #[serde(default)]
    pub description: Option<String>,
}

/// `{text}` response
#[derive(Debug, Serialize, Deserialize)]
pub struct TextResponse {
    /// Provider text or fallback message
    pub text: String,
}

/// `{insight}` response
#[derive(Debug, Serialize, Deserialize)]
pub struct InsightResponse {
    /// Provider text or fallback message
    pub insight: String,
}

/// `{cards}` response
#[derive(Debug, Serialize)]
pub struct CardListResponse {
    /// Catalog in display order
    pub cards: &'static [InsightCard],
}

/// `{key, title, text}` response
#[derive(Debug, Serialize, Deserialize)]
pub struct CardInsightResponse {
    /// Card key
    pub key: String,
    /// Card title
    pub title: String,
    /// Provider text or fallback message
    pub text: String,
}

/// `{context, rendered}` response
#[derive(Debug, Serialize)]
pub struct HealthContextResponse {
    /// Structured metrics
    pub context: HealthContext,
    /// Prompt-prefix rendering
    pub rendered: String,
}

/// Insight routes
pub struct InsightRoutes;

impl InsightRoutes {
    /// Create all insight routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/insight", post(Self::handle_insight))
            .route("/api/insight/chat", post(Self::handle_chat))
            .route("/api/insight/journal", post(Self::handle_journal))
            .route("/api/insight/correlation", post(Self::handle_correlation))
            .route("/api/insight/forecast", post(Self::handle_forecast))
            .route("/api/insight/summary", post(Self::handle_summary))
            .route("/api/insight/cards", get(Self::handle_list_cards))
            .route("/api/insight/cards/:key", post(Self::handle_card))
            .route("/api/health-context", get(Self::handle_health_context))
            .with_state(resources)
    }

    async fn handle_insight(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<InsightRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let request = json_body(payload)?;
        let mode = parse_mode(request.mode.as_deref())?;

        let text = resources
            .insights
            .ask(&request.prompt, mode, request.include_context)
            .await?;

        Ok((StatusCode::OK, Json(TextResponse { text })).into_response())
    }

    async fn handle_chat(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<ChatInsightRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let request = json_body(payload)?;
        let text = resources
            .insights
            .chat(&request.prompt, &request.history)
            .await?;

        Ok((StatusCode::OK, Json(TextResponse { text })).into_response())
    }

    async fn handle_journal(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<JournalInsightRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let entry = json_body(payload)?
            .entry
            .ok_or_else(|| AppError::missing_field("entry"))?;
        let insight = resources.insights.journal_insight(&entry).await?;

        Ok((StatusCode::OK, Json(InsightResponse { insight })).into_response())
    }

    async fn handle_correlation(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<CorrelationRequest>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let request = json_body(payload)?;
        let result = resources
            .insights
            .correlation(
                &request.x_label,
                &request.y_label,
                request.description.as_deref(),
            )
            .await?;

        Ok((StatusCode::OK, Json(result)).into_response())
    }

    async fn handle_forecast(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<ForecastMetrics>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let metrics = json_body(payload)?;
        let insight = resources.insights.forecast(&metrics).await?;

        Ok((StatusCode::OK, Json(InsightResponse { insight })).into_response())
    }

    async fn handle_summary(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<SummaryMetrics>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let metrics = json_body(payload)?;
        let insight = resources.insights.summary(&metrics).await?;

        Ok((StatusCode::OK, Json(InsightResponse { insight })).into_response())
    }

    async fn handle_list_cards() -> Json<CardListResponse> {
        Json(CardListResponse {
            cards: cards::catalog(),
        })
    }

    async fn handle_card(
        State(resources): State<Arc<ServerResources>>,
        Path(key): Path<String>,
    ) -> Result<Response, AppError> {
        let card = cards::find(&key)
            .ok_or_else(|| AppError::not_found(format!("Insight card {key}")))?;
        let text = resources.insights.card_insight(card).await?;

        Ok((
            StatusCode::OK,
            Json(CardInsightResponse {
                key: card.key.to_owned(),
                title: card.title.to_owned(),
                text,
            }),
        )
            .into_response())
    }

    async fn handle_health_context(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let context = resources.insights.health_context().await?;
        let rendered = build_context(&context);

        Ok((StatusCode::OK, Json(HealthContextResponse { context, rendered })).into_response())
    }
}

fn parse_mode(mode: Option<&str>) -> AppResult<Option<RouteMode>> {
    mode.map(str::trim)
        .filter(|m| !m.is_empty())
        .map(|m| m.parse::<RouteMode>().map_err(AppError::invalid_input))
        .transpose()
}
