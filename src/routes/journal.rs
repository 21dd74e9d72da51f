// ABOUTME: Journal route handlers for listing, creating, updating, and deleting entries
// ABOUTME: Also generates an insight for a stored entry by id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::insights::InsightResponse;
use super::json_body;
use crate::errors::AppError;
use crate::journal::{JournalContent, JournalEntry, NewJournalEntry};
use crate::resources::ServerResources;

/// `{entries}` response
#[derive(Debug, Serialize, Deserialize)]
pub struct JournalListResponse {
    /// Entries in insertion order
    pub entries: Vec<JournalEntry>,
}

/// Journal routes
pub struct JournalRoutes;

impl JournalRoutes {
    /// Create all journal routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/journal/entries",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/journal/entries/:id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route("/api/journal/entries/:id/insight", post(Self::handle_insight))
            .with_state(resources)
    }

    async fn handle_list(State(resources): State<Arc<ServerResources>>) -> Json<JournalListResponse> {
        Json(JournalListResponse {
            entries: resources.journal.list().await,
        })
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let entry = resources.journal.get(&id).await?;
        Ok((StatusCode::OK, Json(entry)).into_response())
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<NewJournalEntry>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let entry = resources.journal.add(json_body(payload)?).await?;
        Ok((StatusCode::CREATED, Json(entry)).into_response())
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        payload: Result<Json<JournalContent>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let entry = resources.journal.update(&id, json_body(payload)?).await?;
        Ok((StatusCode::OK, Json(entry)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<StatusCode, AppError> {
        resources.journal.remove(&id).await?;
        Ok(StatusCode::NO_CONTENT)
    }

    async fn handle_insight(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let entry = resources.journal.get(&id).await?;
        let insight = resources.insights.journal_insight(&entry.content).await?;
        Ok((StatusCode::OK, Json(InsightResponse { insight })).into_response())
    }
}
