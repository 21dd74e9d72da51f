// ABOUTME: Route module organization for the insights HTTP API
// ABOUTME: Groups handlers by domain and shares the JSON body extraction helper
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors

//! HTTP routes organised by domain
//!
//! Each domain module holds route definitions and thin handlers that delegate
//! to the service layer in [`crate::insights`] and [`crate::journal`].

/// Liveness and readiness routes
pub mod health;
/// Insight generation routes
pub mod insights;
/// Journal CRUD routes
pub mod journal;

pub use health::HealthRoutes;
pub use insights::InsightRoutes;
pub use journal::JournalRoutes;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;

use crate::errors::{AppError, AppResult};

/// Unwrap a JSON body, turning extractor rejections into the unified error body
///
/// A body cut off by the size limit maps to 413; every other rejection is a 400.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::payload_too_large()
        } else {
            AppError::invalid_input(rejection.body_text())
        }
    })
}
