// ABOUTME: Integration tests for the request ID middleware
// ABOUTME: Covers generation, propagation of caller IDs, and handler access via extensions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors

//! Integration tests for request ID middleware
//!
//! Tests the request ID middleware functionality including:
//! - UUID generation for each request
//! - Caller-supplied IDs echoed back unchanged
//! - Request ID availability in handlers via extensions

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    body::{to_bytes, Body},
    http::{Request as HttpRequest, StatusCode},
    middleware,
    routing::get,
    Extension, Router,
};
use std::error::Error;
use tower::ServiceExt;
use uuid::Uuid;
use wellness_insights::middleware::request_id::{
    request_id_middleware, RequestId, REQUEST_ID_HEADER,
};

async fn test_handler(Extension(request_id): Extension<RequestId>) -> String {
    format!("Request ID: {}", request_id.as_str())
}

fn app() -> Router {
    Router::new()
        .route("/", get(test_handler))
        .layer(middleware::from_fn(request_id_middleware))
}

#[tokio::test]
async fn test_request_id_middleware_generates_id() -> Result<(), Box<dyn Error>> {
    let request = HttpRequest::builder().uri("/").body(Body::empty())?;

    let response = app().oneshot(request).await?;

    let header_value = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .expect("Request ID header not present");
    assert!(
        Uuid::parse_str(header_value.to_str()?).is_ok(),
        "Request ID is not a valid UUID"
    );

    Ok(())
}

#[tokio::test]
async fn test_request_id_available_in_handler() -> Result<(), Box<dyn Error>> {
    let request = HttpRequest::builder().uri("/").body(Body::empty())?;

    let response = app().oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await?;
    let body_str = String::from_utf8(body.to_vec())?;
    assert!(body_str.starts_with("Request ID: "));

    Ok(())
}

#[tokio::test]
async fn test_caller_request_id_is_propagated() -> Result<(), Box<dyn Error>> {
    let request = HttpRequest::builder()
        .uri("/")
        .header(REQUEST_ID_HEADER, "dashboard-42")
        .body(Body::empty())?;

    let response = app().oneshot(request).await?;

    assert_eq!(response.headers()[REQUEST_ID_HEADER], "dashboard-42");
    let body = to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(&body[..], b"Request ID: dashboard-42");

    Ok(())
}

#[tokio::test]
async fn test_unprintable_request_id_is_replaced() -> Result<(), Box<dyn Error>> {
    let oversized = "x".repeat(200);
    let request = HttpRequest::builder()
        .uri("/")
        .header(REQUEST_ID_HEADER, oversized.as_str())
        .body(Body::empty())?;

    let response = app().oneshot(request).await?;

    let echoed = response.headers()[REQUEST_ID_HEADER].to_str()?;
    assert_ne!(echoed, oversized);
    assert!(Uuid::parse_str(echoed).is_ok());

    Ok(())
}
