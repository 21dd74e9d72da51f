// ABOUTME: Tests for the health context renderer and mock source
// ABOUTME: Pins the exact line layout used as the prompt prefix
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors

#![allow(clippy::unwrap_used, clippy::expect_used)]

use wellness_insights::errors::AppResult;
use wellness_insights::health_context::{
    build_context, HealthContext, HealthContextSource, Hydration, MockHealthContextSource,
};

const SAMPLE_RENDERED: &str = "Name: Sarah Johnson
Sleep Score: 89%
Sleep Duration: 7h 15m
HRV: 45 ms
Resting Heart Rate: 75 bpm
Hydration: 1.5L (Goal: 3L)
Vitamin D: 20 ng/mL
LDL Cholesterol: 145 mg/dL
HDL Cholesterol: 45 mg/dL
Step Streak: 5 days
Meditation: 5 consecutive days";

#[test]
fn test_sample_renders_exact_lines() {
    assert_eq!(build_context(&HealthContext::sample()), SAMPLE_RENDERED);
}

#[test]
fn test_one_line_per_metric_without_outer_whitespace() {
    let rendered = build_context(&HealthContext::sample());

    assert_eq!(rendered.lines().count(), 11);
    assert_eq!(rendered, rendered.trim());
}

#[test]
fn test_render_is_pure_and_idempotent() {
    let context = HealthContext::sample();
    let before = context.clone();

    let first = build_context(&context);
    let second = build_context(&context);

    assert_eq!(first, second);
    assert_eq!(context, before);
}

#[test]
fn test_render_reflects_field_values() {
    let context = HealthContext {
        name: "Alex Doe".to_owned(),
        sleep_score: 72,
        sleep_duration: "6h 40m".to_owned(),
        hrv: 61,
        resting_hr: 58,
        hydration: Hydration {
            current: 2.25,
            goal: 2.5,
        },
        vitamin_d: 34,
        ldl: 98,
        hdl: 62,
        step_streak: 12,
        meditation_days: 0,
    };

    let rendered = build_context(&context);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines[0], "Name: Alex Doe");
    assert_eq!(lines[5], "Hydration: 2.25L (Goal: 2.5L)");
    assert_eq!(lines[10], "Meditation: 0 consecutive days");
}

#[tokio::test]
async fn test_mock_source_returns_sample_for_any_user() -> AppResult<()> {
    let source = MockHealthContextSource::default();

    let first = source.load("mock-user-id").await?;
    let second = source.load("someone-else").await?;

    assert_eq!(first, HealthContext::sample());
    assert_eq!(first, second);
    Ok(())
}
