// ABOUTME: Integration tests for the LLM router fallback policy
// ABOUTME: Uses scripted providers to cover auto/primary/secondary modes, timeouts, and shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{auto_router, router_config, Script, ScriptedProvider, TEST_FALLBACK};
use wellness_insights::config::RouteMode;
use wellness_insights::errors::ProviderError;
use wellness_insights::lifecycle::ShutdownController;
use wellness_insights::llm::{
    ChatMessage, ChatRequest, LlmCapabilities, LlmProvider, LlmRouter, MessageRole, RouteOutcome,
};

fn question() -> ChatRequest {
    ChatRequest::new(vec![
        ChatMessage::system("You are a wellness AI."),
        ChatMessage::user("Why is my HRV low?"),
    ])
}

fn router_with_mode(
    primary: &Arc<ScriptedProvider>,
    secondary: &Arc<ScriptedProvider>,
    mode: RouteMode,
) -> LlmRouter {
    LlmRouter::new(
        Arc::clone(primary) as Arc<dyn LlmProvider>,
        Arc::clone(secondary) as Arc<dyn LlmProvider>,
        router_config(mode),
    )
}

// ============================================================================
// Auto mode
// ============================================================================

#[tokio::test]
async fn test_auto_uses_primary_when_it_answers() {
    let primary = ScriptedProvider::always("gemini", Script::reply("Sleep more."));
    let secondary = ScriptedProvider::always("together", Script::reply("unused"));

    let outcome = auto_router(&primary, &secondary).complete(&question()).await;

    assert_eq!(
        outcome,
        RouteOutcome::Answered {
            text: "Sleep more.".to_owned(),
            provider: "gemini",
        }
    );
    assert_eq!(primary.calls(), 1);
    assert_eq!(secondary.calls(), 0);
}

#[tokio::test]
async fn test_auto_falls_back_on_empty_candidate() {
    let primary = ScriptedProvider::always("gemini", Script::empty("gemini"));
    let secondary = ScriptedProvider::always(
        "together",
        Script::reply("Your HRV may be affected by stress."),
    );

    let outcome = auto_router(&primary, &secondary).complete(&question()).await;

    assert_eq!(outcome.text(), "Your HRV may be affected by stress.");
    assert_eq!(outcome.provider(), Some("together"));
    assert_eq!(secondary.last_request().messages, question().messages);
}

#[tokio::test]
async fn test_auto_falls_back_on_status_error() {
    let primary = ScriptedProvider::always("gemini", Script::status("gemini", 503));
    let secondary = ScriptedProvider::always("together", Script::reply("Drink water."));

    let text = auto_router(&primary, &secondary).generate(&question()).await;

    assert_eq!(text, "Drink water.");
}

#[tokio::test]
async fn test_auto_falls_back_on_failure_phrase() {
    let primary = ScriptedProvider::always(
        "gemini",
        Script::reply("Sorry, I had trouble processing your request."),
    );
    let secondary = ScriptedProvider::always("together", Script::reply("Walk after lunch."));

    let outcome = auto_router(&primary, &secondary).complete(&question()).await;

    assert_eq!(outcome.text(), "Walk after lunch.");
    assert_eq!(primary.calls(), 1);
    assert_eq!(secondary.calls(), 1);
}

#[tokio::test]
async fn test_auto_total_failure_returns_sentinel() {
    let primary = ScriptedProvider::always(
        "gemini",
        Script::Fail(ProviderError::Transport {
            provider: "gemini",
            message: "connection refused".to_owned(),
        }),
    );
    let secondary = ScriptedProvider::always("together", Script::status("together", 500));

    let outcome = auto_router(&primary, &secondary).complete(&question()).await;

    assert!(outcome.is_fallback());
    assert_eq!(outcome.text(), TEST_FALLBACK);
    assert_eq!(primary.calls(), 1);
    assert_eq!(secondary.calls(), 1);
}

#[tokio::test]
async fn test_secondary_failure_phrase_returns_sentinel() {
    let primary = ScriptedProvider::always("gemini", Script::empty("gemini"));
    let secondary = ScriptedProvider::always(
        "together",
        Script::reply("Sorry, I had trouble processing that."),
    );

    let outcome = auto_router(&primary, &secondary).complete(&question()).await;

    assert_eq!(
        outcome,
        RouteOutcome::Fallback {
            text: TEST_FALLBACK.to_owned()
        }
    );
}

#[tokio::test]
async fn test_disabled_failure_pattern_accepts_apology_text() {
    let primary = ScriptedProvider::always(
        "gemini",
        Script::reply("Sorry, I had trouble processing that."),
    );
    let secondary = ScriptedProvider::always("together", Script::reply("unused"));
    let mut config = router_config(RouteMode::Auto);
    config.failure_pattern = None;
    let router = LlmRouter::new(
        Arc::clone(&primary) as Arc<dyn LlmProvider>,
        Arc::clone(&secondary) as Arc<dyn LlmProvider>,
        config,
    );

    let outcome = router.complete(&question()).await;

    assert_eq!(outcome.provider(), Some("gemini"));
    assert_eq!(secondary.calls(), 0);
}

// ============================================================================
// Single-provider modes
// ============================================================================

#[tokio::test]
async fn test_primary_mode_never_calls_secondary() {
    let primary = ScriptedProvider::always("gemini", Script::status("gemini", 429));
    let secondary = ScriptedProvider::always("together", Script::reply("unused"));

    let outcome = router_with_mode(&primary, &secondary, RouteMode::Primary)
        .complete(&question())
        .await;

    assert_eq!(outcome.text(), TEST_FALLBACK);
    assert_eq!(secondary.calls(), 0);
}

#[tokio::test]
async fn test_secondary_mode_skips_primary() {
    let primary = ScriptedProvider::always("gemini", Script::reply("unused"));
    let secondary = ScriptedProvider::always("together", Script::reply("Stretch daily."));

    let outcome = router_with_mode(&primary, &secondary, RouteMode::Secondary)
        .complete(&question())
        .await;

    assert_eq!(outcome.text(), "Stretch daily.");
    assert_eq!(primary.calls(), 0);
}

#[tokio::test]
async fn test_explicit_mode_overrides_configured_mode() {
    let primary = ScriptedProvider::always("gemini", Script::reply("unused"));
    let secondary = ScriptedProvider::always("together", Script::reply("From secondary."));
    let router = auto_router(&primary, &secondary);

    let outcome = router
        .complete_with_mode(&question(), RouteMode::Secondary)
        .await;

    assert_eq!(router.mode(), RouteMode::Auto);
    assert_eq!(outcome.provider(), Some("together"));
    assert_eq!(primary.calls(), 0);
}

// ============================================================================
// Timeouts, shutdown, capabilities
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_slow_primary_times_out_and_falls_back() {
    let primary = ScriptedProvider::always(
        "gemini",
        Script::Delay(Duration::from_secs(30), "too late".to_owned()),
    );
    let secondary = ScriptedProvider::always("together", Script::reply("In time."));

    let outcome = auto_router(&primary, &secondary).complete(&question()).await;

    assert_eq!(outcome.text(), "In time.");
}

#[tokio::test]
async fn test_shutdown_skips_fallback() {
    let controller = ShutdownController::new();
    controller.trigger();
    let primary = ScriptedProvider::always("gemini", Script::reply("unused"));
    let secondary = ScriptedProvider::always("together", Script::reply("unused"));
    let router = auto_router(&primary, &secondary).with_shutdown(controller.signal());

    let outcome = router.complete(&question()).await;

    assert_eq!(outcome.text(), TEST_FALLBACK);
    assert_eq!(primary.calls(), 0);
    assert_eq!(secondary.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_aborts_in_flight_attempt() {
    let controller = ShutdownController::new();
    let primary = ScriptedProvider::always(
        "gemini",
        Script::Delay(Duration::from_secs(1), "unused".to_owned()),
    );
    let secondary = ScriptedProvider::always("together", Script::reply("unused"));
    let router = auto_router(&primary, &secondary).with_shutdown(controller.signal());

    let request = question();
    let (outcome, ()) = tokio::join!(router.complete(&request), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        controller.trigger();
    });

    assert!(outcome.is_fallback());
    assert_eq!(primary.calls(), 1);
    assert_eq!(secondary.calls(), 0);
}

#[tokio::test]
async fn test_json_mode_dropped_for_provider_without_support() {
    let primary = ScriptedProvider::always("gemini", Script::empty("gemini"));
    let secondary = ScriptedProvider::with_capabilities(
        "plain",
        LlmCapabilities::chat(),
        Script::reply("{}"),
    );
    let request = question().with_json_mode();

    let _ = auto_router(&primary, &secondary).complete(&request).await;

    assert!(primary.last_request().json_mode);
    assert!(!secondary.last_request().json_mode);
}

#[tokio::test]
async fn test_system_instruction_folded_for_provider_without_support() {
    let primary = ScriptedProvider::always("gemini", Script::empty("gemini"));
    let secondary = ScriptedProvider::with_capabilities(
        "plain",
        LlmCapabilities::MULTI_TURN,
        Script::reply("Folded."),
    );

    let outcome = auto_router(&primary, &secondary).complete(&question()).await;

    assert_eq!(outcome.text(), "Folded.");
    assert_eq!(primary.last_request().messages.len(), 2);
    let sent = secondary.last_request().messages;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].role, MessageRole::User);
    assert_eq!(sent[0].content, "You are a wellness AI.\n\nWhy is my HRV low?");
}

#[tokio::test]
async fn test_history_flattened_for_single_turn_provider() {
    let primary = ScriptedProvider::always("gemini", Script::status("gemini", 503));
    let secondary = ScriptedProvider::with_capabilities(
        "single",
        LlmCapabilities::SYSTEM_MESSAGES,
        Script::reply("Flattened."),
    );
    let request = ChatRequest::new(vec![
        ChatMessage::system("You are a wellness AI."),
        ChatMessage::user("I slept badly."),
        ChatMessage::assistant("Try a consistent bedtime."),
        ChatMessage::user("What else?"),
    ]);

    let _ = auto_router(&primary, &secondary).complete(&request).await;

    let sent = secondary.last_request().messages;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], ChatMessage::system("You are a wellness AI."));
    assert_eq!(
        sent[1].content,
        "User: I slept badly.\n\nAssistant: Try a consistent bedtime.\n\nUser: What else?"
    );
}

#[tokio::test]
async fn test_capable_provider_receives_request_unchanged() {
    let primary = ScriptedProvider::always("gemini", Script::reply("Same."));
    let secondary = ScriptedProvider::always("together", Script::reply("unused"));
    let request = question().with_json_mode();

    let _ = auto_router(&primary, &secondary).complete(&request).await;

    let sent = primary.last_request();
    assert_eq!(sent.messages, request.messages);
    assert!(sent.json_mode);
}

#[tokio::test]
async fn test_sequence_provider_recovers_on_next_request() {
    let primary = ScriptedProvider::sequence(
        "gemini",
        vec![Script::empty("gemini")],
        Script::reply("Recovered."),
    );
    let secondary = ScriptedProvider::always("together", Script::status("together", 500));
    let router = auto_router(&primary, &secondary);

    let first = router.complete(&question()).await;
    let second = router.complete(&question()).await;

    assert!(first.is_fallback());
    assert_eq!(second.text(), "Recovered.");
    assert_eq!(router.provider_names(), ("gemini", "together"));
}
