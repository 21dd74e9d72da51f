// ABOUTME: Provider selection and single-hop fallback for insight generation
// ABOUTME: Always resolves to provider text or the configured apology, never to an error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors

//! # LLM Router
//!
//! Modes:
//!
//! - `primary`: one call to the primary provider
//! - `secondary`: one call to the secondary provider
//! - `auto`: primary first, then exactly one call to the secondary when the
//!   primary failed
//!
//! An attempt fails when the provider returns a [`ProviderError`], exceeds the
//! per-attempt timeout, or answers with text matching the configured failure
//! pattern. When no attempt succeeds the router returns the configured
//! fallback message. A shutdown signal aborts the in-flight attempt and skips
//! the fallback hop.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::{ChatMessage, ChatRequest, LlmProvider, MessageRole};
use crate::config::{RouteMode, RouterConfig};
use crate::errors::ProviderError;
use crate::lifecycle::ShutdownSignal;

/// Result of routing one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// A provider produced usable text
    Answered {
        /// Provider text
        text: String,
        /// Provider that answered
        provider: &'static str,
    },
    /// Every attempt failed; `text` is the configured fallback message
    Fallback {
        /// Fallback message
        text: String,
    },
}

impl RouteOutcome {
    /// Text to show the caller
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Answered { text, .. } | Self::Fallback { text } => text,
        }
    }

    /// Consume the outcome, keeping only the text
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Answered { text, .. } | Self::Fallback { text } => text,
        }
    }

    /// Whether this is the fallback message
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// Provider that answered, if any
    #[must_use]
    pub const fn provider(&self) -> Option<&'static str> {
        match self {
            Self::Answered { provider, .. } => Some(provider),
            Self::Fallback { .. } => None,
        }
    }
}

/// Why one attempt was not accepted
#[derive(Debug)]
enum AttemptFailure {
    Provider(ProviderError),
    FailurePhrase,
}

/// Provider selection with one fallback hop
pub struct LlmRouter {
    primary: Arc<dyn LlmProvider>,
    secondary: Arc<dyn LlmProvider>,
    config: RouterConfig,
    shutdown: ShutdownSignal,
}

impl LlmRouter {
    /// Create a router that is never cancelled
    #[must_use]
    pub fn new(
        primary: Arc<dyn LlmProvider>,
        secondary: Arc<dyn LlmProvider>,
        config: RouterConfig,
    ) -> Self {
        Self {
            primary,
            secondary,
            config,
            shutdown: ShutdownSignal::never(),
        }
    }

    /// Abort in-flight attempts when `signal` fires
    #[must_use]
    pub fn with_shutdown(mut self, signal: ShutdownSignal) -> Self {
        self.shutdown = signal;
        self
    }

    /// Configured default mode
    #[must_use]
    pub const fn mode(&self) -> RouteMode {
        self.config.mode
    }

    /// Names of the primary and secondary providers
    #[must_use]
    pub fn provider_names(&self) -> (&'static str, &'static str) {
        (self.primary.name(), self.secondary.name())
    }

    /// Route with the configured mode
    pub async fn complete(&self, request: &ChatRequest) -> RouteOutcome {
        self.complete_with_mode(request, self.config.mode).await
    }

    /// Route with the configured mode and keep only the text
    pub async fn generate(&self, request: &ChatRequest) -> String {
        self.complete(request).await.into_text()
    }

    /// Route with an explicit mode
    pub async fn complete_with_mode(&self, request: &ChatRequest, mode: RouteMode) -> RouteOutcome {
        let started = Instant::now();
        let (first, second): (&dyn LlmProvider, Option<&dyn LlmProvider>) = match mode {
            RouteMode::Primary => (self.primary.as_ref(), None),
            RouteMode::Secondary => (self.secondary.as_ref(), None),
            RouteMode::Auto => (self.primary.as_ref(), Some(self.secondary.as_ref())),
        };

        let failure = match self.attempt(first, request).await {
            Ok(outcome) => return outcome,
            Err(failure) => failure,
        };
        Self::log_failure(first.name(), &failure);

        let cancelled = matches!(&failure, AttemptFailure::Provider(e) if e.is_cancelled());
        if let (Some(second), false) = (second, cancelled) {
            info!(
                from = first.name(),
                to = second.name(),
                "Falling back to secondary provider"
            );
            match self.attempt(second, request).await {
                Ok(outcome) => return outcome,
                Err(failure) => Self::log_failure(second.name(), &failure),
            }
        }

        warn!(
            mode = %mode,
            elapsed_ms = started.elapsed().as_millis(),
            "All provider attempts failed; returning fallback message"
        );
        RouteOutcome::Fallback {
            text: self.config.fallback_message.clone(),
        }
    }

    /// One bounded, cancellable call
    async fn attempt(
        &self,
        provider: &dyn LlmProvider,
        request: &ChatRequest,
    ) -> Result<RouteOutcome, AttemptFailure> {
        let name = provider.name();
        if self.shutdown.is_triggered() {
            return Err(AttemptFailure::Provider(ProviderError::Cancelled {
                provider: name,
            }));
        }

        let request = Self::adapt_request(provider, request);
        let timeout = self.config.request_timeout;
        let shutdown = self.shutdown.clone();

        let result = tokio::select! {
            biased;
            () = shutdown.triggered() => Err(ProviderError::Cancelled { provider: name }),
            result = tokio::time::timeout(timeout, provider.complete(&request)) => {
                result.unwrap_or(Err(ProviderError::Timeout {
                    provider: name,
                    timeout_secs: timeout.as_secs(),
                }))
            }
        };

        let response = result.map_err(AttemptFailure::Provider)?;
        if self
            .config
            .failure_pattern
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(&response.content))
        {
            return Err(AttemptFailure::FailurePhrase);
        }

        debug!(provider = name, model = %response.model, "Provider answered");
        Ok(RouteOutcome::Answered {
            text: response.content,
            provider: name,
        })
    }

    /// Reshape a request into something the provider can accept
    ///
    /// JSON mode is dropped, history is flattened into one user turn, and
    /// system instructions are folded into the first user turn, each only when
    /// the provider lacks the matching capability.
    fn adapt_request<'a>(
        provider: &dyn LlmProvider,
        request: &'a ChatRequest,
    ) -> Cow<'a, ChatRequest> {
        let capabilities = provider.capabilities();
        let drop_json = request.json_mode && !capabilities.supports_json_mode();
        let flatten_history = !capabilities.supports_multi_turn()
            && request
                .messages
                .iter()
                .filter(|message| message.role != MessageRole::System)
                .count()
                > 1;
        let fold_system = !capabilities.supports_system_messages()
            && request
                .messages
                .iter()
                .any(|message| message.role == MessageRole::System);

        if !(drop_json || flatten_history || fold_system) {
            return Cow::Borrowed(request);
        }

        let mut adapted = request.clone();
        if drop_json {
            adapted.json_mode = false;
        }
        if flatten_history {
            adapted.messages = flatten_turns(&adapted.messages);
        }
        if fold_system {
            adapted.messages = fold_system_messages(&adapted.messages);
        }
        Cow::Owned(adapted)
    }

    fn log_failure(provider: &'static str, failure: &AttemptFailure) {
        match failure {
            AttemptFailure::Provider(error) => {
                warn!(provider, error = %error, "Provider attempt failed");
            }
            AttemptFailure::FailurePhrase => {
                warn!(provider, "Provider reply matched the failure pattern");
            }
        }
    }
}
/// Collapse user/assistant turns into one labelled user transcript
fn flatten_turns(messages: &[ChatMessage]) -> Vec<ChatMessage> {
    let (system, turns): (Vec<&ChatMessage>, Vec<&ChatMessage>) = messages
        .iter()
        .partition(|message| message.role == MessageRole::System);

    let transcript = turns
        .iter()
        .map(|message| {
            let label = match message.role {
                MessageRole::Assistant => "Assistant",
                MessageRole::User | MessageRole::System => "User",
            };
            format!("{label}: {}", message.content)
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    system
        .into_iter()
        .cloned()
        .chain(std::iter::once(ChatMessage::user(transcript)))
        .collect()
}

/// Prefix the first user turn with the system instructions
fn fold_system_messages(messages: &[ChatMessage]) -> Vec<ChatMessage> {
    let instructions = messages
        .iter()
        .filter(|message| message.role == MessageRole::System)
        .map(|message| message.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    let mut folded: Vec<ChatMessage> = messages
        .iter()
        .filter(|message| message.role != MessageRole::System)
        .cloned()
        .collect();

    match folded
        .iter_mut()
        .find(|message| message.role == MessageRole::User)
    {
        Some(first_user) => {
            first_user.content = format!("{instructions}\n\n{}", first_user.content);
        }
        None => folded.insert(0, ChatMessage::user(instructions)),
    }
    folded
}
