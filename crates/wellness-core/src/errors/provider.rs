// ABOUTME: Typed failures for a single call to a generative-AI provider
// ABOUTME: Lets the LLM router branch on structured outcomes instead of sniffing response text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors

use thiserror::Error;

/// Maximum number of body bytes kept on a `Status` error
const MAX_BODY_PREVIEW: usize = 512;

/// Failure of one outbound provider call
///
/// Transport failures, non-2xx statuses, and 2xx responses without usable text
/// are distinct variants. An empty candidate is never a success.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The request never produced an HTTP response (DNS, connect, TLS, reset)
    #[error("{provider} transport failure: {message}")]
    Transport {
        /// Provider identifier
        provider: &'static str,
        /// Transport error description (never contains credentials)
        message: String,
    },

    /// The provider answered with a non-2xx status
    #[error("{provider} returned HTTP {status}")]
    Status {
        /// Provider identifier
        provider: &'static str,
        /// HTTP status code
        status: u16,
        /// Truncated response body
        body: String,
    },

    /// 2xx response without candidate text
    #[error("{provider} returned no candidate text")]
    EmptyResponse {
        /// Provider identifier
        provider: &'static str,
    },

    /// 2xx response whose body could not be decoded
    #[error("{provider} response could not be decoded: {message}")]
    InvalidResponse {
        /// Provider identifier
        provider: &'static str,
        /// Decoder error description
        message: String,
    },

    /// The attempt exceeded its time budget
    #[error("{provider} did not respond within {timeout_secs}s")]
    Timeout {
        /// Provider identifier
        provider: &'static str,
        /// Budget that was exceeded
        timeout_secs: u64,
    },

    /// The attempt was aborted because the server is shutting down
    #[error("{provider} call cancelled")]
    Cancelled {
        /// Provider identifier
        provider: &'static str,
    },
}

impl ProviderError {
    /// Build a `Status` error, truncating the body to a short preview
    #[must_use]
    pub fn status(provider: &'static str, status: u16, body: &str) -> Self {
        let body = if body.len() > MAX_BODY_PREVIEW {
            let mut end = MAX_BODY_PREVIEW;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &body[..end])
        } else {
            body.to_owned()
        };
        Self::Status {
            provider,
            status,
            body,
        }
    }

    /// Provider that produced this error
    #[must_use]
    pub const fn provider(&self) -> &'static str {
        match self {
            Self::Transport { provider, .. }
            | Self::Status { provider, .. }
            | Self::EmptyResponse { provider }
            | Self::InvalidResponse { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::Cancelled { provider } => provider,
        }
    }

    /// Whether the call was aborted by shutdown; no fallback is attempted
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_body_is_truncated() {
        let body = "x".repeat(2000);
        let ProviderError::Status { body, .. } = ProviderError::status("gemini", 500, &body) else {
            panic!("expected status variant");
        };
        assert_eq!(body.len(), MAX_BODY_PREVIEW + 3);
        assert!(body.ends_with("..."));
    }

    #[test]
    fn test_status_body_respects_char_boundaries() {
        let body = "é".repeat(400);
        let error = ProviderError::status("together", 502, &body);
        assert!(matches!(error, ProviderError::Status { status: 502, .. }));
    }

    #[test]
    fn test_display_never_includes_body() {
        let error = ProviderError::status("gemini", 403, "API key invalid: secret-value");
        assert_eq!(error.to_string(), "gemini returned HTTP 403");
        assert_eq!(error.provider(), "gemini");
    }
}
