// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Environment variable names, defaults, and user-facing messages for the insights service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors

//! Constants grouped by domain.

/// Environment variable names recognised at startup
pub mod env_vars {
    /// Gemini API key (required)
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    /// Gemini model identifier
    pub const GEMINI_MODEL: &str = "GEMINI_MODEL";
    /// Gemini API base URL
    pub const GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";
    /// Gemini sampling temperature
    pub const GEMINI_TEMPERATURE: &str = "GEMINI_TEMPERATURE";
    /// Gemini nucleus sampling
    pub const GEMINI_TOP_P: &str = "GEMINI_TOP_P";
    /// Gemini output token limit
    pub const GEMINI_MAX_OUTPUT_TOKENS: &str = "GEMINI_MAX_OUTPUT_TOKENS";

    /// Together AI API key (required)
    pub const TOGETHER_API_KEY: &str = "TOGETHER_API_KEY";
    /// Together AI model identifier
    pub const TOGETHER_MODEL: &str = "TOGETHER_MODEL";
    /// Together AI base URL (any OpenAI-compatible endpoint works)
    pub const TOGETHER_BASE_URL: &str = "TOGETHER_BASE_URL";
    /// Together AI sampling temperature
    pub const TOGETHER_TEMPERATURE: &str = "TOGETHER_TEMPERATURE";
    /// Together AI nucleus sampling
    pub const TOGETHER_TOP_P: &str = "TOGETHER_TOP_P";
    /// Together AI output token limit
    pub const TOGETHER_MAX_TOKENS: &str = "TOGETHER_MAX_TOKENS";

    /// Router mode: primary, secondary, or auto
    pub const LLM_ROUTE_MODE: &str = "LLM_ROUTE_MODE";
    /// Regex that marks a successful-looking primary reply as a failure
    pub const LLM_FAILURE_PATTERN: &str = "LLM_FAILURE_PATTERN";
    /// Text returned when every provider fails
    pub const LLM_FALLBACK_MESSAGE: &str = "LLM_FALLBACK_MESSAGE";
    /// Per-attempt timeout in seconds
    pub const LLM_REQUEST_TIMEOUT_SECS: &str = "LLM_REQUEST_TIMEOUT_SECS";

    /// Bind address
    pub const HTTP_HOST: &str = "HTTP_HOST";
    /// Bind port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Comma separated CORS origins, or `*`
    pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
    /// Request body limit in bytes
    pub const MAX_REQUEST_BODY_BYTES: &str = "MAX_REQUEST_BODY_BYTES";
    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
}

/// Default values applied when an optional variable is unset
pub mod defaults {
    /// Gemini model used by the dashboard
    pub const GEMINI_MODEL: &str = "gemini-2.0-flash";
    /// Gemini Generative Language API base
    pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
    /// Gemini sampling temperature
    pub const GEMINI_TEMPERATURE: f32 = 0.8;
    /// Gemini nucleus sampling
    pub const GEMINI_TOP_P: f32 = 0.95;
    /// Gemini output token limit
    pub const GEMINI_MAX_OUTPUT_TOKENS: u32 = 2048;

    /// Together AI model used for fallback
    pub const TOGETHER_MODEL: &str = "mistralai/Mixtral-8x7B-Instruct-v0.1";
    /// Together AI OpenAI-compatible base
    pub const TOGETHER_BASE_URL: &str = "https://api.together.xyz/v1";
    /// Together AI sampling temperature
    pub const TOGETHER_TEMPERATURE: f32 = 0.7;
    /// Together AI nucleus sampling
    pub const TOGETHER_TOP_P: f32 = 0.95;
    /// Together AI output token limit
    pub const TOGETHER_MAX_TOKENS: u32 = 1024;

    /// Failure phrase a provider uses when it renders its own apology
    pub const FAILURE_PATTERN: &str = "(?i)sorry, i had trouble processing";
    /// Per-attempt timeout
    pub const REQUEST_TIMEOUT_SECS: u64 = 10;

    /// Bind address
    pub const HTTP_HOST: &str = "0.0.0.0";
    /// Bind port
    pub const HTTP_PORT: u16 = 8081;
    /// Request body limit
    pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;
}

/// User-facing messages
pub mod messages {
    /// Returned in place of an insight when every provider attempt failed
    pub const FALLBACK_MESSAGE: &str = "Sorry, I had trouble processing that.";
    /// Correlation insight placeholder when the provider omitted it
    pub const NO_INSIGHT: &str = "No insight returned.";
    /// Correlation recommendation placeholder when the provider omitted it
    pub const NO_RECOMMENDATION: &str = "No recommendation returned.";
}

/// Request limits
pub mod limits {
    /// Maximum prompt length in characters
    pub const MAX_PROMPT_CHARS: usize = 4000;
    /// Maximum number of history turns accepted by the chat endpoint
    pub const MAX_HISTORY_MESSAGES: usize = 50;
}

/// Service identity used in logs
pub mod service_names {
    /// Service name
    pub const WELLNESS_INSIGHTS: &str = "wellness-insights";
}
