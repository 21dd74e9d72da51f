// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Loads provider credentials, router policy, and HTTP settings once at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors

//! Environment-based configuration
//!
//! Everything is read once at process start. A missing provider API key is a
//! fatal [`ErrorCode::ConfigMissing`](crate::errors::ErrorCode) error: the
//! server refuses to start instead of failing on the first request.

use std::env;
use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

use regex::Regex;
use tracing::{debug, info};
use url::Url;
use wellness_core::constants::{defaults, env_vars, messages};
use zeroize::Zeroize;

use super::types::{Environment, LogLevel, RouteMode};
use crate::errors::{AppError, AppResult};

/// Provider API key that never appears in `Debug` output and is wiped on drop
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the raw key for an outbound request header
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for ApiKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for ApiKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Sampling parameters sent with every completion request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    /// Sampling temperature (0.0 - 2.0)
    pub temperature: f32,
    /// Nucleus sampling probability mass (0.0 - 1.0)
    pub top_p: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
}

/// Connection settings for one generative-AI provider
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API base URL, without a trailing slash
    pub base_url: Url,
    /// API key
    pub api_key: ApiKey,
    /// Model identifier
    pub model: String,
    /// Default sampling parameters
    pub generation: GenerationSettings,
}

/// Fallback policy for the LLM router
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Default provider selection
    pub mode: RouteMode,
    /// Compiled failure phrase; `None` disables the text check
    pub failure_pattern: Option<Regex>,
    /// Text returned when every attempt failed
    pub fallback_message: String,
    /// Time budget of a single provider attempt
    pub request_timeout: Duration,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            mode: RouteMode::Auto,
            failure_pattern: Regex::new(defaults::FAILURE_PATTERN).ok(),
            fallback_message: messages::FALLBACK_MESSAGE.to_owned(),
            request_timeout: Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS),
        }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Comma separated list of allowed origins, or `*`
    pub cors_allowed_origins: String,
    /// Request body limit in bytes
    pub max_request_body_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: defaults::HTTP_HOST.to_owned(),
            port: defaults::HTTP_PORT,
            cors_allowed_origins: "*".to_owned(),
            max_request_body_bytes: defaults::MAX_REQUEST_BODY_BYTES,
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Log level
    pub log_level: LogLevel,
    /// HTTP listener
    pub http: HttpConfig,
    /// Primary provider (Gemini)
    pub gemini: ProviderConfig,
    /// Secondary provider (OpenAI-compatible, Together AI by default)
    pub together: ProviderConfig,
    /// Fallback policy
    pub router: RouterConfig,
}

/// Load a `.env` file from the working directory into the process environment
///
/// Variables already set in the process take precedence. Loading twice is harmless.
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        debug!("No .env file loaded: {e}");
    }
}

impl ServerConfig {
    /// Load configuration from the process environment
    ///
    /// A `.env` file in the working directory is loaded first when present.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a required key is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        load_dotenv();

        let config = Self::from_lookup(|key| env::var(key).ok())?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a required key is missing or a value
    /// cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvSource(&lookup);

        let gemini = ProviderConfig {
            base_url: env.url(env_vars::GEMINI_BASE_URL, defaults::GEMINI_BASE_URL)?,
            api_key: ApiKey::new(env.required(env_vars::GEMINI_API_KEY)?),
            model: env.string_or(env_vars::GEMINI_MODEL, defaults::GEMINI_MODEL),
            generation: GenerationSettings {
                temperature: env.parse_or(
                    env_vars::GEMINI_TEMPERATURE,
                    defaults::GEMINI_TEMPERATURE,
                )?,
                top_p: env.parse_or(env_vars::GEMINI_TOP_P, defaults::GEMINI_TOP_P)?,
                max_tokens: env.parse_or(
                    env_vars::GEMINI_MAX_OUTPUT_TOKENS,
                    defaults::GEMINI_MAX_OUTPUT_TOKENS,
                )?,
            },
        };

        let together = ProviderConfig {
            base_url: env.url(env_vars::TOGETHER_BASE_URL, defaults::TOGETHER_BASE_URL)?,
            api_key: ApiKey::new(env.required(env_vars::TOGETHER_API_KEY)?),
            model: env.string_or(env_vars::TOGETHER_MODEL, defaults::TOGETHER_MODEL),
            generation: GenerationSettings {
                temperature: env.parse_or(
                    env_vars::TOGETHER_TEMPERATURE,
                    defaults::TOGETHER_TEMPERATURE,
                )?,
                top_p: env.parse_or(env_vars::TOGETHER_TOP_P, defaults::TOGETHER_TOP_P)?,
                max_tokens: env.parse_or(
                    env_vars::TOGETHER_MAX_TOKENS,
                    defaults::TOGETHER_MAX_TOKENS,
                )?,
            },
        };

        let failure_pattern = match lookup(env_vars::LLM_FAILURE_PATTERN) {
            Some(pattern) if pattern.trim().is_empty() => None,
            Some(pattern) => Some(compile_pattern(&pattern)?),
            None => Some(compile_pattern(defaults::FAILURE_PATTERN)?),
        };

        let router = RouterConfig {
            mode: env.parse_or(env_vars::LLM_ROUTE_MODE, RouteMode::Auto)?,
            failure_pattern,
            fallback_message: env.string_or(
                env_vars::LLM_FALLBACK_MESSAGE,
                messages::FALLBACK_MESSAGE,
            ),
            request_timeout: Duration::from_secs(env.parse_or(
                env_vars::LLM_REQUEST_TIMEOUT_SECS,
                defaults::REQUEST_TIMEOUT_SECS,
            )?),
        };

        let http = HttpConfig {
            host: env.string_or(env_vars::HTTP_HOST, defaults::HTTP_HOST),
            port: env.parse_or(env_vars::HTTP_PORT, defaults::HTTP_PORT)?,
            cors_allowed_origins: env.string_or(env_vars::CORS_ALLOWED_ORIGINS, "*"),
            max_request_body_bytes: env.parse_or(
                env_vars::MAX_REQUEST_BODY_BYTES,
                defaults::MAX_REQUEST_BODY_BYTES,
            )?,
        };

        let config = Self {
            environment: Environment::from_str_or_default(
                &env.string_or(env_vars::ENVIRONMENT, "development"),
            ),
            log_level: LogLevel::from_str_or_default(&env.string_or("RUST_LOG", "info")),
            http,
            gemini,
            together,
            router,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate value ranges that parsing alone cannot enforce
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the first invalid value.
    pub fn validate(&self) -> AppResult<()> {
        if self.router.request_timeout.is_zero() {
            return Err(AppError::config_invalid(format!(
                "{} must be greater than zero",
                env_vars::LLM_REQUEST_TIMEOUT_SECS
            )));
        }

        if self.router.fallback_message.trim().is_empty() {
            return Err(AppError::config_invalid(format!(
                "{} must not be blank",
                env_vars::LLM_FALLBACK_MESSAGE
            )));
        }

        for (name, provider) in [("Gemini", &self.gemini), ("Together", &self.together)] {
            let generation = provider.generation;
            if !(0.0..=2.0).contains(&generation.temperature) {
                return Err(AppError::config_invalid(format!(
                    "{name} temperature must be between 0.0 and 2.0"
                )));
            }
            if !(0.0..=1.0).contains(&generation.top_p) {
                return Err(AppError::config_invalid(format!(
                    "{name} top-p must be between 0.0 and 1.0"
                )));
            }
            if generation.max_tokens == 0 {
                return Err(AppError::config_invalid(format!(
                    "{name} max tokens must be greater than zero"
                )));
            }
        }

        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Wellness Insights Configuration:\n\
             - Environment: {}\n\
             - HTTP: {}:{}\n\
             - Log Level: {}\n\
             - Primary: Gemini ({}) at {}\n\
             - Secondary: {} at {}\n\
             - Route Mode: {}\n\
             - Failure Pattern: {}\n\
             - Request Timeout: {}s",
            self.environment,
            self.http.host,
            self.http.port,
            self.log_level,
            self.gemini.model,
            self.gemini.base_url,
            self.together.model,
            self.together.base_url,
            self.router.mode,
            self.router
                .failure_pattern
                .as_ref()
                .map_or("disabled", Regex::as_str),
            self.router.request_timeout.as_secs(),
        )
    }
}

/// Typed accessors over a key lookup
struct EnvSource<'a, F>(&'a F);

impl<F> EnvSource<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    fn required(&self, key: &str) -> AppResult<String> {
        self.get(key).ok_or_else(|| {
            AppError::config_missing(format!("{key} environment variable not set"))
        })
    }

    fn string_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_owned())
    }

    fn parse_or<T>(&self, key: &str, default: T) -> AppResult<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.get(key).map_or(Ok(default), |raw| {
            raw.trim()
                .parse()
                .map_err(|e| AppError::config_invalid(format!("Invalid {key} value '{raw}': {e}")))
        })
    }

    fn url(&self, key: &str, default: &str) -> AppResult<Url> {
        let raw = self.string_or(key, default);
        let url = Url::parse(raw.trim_end_matches('/'))
            .map_err(|e| AppError::config_invalid(format!("Invalid {key} value '{raw}': {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::config_invalid(format!(
                "{key} must be an http(s) URL"
            )));
        }
        Ok(url)
    }
}

fn compile_pattern(pattern: &str) -> AppResult<Regex> {
    Regex::new(pattern).map_err(|e| {
        AppError::config_invalid(format!(
            "Invalid {} value: {e}",
            env_vars::LLM_FAILURE_PATTERN
        ))
    })
}
