// ABOUTME: Checks that logging settings written to a .env file reach the logging config
// ABOUTME: Runs in its own test binary because it changes the working directory and process env
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Wellness Insights Contributors

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::env;
use std::fs;

use wellness_insights::logging::{LogFormat, LoggingConfig};

#[test]
fn test_logging_config_reads_dotenv_before_server_config() {
    let dir = env::temp_dir().join(format!("wellness-dotenv-{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join(".env"),
        "LOG_FORMAT=json\nSERVICE_NAME=insights-from-dotenv\nRUST_LOG=debug\n",
    )
    .unwrap();

    for key in ["LOG_FORMAT", "SERVICE_NAME", "RUST_LOG", "ENVIRONMENT"] {
        env::remove_var(key);
    }
    env::set_current_dir(&dir).unwrap();

    let config = LoggingConfig::from_env();

    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.service_name, "insights-from-dotenv");
    assert_eq!(config.level, "debug");

    fs::remove_dir_all(&dir).unwrap();
}
