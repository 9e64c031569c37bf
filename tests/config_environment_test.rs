// ABOUTME: Integration tests for environment-driven configuration and logging setup
// ABOUTME: Serialized because they mutate process environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;

use flowstate::config::{Environment, ServerConfig};
use flowstate::errors::ErrorCode;
use flowstate::logging::{LogFormat, LoggingConfig};
use serial_test::serial;

const VARS: &[&str] = &[
    "FLOWSTATE_JWT_SECRET",
    "FLOWSTATE_JWT_ISSUER",
    "FLOWSTATE_JWT_AUDIENCE",
    "GEMINI_API_KEY",
    "GEMINI_MODEL",
    "HTTP_PORT",
    "DATABASE_URL",
    "RECENT_WORKOUTS_LIMIT",
    "CORS_ALLOWED_ORIGINS",
    "ENVIRONMENT",
    "LOG_FORMAT",
    "RUST_LOG",
];

fn clear() {
    for var in VARS {
        env::remove_var(var);
    }
}

fn set_required() {
    env::set_var("FLOWSTATE_JWT_SECRET", "0123456789abcdef0123456789abcdef");
    env::set_var("GEMINI_API_KEY", "key-from-env");
}

#[test]
#[serial]
fn test_defaults_from_environment() {
    clear();
    set_required();

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 8081);
    assert_eq!(config.database_url, "sqlite:./data/flowstate.db");
    assert_eq!(config.recent_workouts_limit, 3);
    assert_eq!(config.llm.model, "gemini-2.0-flash");
    assert_eq!(config.cors_allowed_origins, vec!["*"]);
    assert_eq!(config.environment, Environment::Development);
    clear();
}

#[test]
#[serial]
fn test_overrides_and_secret_free_summary() {
    clear();
    set_required();
    env::set_var("HTTP_PORT", "9090");
    env::set_var("RECENT_WORKOUTS_LIMIT", "5");
    env::set_var("CORS_ALLOWED_ORIGINS", "https://app.example.com, https://admin.example.com");
    env::set_var("ENVIRONMENT", "production");

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 9090);
    assert_eq!(config.recent_workouts_limit, 5);
    assert_eq!(config.cors_allowed_origins.len(), 2);
    assert!(config.environment.is_production());

    let summary = config.summary();
    assert!(summary.contains("9090"));
    assert!(!summary.contains("key-from-env"));
    assert!(!summary.contains("0123456789abcdef"));
    assert!(!format!("{config:?}").contains("key-from-env"));
    clear();
}

#[test]
#[serial]
fn test_missing_or_weak_secrets_are_config_errors() {
    clear();
    env::set_var("GEMINI_API_KEY", "key");
    let error = ServerConfig::from_env().unwrap_err();
    assert_eq!(error.code, ErrorCode::ConfigError);

    env::set_var("FLOWSTATE_JWT_SECRET", "short");
    assert!(ServerConfig::from_env().is_err());

    env::set_var("FLOWSTATE_JWT_SECRET", "0123456789abcdef0123456789abcdef");
    env::remove_var("GEMINI_API_KEY");
    assert!(ServerConfig::from_env().is_err());

    set_required();
    env::set_var("HTTP_PORT", "eighty");
    assert!(ServerConfig::from_env().is_err());
    clear();
}

#[test]
#[serial]
fn test_logging_config_from_environment() {
    clear();
    env::set_var("LOG_FORMAT", "json");
    env::set_var("RUST_LOG", "debug");

    let config = LoggingConfig::from_env();
    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.level, "debug");
    clear();
}
