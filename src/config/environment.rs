// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses environment variables into a typed, validated ServerConfig
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

//! Environment-based configuration

use std::env;
use std::fmt;
use std::str::FromStr;

use flowstate_core::constants::progress_defaults;
use flowstate_core::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Minimum length of the token signing secret in bytes
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 8081;

/// Default database location
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/flowstate.db";

/// Default Gemini model
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Default Gemini API base URL
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Test runs
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Bearer token verification settings
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing secret shared with the identity provider
    pub jwt_secret: String,
    /// Expected `iss` claim
    pub issuer: Option<String>,
    /// Expected `aud` claim
    pub audience: Option<String>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

/// Hosted text-generation settings
#[derive(Clone)]
pub struct LlmConfig {
    /// Gemini API key
    pub api_key: String,
    /// Model used by the prompt flows
    pub model: String,
    /// API base URL
    pub base_url: String,
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// sqlx database URL
    pub database_url: String,
    /// Token verification
    pub auth: AuthConfig,
    /// Text generation
    pub llm: LlmConfig,
    /// Workouts shown in "recent" views
    pub recent_workouts_limit: usize,
    /// Allowed CORS origins (`*` for any)
    pub cors_allowed_origins: Vec<String>,
    /// Deployment environment
    pub environment: Environment,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a required variable is missing or a value
    /// does not parse
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a required variable is missing or a value
    /// does not parse
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let jwt_secret = var("FLOWSTATE_JWT_SECRET")
            .ok_or_else(|| AppError::config("FLOWSTATE_JWT_SECRET must be set"))?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(AppError::config(format!(
                "FLOWSTATE_JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} bytes"
            )));
        }

        let api_key = var("GEMINI_API_KEY")
            .ok_or_else(|| AppError::config("GEMINI_API_KEY must be set"))?;

        let config = Self {
            http_port: parse_or("HTTP_PORT", var("HTTP_PORT"), DEFAULT_HTTP_PORT)?,
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned()),
            auth: AuthConfig {
                jwt_secret,
                issuer: var("FLOWSTATE_JWT_ISSUER"),
                audience: var("FLOWSTATE_JWT_AUDIENCE"),
            },
            llm: LlmConfig {
                api_key,
                model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_owned()),
                base_url: var("GEMINI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_owned()),
            },
            recent_workouts_limit: parse_or(
                "RECENT_WORKOUTS_LIMIT",
                var("RECENT_WORKOUTS_LIMIT"),
                progress_defaults::RECENT_WORKOUTS,
            )?,
            cors_allowed_origins: parse_origins(
                &var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|| "*".to_owned()),
            ),
            environment: Environment::from_str_or_default(
                &var("ENVIRONMENT").unwrap_or_default(),
            ),
        };

        if config.recent_workouts_limit == 0 {
            return Err(AppError::config("RECENT_WORKOUTS_LIMIT must be at least 1"));
        }

        Ok(config)
    }

    /// Human-readable configuration summary without secrets
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "FlowState Server Configuration:\n\
             - HTTP Port: {}\n\
             - Environment: {}\n\
             - Database: {}\n\
             - LLM Model: {}\n\
             - Token Issuer: {}\n\
             - Recent Workouts: {}\n\
             - CORS Origins: {}",
            self.http_port,
            self.environment,
            self.database_url,
            self.llm.model,
            self.auth.issuer.as_deref().unwrap_or("any"),
            self.recent_workouts_limit,
            self.cors_allowed_origins.join(", "),
        )
    }
}

fn parse_or<T: FromStr>(key: &str, value: Option<String>, default: T) -> AppResult<T> {
    value.map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|_| AppError::config(format!("{key} has an invalid value: {raw}")))
    })
}

/// Parse comma-separated CORS origins
fn parse_origins(origins: &str) -> Vec<String> {
    if origins.trim() == "*" {
        vec!["*".to_owned()]
    } else {
        origins
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_defaults_apply() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("FLOWSTATE_JWT_SECRET", SECRET),
            ("GEMINI_API_KEY", "key"),
        ]));
        let Ok(config) = config else {
            unreachable!("config should load");
        };

        assert_eq!(config.http_port, DEFAULT_HTTP_PORT);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.recent_workouts_limit, 3);
        assert_eq!(config.cors_allowed_origins, vec!["*".to_owned()]);
        assert_eq!(config.environment, Environment::Development);
        assert!(!config.summary().contains(SECRET));
    }

    #[test]
    fn test_short_secret_is_rejected() {
        let result = ServerConfig::from_lookup(lookup(&[
            ("FLOWSTATE_JWT_SECRET", "short"),
            ("GEMINI_API_KEY", "key"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_api_key_is_rejected() {
        let result = ServerConfig::from_lookup(lookup(&[("FLOWSTATE_JWT_SECRET", SECRET)]));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = ServerConfig::from_lookup(lookup(&[
            ("FLOWSTATE_JWT_SECRET", SECRET),
            ("GEMINI_API_KEY", "key"),
            ("HTTP_PORT", "eighty"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("http://a.test, http://b.test,"),
            vec!["http://a.test".to_owned(), "http://b.test".to_owned()]
        );
    }
}
