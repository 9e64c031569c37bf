// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides quiet logging, test configuration, in-memory resources and token minting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `flowstate`

use std::collections::HashMap;
use std::sync::{Arc, Once};

use flowstate::config::ServerConfig;
use flowstate::database::Database;
use flowstate::llm::LlmProvider;
use flowstate::resources::ServerResources;

use crate::helpers::stub_llm::StubLlmProvider;

static INIT_LOGGER: Once = Once::new();

/// Secret used to sign test tokens
pub const TEST_JWT_SECRET: &str = "flowstate-test-secret-0123456789abcdef";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Configuration with test secrets and an in-memory database
pub fn test_config() -> ServerConfig {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("FLOWSTATE_JWT_SECRET", TEST_JWT_SECRET),
        ("GEMINI_API_KEY", "test-gemini-key"),
        ("DATABASE_URL", "sqlite::memory:"),
        ("ENVIRONMENT", "testing"),
    ]);
    ServerConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_owned()))
        .expect("test configuration must load")
}

/// Connect a migrated in-memory database
pub async fn create_test_database() -> Database {
    init_test_logging();
    Database::new("sqlite::memory:")
        .await
        .expect("in-memory database must open")
}

/// Server resources over an in-memory database and the given provider
pub async fn create_test_resources(llm: Arc<dyn LlmProvider>) -> Arc<ServerResources> {
    let database = create_test_database().await;
    Arc::new(ServerResources::new(Arc::new(test_config()), database, llm))
}

/// Server resources whose provider replies with `reply`
pub async fn create_resources_replying(reply: &str) -> (Arc<ServerResources>, Arc<StubLlmProvider>) {
    let stub = Arc::new(StubLlmProvider::replying(reply));
    let resources = create_test_resources(stub.clone()).await;
    (resources, stub)
}

/// `Authorization` header value for `user_id`
pub fn bearer_for(resources: &ServerResources, user_id: &str) -> String {
    let token = resources
        .auth
        .generate_token(user_id, chrono::Duration::hours(1))
        .expect("token must be issued");
    format!("Bearer {token}")
}
