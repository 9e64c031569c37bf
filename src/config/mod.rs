// ABOUTME: Configuration module for centralized server settings
// ABOUTME: Re-exports the environment-driven ServerConfig and its sections
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

//! Configuration for the `FlowState` server
//!
//! All settings come from environment variables; see [`environment::ServerConfig::from_env`].

/// Environment and server configuration
pub mod environment;

pub use environment::{AuthConfig, Environment, LlmConfig, ServerConfig};
