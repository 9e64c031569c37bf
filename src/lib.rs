// ABOUTME: Main library entry point for the FlowState workout tracking server
// ABOUTME: Workout logging, progress aggregation, AI prompt flows and the HTTP API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

// deny(unsafe_code): zero-tolerance unsafe policy
#![deny(unsafe_code)]

//! # FlowState Server
//!
//! Backend for a workout tracker with AI-generated exercise suggestions.
//!
//! ## Features
//!
//! - **Workout logging**: validated submissions written to per-user collections in the
//!   background, with rejections surfaced on a permission error channel
//! - **Live queries**: collection snapshots re-emitted on every change
//! - **Progress**: dashboard summary, weekly volume and per-exercise progression
//! - **Prompt flows**: exercise suggestions and workout plans from Gemini with
//!   schema-checked input and output
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use flowstate::config::ServerConfig;
//! use flowstate_core::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("FlowState configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Bearer token validation
pub mod auth;

/// Environment-based configuration
pub mod config;

/// SQLite-backed workout collections and live queries
pub mod database;

/// Structured prompt flows over hosted text generation
pub mod flows;

/// Text generation provider abstraction and prompt templates
pub mod llm;

/// Production logging and structured output
pub mod logging;

/// HTTP middleware for CORS and request tracing
pub mod middleware;

/// Permission error channel and its event stream
pub mod notifications;

/// Shared server resources
pub mod resources;

/// HTTP routes by domain
pub mod routes;

/// Router assembly and serving
pub mod server;

/// Domain service layer for workouts, progress and suggestions
pub mod services;

pub use flowstate_core::{constants, errors, models, schemas, validation};
