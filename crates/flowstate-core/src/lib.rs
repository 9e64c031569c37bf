// ABOUTME: Core types and constants for the FlowState workout tracking platform
// ABOUTME: Foundation crate with error handling, domain models, schemas and validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

#![deny(unsafe_code)]

//! # `FlowState` Core
//!
//! Foundation crate providing shared types for the `FlowState` server. It holds
//! everything that does not need a runtime: errors, domain models, declared record
//! shapes and the validator that checks candidate records against them.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Validation limits, equipment tags and other fixed values
//! - **models**: Workouts, exercises, suggestion records and permission errors
//! - **validation**: Declarative schema validator with normalization
//! - **schemas**: The declared shapes for forms and prompt flows

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (Workout, Exercise, suggestion records, `PermissionError`)
pub mod models;

/// Declarative record validation with field-level violations
pub mod validation;

/// Declared shapes for forms, flow inputs and flow outputs
pub mod schemas;
