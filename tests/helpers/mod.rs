// ABOUTME: Shared test helpers for integration tests
// ABOUTME: Exports the axum request helper and the stub text generation provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

pub mod axum_test;
pub mod stub_llm;
pub mod workouts;
