// ABOUTME: HTTP middleware for cross-origin access and request tracing
// ABOUTME: CORS policy from configuration plus request ids and per-request spans
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

pub mod cors;
pub mod tracing;

// CORS configuration
pub use cors::setup_cors;

// Request tracing
pub use self::tracing::{make_request_span, REQUEST_ID_HEADER};
