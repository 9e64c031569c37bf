// ABOUTME: Notification system for surfacing asynchronous store rejections
// ABOUTME: Application-scoped permission error channel plus its SSE bridge
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

/// Publish/subscribe channel for permission errors
pub mod channel;
/// Server-Sent Events bridge for channel subscribers
pub mod sse;

pub use channel::{PermissionErrorChannel, Subscription, PERMISSION_ERROR_EVENT};
