// ABOUTME: Bridges permission error channel subscriptions to Server-Sent Event streams
// ABOUTME: Each open stream owns one subscription filtered to the connected user
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

use std::convert::Infallible;

use axum::response::sse::Event;
use futures_util::stream::Stream;
use tokio::sync::mpsc;

use super::channel::{PermissionErrorChannel, PERMISSION_ERROR_EVENT};

/// Stream of `permission-error` events for one user
///
/// The subscription lives inside the stream, so it is revoked when the client
/// disconnects and axum drops the response body.
pub fn permission_error_stream(
    channel: &PermissionErrorChannel,
    user_id: String,
) -> impl Stream<Item = Result<Event, Infallible>> + Send + 'static {
    let (sender, mut receiver) = mpsc::unbounded_channel();
    let owner = user_id.clone();
    let subscription = channel.subscribe(move |event| {
        if event.auth_user_id.as_deref() == Some(owner.as_str()) {
            // Receiver gone means the stream is being torn down
            let _ = sender.send(event.clone());
        }
    });

    tracing::info!(user.id = %user_id, "Permission error stream opened");

    async_stream::stream! {
        let _subscription = subscription;
        let mut event_id: u64 = 0;

        event_id += 1;
        yield Ok(Event::default()
            .id(event_id.to_string())
            .event("connection")
            .data("connected"));

        while let Some(error) = receiver.recv().await {
            event_id += 1;
            match Event::default()
                .id(event_id.to_string())
                .event(PERMISSION_ERROR_EVENT)
                .json_data(&error)
            {
                Ok(event) => yield Ok(event),
                Err(e) => tracing::warn!(error = %e, "Failed to encode permission error event"),
            }
        }

        tracing::info!(user.id = %user_id, "Permission error stream closed");
    }
}
