// ABOUTME: Integration tests for the permission error channel and its SSE bridge
// ABOUTME: Checks delivery order, exact payloads, revocation and per-user filtering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use flowstate::models::{PermissionError, WriteOperation};
use flowstate::notifications::sse::permission_error_stream;
use flowstate::notifications::PermissionErrorChannel;
use futures_util::StreamExt;
use serde_json::json;

fn sample_error(user: &str) -> PermissionError {
    PermissionError::new(format!("users/{user}/workouts"), WriteOperation::Create)
        .with_resource_data(json!({ "name": "Leg Day" }))
        .with_auth_user(user)
}

#[test]
fn test_subscribers_receive_exact_payload_in_registration_order() {
    let channel = PermissionErrorChannel::new();
    let log: Arc<Mutex<Vec<(usize, PermissionError)>>> = Arc::new(Mutex::new(Vec::new()));

    let subscriptions: Vec<_> = (0..3)
        .map(|index| {
            let log = Arc::clone(&log);
            channel.subscribe(move |event| log.lock().unwrap().push((index, event.clone())))
        })
        .collect();

    let event = sample_error("u1");
    assert_eq!(channel.publish(&event), 3);

    let received = log.lock().unwrap().clone();
    let order: Vec<usize> = received.iter().map(|(i, _)| *i).collect();
    assert_eq!(order, vec![0, 1, 2]);
    assert!(received.iter().all(|(_, e)| *e == event));
    drop(subscriptions);
}

#[test]
fn test_revoked_subscriptions_are_not_invoked() {
    let channel = PermissionErrorChannel::new();
    let calls = Arc::new(Mutex::new(Vec::new()));

    let first = {
        let calls = Arc::clone(&calls);
        channel.subscribe(move |_| calls.lock().unwrap().push("first"))
    };
    let second = {
        let calls = Arc::clone(&calls);
        channel.subscribe(move |_| calls.lock().unwrap().push("second"))
    };

    first.unsubscribe();
    assert_eq!(channel.publish(&sample_error("u1")), 1);

    drop(second);
    assert_eq!(channel.publish(&sample_error("u1")), 0);
    assert_eq!(*calls.lock().unwrap(), vec!["second"]);
    assert_eq!(channel.subscriber_count(), 0);
}

#[test]
fn test_listener_may_publish_count_without_deadlock() {
    let channel = PermissionErrorChannel::new();
    let observed = Arc::new(Mutex::new(0));

    let inner = channel.clone();
    let seen = Arc::clone(&observed);
    let _subscription = channel.subscribe(move |_| {
        *seen.lock().unwrap() = inner.subscriber_count();
    });

    channel.publish(&sample_error("u1"));
    assert_eq!(*observed.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_sse_stream_only_forwards_errors_for_its_user() {
    let channel = PermissionErrorChannel::new();
    let mut stream = Box::pin(permission_error_stream(&channel, "u1".to_owned()));

    // Connection event comes first and confirms the subscription is live
    let connected = stream.next().await;
    assert!(connected.is_some());
    assert_eq!(channel.subscriber_count(), 1);

    channel.publish(&sample_error("someone-else"));
    channel.publish(&sample_error("u1"));

    let forwarded = tokio::time::timeout(Duration::from_secs(1), stream.next()).await;
    assert!(matches!(forwarded, Ok(Some(Ok(_)))));

    let nothing_more = tokio::time::timeout(Duration::from_millis(100), stream.next()).await;
    assert!(nothing_more.is_err());

    drop(stream);
    assert_eq!(channel.subscriber_count(), 0);
}
