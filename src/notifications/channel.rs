// ABOUTME: Application-scoped publish/subscribe channel for permission errors
// ABOUTME: Listeners are invoked synchronously in registration order and can be revoked
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FlowState Contributors

//! # Permission Error Channel
//!
//! Store writes complete in the background, so a rejection cannot be returned to the
//! caller that issued the write. Instead the write path publishes a
//! [`PermissionError`] here and every interested component (the log subscriber, one
//! subscriber per open event stream) receives it.
//!
//! The subscriber list is locked only to copy or modify it; listeners run outside the
//! lock, so a listener may subscribe or unsubscribe while being invoked.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use flowstate_core::models::PermissionError;

/// Event name used on the wire
pub const PERMISSION_ERROR_EVENT: &str = "permission-error";

type Listener = Arc<dyn Fn(&PermissionError) + Send + Sync>;

#[derive(Default)]
struct ChannelInner {
    next_id: AtomicU64,
    listeners: RwLock<Vec<(u64, Listener)>>,
}

impl ChannelInner {
    fn remove(&self, id: u64) {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        listeners.retain(|(listener_id, _)| *listener_id != id);
    }
}

/// Publish/subscribe channel with a single event kind
#[derive(Clone, Default)]
pub struct PermissionErrorChannel {
    inner: Arc<ChannelInner>,
}

impl PermissionErrorChannel {
    /// Create a channel with no subscribers
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; it stays registered until the returned handle is revoked
    /// or dropped
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&PermissionError) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));

        Subscription {
            id,
            channel: Arc::downgrade(&self.inner),
            active: true,
        }
    }

    /// Deliver an event to every current listener, returning how many were reached
    pub fn publish(&self, event: &PermissionError) -> usize {
        let snapshot: Vec<Listener> = self
            .inner
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in &snapshot {
            listener(event);
        }

        snapshot.len()
    }

    /// Number of registered listeners
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl fmt::Debug for PermissionErrorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermissionErrorChannel")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Revocable registration handle
///
/// Dropping the handle removes the listener. Use [`Subscription::detach`] for
/// listeners that should live as long as the channel.
#[must_use = "dropping a Subscription removes its listener"]
pub struct Subscription {
    id: u64,
    channel: Weak<ChannelInner>,
    active: bool,
}

impl Subscription {
    /// Listener id, unique per channel
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Remove the listener now
    pub fn unsubscribe(mut self) {
        self.revoke();
    }

    /// Keep the listener registered for the lifetime of the channel
    pub fn detach(mut self) {
        self.active = false;
    }

    fn revoke(&mut self) {
        if std::mem::take(&mut self.active) {
            if let Some(channel) = self.channel.upgrade() {
                channel.remove(self.id);
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.revoke();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.active)
            .finish()
    }
}
