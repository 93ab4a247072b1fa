// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broadcast channel carrying TV events.

use tokio::sync::broadcast;

use super::TvEvent;

/// Default channel capacity for the event bus.
const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Broadcasts TV events to every subscriber.
///
/// Each subscriber receives events in emission order. A subscriber that
/// falls more than the channel capacity behind loses the oldest events and
/// sees a `RecvError::Lagged` on its next receive.
#[derive(Debug, Clone)]
pub struct TvEventBus {
    sender: broadcast::Sender<TvEvent>,
}

impl TvEventBus {
    /// Creates a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a new event bus buffering up to `capacity` events.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TvEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event and returns how many subscribers received it.
    ///
    /// Without subscribers the event is discarded and 0 is returned.
    pub fn publish(&self, event: TvEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for TvEventBus {
    fn default() -> Self {
        Self::new()
    }
}
