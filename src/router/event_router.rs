// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Publishes TV events to retained state topics.

use std::sync::Arc;

use serde_json::Value;

use crate::event::TvEvent;
use crate::protocol::MessageBus;
use crate::topic::TopicScheme;
use crate::types::StateLeaf;

/// Routes TV events to their state topics.
///
/// Stateless: each event is published on its own, at most once. Publish
/// failures are logged and dropped; redelivery is the bus client's job.
#[derive(Debug)]
pub struct EventRouter<B> {
    topics: TopicScheme,
    bus: Arc<B>,
}

impl<B: MessageBus> EventRouter<B> {
    /// Creates a router publishing through `bus`.
    #[must_use]
    pub fn new(topics: TopicScheme, bus: Arc<B>) -> Self {
        Self { topics, bus }
    }

    /// Publishes an event to its state topic.
    ///
    /// Returns `true` if a publish request was queued.
    pub fn route(&self, event: &TvEvent) -> bool {
        tracing::debug!(event = event.name(), payload = ?event.payload(), "Got TV event");

        let Some((leaf, body)) = project(event) else {
            if matches!(event, TvEvent::SetupFinished) {
                tracing::info!("TV setup finished");
            }
            return false;
        };

        let topic = self.topics.state_topic(leaf);
        let payload = match serde_json::to_vec(body) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(topic = %topic, error = %e, "Cannot encode TV event payload");
                return false;
            }
        };

        match self.bus.publish(&topic, payload, true) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(topic = %topic, error = %e, "Failed to publish TV state");
                false
            }
        }
    }
}

/// Selects the state leaf and the document published for an event.
fn project(event: &TvEvent) -> Option<(StateLeaf, &Value)> {
    let leaf = event.state_leaf()?;
    let payload = event.payload()?;

    let body = match event {
        TvEvent::AudioStatusChanged(_) => payload.get("volumeStatus").unwrap_or(payload),
        _ => payload,
    };
    Some((leaf, body))
}
