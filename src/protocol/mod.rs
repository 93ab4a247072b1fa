// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Message bus abstraction.
//!
//! The bridge publishes state and discovery documents and subscribes to
//! command topics through the [`MessageBus`] trait. Inbound traffic arrives
//! as a stream of [`BusEvent`]s.
//!
//! # Implementations
//!
//! - [`MqttBus`]: rumqttc-backed MQTT client (feature `mqtt`)

#[cfg(feature = "mqtt")]
mod mqtt_bus;

#[cfg(feature = "mqtt")]
pub use mqtt_bus::{MqttBus, MqttBusBuilder, MqttBusConfig};

use crate::error::ProtocolError;

/// Receiving end of a bus client's event stream.
pub type BusEvents = tokio::sync::mpsc::Receiver<BusEvent>;

/// Something that happened on the bus connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusEvent {
    /// The connection was (re-)established.
    ///
    /// Subscriptions and retained discovery documents must be renewed,
    /// since the broker may not have kept them.
    Connected,
    /// A message arrived on a subscribed topic.
    Message {
        /// Full topic the message was published to.
        topic: String,
        /// Message body as text.
        payload: String,
    },
}

/// Publishing side of a topic-based message bus.
///
/// Both operations only queue the request. Delivery, retries and
/// reconnection are the implementation's business; an error means the
/// request could not even be queued.
pub trait MessageBus: Send + Sync {
    /// Publishes `payload` to `topic`, retained on the broker if `retain`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] if the request cannot be queued.
    fn publish(&self, topic: &str, payload: Vec<u8>, retain: bool) -> Result<(), ProtocolError>;

    /// Subscribes to `topic`.
    ///
    /// Subscribing twice to the same topic is harmless.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] if the request cannot be queued.
    fn subscribe(&self, topic: &str) -> Result<(), ProtocolError>;
}
