// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT implementation of the message bus.
//!
//! # Examples
//!
//! ```no_run
//! use lgtv2mqtt::protocol::{BusEvent, MessageBus, MqttBus};
//!
//! # async fn example() -> lgtv2mqtt::Result<()> {
//! let (bus, mut events) = MqttBus::builder()
//!     .host("192.168.1.50")
//!     .port(1883)
//!     .credentials("user", "password")
//!     .build()
//!     .await?;
//!
//! bus.subscribe("lgtv2mqtt/tv/cmnd/power")?;
//! while let Some(event) = events.recv().await {
//!     if let BusEvent::Message { topic, payload } = event {
//!         println!("{topic}: {payload}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use tokio::sync::{mpsc, oneshot};

use super::{BusEvent, BusEvents, MessageBus};
use crate::config::BrokerSettings;
use crate::error::ProtocolError;

/// Capacity of the client's outgoing request queue.
///
/// Must hold a full announcement (every discovery document plus every
/// command subscription) since those are queued back to back.
const REQUEST_QUEUE_CAPACITY: usize = 64;

/// Capacity of the inbound bus event channel.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Configuration for an MQTT bus connection.
#[derive(Debug, Clone)]
pub struct MqttBusConfig {
    host: String,
    port: u16,
    credentials: Option<(String, String)>,
    keep_alive: Duration,
    connection_timeout: Duration,
    reconnect_delay: Duration,
}

impl Default for MqttBusConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 1883,
            credentials: None,
            keep_alive: Duration::from_secs(30),
            connection_timeout: Duration::from_secs(10),
            reconnect_delay: Duration::from_secs(5),
        }
    }
}

impl MqttBusConfig {
    /// Returns the broker host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the broker port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns whether credentials are configured.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Returns the keep-alive interval.
    #[must_use]
    pub fn keep_alive(&self) -> Duration {
        self.keep_alive
    }

    /// Returns how long `build` waits for the first CONNACK.
    #[must_use]
    pub fn connection_timeout(&self) -> Duration {
        self.connection_timeout
    }

    /// Returns the pause between reconnection attempts.
    #[must_use]
    pub fn reconnect_delay(&self) -> Duration {
        self.reconnect_delay
    }
}

/// An MQTT connection used as the bridge's message bus.
///
/// Cheaply cloneable. The rumqttc event loop runs on its own task and
/// reconnects after connection errors; every successful (re)connect is
/// reported as [`BusEvent::Connected`].
#[derive(Clone)]
pub struct MqttBus {
    inner: Arc<MqttBusInner>,
}

struct MqttBusInner {
    client: AsyncClient,
    config: MqttBusConfig,
    connected: AtomicBool,
    shutting_down: AtomicBool,
}

impl MqttBus {
    /// Creates a new builder for configuring an MQTT bus connection.
    #[must_use]
    pub fn builder() -> MqttBusBuilder {
        MqttBusBuilder::default()
    }

    /// Returns whether the broker connection is currently up.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.connected.load(Ordering::Acquire)
    }

    /// Returns the connection settings the bus was built with.
    #[must_use]
    pub fn config(&self) -> &MqttBusConfig {
        &self.inner.config
    }

    /// Returns the host address of the broker.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.inner.config.host
    }

    /// Returns the port of the broker.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.inner.config.port
    }

    /// Disconnects from the broker and stops the event loop.
    ///
    /// # Errors
    ///
    /// Returns error if the disconnect request cannot be sent.
    pub async fn disconnect(&self) -> Result<(), ProtocolError> {
        tracing::info!(
            host = %self.inner.config.host,
            port = %self.inner.config.port,
            "Disconnecting from MQTT broker"
        );
        self.inner.shutting_down.store(true, Ordering::Release);
        self.inner.client.disconnect().await?;
        self.inner.connected.store(false, Ordering::Release);
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), ProtocolError> {
        if self.inner.shutting_down.load(Ordering::Acquire) {
            return Err(ProtocolError::ChannelClosed(
                "MQTT bus was disconnected".to_string(),
            ));
        }
        Ok(())
    }
}

impl MessageBus for MqttBus {
    fn publish(&self, topic: &str, payload: Vec<u8>, retain: bool) -> Result<(), ProtocolError> {
        self.ensure_open()?;
        self.inner
            .client
            .try_publish(topic, QoS::AtLeastOnce, retain, payload)?;
        Ok(())
    }

    fn subscribe(&self, topic: &str) -> Result<(), ProtocolError> {
        self.ensure_open()?;
        self.inner.client.try_subscribe(topic, QoS::AtLeastOnce)?;
        Ok(())
    }
}

impl std::fmt::Debug for MqttBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MqttBus")
            .field("host", &self.inner.config.host)
            .field("port", &self.inner.config.port)
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// Builder for an MQTT bus connection.
///
/// # Examples
///
/// ```no_run
/// use lgtv2mqtt::protocol::MqttBus;
/// use std::time::Duration;
///
/// # async fn example() -> lgtv2mqtt::Result<()> {
/// let (bus, events) = MqttBus::builder()
///     .host("192.168.1.50")
///     .keep_alive(Duration::from_secs(60))
///     .reconnect_delay(Duration::from_secs(2))
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MqttBusBuilder {
    config: MqttBusConfig,
}

impl MqttBusBuilder {
    /// Applies host, port and credentials from the bridge configuration.
    #[must_use]
    pub fn broker(mut self, settings: &BrokerSettings) -> Self {
        self.config.host.clone_from(&settings.host);
        self.config.port = settings.port;
        self.config.credentials.clone_from(&settings.credentials);
        self
    }

    /// Sets the broker host address.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Sets the broker port (default: 1883).
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Sets authentication credentials.
    #[must_use]
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.credentials = Some((username.into(), password.into()));
        self
    }

    /// Sets the keep-alive interval (default: 30 seconds).
    #[must_use]
    pub fn keep_alive(mut self, duration: Duration) -> Self {
        self.config.keep_alive = duration;
        self
    }

    /// Sets how long `build` waits for the first CONNACK (default: 10 seconds).
    #[must_use]
    pub fn connection_timeout(mut self, duration: Duration) -> Self {
        self.config.connection_timeout = duration;
        self
    }

    /// Sets the pause between reconnection attempts (default: 5 seconds).
    #[must_use]
    pub fn reconnect_delay(mut self, duration: Duration) -> Self {
        self.config.reconnect_delay = duration;
        self
    }

    /// Connects to the broker.
    ///
    /// Returns the bus and its event stream. The initial connection is
    /// reported on the stream as [`BusEvent::Connected`] like every later
    /// reconnection.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Host is not set
    /// - Connection fails
    /// - Connection times out
    pub async fn build(self) -> Result<(MqttBus, BusEvents), ProtocolError> {
        if self.config.host.is_empty() {
            return Err(ProtocolError::InvalidAddress(
                "MQTT broker host is required".to_string(),
            ));
        }

        let client_id = format!("lgtv2mqtt-{}", uuid::Uuid::new_v4().simple());

        let mut mqtt_options = MqttOptions::new(&client_id, &self.config.host, self.config.port);
        mqtt_options.set_keep_alive(self.config.keep_alive);
        mqtt_options.set_clean_session(true);

        if let Some((ref username, ref password)) = self.config.credentials {
            mqtt_options.set_credentials(username, password);
        }

        let (client, event_loop) = AsyncClient::new(mqtt_options, REQUEST_QUEUE_CAPACITY);

        let bus = MqttBus {
            inner: Arc::new(MqttBusInner {
                client,
                config: self.config.clone(),
                connected: AtomicBool::new(false),
                shutting_down: AtomicBool::new(false),
            }),
        };

        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (connack_tx, connack_rx) = oneshot::channel();

        tokio::spawn(handle_bus_events(
            event_loop,
            bus.clone(),
            events_tx,
            connack_tx,
        ));

        let timeout = self.config.connection_timeout;
        match tokio::time::timeout(timeout, connack_rx).await {
            Ok(Ok(())) => {
                tracing::info!(
                    host = %self.config.host,
                    port = %self.config.port,
                    client_id = %client_id,
                    "Connected to MQTT broker"
                );
            }
            Ok(Err(_)) => {
                return Err(ProtocolError::ConnectionFailed(
                    "MQTT event loop terminated unexpectedly".to_string(),
                ));
            }
            Err(_) => {
                bus.inner.shutting_down.store(true, Ordering::Release);
                return Err(ProtocolError::ConnectionFailed(format!(
                    "MQTT connection timeout after {}s",
                    timeout.as_secs()
                )));
            }
        }

        Ok((bus, events_rx))
    }
}

/// Drives the rumqttc event loop and forwards bus events.
///
/// Runs until the bus is disconnected or the event receiver is dropped.
async fn handle_bus_events(
    mut event_loop: EventLoop,
    bus: MqttBus,
    events_tx: mpsc::Sender<BusEvent>,
    connack_tx: oneshot::Sender<()>,
) {
    let mut connack_tx = Some(connack_tx);

    loop {
        if bus.inner.shutting_down.load(Ordering::Acquire) {
            break;
        }

        let event = match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(connack))) => {
                tracing::debug!(?connack, "MQTT broker connected");
                bus.inner.connected.store(true, Ordering::Release);
                if let Some(tx) = connack_tx.take() {
                    let _ = tx.send(());
                }
                BusEvent::Connected
            }
            Ok(Event::Incoming(Packet::SubAck(suback))) => {
                tracing::trace!(?suback, "MQTT subscription acknowledged");
                continue;
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let Ok(payload) = String::from_utf8(publish.payload.to_vec()) else {
                    tracing::warn!(topic = %publish.topic, "Dropping non UTF-8 MQTT payload");
                    continue;
                };
                tracing::trace!(topic = %publish.topic, payload = %payload, "MQTT message received");
                BusEvent::Message {
                    topic: publish.topic,
                    payload,
                }
            }
            Ok(Event::Incoming(Packet::Disconnect)) => {
                tracing::info!("MQTT broker disconnected");
                bus.inner.connected.store(false, Ordering::Release);
                continue;
            }
            Ok(_) => continue,
            Err(e) => {
                bus.inner.connected.store(false, Ordering::Release);
                if bus.inner.shutting_down.load(Ordering::Acquire) {
                    break;
                }
                tracing::error!(
                    error = %e,
                    retry_in = ?bus.inner.config.reconnect_delay,
                    "MQTT event loop error"
                );
                tokio::time::sleep(bus.inner.config.reconnect_delay).await;
                continue;
            }
        };

        if events_tx.send(event).await.is_err() {
            tracing::debug!("Bus event receiver dropped, stopping MQTT event loop");
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_default_values() {
        let builder = MqttBusBuilder::default();
        assert_eq!(builder.config.port, 1883);
        assert!(builder.config.host.is_empty());
        assert!(builder.config.credentials.is_none());
        assert_eq!(builder.config.keep_alive, Duration::from_secs(30));
        assert_eq!(builder.config.connection_timeout, Duration::from_secs(10));
        assert_eq!(builder.config.reconnect_delay, Duration::from_secs(5));
    }

    #[test]
    fn builder_chain() {
        let builder = MqttBusBuilder::default()
            .host("192.168.1.50")
            .port(8883)
            .credentials("admin", "secret")
            .keep_alive(Duration::from_secs(45))
            .connection_timeout(Duration::from_secs(15))
            .reconnect_delay(Duration::from_secs(1));

        assert_eq!(builder.config.host, "192.168.1.50");
        assert_eq!(builder.config.port, 8883);
        assert_eq!(
            builder.config.credentials,
            Some(("admin".to_string(), "secret".to_string()))
        );
        assert_eq!(builder.config.keep_alive, Duration::from_secs(45));
        assert_eq!(builder.config.connection_timeout, Duration::from_secs(15));
        assert_eq!(builder.config.reconnect_delay, Duration::from_secs(1));
    }

    #[test]
    fn config_accessors() {
        let config = MqttBusBuilder::default()
            .host("broker.local")
            .port(1884)
            .credentials("mqtt", "pw")
            .reconnect_delay(Duration::from_secs(2))
            .config;

        assert_eq!(config.host(), "broker.local");
        assert_eq!(config.port(), 1884);
        assert!(config.has_credentials());
        assert_eq!(config.keep_alive(), Duration::from_secs(30));
        assert_eq!(config.connection_timeout(), Duration::from_secs(10));
        assert_eq!(config.reconnect_delay(), Duration::from_secs(2));
        assert!(!MqttBusConfig::default().has_credentials());
    }

    #[test]
    fn builder_from_broker_settings() {
        let settings = BrokerSettings {
            host: "broker.local".to_string(),
            port: 1884,
            credentials: Some(("mqtt".to_string(), "pw".to_string())),
        };
        let builder = MqttBusBuilder::default().broker(&settings);

        assert_eq!(builder.config.host, "broker.local");
        assert_eq!(builder.config.port, 1884);
        assert_eq!(builder.config.credentials, settings.credentials);
    }

    #[tokio::test]
    async fn builder_missing_host_fails() {
        let result = MqttBusBuilder::default().build().await;
        assert!(matches!(result, Err(ProtocolError::InvalidAddress(_))));
    }
}
