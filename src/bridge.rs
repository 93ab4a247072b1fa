// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The bridge between one TV and the message bus.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use lgtv2mqtt::Bridge;
//! use lgtv2mqtt::config::BridgeConfig;
//! use lgtv2mqtt::device::TvHandle;
//! use lgtv2mqtt::protocol::MqttBus;
//!
//! # async fn example() -> lgtv2mqtt::Result<()> {
//! let config = BridgeConfig::load("/etc/lgtv-config.json")?;
//! let (bus, bus_events) = MqttBus::builder().broker(&config.broker()).build().await?;
//! let (tv, _link) = TvHandle::new();
//!
//! let bridge = Bridge::new(&config, Arc::new(bus), Arc::new(tv))?;
//! bridge.run(bus_events).await;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};

use crate::config::BridgeConfig;
use crate::device::TvControl;
use crate::discovery::{Announcement, DescriptorBuilder, DeviceIdentity, tv_entities};
use crate::error::ParseError;
use crate::event::TvEvent;
use crate::protocol::{BusEvent, BusEvents, MessageBus};
use crate::router::{CommandRouter, Dispatch, EventRouter};
use crate::topic::TopicScheme;

/// Connects a TV to the bus.
///
/// Created with the TV's event subscription already in place, so events
/// emitted between construction and [`run`](Self::run) are not lost.
pub struct Bridge<B, D> {
    bus: Arc<B>,
    announcements: Vec<Announcement>,
    subscriptions: Vec<String>,
    events: EventRouter<B>,
    commands: CommandRouter<D>,
    tv_events: broadcast::Receiver<TvEvent>,
}

impl<B: MessageBus, D: TvControl> Bridge<B, D> {
    /// Creates a bridge for the TV described by `config`.
    ///
    /// # Errors
    ///
    /// Returns error if a discovery document cannot be serialized.
    pub fn new(config: &BridgeConfig, bus: Arc<B>, tv: Arc<D>) -> crate::Result<Self> {
        Ok(Self::from_parts(config.topics(), config.device_identity(), bus, tv)?)
    }

    /// Creates a bridge from an explicit topic layout and device block.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if a discovery document cannot be serialized.
    pub fn from_parts(
        topics: TopicScheme,
        device: DeviceIdentity,
        bus: Arc<B>,
        tv: Arc<D>,
    ) -> Result<Self, ParseError> {
        let announcements =
            DescriptorBuilder::new(topics.clone(), device).announcements(&tv_entities())?;
        let tv_events = tv.subscribe();
        let events = EventRouter::new(topics.clone(), Arc::clone(&bus));
        let commands = CommandRouter::new(topics, tv);
        let subscriptions = commands.subscriptions();

        Ok(Self {
            bus,
            announcements,
            subscriptions,
            events,
            commands,
            tv_events,
        })
    }

    /// Publishes every discovery document and subscribes every command
    /// topic.
    ///
    /// Failures are logged per item and do not stop the rest.
    pub fn announce(&self) {
        let mut failures = 0_usize;

        for announcement in &self.announcements {
            if let Err(e) = self
                .bus
                .publish(&announcement.topic, announcement.payload.clone(), true)
            {
                tracing::warn!(topic = %announcement.topic, error = %e, "Failed to publish discovery document");
                failures += 1;
            }
        }

        for topic in &self.subscriptions {
            if let Err(e) = self.bus.subscribe(topic) {
                tracing::warn!(topic = %topic, error = %e, "Failed to subscribe command topic");
                failures += 1;
            }
        }

        tracing::info!(
            descriptors = self.announcements.len(),
            subscriptions = self.subscriptions.len(),
            failures,
            "Announced TV"
        );
    }

    /// Handles one bus event.
    pub fn handle_bus_event(&self, event: BusEvent) -> Option<Dispatch> {
        match event {
            BusEvent::Connected => {
                tracing::info!("Connected to bus");
                self.announce();
                None
            }
            BusEvent::Message { topic, payload } => Some(self.commands.route(&topic, &payload)),
        }
    }

    /// Handles one TV event.
    pub fn handle_tv_event(&self, event: &TvEvent) -> bool {
        self.events.route(event)
    }

    /// Runs the bridge until the bus event stream ends.
    ///
    /// TV events take priority over bus events when both are pending.
    pub async fn run(mut self, mut bus_events: BusEvents) {
        tracing::info!("Bridge started");
        let mut tv_open = true;

        loop {
            tokio::select! {
                biased;

                event = self.tv_events.recv(), if tv_open => match event {
                    Ok(event) => {
                        self.events.route(&event);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "TV events dropped, bridge is lagging");
                    }
                    Err(RecvError::Closed) => {
                        tracing::info!("TV event stream closed");
                        tv_open = false;
                    }
                },
                event = bus_events.recv() => match event {
                    Some(event) => {
                        self.handle_bus_event(event);
                    }
                    None => break,
                },
            }
        }

        tracing::info!("Bus event stream closed, bridge stopped");
    }
}

impl<B, D> std::fmt::Debug for Bridge<B, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("announcements", &self.announcements.len())
            .field("subscriptions", &self.subscriptions)
            .finish_non_exhaustive()
    }
}
