// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `lgtv2mqtt` - Bridge an LG webOS TV to MQTT.
//!
//! The bridge mirrors the TV's state to retained MQTT topics, turns
//! messages on command topics into TV actions and announces the TV to
//! Home Assistant through MQTT discovery.
//!
//! # Topics
//!
//! With the default configuration and a TV named `tv`:
//!
//! - `lgtv2mqtt/tv/<state>` - Retained JSON state (`powerState`,
//!   `audioStatus`, `soundSettings`, `pictureSettings`, `foregroundApp`,
//!   `liveTvChannel`)
//! - `lgtv2mqtt/tv/cmnd/<command>` - Commands (`power`, `volume`, `mute`,
//!   `screen`, `application`, `liveTvChannel`)
//! - `homeassistant/<component>/tv/<object_id>/config` - Discovery documents
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use lgtv2mqtt::{Bridge, BridgeConfig, MqttBus, TvHandle};
//!
//! #[tokio::main]
//! async fn main() -> lgtv2mqtt::Result<()> {
//!     let config = BridgeConfig::load(lgtv2mqtt::config::DEFAULT_CONFIG_PATH)?;
//!     let (bus, bus_events) = MqttBus::builder().broker(&config.broker()).build().await?;
//!
//!     // The link is handed to the TV transport, which executes queued
//!     // commands and emits the TV's events.
//!     let (tv, _link) = TvHandle::new();
//!
//!     Bridge::new(&config, Arc::new(bus), Arc::new(tv))?
//!         .run(bus_events)
//!         .await;
//!     Ok(())
//! }
//! ```
//!
//! # Custom transports
//!
//! The routers only depend on the [`MessageBus`] and [`TvControl`] traits,
//! so either side can be replaced:
//!
//! ```
//! use std::sync::Arc;
//!
//! use lgtv2mqtt::protocol::MessageBus;
//! use lgtv2mqtt::router::EventRouter;
//! use lgtv2mqtt::topic::TopicScheme;
//! use lgtv2mqtt::{ProtocolError, TvEvent};
//!
//! struct Stdout;
//!
//! impl MessageBus for Stdout {
//!     fn publish(&self, topic: &str, payload: Vec<u8>, _retain: bool) -> Result<(), ProtocolError> {
//!         println!("{topic} {}", String::from_utf8_lossy(&payload));
//!         Ok(())
//!     }
//!
//!     fn subscribe(&self, _topic: &str) -> Result<(), ProtocolError> {
//!         Ok(())
//!     }
//! }
//!
//! let router = EventRouter::new(
//!     TopicScheme::new("lgtv2mqtt", "tv", "homeassistant"),
//!     Arc::new(Stdout),
//! );
//! assert!(router.route(&TvEvent::ForegroundAppChanged(
//!     serde_json::json!({"appId": "netflix"})
//! )));
//! ```

mod bridge;
pub mod config;
pub mod device;
pub mod discovery;
pub mod error;
pub mod event;
pub mod mapping;
pub mod protocol;
pub mod router;
pub mod topic;
pub mod types;

pub use bridge::Bridge;
pub use config::BridgeConfig;
pub use device::{TvCommand, TvControl, TvHandle, TvLink};
pub use error::{ConfigError, Error, ParseError, ProtocolError, Result};
pub use event::{TvEvent, TvEventBus};
#[cfg(feature = "mqtt")]
pub use protocol::{MqttBus, MqttBusBuilder};
pub use protocol::{BusEvent, BusEvents, MessageBus};
pub use router::{CommandRouter, Dispatch, EventRouter};
pub use types::{ChannelRef, CommandLeaf, StateLeaf, Switch};
