// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Home Assistant MQTT discovery documents.
//!
//! Every control and sensor the bridge exposes is described by an
//! [`EntityDefinition`]. The [`DescriptorBuilder`] turns each definition into
//! a [`DiscoveryDescriptor`] bound to one TV instance, which the bridge
//! publishes retained to
//! `<discovery_prefix>/<category>/<instance>/<object_id>/config`.
//!
//! Building is pure and deterministic: the same configuration always
//! produces byte-identical documents, so republishing on every reconnect
//! replaces the retained documents with themselves.
//!
//! # Examples
//!
//! ```
//! use lgtv2mqtt::discovery::{DescriptorBuilder, DeviceIdentity, tv_entities};
//! use lgtv2mqtt::topic::TopicScheme;
//!
//! let builder = DescriptorBuilder::new(
//!     TopicScheme::new("lgtv2mqtt", "tv", "homeassistant"),
//!     DeviceIdentity::new("tv", "a8:23:fe:00:00:01"),
//! );
//!
//! let announcements = builder.announcements(&tv_entities()).unwrap();
//! assert_eq!(announcements[0].topic, "homeassistant/sensor/tv/powerstate/config");
//! ```

mod descriptor;
mod entity;

pub use descriptor::{Announcement, DescriptorBuilder, DeviceIdentity, DiscoveryDescriptor};
pub use entity::{Availability, Control, EntityDefinition, EntityKind, tv_entities};
