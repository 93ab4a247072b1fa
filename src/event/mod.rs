// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Events emitted by the TV.
//!
//! The device transport pushes [`TvEvent`]s into a [`TvEventBus`]; the bridge
//! holds a receiver and routes every event to its retained state topic.
//!
//! # Examples
//!
//! ```
//! use lgtv2mqtt::event::{TvEvent, TvEventBus};
//! use serde_json::json;
//!
//! let bus = TvEventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(TvEvent::ForegroundAppChanged(json!({"appId": "netflix"})));
//! assert!(rx.try_recv().is_ok());
//! ```

mod event_bus;
mod tv_event;

pub use event_bus::TvEventBus;
pub use tv_event::TvEvent;
