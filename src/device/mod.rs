// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The TV as seen by the bridge.
//!
//! The bridge never speaks the TV's wire protocol. It drives the TV through
//! the [`TvControl`] trait, which a transport implementation provides.
//! [`TvHandle`] is the in-process implementation shipped with this crate:
//! it queues typed [`TvCommand`]s for a transport driver and tracks the
//! power and foreground-app state needed to answer the precondition
//! queries.
//!
//! # Architecture
//!
//! ```text
//!   CommandRouter ──TvControl──▶ TvHandle ──TvCommand──▶ TvLink ──▶ transport
//!   EventRouter ◀──TvEvent───── TvEventBus ◀──emit()──── TvLink ◀── transport
//! ```

mod handle;

pub use handle::{LIVE_TV_APP_ID, TvCommand, TvHandle, TvLink};

use tokio::sync::broadcast;

use crate::event::TvEvent;

/// Imperative control surface of a TV.
///
/// Commands are fire-and-forget: implementations must not block and report
/// delivery problems themselves, since the bus offers no way to answer a
/// command.
pub trait TvControl: Send + Sync {
    /// Switches the TV on.
    fn power_on(&self);

    /// Switches the TV off.
    fn power_off(&self);

    /// Returns whether the TV is currently powered on.
    fn is_powered_on(&self) -> bool;

    /// Returns whether the live TV application is in the foreground.
    fn is_live_tv_active(&self) -> bool;

    /// Raises the volume by one step.
    fn volume_up(&self);

    /// Lowers the volume by one step.
    fn volume_down(&self);

    /// Sets the absolute volume level.
    fn set_volume_level(&self, level: u8);

    /// Mutes or unmutes the audio.
    fn set_mute(&self, muted: bool);

    /// Switches the panel on.
    fn screen_on(&self);

    /// Switches the panel off while audio keeps playing.
    fn screen_off(&self);

    /// Launches an application by id.
    fn launch_application(&self, app_id: &str);

    /// Tunes a live TV channel by number and tuner id.
    fn open_channel(&self, number: u32, channel_id: &str);

    /// Subscribes to the TV's events.
    fn subscribe(&self) -> broadcast::Receiver<TvEvent>;
}
