// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-process TV handle backed by channels.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{broadcast, mpsc};

use super::TvControl;
use crate::event::{TvEvent, TvEventBus};
use crate::types::ChannelRef;

/// Application id of the TV's live TV app.
pub const LIVE_TV_APP_ID: &str = "com.webos.app.livetv";

/// Power states in which the TV accepts commands.
const POWERED_ON_STATES: &[&str] = &["Active", "Screen Off", "Screen Saver"];

/// A command queued for the transport driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", content = "args", rename_all = "camelCase")]
pub enum TvCommand {
    /// Switch the TV on.
    PowerOn,
    /// Switch the TV off.
    PowerOff,
    /// Raise the volume by one step.
    VolumeUp,
    /// Lower the volume by one step.
    VolumeDown,
    /// Set the absolute volume level.
    SetVolumeLevel(u8),
    /// Mute (`true`) or unmute.
    SetMute(bool),
    /// Switch the panel on.
    ScreenOn,
    /// Switch the panel off.
    ScreenOff,
    /// Launch an application by id.
    LaunchApplication(String),
    /// Tune a live TV channel.
    OpenChannel {
        /// Channel number.
        number: u32,
        /// Tuner channel id.
        id: String,
    },
}

/// State observed from the TV's events.
#[derive(Debug, Default)]
struct ObservedState {
    powered_on: AtomicBool,
    foreground_app: RwLock<Option<String>>,
}

impl ObservedState {
    fn observe(&self, event: &TvEvent) {
        match event {
            TvEvent::TurnedOn(_) => self.set_powered_on(true),
            TvEvent::TurnedOff(_) => {
                self.set_powered_on(false);
                *self.foreground_app.write() = None;
            }
            TvEvent::PixelRefresherStarted(payload)
            | TvEvent::ScreenStateChanged(payload)
            | TvEvent::ScreenSaverTurnedOn(payload)
            | TvEvent::PowerStateChanged(payload) => {
                if let Some(state) = payload.get("state").and_then(Value::as_str) {
                    self.set_powered_on(POWERED_ON_STATES.contains(&state));
                }
            }
            TvEvent::ForegroundAppChanged(payload) => {
                let app_id = payload
                    .get("appId")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                *self.foreground_app.write() = app_id;
            }
            _ => {}
        }
    }

    fn set_powered_on(&self, on: bool) {
        let was = self.powered_on.swap(on, Ordering::AcqRel);
        if was != on {
            tracing::debug!(powered_on = on, "TV power state changed");
        }
    }
}

/// Handle through which the bridge controls a TV.
///
/// Cheap to clone; all clones share the command queue, the event bus and
/// the observed state.
///
/// # Examples
///
/// ```
/// use lgtv2mqtt::device::{TvCommand, TvControl, TvHandle};
/// use lgtv2mqtt::event::TvEvent;
/// use serde_json::json;
///
/// let (tv, mut link) = TvHandle::new();
///
/// link.emit(TvEvent::TurnedOn(json!({"state": "Active"})));
/// assert!(tv.is_powered_on());
///
/// tv.volume_up();
/// assert_eq!(link.try_recv_command(), Some(TvCommand::VolumeUp));
/// ```
#[derive(Debug, Clone)]
pub struct TvHandle {
    commands: mpsc::UnboundedSender<TvCommand>,
    events: TvEventBus,
    state: Arc<ObservedState>,
}

/// Transport side of a [`TvHandle`].
///
/// The transport driver drains queued commands from it and feeds the TV's
/// events into it.
#[derive(Debug)]
pub struct TvLink {
    commands: mpsc::UnboundedReceiver<TvCommand>,
    events: TvEventBus,
    state: Arc<ObservedState>,
}

impl TvHandle {
    /// Creates a handle and its transport link.
    #[must_use]
    pub fn new() -> (Self, TvLink) {
        let (tx, rx) = mpsc::unbounded_channel();
        let events = TvEventBus::new();
        let state = Arc::new(ObservedState::default());

        let handle = Self {
            commands: tx,
            events: events.clone(),
            state: Arc::clone(&state),
        };
        let link = TvLink {
            commands: rx,
            events,
            state,
        };
        (handle, link)
    }

    fn send(&self, command: TvCommand) {
        tracing::debug!(?command, "Queueing TV command");
        if self.commands.send(command).is_err() {
            tracing::warn!("TV transport is gone, command dropped");
        }
    }
}

impl TvControl for TvHandle {
    fn power_on(&self) {
        self.send(TvCommand::PowerOn);
    }

    fn power_off(&self) {
        self.send(TvCommand::PowerOff);
    }

    fn is_powered_on(&self) -> bool {
        self.state.powered_on.load(Ordering::Acquire)
    }

    fn is_live_tv_active(&self) -> bool {
        self.state.foreground_app.read().as_deref() == Some(LIVE_TV_APP_ID)
    }

    fn volume_up(&self) {
        self.send(TvCommand::VolumeUp);
    }

    fn volume_down(&self) {
        self.send(TvCommand::VolumeDown);
    }

    fn set_volume_level(&self, level: u8) {
        self.send(TvCommand::SetVolumeLevel(level));
    }

    fn set_mute(&self, muted: bool) {
        self.send(TvCommand::SetMute(muted));
    }

    fn screen_on(&self) {
        self.send(TvCommand::ScreenOn);
    }

    fn screen_off(&self) {
        self.send(TvCommand::ScreenOff);
    }

    fn launch_application(&self, app_id: &str) {
        self.send(TvCommand::LaunchApplication(app_id.to_string()));
    }

    fn open_channel(&self, number: u32, channel_id: &str) {
        self.send(TvCommand::OpenChannel {
            number,
            id: channel_id.to_string(),
        });
    }

    fn subscribe(&self) -> broadcast::Receiver<TvEvent> {
        self.events.subscribe()
    }
}

impl TvLink {
    /// Records an event from the TV and broadcasts it to subscribers.
    ///
    /// State is updated before the broadcast, so a subscriber reacting to
    /// the event already sees the new power and foreground-app state.
    pub fn emit(&self, event: TvEvent) {
        self.state.observe(&event);
        self.events.publish(event);
    }

    /// Waits for the next queued command.
    ///
    /// Returns `None` once every [`TvHandle`] clone has been dropped.
    pub async fn recv_command(&mut self) -> Option<TvCommand> {
        self.commands.recv().await
    }

    /// Returns the next queued command without waiting.
    pub fn try_recv_command(&mut self) -> Option<TvCommand> {
        self.commands.try_recv().ok()
    }
}

impl From<ChannelRef> for TvCommand {
    fn from(channel: ChannelRef) -> Self {
        Self::OpenChannel {
            number: channel.number(),
            id: channel.id().to_string(),
        }
    }
}
