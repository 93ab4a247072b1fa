// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Translates command topic messages into TV actions.

use std::sync::Arc;

use crate::device::TvControl;
use crate::mapping::{applications, live_tv_channels};
use crate::topic::TopicScheme;
use crate::types::{CommandLeaf, Switch};

/// Highest absolute volume level; parsed levels are clamped to `0..=MAX_VOLUME`.
const MAX_VOLUME: u8 = 100;

/// What became of one inbound command message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A device action was issued.
    Invoked,
    /// The topic is outside the command namespace or names no known leaf.
    UnknownTopic,
    /// The TV is not in a state that accepts this command.
    Unavailable,
    /// The payload has no meaning for this command.
    Ignored,
}

/// Routes command topic messages to a [`TvControl`].
///
/// Preconditions are checked before the payload is looked at, so a command
/// for a TV that is off is dropped even when its payload is valid.
#[derive(Debug)]
pub struct CommandRouter<D> {
    topics: TopicScheme,
    tv: Arc<D>,
}

impl<D: TvControl> CommandRouter<D> {
    /// Creates a router driving `tv`.
    #[must_use]
    pub fn new(topics: TopicScheme, tv: Arc<D>) -> Self {
        Self { topics, tv }
    }

    /// Returns the command topics the router handles.
    #[must_use]
    pub fn subscriptions(&self) -> Vec<String> {
        CommandLeaf::ALL
            .iter()
            .map(|leaf| self.topics.command_topic(*leaf))
            .collect()
    }

    /// Routes one inbound message.
    pub fn route(&self, topic: &str, payload: &str) -> Dispatch {
        let Some(name) = self.topics.command_leaf(topic) else {
            tracing::trace!(topic = %topic, "Ignoring topic outside command namespace");
            return Dispatch::UnknownTopic;
        };

        let Some(leaf) = CommandLeaf::from_name(name) else {
            tracing::debug!(topic = %topic, "No handler for command topic");
            return Dispatch::UnknownTopic;
        };

        tracing::debug!(command = %leaf, payload = %payload, "Got command");
        let outcome = self.dispatch(leaf, payload);
        match outcome {
            Dispatch::Unavailable => {
                tracing::debug!(command = %leaf, "TV not ready, dropping command");
            }
            Dispatch::Ignored => {
                tracing::debug!(command = %leaf, payload = %payload, "Unusable command payload");
            }
            Dispatch::Invoked | Dispatch::UnknownTopic => {}
        }
        outcome
    }

    /// Applies a command to the TV.
    pub fn dispatch(&self, leaf: CommandLeaf, payload: &str) -> Dispatch {
        if !self.ready_for(leaf) {
            return Dispatch::Unavailable;
        }

        match leaf {
            CommandLeaf::Power => match Switch::from_payload(payload) {
                Some(Switch::On) => self.tv.power_on(),
                Some(Switch::Off) => self.tv.power_off(),
                None => return Dispatch::Ignored,
            },
            CommandLeaf::Volume => match payload {
                "up" => self.tv.volume_up(),
                "down" => self.tv.volume_down(),
                level => match parse_volume(level) {
                    Some(level) => self.tv.set_volume_level(level),
                    None => return Dispatch::Ignored,
                },
            },
            // Anything but "on" unmutes.
            CommandLeaf::Mute => self.tv.set_mute(payload == Switch::On.as_str()),
            CommandLeaf::Screen => match Switch::from_payload(payload) {
                Some(Switch::On) => self.tv.screen_on(),
                Some(Switch::Off) => self.tv.screen_off(),
                None => return Dispatch::Ignored,
            },
            CommandLeaf::Application => match applications().identifier_for(payload) {
                Some(app_id) => self.tv.launch_application(app_id),
                None => return Dispatch::Ignored,
            },
            CommandLeaf::LiveTvChannel => match live_tv_channels().identifier_for(payload) {
                Some(channel) => self.tv.open_channel(channel.number(), channel.id()),
                None => return Dispatch::Ignored,
            },
        }
        Dispatch::Invoked
    }

    fn ready_for(&self, leaf: CommandLeaf) -> bool {
        match leaf {
            CommandLeaf::Power => true,
            CommandLeaf::Volume
            | CommandLeaf::Mute
            | CommandLeaf::Screen
            | CommandLeaf::Application => self.tv.is_powered_on(),
            CommandLeaf::LiveTvChannel => self.tv.is_powered_on() && self.tv.is_live_tv_active(),
        }
    }
}

/// Parses an absolute volume level, clamped to `0..=MAX_VOLUME`.
///
/// Returns `None` unless the payload is an integer.
fn parse_volume(payload: &str) -> Option<u8> {
    let level = payload.trim().parse::<i64>().ok()?;
    let clamped = level.clamp(0, i64::from(MAX_VOLUME));
    Some(u8::try_from(clamped).unwrap_or(MAX_VOLUME))
}
