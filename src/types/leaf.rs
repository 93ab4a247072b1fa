// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Topic leaf names.
//!
//! A leaf is the last segment of a state or command topic. State leaves are
//! written by the event router, command leaves are read by the command
//! router. Both sets are closed enumerations so the registries built from
//! them cannot contain duplicates.

use std::fmt;

/// Leaf of a retained state topic (`<prefix>/<instance>/<leaf>`).
///
/// # Examples
///
/// ```
/// use lgtv2mqtt::types::StateLeaf;
///
/// assert_eq!(StateLeaf::ForegroundApp.as_str(), "foregroundApp");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateLeaf {
    /// Power state object reported by the TV.
    PowerState,
    /// Volume and mute status.
    AudioStatus,
    /// Sound mode and related settings.
    SoundSettings,
    /// Picture settings.
    PictureSettings,
    /// The application currently in the foreground.
    ForegroundApp,
    /// The live TV channel currently tuned.
    LiveTvChannel,
}

impl StateLeaf {
    /// Every state leaf, in publication order.
    pub const ALL: [Self; 6] = [
        Self::PowerState,
        Self::AudioStatus,
        Self::SoundSettings,
        Self::PictureSettings,
        Self::ForegroundApp,
        Self::LiveTvChannel,
    ];

    /// Returns the topic segment for this leaf.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PowerState => "powerState",
            Self::AudioStatus => "audioStatus",
            Self::SoundSettings => "soundSettings",
            Self::PictureSettings => "pictureSettings",
            Self::ForegroundApp => "foregroundApp",
            Self::LiveTvChannel => "liveTvChannel",
        }
    }
}

impl fmt::Display for StateLeaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leaf of a command topic (`<prefix>/<instance>/cmnd/<leaf>`).
///
/// The set of variants is the command registry: every variant is
/// subscribed on connect and has exactly one handler.
///
/// # Examples
///
/// ```
/// use lgtv2mqtt::types::CommandLeaf;
///
/// assert_eq!(CommandLeaf::from_name("volume"), Some(CommandLeaf::Volume));
/// assert_eq!(CommandLeaf::from_name("soundOutput"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandLeaf {
    /// Power the TV on or off.
    Power,
    /// Step or set the volume.
    Volume,
    /// Mute or unmute.
    Mute,
    /// Turn the panel on or off while the TV stays powered.
    Screen,
    /// Launch an application by display label.
    Application,
    /// Tune a live TV channel by display label.
    LiveTvChannel,
}

impl CommandLeaf {
    /// Every command leaf, in subscription order.
    pub const ALL: [Self; 6] = [
        Self::Power,
        Self::Volume,
        Self::Mute,
        Self::Screen,
        Self::Application,
        Self::LiveTvChannel,
    ];

    /// Returns the topic segment for this leaf.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Power => "power",
            Self::Volume => "volume",
            Self::Mute => "mute",
            Self::Screen => "screen",
            Self::Application => "application",
            Self::LiveTvChannel => "liveTvChannel",
        }
    }

    /// Looks up a leaf by its exact topic segment.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|leaf| leaf.as_str() == name)
    }
}

impl fmt::Display for CommandLeaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
