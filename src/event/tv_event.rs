// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! TV event types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::StateLeaf;

/// An event reported by the TV.
///
/// Each variant carries the payload object the TV sent with it. Payloads
/// are kept opaque: the bridge republishes them and leaves interpretation
/// to the templates of the discovery descriptors.
///
/// Serialized with the TV's event names as an adjacently tagged object,
/// which is the line format the demo transport reads:
///
/// ```
/// use lgtv2mqtt::event::TvEvent;
/// use serde_json::json;
///
/// let event: TvEvent = serde_json::from_value(json!({
///     "event": "FOREGROUND_APP_CHANGED",
///     "payload": {"appId": "netflix"}
/// })).unwrap();
///
/// assert_eq!(event, TvEvent::ForegroundAppChanged(json!({"appId": "netflix"})));
/// assert_eq!(event.name(), "FOREGROUND_APP_CHANGED");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TvEvent {
    /// The TV was switched on.
    #[serde(rename = "TV_TURNED_ON")]
    TurnedOn(Value),
    /// The TV was switched off.
    #[serde(rename = "TV_TURNED_OFF")]
    TurnedOff(Value),
    /// The panel started its pixel refresh cycle.
    PixelRefresherStarted(Value),
    /// The panel was switched on or off.
    ScreenStateChanged(Value),
    /// The screen saver started.
    ScreenSaverTurnedOn(Value),
    /// Any other power state transition.
    PowerStateChanged(Value),
    /// Volume or mute changed.
    AudioStatusChanged(Value),
    /// Sound settings changed.
    SoundSettingsChanged(Value),
    /// Picture settings changed.
    PictureSettingsChanged(Value),
    /// A different application came to the foreground.
    ForegroundAppChanged(Value),
    /// The tuned live TV channel changed.
    LiveTvChannelChanged(Value),
    /// The connection handshake with the TV completed.
    SetupFinished,
}

impl TvEvent {
    /// Returns the TV's name for this event type.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TurnedOn(_) => "TV_TURNED_ON",
            Self::TurnedOff(_) => "TV_TURNED_OFF",
            Self::PixelRefresherStarted(_) => "PIXEL_REFRESHER_STARTED",
            Self::ScreenStateChanged(_) => "SCREEN_STATE_CHANGED",
            Self::ScreenSaverTurnedOn(_) => "SCREEN_SAVER_TURNED_ON",
            Self::PowerStateChanged(_) => "POWER_STATE_CHANGED",
            Self::AudioStatusChanged(_) => "AUDIO_STATUS_CHANGED",
            Self::SoundSettingsChanged(_) => "SOUND_SETTINGS_CHANGED",
            Self::PictureSettingsChanged(_) => "PICTURE_SETTINGS_CHANGED",
            Self::ForegroundAppChanged(_) => "FOREGROUND_APP_CHANGED",
            Self::LiveTvChannelChanged(_) => "LIVE_TV_CHANNEL_CHANGED",
            Self::SetupFinished => "SETUP_FINISHED",
        }
    }

    /// Returns the payload, if this event type carries one.
    #[must_use]
    pub const fn payload(&self) -> Option<&Value> {
        match self {
            Self::TurnedOn(v)
            | Self::TurnedOff(v)
            | Self::PixelRefresherStarted(v)
            | Self::ScreenStateChanged(v)
            | Self::ScreenSaverTurnedOn(v)
            | Self::PowerStateChanged(v)
            | Self::AudioStatusChanged(v)
            | Self::SoundSettingsChanged(v)
            | Self::PictureSettingsChanged(v)
            | Self::ForegroundAppChanged(v)
            | Self::LiveTvChannelChanged(v) => Some(v),
            Self::SetupFinished => None,
        }
    }

    /// Returns the state leaf this event is published to.
    ///
    /// `None` for events that are only logged.
    #[must_use]
    pub const fn state_leaf(&self) -> Option<StateLeaf> {
        match self {
            Self::TurnedOn(_)
            | Self::TurnedOff(_)
            | Self::PixelRefresherStarted(_)
            | Self::ScreenStateChanged(_)
            | Self::ScreenSaverTurnedOn(_)
            | Self::PowerStateChanged(_) => Some(StateLeaf::PowerState),
            Self::AudioStatusChanged(_) => Some(StateLeaf::AudioStatus),
            Self::SoundSettingsChanged(_) => Some(StateLeaf::SoundSettings),
            Self::PictureSettingsChanged(_) => Some(StateLeaf::PictureSettings),
            Self::ForegroundAppChanged(_) => Some(StateLeaf::ForegroundApp),
            Self::LiveTvChannelChanged(_) => Some(StateLeaf::LiveTvChannel),
            Self::SetupFinished => None,
        }
    }

    /// Returns `true` if this event reports a power transition.
    #[must_use]
    pub const fn is_power_event(&self) -> bool {
        matches!(self.state_leaf(), Some(StateLeaf::PowerState))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn power_events_share_a_leaf() {
        let events = [
            TvEvent::TurnedOn(json!({})),
            TvEvent::TurnedOff(json!({})),
            TvEvent::PixelRefresherStarted(json!({})),
            TvEvent::ScreenStateChanged(json!({})),
            TvEvent::ScreenSaverTurnedOn(json!({})),
            TvEvent::PowerStateChanged(json!({})),
        ];
        for event in events {
            assert_eq!(event.state_leaf(), Some(StateLeaf::PowerState));
            assert!(event.is_power_event());
        }
    }

    #[test]
    fn every_state_leaf_has_an_event() {
        let events = [
            TvEvent::PowerStateChanged(json!({})),
            TvEvent::AudioStatusChanged(json!({})),
            TvEvent::SoundSettingsChanged(json!({})),
            TvEvent::PictureSettingsChanged(json!({})),
            TvEvent::ForegroundAppChanged(json!({})),
            TvEvent::LiveTvChannelChanged(json!({})),
        ];
        for leaf in StateLeaf::ALL {
            assert!(events.iter().any(|e| e.state_leaf() == Some(leaf)), "{leaf}");
        }
    }

    #[test]
    fn setup_finished_is_not_published() {
        assert_eq!(TvEvent::SetupFinished.state_leaf(), None);
        assert_eq!(TvEvent::SetupFinished.payload(), None);
    }

    #[test]
    fn deserialize_uses_tv_names() {
        let event: TvEvent =
            serde_json::from_str(r#"{"event":"TV_TURNED_ON","payload":{"state":"Active"}}"#)
                .unwrap();
        assert_eq!(event, TvEvent::TurnedOn(json!({"state": "Active"})));

        let event: TvEvent =
            serde_json::from_str(r#"{"event":"LIVE_TV_CHANNEL_CHANGED","payload":{}}"#).unwrap();
        assert_eq!(event.name(), "LIVE_TV_CHANNEL_CHANGED");
    }

    #[test]
    fn deserialize_unit_event_without_payload() {
        let event: TvEvent = serde_json::from_str(r#"{"event":"SETUP_FINISHED"}"#).unwrap();
        assert_eq!(event, TvEvent::SetupFinished);
    }

    #[test]
    fn serialized_name_matches_name() {
        let event = TvEvent::PictureSettingsChanged(json!({"backlight": 80}));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], event.name());
    }

    #[test]
    fn deserialize_unknown_event_fails() {
        let result = serde_json::from_str::<TvEvent>(r#"{"event":"NOPE","payload":{}}"#);
        assert!(result.is_err());
    }
}
