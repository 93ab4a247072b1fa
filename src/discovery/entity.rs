// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity definitions.

use std::fmt;

use crate::device::LIVE_TV_APP_ID;
use crate::mapping::{self, UNKNOWN_LABEL};
use crate::types::{CommandLeaf, StateLeaf};

/// Home Assistant entity platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Read-only value.
    Sensor,
    /// On/off control with state.
    Switch,
    /// Stateless action.
    Button,
    /// Numeric control.
    Number,
    /// Choice among fixed options.
    Select,
}

impl EntityKind {
    /// Returns the discovery topic category segment.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Sensor => "sensor",
            Self::Switch => "switch",
            Self::Button => "button",
            Self::Number => "number",
            Self::Select => "select",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.category())
    }
}

/// What an entity lets the user do, and through which command leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    /// Nothing; the entity only displays state.
    Sensor,
    /// Sends `on`/`off`.
    Switch(CommandLeaf),
    /// Sends a fixed payload when pressed.
    Button {
        /// Command leaf the press is sent to.
        command: CommandLeaf,
        /// Payload sent on press.
        press: &'static str,
    },
    /// Sends a number in `min..=max`.
    Number {
        /// Command leaf the value is sent to.
        command: CommandLeaf,
        /// Lowest value.
        min: u8,
        /// Highest value.
        max: u8,
        /// Increment.
        step: u8,
    },
    /// Sends one of `options`.
    Select {
        /// Command leaf the chosen option is sent to.
        command: CommandLeaf,
        /// Selectable labels, ending with the unknown label.
        options: Vec<String>,
    },
}

impl Control {
    /// Returns the entity platform implementing this control.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Sensor => EntityKind::Sensor,
            Self::Switch(_) => EntityKind::Switch,
            Self::Button { .. } => EntityKind::Button,
            Self::Number { .. } => EntityKind::Number,
            Self::Select { .. } => EntityKind::Select,
        }
    }

    /// Returns the command leaf, if the entity sends commands.
    #[must_use]
    pub const fn command(&self) -> Option<CommandLeaf> {
        match self {
            Self::Sensor => None,
            Self::Switch(command)
            | Self::Button { command, .. }
            | Self::Number { command, .. }
            | Self::Select { command, .. } => Some(*command),
        }
    }
}

/// Rule deciding when Home Assistant shows an entity as available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    /// State leaf the rule reads.
    pub leaf: StateLeaf,
    /// Template rendering `online` or `offline`.
    pub template: String,
}

impl Availability {
    /// Available while the TV reports the `Active` power state.
    #[must_use]
    pub fn while_powered_on() -> Self {
        Self {
            leaf: StateLeaf::PowerState,
            template: "{{ 'online' if value_json.state == 'Active' else 'offline' }}".to_string(),
        }
    }

    /// Available while the live TV app is in the foreground.
    #[must_use]
    pub fn while_live_tv_active() -> Self {
        Self {
            leaf: StateLeaf::ForegroundApp,
            template: format!(
                "{{{{ 'online' if value_json.appId == '{LIVE_TV_APP_ID}' else 'offline' }}}}"
            ),
        }
    }
}

/// One exposed entity, independent of the TV instance it is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDefinition {
    /// Object id: the discovery topic segment.
    pub object_id: &'static str,
    /// Suffix of the `unique_id`, usually the object id.
    pub unique_key: &'static str,
    /// Display name suffix appended to the instance name.
    pub label: &'static str,
    /// Material Design icon.
    pub icon: &'static str,
    /// State leaf carrying the entity's state and attributes.
    pub leaf: StateLeaf,
    /// Template extracting the displayed value from the state document.
    pub value_template: Option<String>,
    /// Optional availability rule.
    pub availability: Option<Availability>,
    /// Control surface.
    pub control: Control,
}

impl EntityDefinition {
    fn new(
        object_id: &'static str,
        label: &'static str,
        icon: &'static str,
        leaf: StateLeaf,
        control: Control,
    ) -> Self {
        Self {
            object_id,
            unique_key: object_id,
            label,
            icon,
            leaf,
            value_template: None,
            availability: None,
            control,
        }
    }

    /// Creates a read-only sensor on `leaf`.
    #[must_use]
    pub fn sensor(
        object_id: &'static str,
        label: &'static str,
        icon: &'static str,
        leaf: StateLeaf,
    ) -> Self {
        Self::new(object_id, label, icon, leaf, Control::Sensor)
    }

    /// Creates an on/off switch reading `leaf` and commanding `command`.
    #[must_use]
    pub fn switch(
        object_id: &'static str,
        label: &'static str,
        icon: &'static str,
        leaf: StateLeaf,
        command: CommandLeaf,
    ) -> Self {
        Self::new(object_id, label, icon, leaf, Control::Switch(command))
    }

    /// Creates a button sending `press` to `command`.
    ///
    /// Buttons have no state; `leaf` only supplies attributes.
    #[must_use]
    pub fn button(
        object_id: &'static str,
        label: &'static str,
        icon: &'static str,
        leaf: StateLeaf,
        command: CommandLeaf,
        press: &'static str,
    ) -> Self {
        Self::new(
            object_id,
            label,
            icon,
            leaf,
            Control::Button { command, press },
        )
    }

    /// Creates a 0 to 100 number control.
    #[must_use]
    pub fn percentage(
        object_id: &'static str,
        label: &'static str,
        icon: &'static str,
        leaf: StateLeaf,
        command: CommandLeaf,
    ) -> Self {
        Self::new(
            object_id,
            label,
            icon,
            leaf,
            Control::Number {
                command,
                min: 0,
                max: 100,
                step: 1,
            },
        )
    }

    /// Creates a select offering `labels` plus the unknown label.
    #[must_use]
    pub fn select(
        object_id: &'static str,
        label: &'static str,
        icon: &'static str,
        leaf: StateLeaf,
        command: CommandLeaf,
        labels: Vec<String>,
    ) -> Self {
        let mut options = labels;
        if options.last().map(String::as_str) != Some(UNKNOWN_LABEL) {
            options.push(UNKNOWN_LABEL.to_string());
        }
        Self::new(
            object_id,
            label,
            icon,
            leaf,
            Control::Select { command, options },
        )
    }

    /// Sets the `unique_id` suffix when it differs from the object id.
    ///
    /// Lets two components share an object id while staying distinct
    /// entities in Home Assistant.
    #[must_use]
    pub fn with_unique_key(mut self, unique_key: &'static str) -> Self {
        self.unique_key = unique_key;
        self
    }

    /// Sets the value template.
    #[must_use]
    pub fn with_value_template(mut self, template: impl Into<String>) -> Self {
        self.value_template = Some(template.into());
        self
    }

    /// Sets the availability rule.
    #[must_use]
    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = Some(availability);
        self
    }

    /// Returns the entity platform.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.control.kind()
    }

    /// Returns `true` if the entity displays a state.
    #[must_use]
    pub const fn has_state(&self) -> bool {
        !matches!(self.control, Control::Button { .. })
    }
}

/// Returns every entity the bridge exposes for a TV, in announcement order.
#[must_use]
pub fn tv_entities() -> Vec<EntityDefinition> {
    let apps = mapping::applications();
    let channels = mapping::live_tv_channels();

    vec![
        EntityDefinition::sensor("powerstate", "Power State", "mdi:power", StateLeaf::PowerState)
            .with_value_template("{{ value_json.state }}"),
        EntityDefinition::switch(
            "power",
            "Power",
            "mdi:power",
            StateLeaf::PowerState,
            CommandLeaf::Power,
        )
        .with_value_template("{{ 'on' if value_json.state == 'Active' else 'off' }}"),
        EntityDefinition::button(
            "poweroff",
            "Power Off",
            "mdi:power",
            StateLeaf::PowerState,
            CommandLeaf::Power,
            "off",
        )
        .with_availability(Availability::while_powered_on()),
        EntityDefinition::sensor("appid", "App ID", "mdi:application", StateLeaf::ForegroundApp)
            .with_value_template("{{ value_json.appId }}"),
        EntityDefinition::select(
            "appid",
            "Application",
            "mdi:application",
            StateLeaf::ForegroundApp,
            CommandLeaf::Application,
            apps.options(),
        )
        .with_unique_key("application")
        .with_value_template(format!(
            "{{{{ {}.get(value_json.appId, '{UNKNOWN_LABEL}') }}}}",
            apps.jinja_dict()
        )),
        EntityDefinition::sensor(
            "livetvchannelname",
            "Live TV Channel Name",
            "mdi:television-classic",
            StateLeaf::LiveTvChannel,
        )
        .with_value_template("{{ value_json.channelName }}"),
        EntityDefinition::sensor(
            "livetvchannelnumber",
            "Live TV Channel Number",
            "mdi:television-classic",
            StateLeaf::LiveTvChannel,
        )
        .with_value_template("{{ value_json.channelNumber }}"),
        EntityDefinition::sensor(
            "livetvchannelid",
            "Live TV Channel ID",
            "mdi:television-classic",
            StateLeaf::LiveTvChannel,
        )
        .with_value_template("{{ value_json.channelId }}"),
        EntityDefinition::select(
            "livetvchannel",
            "Live TV Channel",
            "mdi:television-classic",
            StateLeaf::LiveTvChannel,
            CommandLeaf::LiveTvChannel,
            channels.options(),
        )
        .with_value_template(format!(
            "{{{{ {}.get(value_json.channelNumber ~ '/' ~ value_json.channelId, '{UNKNOWN_LABEL}') }}}}",
            channels.jinja_dict()
        ))
        .with_availability(Availability::while_live_tv_active()),
        EntityDefinition::percentage(
            "volume",
            "Volume",
            "mdi:volume-high",
            StateLeaf::AudioStatus,
            CommandLeaf::Volume,
        )
        .with_value_template("{{ value_json.volume }}"),
        EntityDefinition::button(
            "volumeup",
            "Volume Up",
            "mdi:volume-plus",
            StateLeaf::AudioStatus,
            CommandLeaf::Volume,
            "up",
        )
        .with_availability(Availability::while_powered_on()),
        EntityDefinition::button(
            "volumedown",
            "Volume Down",
            "mdi:volume-minus",
            StateLeaf::AudioStatus,
            CommandLeaf::Volume,
            "down",
        )
        .with_availability(Availability::while_powered_on()),
        EntityDefinition::switch(
            "mute",
            "Mute",
            "mdi:volume-mute",
            StateLeaf::AudioStatus,
            CommandLeaf::Mute,
        )
        .with_value_template("{{ 'on' if value_json.muteStatus else 'off' }}"),
        EntityDefinition::sensor(
            "soundoutput",
            "Sound Output",
            "mdi:surround-sound",
            StateLeaf::AudioStatus,
        )
        .with_value_template("{{ value_json.soundOutput }}"),
        EntityDefinition::sensor(
            "soundmode",
            "Sound Mode",
            "mdi:surround-sound",
            StateLeaf::SoundSettings,
        )
        .with_value_template("{{ value_json.soundMode }}"),
    ]
}
