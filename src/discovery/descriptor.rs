// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Discovery document construction.

use serde::Serialize;

use super::entity::{Control, EntityDefinition};
use crate::error::ParseError;
use crate::topic::TopicScheme;

/// Template forwarding the whole state document as entity attributes.
const ATTRIBUTES_TEMPLATE: &str = "{{ value_json | tojson }}";

/// Template forwarding the command value unchanged.
const COMMAND_TEMPLATE: &str = "{{ value }}";

const MANUFACTURER: &str = "jarvis";
const MODEL: &str = "LG WebOS lgtv2mqtt";

/// The device block shared by every entity of one TV.
///
/// Home Assistant groups entities with the same identifiers under one
/// device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceIdentity {
    connections: Vec<(String, String)>,
    identifiers: Vec<String>,
    manufacturer: String,
    model: String,
    name: String,
}

impl DeviceIdentity {
    /// Creates the identity of the TV named `name` with MAC address `mac`.
    #[must_use]
    pub fn new(name: impl Into<String>, mac: impl Into<String>) -> Self {
        let mac = mac.into();
        Self {
            identifiers: vec![format!("jarvis_lgtv_{mac}")],
            connections: vec![("mac".to_string(), mac)],
            manufacturer: MANUFACTURER.to_string(),
            model: MODEL.to_string(),
            name: name.into(),
        }
    }

    /// Returns the device name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A Home Assistant MQTT discovery document.
///
/// Field order is fixed by the struct, so serialization is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryDescriptor {
    /// Stable id, `<instance>_<unique_key>`.
    pub unique_id: String,
    /// Display name, `<instance> <label>`.
    pub name: String,
    /// Device linkage.
    pub device: DeviceIdentity,
    /// Material Design icon.
    pub icon: String,
    /// Topic read by the availability template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_topic: Option<String>,
    /// Template rendering `online`/`offline`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_template: Option<String>,
    /// Topic whose document becomes the entity's attributes.
    pub json_attributes_topic: String,
    /// Template selecting the attributes.
    pub json_attributes_template: String,
    /// Retained state topic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_topic: Option<String>,
    /// Template extracting the state value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_template: Option<String>,
    /// Rendered state meaning off (switches).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_off: Option<String>,
    /// Rendered state meaning on (switches).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_on: Option<String>,
    /// Command topic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_topic: Option<String>,
    /// Template rendering the command payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_template: Option<String>,
    /// Payload sent to switch off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_off: Option<String>,
    /// Payload sent to switch on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_on: Option<String>,
    /// Payload sent when a button is pressed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_press: Option<String>,
    /// Lowest number value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<u8>,
    /// Highest number value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u8>,
    /// Number increment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<u8>,
    /// Select options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl DiscoveryDescriptor {
    /// Serializes the document as a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Json`] if serialization fails.
    pub fn to_payload(&self) -> Result<Vec<u8>, ParseError> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// A discovery document ready to publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    /// Discovery topic.
    pub topic: String,
    /// Serialized descriptor.
    pub payload: Vec<u8>,
}

/// Binds entity definitions to one TV instance.
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
    topics: TopicScheme,
    device: DeviceIdentity,
}

impl DescriptorBuilder {
    /// Creates a builder for the TV described by `topics` and `device`.
    #[must_use]
    pub fn new(topics: TopicScheme, device: DeviceIdentity) -> Self {
        Self { topics, device }
    }

    /// Returns the discovery topic of an entity.
    #[must_use]
    pub fn topic(&self, entity: &EntityDefinition) -> String {
        self.topics
            .discovery_topic(entity.kind().category(), entity.object_id)
    }

    /// Builds the discovery document of an entity.
    #[must_use]
    pub fn build(&self, entity: &EntityDefinition) -> DiscoveryDescriptor {
        let instance = self.topics.instance();
        let leaf_topic = self.topics.state_topic(entity.leaf);

        let mut descriptor = DiscoveryDescriptor {
            unique_id: format!("{instance}_{}", entity.unique_key),
            name: format!("{instance} {}", entity.label),
            device: self.device.clone(),
            icon: entity.icon.to_string(),
            availability_topic: None,
            availability_template: None,
            json_attributes_topic: leaf_topic.clone(),
            json_attributes_template: ATTRIBUTES_TEMPLATE.to_string(),
            state_topic: None,
            value_template: None,
            state_off: None,
            state_on: None,
            command_topic: entity
                .control
                .command()
                .map(|leaf| self.topics.command_topic(leaf)),
            command_template: None,
            payload_off: None,
            payload_on: None,
            payload_press: None,
            min: None,
            max: None,
            step: None,
            options: None,
        };

        if entity.has_state() {
            descriptor.state_topic = Some(leaf_topic);
            descriptor.value_template.clone_from(&entity.value_template);
        }

        if let Some(availability) = &entity.availability {
            descriptor.availability_topic = Some(self.topics.state_topic(availability.leaf));
            descriptor.availability_template = Some(availability.template.clone());
        }

        match &entity.control {
            Control::Sensor => {}
            Control::Switch(_) => {
                descriptor.state_off = Some("off".to_string());
                descriptor.state_on = Some("on".to_string());
                descriptor.command_template = Some(COMMAND_TEMPLATE.to_string());
                descriptor.payload_off = Some("off".to_string());
                descriptor.payload_on = Some("on".to_string());
            }
            Control::Button { press, .. } => {
                descriptor.command_template = Some(COMMAND_TEMPLATE.to_string());
                descriptor.payload_press = Some((*press).to_string());
            }
            Control::Number { min, max, step, .. } => {
                descriptor.command_template = Some(COMMAND_TEMPLATE.to_string());
                descriptor.min = Some(*min);
                descriptor.max = Some(*max);
                descriptor.step = Some(*step);
            }
            Control::Select { options, .. } => {
                descriptor.options = Some(options.clone());
            }
        }

        descriptor
    }

    /// Builds and serializes the documents of all `entities`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if a document cannot be serialized.
    pub fn announcements(
        &self,
        entities: &[EntityDefinition],
    ) -> Result<Vec<Announcement>, ParseError> {
        entities
            .iter()
            .map(|entity| {
                Ok(Announcement {
                    topic: self.topic(entity),
                    payload: self.build(entity).to_payload()?,
                })
            })
            .collect()
    }
}
