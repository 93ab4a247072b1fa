// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Topic naming for one TV instance.
//!
//! ```text
//! state:      <prefix>/<instance>/<leaf>
//! command:    <prefix>/<instance>/cmnd/<leaf>
//! discovery:  <discovery_prefix>/<category>/<instance>/<object_id>/config
//! ```

use crate::types::{CommandLeaf, StateLeaf};

/// Separator between topic levels.
pub const SEPARATOR: char = '/';

/// Segment placed between the instance and a command leaf.
pub const COMMAND_SEGMENT: &str = "cmnd";

/// Last segment of every discovery topic.
pub const DISCOVERY_SUFFIX: &str = "config";

/// Joins a prefix, an instance name and further segments into a topic.
///
/// # Examples
///
/// ```
/// use lgtv2mqtt::topic::build_topic;
///
/// assert_eq!(build_topic("lgtv2mqtt", "tv", &["cmnd", "power"]), "lgtv2mqtt/tv/cmnd/power");
/// ```
#[must_use]
pub fn build_topic(prefix: &str, instance: &str, segments: &[&str]) -> String {
    let mut topic = String::with_capacity(
        prefix.len() + instance.len() + segments.iter().map(|s| s.len() + 1).sum::<usize>() + 1,
    );
    topic.push_str(prefix);
    topic.push(SEPARATOR);
    topic.push_str(instance);
    for segment in segments {
        topic.push(SEPARATOR);
        topic.push_str(segment);
    }
    topic
}

/// Topic layout of one bridged TV.
///
/// # Examples
///
/// ```
/// use lgtv2mqtt::topic::TopicScheme;
/// use lgtv2mqtt::types::{CommandLeaf, StateLeaf};
///
/// let topics = TopicScheme::new("lgtv2mqtt", "tv", "homeassistant");
/// assert_eq!(topics.state_topic(StateLeaf::PowerState), "lgtv2mqtt/tv/powerState");
/// assert_eq!(topics.command_topic(CommandLeaf::Volume), "lgtv2mqtt/tv/cmnd/volume");
/// assert_eq!(topics.command_leaf("lgtv2mqtt/tv/cmnd/volume"), Some("volume"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicScheme {
    prefix: String,
    instance: String,
    discovery_prefix: String,
    command_prefix: String,
}

impl TopicScheme {
    /// Creates the topic layout for `instance` under `prefix`, announcing
    /// discovery descriptors under `discovery_prefix`.
    #[must_use]
    pub fn new(
        prefix: impl Into<String>,
        instance: impl Into<String>,
        discovery_prefix: impl Into<String>,
    ) -> Self {
        let prefix = prefix.into();
        let instance = instance.into();
        let command_prefix = build_topic(&prefix, &instance, &[COMMAND_SEGMENT, ""]);
        Self {
            prefix,
            instance,
            discovery_prefix: discovery_prefix.into(),
            command_prefix,
        }
    }

    /// Returns the base topic prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the instance name.
    #[must_use]
    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// Returns the discovery prefix.
    #[must_use]
    pub fn discovery_prefix(&self) -> &str {
        &self.discovery_prefix
    }

    /// Returns the retained state topic for a leaf.
    #[must_use]
    pub fn state_topic(&self, leaf: StateLeaf) -> String {
        build_topic(&self.prefix, &self.instance, &[leaf.as_str()])
    }

    /// Returns the command topic for a leaf.
    #[must_use]
    pub fn command_topic(&self, leaf: CommandLeaf) -> String {
        build_topic(&self.prefix, &self.instance, &[COMMAND_SEGMENT, leaf.as_str()])
    }

    /// Returns the discovery topic for an entity.
    #[must_use]
    pub fn discovery_topic(&self, category: &str, object_id: &str) -> String {
        build_topic(
            &self.discovery_prefix,
            category,
            &[&self.instance, object_id, DISCOVERY_SUFFIX],
        )
    }

    /// Strips the command prefix from an inbound topic.
    ///
    /// Returns the remaining leaf, which may not be a registered one, or
    /// `None` if the topic is outside this instance's command namespace.
    #[must_use]
    pub fn command_leaf<'a>(&self, topic: &'a str) -> Option<&'a str> {
        topic.strip_prefix(self.command_prefix.as_str())
    }
}
