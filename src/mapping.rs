// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Label lookup tables for selectable controls.
//!
//! Home Assistant select entities show human-readable labels ("Netflix",
//! "E4") while the TV speaks in identifiers (`netflix`, channel 13 with id
//! `1_26_13_13_8197_8448_9018`). Each [`MappingTable`] is built from a single
//! authored list of `(identifier, label)` pairs and derives both lookup
//! directions from it, so the two directions cannot drift apart.
//!
//! # Examples
//!
//! ```
//! use lgtv2mqtt::mapping::{applications, UNKNOWN_LABEL};
//!
//! let apps = applications();
//! assert_eq!(apps.label_for("netflix"), "Netflix");
//! assert_eq!(apps.identifier_for("Netflix").map(String::as_str), Some("netflix"));
//! assert_eq!(apps.label_for("not.installed"), UNKNOWN_LABEL);
//! assert_eq!(apps.identifier_for("NotAThing"), None);
//! ```

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::LazyLock;

use crate::types::ChannelRef;

/// Label returned for identifiers that are not in a table.
///
/// Also appended to every select entity's option list so that an unmapped
/// state still has a valid option to display.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Applications offered by the application select.
const APPLICATION_ENTRIES: &[(&str, &str)] = &[
    ("com.webos.app.home", "Home"),
    ("netflix", "Netflix"),
    ("amazon", "Prime Video"),
    ("com.disney.disneyplus-prod", "Disney+"),
    ("com.fvp.ch4", "4"),
    ("demand5", "my5"),
    ("com.fvp.itv", "itvX"),
    ("com.fvp.fve", "Freeview Play"),
    ("ui30", "Rakuten TV"),
    ("com.webos.app.lgchannels", "LG Channels"),
    ("com.apple.appletv", "Apple TV"),
    ("bbc.iplayer.3.0", "BBC iPlayer"),
    ("com.webos.app.livetv", "Live TV"),
    ("youtube.leanback.v4", "YouTube"),
    ("cdp-30", "Plex"),
    ("bbc.sounds.1.0", "BBC Sounds"),
    ("com.webos.app.hdmi1", "PlayStation 4"),
    ("com.webos.app.hdmi3", "PlayStation 3"),
];

/// Channels offered by the live TV channel select.
const LIVE_TV_CHANNEL_ENTRIES: &[(u32, &str, &str)] = &[
    (13, "1_26_13_13_8197_8448_9018", "E4"),
    (30, "1_26_30_30_8197_8458_9018", "E4+1"),
];

static APPLICATIONS: LazyLock<MappingTable<String>> = LazyLock::new(|| {
    MappingTable::from_entries(
        APPLICATION_ENTRIES
            .iter()
            .map(|&(id, label)| (id.to_string(), label)),
    )
    .expect("application table must be a bijection")
});

static LIVE_TV_CHANNELS: LazyLock<MappingTable<ChannelRef>> = LazyLock::new(|| {
    MappingTable::from_entries(
        LIVE_TV_CHANNEL_ENTRIES
            .iter()
            .map(|&(number, id, label)| (ChannelRef::new(number, id), label)),
    )
    .expect("live TV channel table must be a bijection")
});

/// Returns the application id ↔ name table.
#[must_use]
pub fn applications() -> &'static MappingTable<String> {
    &APPLICATIONS
}

/// Returns the live TV channel ↔ name table.
#[must_use]
pub fn live_tv_channels() -> &'static MappingTable<ChannelRef> {
    &LIVE_TV_CHANNELS
}

/// Rejected table entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    /// Two entries share an identifier.
    #[error("duplicate identifier: {0}")]
    DuplicateIdentifier(String),

    /// Two entries share a label.
    #[error("duplicate label: {0}")]
    DuplicateLabel(String),
}

/// A bijective lookup between device identifiers and display labels.
///
/// Entries keep their authored order, which is the order of the select
/// entity's options.
#[derive(Debug, Clone)]
pub struct MappingTable<K> {
    entries: Vec<(K, &'static str)>,
    by_identifier: HashMap<K, usize>,
    by_label: HashMap<&'static str, usize>,
}

impl<K> MappingTable<K>
where
    K: Clone + Eq + Hash + fmt::Display,
{
    /// Builds a table from `(identifier, label)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError`] if an identifier or a label appears twice.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (K, &'static str)>,
    ) -> Result<Self, MappingError> {
        let entries: Vec<_> = entries.into_iter().collect();
        let mut by_identifier = HashMap::with_capacity(entries.len());
        let mut by_label = HashMap::with_capacity(entries.len());

        for (index, (identifier, label)) in entries.iter().enumerate() {
            if by_identifier.insert(identifier.clone(), index).is_some() {
                return Err(MappingError::DuplicateIdentifier(identifier.to_string()));
            }
            if by_label.insert(*label, index).is_some() {
                return Err(MappingError::DuplicateLabel((*label).to_string()));
            }
        }

        Ok(Self {
            entries,
            by_identifier,
            by_label,
        })
    }

    /// Returns the label for an identifier, or [`UNKNOWN_LABEL`].
    #[must_use]
    pub fn label_for<Q>(&self, identifier: &Q) -> &'static str
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.by_identifier
            .get(identifier)
            .map_or(UNKNOWN_LABEL, |&index| self.entries[index].1)
    }

    /// Returns the identifier for a label, if the label is in the table.
    #[must_use]
    pub fn identifier_for(&self, label: &str) -> Option<&K> {
        self.by_label
            .get(label)
            .map(|&index| &self.entries[index].0)
    }

    /// Iterates over `(identifier, label)` pairs in authored order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &'static str)> {
        self.entries.iter().map(|(identifier, label)| (identifier, *label))
    }

    /// Returns the labels followed by [`UNKNOWN_LABEL`].
    #[must_use]
    pub fn options(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(_, label)| (*label).to_string())
            .chain(std::iter::once(UNKNOWN_LABEL.to_string()))
            .collect()
    }

    /// Renders the table as a Jinja dict literal keyed by identifier.
    ///
    /// Used inside select value templates, e.g.
    /// `{{ {'netflix': 'Netflix'}.get(value_json.appId, 'Unknown') }}`.
    #[must_use]
    pub fn jinja_dict(&self) -> String {
        let pairs: Vec<String> = self
            .entries
            .iter()
            .map(|(identifier, label)| format!("'{identifier}': '{label}'"))
            .collect();
        format!("{{{}}}", pairs.join(","))
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
