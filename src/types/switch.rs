// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `on`/`off` vocabulary used by switch-like command topics.

use std::fmt;

/// A switch payload.
///
/// Matching is exact: Home Assistant sends the configured `payload_on` and
/// `payload_off` strings verbatim, so `"ON"` is not a switch payload.
///
/// # Examples
///
/// ```
/// use lgtv2mqtt::types::Switch;
///
/// assert_eq!(Switch::from_payload("on"), Some(Switch::On));
/// assert_eq!(Switch::from_payload("ON"), None);
/// assert_eq!(Switch::Off.as_str(), "off");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Switch {
    /// The `off` payload.
    Off,
    /// The `on` payload.
    On,
}

impl Switch {
    /// Returns the payload string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
        }
    }

    /// Parses a command payload.
    #[must_use]
    pub fn from_payload(payload: &str) -> Option<Self> {
        match payload {
            "on" => Some(Self::On),
            "off" => Some(Self::Off),
            _ => None,
        }
    }

    /// Returns `true` for [`Switch::On`].
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<bool> for Switch {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}
