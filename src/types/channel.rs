// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Live TV channel reference.

use std::fmt;

/// A live TV channel as the TV identifies it: the channel number shown to
/// the viewer and the tuner's internal channel id.
///
/// Displays as `<number>/<id>`, the key format of the channel lookup in the
/// select entity's value template.
///
/// # Examples
///
/// ```
/// use lgtv2mqtt::types::ChannelRef;
///
/// let e4 = ChannelRef::new(13, "1_26_13_13_8197_8448_9018");
/// assert_eq!(e4.to_string(), "13/1_26_13_13_8197_8448_9018");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelRef {
    number: u32,
    id: String,
}

impl ChannelRef {
    /// Creates a channel reference.
    #[must_use]
    pub fn new(number: u32, id: impl Into<String>) -> Self {
        Self {
            number,
            id: id.into(),
        }
    }

    /// Returns the channel number.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Returns the tuner channel id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.number, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let channel = ChannelRef::new(30, "1_26_30_30_8197_8458_9018");
        assert_eq!(channel.number(), 30);
        assert_eq!(channel.id(), "1_26_30_30_8197_8458_9018");
    }

    #[test]
    fn equality_uses_both_fields() {
        assert_ne!(ChannelRef::new(13, "a"), ChannelRef::new(13, "b"));
        assert_ne!(ChannelRef::new(13, "a"), ChannelRef::new(14, "a"));
        assert_eq!(ChannelRef::new(13, "a"), ChannelRef::new(13, "a"));
    }
}
