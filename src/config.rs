// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bridge configuration.
//!
//! The configuration is a flat JSON document:
//!
//! ```json
//! {
//!   "host": "192.168.1.10",
//!   "port": 1883,
//!   "username": "mqtt",
//!   "password": "secret",
//!   "name": "livingroom",
//!   "ip": "192.168.1.60",
//!   "mac": "a8:23:fe:00:11:22",
//!   "lgtv_base_topic": "lgtv2mqtt",
//!   "ha_base_topic": "homeassistant"
//! }
//! ```
//!
//! Only `host`, `ip` and `mac` are required.

use std::path::Path;

use serde::Deserialize;

use crate::discovery::DeviceIdentity;
use crate::error::ConfigError;
use crate::topic::TopicScheme;

/// Where the bridge looks for its configuration by default.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/lgtv-config.json";

const DEFAULT_PORT: u16 = 1883;
const DEFAULT_NAME: &str = "tv";
const DEFAULT_LGTV_BASE_TOPIC: &str = "lgtv2mqtt";
const DEFAULT_HA_BASE_TOPIC: &str = "homeassistant";

/// Characters that cannot appear inside a single topic level.
const RESERVED_TOPIC_CHARS: &[char] = &['/', '+', '#'];

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    host: Option<String>,
    port: Option<u16>,
    username: Option<String>,
    password: Option<String>,
    name: Option<String>,
    ip: Option<String>,
    mac: Option<String>,
    lgtv_base_topic: Option<String>,
    ha_base_topic: Option<String>,
}

/// Broker connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerSettings {
    /// Broker host name or address.
    pub host: String,
    /// Broker port.
    pub port: u16,
    /// Username and password, if the broker needs them.
    pub credentials: Option<(String, String)>,
}

/// Validated bridge configuration.
///
/// # Examples
///
/// ```
/// use lgtv2mqtt::config::BridgeConfig;
/// use lgtv2mqtt::types::StateLeaf;
///
/// let config = BridgeConfig::from_json(
///     r#"{"host": "broker", "ip": "192.168.1.60", "mac": "aa:bb:cc:dd:ee:ff"}"#,
/// )?;
///
/// assert_eq!(config.port(), 1883);
/// assert_eq!(config.name(), "tv");
/// assert_eq!(
///     config.topics().state_topic(StateLeaf::PowerState),
///     "lgtv2mqtt/tv/powerState"
/// );
/// # Ok::<(), lgtv2mqtt::error::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    host: String,
    port: u16,
    credentials: Option<(String, String)>,
    name: String,
    ip: String,
    mac: String,
    lgtv_base_topic: String,
    ha_base_topic: String,
}

impl BridgeConfig {
    /// Reads and validates the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, and any
    /// error of [`from_json`](Self::from_json).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Loading configuration");

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Parses and validates a configuration document.
    ///
    /// Empty strings count as absent. Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed documents,
    /// [`ConfigError::MissingField`] if `host`, `ip` or `mac` is absent, and
    /// [`ConfigError::InvalidValue`] for unusable values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(json)?;

        let credentials = match (present(raw.username), present(raw.password)) {
            (Some(username), Some(password)) => Some((username, password)),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ConfigError::InvalidValue {
                    field: "password",
                    message: "username given without password".to_string(),
                });
            }
            (None, Some(_)) => {
                return Err(ConfigError::InvalidValue {
                    field: "username",
                    message: "password given without username".to_string(),
                });
            }
        };

        let config = Self {
            host: present(raw.host).ok_or(ConfigError::MissingField("host"))?,
            port: raw.port.unwrap_or(DEFAULT_PORT),
            credentials,
            name: present(raw.name).unwrap_or_else(|| DEFAULT_NAME.to_string()),
            ip: present(raw.ip).ok_or(ConfigError::MissingField("ip"))?,
            mac: present(raw.mac).ok_or(ConfigError::MissingField("mac"))?,
            lgtv_base_topic: present(raw.lgtv_base_topic)
                .unwrap_or_else(|| DEFAULT_LGTV_BASE_TOPIC.to_string()),
            ha_base_topic: present(raw.ha_base_topic)
                .unwrap_or_else(|| DEFAULT_HA_BASE_TOPIC.to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value can be used as configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the port is zero or a topic
    /// level is empty or contains `/`, `+` or `#`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "port",
                message: "must not be 0".to_string(),
            });
        }

        for (field, value) in [
            ("name", &self.name),
            ("lgtv_base_topic", &self.lgtv_base_topic),
            ("ha_base_topic", &self.ha_base_topic),
        ] {
            validate_topic_level(field, value)?;
        }
        Ok(())
    }

    /// Returns the broker host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the broker port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the broker username and password.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.credentials
            .as_ref()
            .map(|(username, password)| (username.as_str(), password.as_str()))
    }

    /// Returns the instance name used in every topic.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the TV's address.
    #[must_use]
    pub fn ip(&self) -> &str {
        &self.ip
    }

    /// Returns the TV's MAC address.
    #[must_use]
    pub fn mac(&self) -> &str {
        &self.mac
    }

    /// Returns the prefix of state and command topics.
    #[must_use]
    pub fn lgtv_base_topic(&self) -> &str {
        &self.lgtv_base_topic
    }

    /// Returns the Home Assistant discovery prefix.
    #[must_use]
    pub fn ha_base_topic(&self) -> &str {
        &self.ha_base_topic
    }

    /// Returns the topic layout for this TV.
    #[must_use]
    pub fn topics(&self) -> TopicScheme {
        TopicScheme::new(&self.lgtv_base_topic, &self.name, &self.ha_base_topic)
    }

    /// Returns the device block shared by all discovery descriptors.
    #[must_use]
    pub fn device_identity(&self) -> DeviceIdentity {
        DeviceIdentity::new(&self.name, &self.mac)
    }

    /// Returns the broker connection settings.
    #[must_use]
    pub fn broker(&self) -> BrokerSettings {
        BrokerSettings {
            host: self.host.clone(),
            port: self.port,
            credentials: self.credentials.clone(),
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn validate_topic_level(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::InvalidValue {
            field,
            message: "must not be empty".to_string(),
        });
    }
    if let Some(c) = value.chars().find(|c| RESERVED_TOPIC_CHARS.contains(c)) {
        return Err(ConfigError::InvalidValue {
            field,
            message: format!("must not contain '{c}'"),
        });
    }
    Ok(())
}
