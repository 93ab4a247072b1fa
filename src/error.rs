// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the bridge.
//!
//! Only configuration problems and transport failures are errors here.
//! Unknown command topics, unmapped labels and unmet device preconditions
//! are ordinary outcomes of routing and are reported through
//! [`Dispatch`](crate::router::Dispatch) instead.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The bridge configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Communication with the message bus failed.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A payload or descriptor could not be serialized.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Errors raised while loading or validating the bridge configuration.
///
/// These are fatal: the bridge must not start with a broken configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Path of the configuration file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration document is not valid JSON for the expected shape.
    #[error("cannot parse configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A required key is absent.
    #[error("value for \"{0}\" missing in config")]
    MissingField(&'static str),

    /// A key is present but its value cannot be used.
    #[error("invalid value for \"{field}\": {message}")]
    InvalidValue {
        /// The offending key.
        field: &'static str,
        /// Why the value was rejected.
        message: String,
    },
}

/// Errors related to the message bus connection.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// MQTT client request could not be queued.
    #[cfg(feature = "mqtt")]
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// Connection to the broker failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid broker address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Internal channel was closed.
    #[error("channel closed: {0}")]
    ChannelClosed(String),
}

/// Errors related to encoding bus payloads.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_display() {
        let err = ConfigError::MissingField("host");
        assert_eq!(err.to_string(), "value for \"host\" missing in config");
    }

    #[test]
    fn invalid_value_display() {
        let err = ConfigError::InvalidValue {
            field: "name",
            message: "must not contain '/'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value for \"name\": must not contain '/'"
        );
    }

    #[test]
    fn error_from_config_error() {
        let err: Error = ConfigError::MissingField("mac").into();
        assert!(matches!(err, Error::Config(ConfigError::MissingField("mac"))));
    }

    #[test]
    fn protocol_error_display() {
        let err = ProtocolError::ChannelClosed("bus events".to_string());
        assert_eq!(err.to_string(), "channel closed: bus events");
    }
}
