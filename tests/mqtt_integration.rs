// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the MQTT bus using mockforge-mqtt.

#![cfg(feature = "mqtt")]

use std::time::Duration;

use lgtv2mqtt::ProtocolError;
use lgtv2mqtt::config::BridgeConfig;
use lgtv2mqtt::protocol::{BusEvent, MessageBus, MqttBus};
use mockforge_mqtt::broker::MqttConfig;
use mockforge_mqtt::start_mqtt_server;
use tokio::time::{sleep, timeout};

/// Helper to find an available port for testing.
fn get_test_port() -> u16 {
    use std::sync::atomic::{AtomicU16, Ordering};
    static PORT_COUNTER: AtomicU16 = AtomicU16::new(18950);
    PORT_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Starts a mock MQTT broker on the given port.
async fn start_mock_broker(port: u16) {
    let config = MqttConfig {
        port,
        host: "127.0.0.1".to_string(),
        ..Default::default()
    };

    tokio::spawn(async move {
        let _ = start_mqtt_server(config).await;
    });

    // Give the broker time to bind
    sleep(Duration::from_millis(500)).await;
}

// ============================================================================
// Connection
// ============================================================================

mod connection {
    use super::*;

    #[tokio::test]
    async fn connect_reports_connected_event() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let result = MqttBus::builder().host("127.0.0.1").port(port).build().await;
        assert!(result.is_ok(), "Failed to connect: {:?}", result.err());

        let (bus, mut events) = result.unwrap();
        assert!(bus.is_connected());
        assert_eq!(bus.host(), "127.0.0.1");
        assert_eq!(bus.port(), port);
        assert_eq!(bus.config().port(), port);
        assert!(!bus.config().has_credentials());

        let first = timeout(Duration::from_secs(2), events.recv()).await.unwrap();
        assert_eq!(first, Some(BusEvent::Connected));
    }

    #[tokio::test]
    async fn connect_from_config() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let config = BridgeConfig::from_json(&format!(
            r#"{{"host": "127.0.0.1", "port": {port}, "ip": "10.0.0.60", "mac": "aa:bb"}}"#
        ))
        .unwrap();

        let result = MqttBus::builder().broker(&config.broker()).build().await;
        assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
    }

    #[tokio::test]
    async fn missing_host_fails() {
        let result = MqttBus::builder().port(1883).build().await;
        assert!(matches!(result, Err(ProtocolError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn unreachable_broker_times_out() {
        let port = get_test_port();

        let result = MqttBus::builder()
            .host("127.0.0.1")
            .port(port)
            .connection_timeout(Duration::from_millis(300))
            .reconnect_delay(Duration::from_millis(50))
            .build()
            .await;

        assert!(matches!(result, Err(ProtocolError::ConnectionFailed(_))));
    }

    #[tokio::test]
    async fn requests_fail_after_disconnect() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let (bus, _events) = MqttBus::builder()
            .host("127.0.0.1")
            .port(port)
            .build()
            .await
            .unwrap();

        assert!(bus.disconnect().await.is_ok());
        assert!(!bus.is_connected());

        assert!(matches!(
            bus.publish("lgtv2mqtt/tv/powerState", b"{}".to_vec(), true),
            Err(ProtocolError::ChannelClosed(_))
        ));
        assert!(matches!(
            bus.subscribe("lgtv2mqtt/tv/cmnd/power"),
            Err(ProtocolError::ChannelClosed(_))
        ));
    }
}

// ============================================================================
// Publish and subscribe
// ============================================================================

mod requests {
    use super::*;

    #[tokio::test]
    async fn publish_and_subscribe_are_queued() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let (bus, _events) = MqttBus::builder()
            .host("127.0.0.1")
            .port(port)
            .build()
            .await
            .unwrap();

        assert!(bus.subscribe("lgtv2mqtt/tv/cmnd/power").is_ok());
        assert!(
            bus.publish("lgtv2mqtt/tv/powerState", br#"{"state":"Active"}"#.to_vec(), true)
                .is_ok()
        );
    }
}
