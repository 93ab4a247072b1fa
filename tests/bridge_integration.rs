// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end tests of the bridge with in-memory bus and TV fakes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::sync::{broadcast, mpsc};

use lgtv2mqtt::{
    Bridge, BridgeConfig, BusEvent, Dispatch, MessageBus, ProtocolError, TvCommand, TvControl,
    TvEvent, TvEventBus, TvHandle,
};

// ============================================================================
// Fakes
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Published {
    topic: String,
    payload: Vec<u8>,
    retain: bool,
}

impl Published {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.payload).unwrap()
    }
}

#[derive(Default)]
struct FakeBus {
    published: Mutex<Vec<Published>>,
    subscribed: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl FakeBus {
    fn published(&self) -> Vec<Published> {
        self.published.lock().clone()
    }

    fn published_to(&self, topic: &str) -> Vec<Published> {
        self.published()
            .into_iter()
            .filter(|p| p.topic == topic)
            .collect()
    }
}

impl MessageBus for FakeBus {
    fn publish(&self, topic: &str, payload: Vec<u8>, retain: bool) -> Result<(), ProtocolError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ProtocolError::ChannelClosed("fake bus".to_string()));
        }
        self.published.lock().push(Published {
            topic: topic.to_string(),
            payload,
            retain,
        });
        Ok(())
    }

    fn subscribe(&self, topic: &str) -> Result<(), ProtocolError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ProtocolError::ChannelClosed("fake bus".to_string()));
        }
        self.subscribed.lock().push(topic.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    PowerOn,
    PowerOff,
    VolumeUp,
    VolumeDown,
    SetVolumeLevel(u8),
    SetMute(bool),
    ScreenOn,
    ScreenOff,
    LaunchApplication(String),
    OpenChannel(u32, String),
}

#[derive(Default)]
struct FakeTv {
    powered_on: AtomicBool,
    live_tv: AtomicBool,
    calls: Mutex<Vec<Call>>,
    events: TvEventBus,
}

impl FakeTv {
    fn set_powered_on(&self, on: bool) {
        self.powered_on.store(on, Ordering::SeqCst);
    }

    fn set_live_tv(&self, active: bool) {
        self.live_tv.store(active, Ordering::SeqCst);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

impl TvControl for FakeTv {
    fn power_on(&self) {
        self.record(Call::PowerOn);
    }
    fn power_off(&self) {
        self.record(Call::PowerOff);
    }
    fn is_powered_on(&self) -> bool {
        self.powered_on.load(Ordering::SeqCst)
    }
    fn is_live_tv_active(&self) -> bool {
        self.live_tv.load(Ordering::SeqCst)
    }
    fn volume_up(&self) {
        self.record(Call::VolumeUp);
    }
    fn volume_down(&self) {
        self.record(Call::VolumeDown);
    }
    fn set_volume_level(&self, level: u8) {
        self.record(Call::SetVolumeLevel(level));
    }
    fn set_mute(&self, muted: bool) {
        self.record(Call::SetMute(muted));
    }
    fn screen_on(&self) {
        self.record(Call::ScreenOn);
    }
    fn screen_off(&self) {
        self.record(Call::ScreenOff);
    }
    fn launch_application(&self, app_id: &str) {
        self.record(Call::LaunchApplication(app_id.to_string()));
    }
    fn open_channel(&self, number: u32, channel_id: &str) {
        self.record(Call::OpenChannel(number, channel_id.to_string()));
    }
    fn subscribe(&self) -> broadcast::Receiver<TvEvent> {
        self.events.subscribe()
    }
}

const CONFIG: &str = r#"{
    "host": "broker",
    "name": "tv",
    "ip": "192.168.1.60",
    "mac": "a8:23:fe:00:11:22"
}"#;

fn setup() -> (Bridge<FakeBus, FakeTv>, Arc<FakeBus>, Arc<FakeTv>) {
    let config = BridgeConfig::from_json(CONFIG).unwrap();
    let bus = Arc::new(FakeBus::default());
    let tv = Arc::new(FakeTv::default());
    let bridge = Bridge::new(&config, Arc::clone(&bus), Arc::clone(&tv)).unwrap();
    (bridge, bus, tv)
}

fn command(bridge: &Bridge<FakeBus, FakeTv>, leaf: &str, payload: &str) -> Option<Dispatch> {
    bridge.handle_bus_event(BusEvent::Message {
        topic: format!("lgtv2mqtt/tv/cmnd/{leaf}"),
        payload: payload.to_string(),
    })
}

// ============================================================================
// Commands
// ============================================================================

mod commands {
    use super::*;

    #[test]
    fn power_on_invokes_once_without_publishing() {
        let (bridge, bus, tv) = setup();

        assert_eq!(command(&bridge, "power", "on"), Some(Dispatch::Invoked));
        assert_eq!(tv.calls(), vec![Call::PowerOn]);
        assert!(bus.published().is_empty());
    }

    #[test]
    fn volume_level_requires_power() {
        let (bridge, _bus, tv) = setup();

        assert_eq!(command(&bridge, "volume", "37"), Some(Dispatch::Unavailable));
        assert!(tv.calls().is_empty());

        tv.set_powered_on(true);
        assert_eq!(command(&bridge, "volume", "37"), Some(Dispatch::Invoked));
        assert_eq!(tv.calls(), vec![Call::SetVolumeLevel(37)]);
    }

    #[test]
    fn volume_steps() {
        let (bridge, _bus, tv) = setup();
        tv.set_powered_on(true);

        command(&bridge, "volume", "up");
        command(&bridge, "volume", "down");
        command(&bridge, "volume", "NaN");
        command(&bridge, "volume", "300");
        assert_eq!(
            tv.calls(),
            vec![Call::VolumeUp, Call::VolumeDown, Call::SetVolumeLevel(100)]
        );
    }

    #[test]
    fn application_label_resolution() {
        let (bridge, _bus, tv) = setup();
        tv.set_powered_on(true);

        assert_eq!(command(&bridge, "application", "Netflix"), Some(Dispatch::Invoked));
        assert_eq!(command(&bridge, "application", "NotAThing"), Some(Dispatch::Ignored));
        assert_eq!(
            tv.calls(),
            vec![Call::LaunchApplication("netflix".to_string())]
        );
    }

    #[test]
    fn live_tv_channel_requires_live_tv() {
        let (bridge, _bus, tv) = setup();
        tv.set_powered_on(true);

        assert_eq!(command(&bridge, "liveTvChannel", "E4"), Some(Dispatch::Unavailable));
        assert!(tv.calls().is_empty());

        tv.set_live_tv(true);
        assert_eq!(command(&bridge, "liveTvChannel", "E4"), Some(Dispatch::Invoked));
        assert_eq!(
            tv.calls(),
            vec![Call::OpenChannel(13, "1_26_13_13_8197_8448_9018".to_string())]
        );
    }

    #[test]
    fn live_tv_without_power_is_unavailable() {
        let (bridge, _bus, tv) = setup();
        tv.set_live_tv(true);

        assert_eq!(command(&bridge, "liveTvChannel", "E4+1"), Some(Dispatch::Unavailable));
        assert!(tv.calls().is_empty());
    }

    #[test]
    fn mute_and_screen() {
        let (bridge, _bus, tv) = setup();
        tv.set_powered_on(true);

        command(&bridge, "mute", "on");
        command(&bridge, "mute", "off");
        command(&bridge, "screen", "off");
        command(&bridge, "screen", "on");
        assert_eq!(
            tv.calls(),
            vec![
                Call::SetMute(true),
                Call::SetMute(false),
                Call::ScreenOff,
                Call::ScreenOn
            ]
        );
    }

    #[test]
    fn unknown_leaf_dropped() {
        let (bridge, bus, tv) = setup();
        tv.set_powered_on(true);

        assert_eq!(command(&bridge, "reboot", "now"), Some(Dispatch::UnknownTopic));
        assert_eq!(
            bridge.handle_bus_event(BusEvent::Message {
                topic: "zigbee2mqtt/lamp".to_string(),
                payload: "{}".to_string(),
            }),
            Some(Dispatch::UnknownTopic)
        );
        assert!(tv.calls().is_empty());
        assert!(bus.published().is_empty());
    }

    #[test]
    fn power_off_while_off() {
        let (bridge, _bus, tv) = setup();

        command(&bridge, "power", "off");
        command(&bridge, "power", "maybe");
        assert_eq!(tv.calls(), vec![Call::PowerOff]);
    }
}

// ============================================================================
// Events
// ============================================================================

mod events {
    use super::*;

    #[test]
    fn foreground_app_published_retained() {
        let (bridge, bus, _tv) = setup();

        assert!(bridge.handle_tv_event(&TvEvent::ForegroundAppChanged(json!({"appId": "netflix"}))));

        let published = bus.published_to("lgtv2mqtt/tv/foregroundApp");
        assert_eq!(published.len(), 1);
        assert!(published[0].retain);
        assert_eq!(published[0].json(), json!({"appId": "netflix"}));
    }

    #[test]
    fn each_event_published_once() {
        let (bridge, bus, _tv) = setup();

        bridge.handle_tv_event(&TvEvent::LiveTvChannelChanged(json!({"channelNumber": "13"})));
        bridge.handle_tv_event(&TvEvent::LiveTvChannelChanged(json!({"channelNumber": "30"})));

        let published = bus.published_to("lgtv2mqtt/tv/liveTvChannel");
        assert_eq!(published.len(), 2);
        assert_eq!(published[1].json(), json!({"channelNumber": "30"}));
    }

    #[test]
    fn publish_failure_is_survivable() {
        let (bridge, bus, _tv) = setup();

        bus.failing.store(true, Ordering::SeqCst);
        assert!(!bridge.handle_tv_event(&TvEvent::PowerStateChanged(json!({"state": "Active"}))));

        bus.failing.store(false, Ordering::SeqCst);
        assert!(bridge.handle_tv_event(&TvEvent::PowerStateChanged(json!({"state": "Active"}))));
        assert_eq!(bus.published_to("lgtv2mqtt/tv/powerState").len(), 1);
    }
}

// ============================================================================
// Announcement
// ============================================================================

mod announcement {
    use super::*;

    #[test]
    fn connected_publishes_discovery_and_subscribes_commands() {
        let (bridge, bus, _tv) = setup();

        bridge.handle_bus_event(BusEvent::Connected);

        let published = bus.published();
        assert_eq!(published.len(), 15);
        assert!(published.iter().all(|p| p.retain));
        assert!(
            published
                .iter()
                .all(|p| p.topic.starts_with("homeassistant/") && p.topic.ends_with("/config"))
        );

        let mut subscribed = bus.subscribed.lock().clone();
        subscribed.sort();
        assert_eq!(
            subscribed,
            vec![
                "lgtv2mqtt/tv/cmnd/application",
                "lgtv2mqtt/tv/cmnd/liveTvChannel",
                "lgtv2mqtt/tv/cmnd/mute",
                "lgtv2mqtt/tv/cmnd/power",
                "lgtv2mqtt/tv/cmnd/screen",
                "lgtv2mqtt/tv/cmnd/volume",
            ]
        );
    }

    #[test]
    fn reannouncement_is_identical() {
        let (bridge, bus, _tv) = setup();

        bridge.announce();
        let first = bus.published();
        bus.published.lock().clear();

        bridge.announce();
        assert_eq!(bus.published(), first);
    }

    #[test]
    fn separate_bridges_announce_identical_documents() {
        let (first_bridge, first_bus, _) = setup();
        let (second_bridge, second_bus, _) = setup();

        first_bridge.announce();
        second_bridge.announce();
        assert_eq!(first_bus.published(), second_bus.published());
    }

    #[test]
    fn application_select_descriptor() {
        let (bridge, bus, _tv) = setup();
        bridge.announce();

        assert!(bus.published_to("homeassistant/select/tv/application/config").is_empty());
        let select = bus.published_to("homeassistant/select/tv/appid/config");
        assert_eq!(select.len(), 1);

        let doc = select[0].json();
        assert_eq!(doc["unique_id"], "tv_application");
        assert_eq!(doc["command_topic"], "lgtv2mqtt/tv/cmnd/application");
        assert_eq!(doc["state_topic"], "lgtv2mqtt/tv/foregroundApp");

        let options = doc["options"].as_array().unwrap();
        assert_eq!(options.first().unwrap(), "Home");
        assert_eq!(options.last().unwrap(), "Unknown");
        assert!(options.contains(&json!("Netflix")));
    }

    #[test]
    fn announce_failures_do_not_stop_announcement() {
        let (bridge, bus, _tv) = setup();
        bus.failing.store(true, Ordering::SeqCst);

        bridge.announce();
        assert!(bus.published().is_empty());
        assert!(bus.subscribed.lock().is_empty());
    }
}

// ============================================================================
// Run loop
// ============================================================================

mod run_loop {
    use super::*;

    #[tokio::test]
    async fn run_processes_tv_events_and_bus_messages() {
        let (bridge, bus, tv) = setup();
        let (bus_tx, bus_rx) = mpsc::channel(16);

        tv.events
            .publish(TvEvent::ForegroundAppChanged(json!({"appId": "youtube.leanback.v4"})));
        bus_tx.send(BusEvent::Connected).await.unwrap();
        bus_tx
            .send(BusEvent::Message {
                topic: "lgtv2mqtt/tv/cmnd/power".to_string(),
                payload: "on".to_string(),
            })
            .await
            .unwrap();
        drop(bus_tx);

        bridge.run(bus_rx).await;

        assert_eq!(bus.published_to("lgtv2mqtt/tv/foregroundApp").len(), 1);
        assert_eq!(bus.subscribed.lock().len(), 6);
        assert_eq!(tv.calls(), vec![Call::PowerOn]);
    }

    #[tokio::test]
    async fn every_reconnect_reannounces() {
        let (bridge, bus, _tv) = setup();
        let (bus_tx, bus_rx) = mpsc::channel(16);

        for _ in 0..3 {
            bus_tx.send(BusEvent::Connected).await.unwrap();
        }
        drop(bus_tx);

        bridge.run(bus_rx).await;
        assert_eq!(bus.published().len(), 45);
        assert_eq!(bus.subscribed.lock().len(), 18);
    }

    #[tokio::test]
    async fn tv_handle_state_gates_commands() {
        let config = BridgeConfig::from_json(CONFIG).unwrap();
        let bus = Arc::new(FakeBus::default());
        let (tv, mut link) = TvHandle::new();
        let bridge = Bridge::new(&config, Arc::clone(&bus), Arc::new(tv)).unwrap();
        let (bus_tx, bus_rx) = mpsc::channel(16);

        link.emit(TvEvent::PowerStateChanged(json!({"state": "Active"})));
        link.emit(TvEvent::ForegroundAppChanged(json!({"appId": "com.webos.app.livetv"})));
        bus_tx
            .send(BusEvent::Message {
                topic: "lgtv2mqtt/tv/cmnd/liveTvChannel".to_string(),
                payload: "E4+1".to_string(),
            })
            .await
            .unwrap();
        bus_tx
            .send(BusEvent::Message {
                topic: "lgtv2mqtt/tv/cmnd/volume".to_string(),
                payload: "12".to_string(),
            })
            .await
            .unwrap();
        drop(bus_tx);

        bridge.run(bus_rx).await;

        assert_eq!(
            link.try_recv_command(),
            Some(TvCommand::OpenChannel {
                number: 30,
                id: "1_26_30_30_8197_8458_9018".to_string(),
            })
        );
        assert_eq!(link.try_recv_command(), Some(TvCommand::SetVolumeLevel(12)));
        assert_eq!(link.try_recv_command(), None);

        assert_eq!(bus.published_to("lgtv2mqtt/tv/powerState").len(), 1);
        assert_eq!(bus.published_to("lgtv2mqtt/tv/foregroundApp").len(), 1);
    }
}
