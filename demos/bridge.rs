// SPDX-License-Identifier: MPL-2.0

//! Runs the bridge with a line-based stand-in for the TV transport.
//!
//! TV events are read from stdin as one JSON document per line, and every
//! command the bridge issues is written to stdout the same way. This lets
//! the bridge be driven by hand, or by any process speaking to the TV.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example bridge -- [config_path]
//! ```
//!
//! # Examples
//!
//! ```bash
//! # Use /etc/lgtv-config.json
//! cargo run --example bridge
//!
//! # Feed a power event and watch lgtv2mqtt/tv/powerState
//! echo '{"event":"POWER_STATE_CHANGED","payload":{"state":"Active"}}' \
//!     | RUST_LOG=lgtv2mqtt=debug cargo run --example bridge -- ./lgtv-config.json
//! ```

use std::env;
use std::sync::Arc;

use lgtv2mqtt::config::DEFAULT_CONFIG_PATH;
use lgtv2mqtt::{Bridge, BridgeConfig, MqttBus, TvEvent, TvHandle, TvLink};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lgtv2mqtt=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let path = env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = BridgeConfig::load(&path)?;
    tracing::info!(
        path = %path,
        broker = %config.host(),
        tv = %config.ip(),
        name = %config.name(),
        "Configuration loaded"
    );

    let (bus, bus_events) = MqttBus::builder()
        .broker(&config.broker())
        .build()
        .await?;
    let (tv, link) = TvHandle::new();

    let bridge = Bridge::new(&config, Arc::new(bus), Arc::new(tv))?;
    tokio::spawn(drive_transport(link));

    bridge.run(bus_events).await;
    Ok(())
}

/// Feeds stdin events into the link and prints queued commands.
async fn drive_transport(mut link: TvLink) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) if line.trim().is_empty() => {}
                Ok(Some(line)) => match serde_json::from_str::<TvEvent>(&line) {
                    Ok(event) => link.emit(event),
                    Err(e) => tracing::warn!(error = %e, "Skipping malformed event line"),
                },
                Ok(None) => stdin_open = false,
                Err(e) => {
                    tracing::error!(error = %e, "Cannot read stdin");
                    stdin_open = false;
                }
            },
            command = link.recv_command() => match command {
                Some(command) => match serde_json::to_string(&command) {
                    Ok(json) => println!("{json}"),
                    Err(e) => tracing::warn!(error = %e, "Cannot encode command"),
                },
                None => break,
            },
        }
    }
}
