//! # mqtt-hassd: mqtt-hass daemon
//!
//! Composition root that wires the MQTT transport to the registry and
//! announces a demo device to Home Assistant.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Install the tracing subscriber
//! - Construct the transport adapter and the registry
//! - Register the demo entities and keep their availability fresh
//! - Route inbound messages and commands until Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;
mod demo;

use std::sync::Arc;
use std::time::Duration;

use mqtt_hass_adapter_mqtt::RumqttTransport;
use mqtt_hass_app::{Hass, Inbound};
use mqtt_hass_domain::device::Device;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::demo::DemoDevice;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    let filter = EnvFilter::try_new(&config.logging.filter).unwrap_or_else(|err| {
        eprintln!("invalid log filter {:?}: {err}", config.logging.filter);
        EnvFilter::new("info")
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let serial = config.serial()?;
    let credentials = config.credentials();
    let (transport, mut inbound) = RumqttTransport::new(config.mqtt.clone());
    let hass = Hass::new(transport, &serial);

    tracing::info!(
        host = %config.mqtt.broker_host,
        port = config.mqtt.broker_port,
        device = %config.device.name,
        "starting"
    );
    hass.connect(credentials.as_ref()).await?;

    let device = Arc::new(
        Device::builder()
            .name(config.device.name.as_str())
            .model(config.device.model.as_str())
            .sw_version(env!("CARGO_PKG_VERSION"))
            .build()?,
    );
    let (commands_tx, mut commands) = mpsc::unbounded_channel();
    let mut demo = DemoDevice::register(&hass, &device, &commands_tx).await?;

    if let Err(err) = hass.publish_availabilities().await {
        tracing::warn!(error = %err, "initial availability failed");
    }
    if let Err(err) = demo.publish_initial_states().await {
        tracing::warn!(error = %err, "initial state failed");
    }

    let mut tick = tokio::time::interval(Duration::from_secs(config.availability.interval_secs));
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            Some(message) = inbound.recv() => {
                match hass.on_inbound_message(&message.topic, &message.payload).await {
                    Inbound::HubRestart(report) if !report.is_complete() => {
                        tracing::warn!(
                            replayed = report.replayed,
                            failures = report.discovery_failures.len(),
                            "hub restart replay incomplete"
                        );
                    }
                    Inbound::Dispatched(0) => {
                        tracing::debug!(topic = %message.topic, "no handler for message");
                    }
                    _ => {}
                }
            }
            Some(command) = commands.recv() => {
                if let Err(err) = demo.apply(command).await {
                    tracing::warn!(error = %err, "failed to echo command state");
                }
            }
            _ = tick.tick() => {
                if !hass.is_ready() {
                    tracing::info!("reconnecting");
                    if let Err(err) = hass.connect(credentials.as_ref()).await {
                        tracing::warn!(error = %err, "reconnect failed");
                        continue;
                    }
                }
                if let Err(err) = hass.publish_availabilities().await {
                    tracing::warn!(error = %err, "availability round failed");
                }
                if let Err(err) = demo.refresh_uptime().await {
                    tracing::warn!(error = %err, "uptime refresh failed");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                break;
            }
        }
    }

    if let Err(err) = hass.transport().disconnect().await {
        tracing::debug!(error = %err, "disconnect failed");
    }
    Ok(())
}
