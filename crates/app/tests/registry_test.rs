//! End-to-end tests of the registry with every entity kind.
//!
//! Each test wires a full device (binary sensor, sensor, button, lock, cover)
//! onto an in-memory broker log and drives it through the public API only.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use mqtt_hass_app::entity::{
    BinarySensor, Button, Cover, Lock, SensorBuilder, command_handler,
};
use mqtt_hass_app::ports::{Credentials, Transport};
use mqtt_hass_app::{Hass, Inbound};
use mqtt_hass_domain::device::Device;
use mqtt_hass_domain::error::HassError;
use mqtt_hass_domain::taxonomy::{
    BinarySensorClass, BinarySensorState, ButtonClass, CoverClass, CoverState, EntityCategory,
    LockState, SensorClass,
};
use mqtt_hass_domain::topic::STATUS_TOPIC;

/// Broker stand-in that keeps an ordered log of what reached it.
#[derive(Default)]
struct BrokerLog {
    connected: AtomicBool,
    published: Mutex<Vec<(String, String)>>,
    subscribed: Mutex<Vec<String>>,
}

impl Transport for BrokerLog {
    async fn connect(&self, _client_id: &str, credentials: Option<&Credentials>) -> Result<(), HassError> {
        if credentials.is_some_and(|c| c.password.is_empty()) {
            return Err(HassError::transport(std::io::Error::other("not authorized")));
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn publish(&self, topic: &str, payload: &[u8]) -> Result<(), HassError> {
        self.published.lock().unwrap().push((
            topic.to_string(),
            String::from_utf8_lossy(payload).into_owned(),
        ));
        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> Result<(), HassError> {
        self.subscribed.lock().unwrap().push(topic.to_string());
        Ok(())
    }
}

impl BrokerLog {
    fn published_topics(&self) -> Vec<String> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .map(|(topic, _)| topic.clone())
            .collect()
    }

    fn last_payload(&self, topic: &str) -> Option<String> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(t, _)| t == topic)
            .map(|(_, payload)| payload.clone())
    }

    fn reset(&self) {
        self.published.lock().unwrap().clear();
        self.subscribed.lock().unwrap().clear();
    }
}

fn device() -> Arc<Device> {
    Arc::new(
        Device::builder()
            .name("workshop")
            .model("Photon 2")
            .sw_version("0.4.0")
            .build()
            .expect("device should be valid"),
    )
}

/// Commands received by the handlers, in arrival order.
type Inbox = Arc<Mutex<Vec<(String, String)>>>;

struct Workshop {
    hass: Hass<BrokerLog>,
    door: Arc<BinarySensor<BrokerLog>>,
    lock: Arc<Lock<BrokerLog>>,
    cover: Arc<Cover<BrokerLog>>,
    inbox: Inbox,
}

async fn workshop() -> Workshop {
    let hass = Hass::new(BrokerLog::default(), "0a10aced202194944a02c8c4");
    hass.connect(Some(&Credentials::new("hass", "secret")))
        .await
        .expect("connect should succeed");

    let device = device();
    let inbox: Inbox = Arc::default();
    let recorder = |inbox: &Inbox| {
        let inbox = Arc::clone(inbox);
        command_handler(move |topic, payload| {
            inbox.lock().unwrap().push((
                topic.to_string(),
                String::from_utf8_lossy(payload).into_owned(),
            ));
        })
    };

    let door = Arc::new(
        BinarySensor::new(&hass, &device, "door", "Door", Some(BinarySensorClass::Door)).unwrap(),
    );
    let temperature = Arc::new(
        SensorBuilder::new("temperature", "Temperature")
            .device_class(SensorClass::Temperature)
            .unit_of_measurement("°C")
            .build(&hass, &device)
            .unwrap(),
    );
    let signal = Arc::new(
        SensorBuilder::new("signal", "Signal")
            .entity_category(EntityCategory::Diagnostic)
            .build(&hass, &device)
            .unwrap(),
    );
    let restart = Arc::new(
        Button::new(&device, "restart", "Restart", Some(ButtonClass::Restart), recorder(&inbox))
            .unwrap(),
    );
    let lock = Arc::new(Lock::new(&hass, &device, "lock", "Lock", recorder(&inbox)).unwrap());
    let cover = Arc::new(
        Cover::new(&hass, &device, "shutter", "Shutter", Some(CoverClass::Shutter), recorder(&inbox))
            .unwrap(),
    );

    hass.register_entity(door.clone()).await.unwrap();
    hass.register_entity(temperature).await.unwrap();
    hass.register_entity(signal).await.unwrap();
    hass.register_entity(restart).await.unwrap();
    hass.register_entity(lock.clone()).await.unwrap();
    hass.register_entity(cover.clone()).await.unwrap();

    Workshop {
        hass,
        door,
        lock,
        cover,
        inbox,
    }
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_announce_every_entity_in_registration_order() {
    let ws = workshop().await;

    assert_eq!(ws.hass.len(), 6);
    assert_eq!(
        ws.hass.transport().published_topics(),
        vec![
            "homeassistant/binary_sensor/particle_workshop/door/config",
            "homeassistant/sensor/particle_workshop/temperature/config",
            "homeassistant/sensor/particle_workshop/signal/config",
            "homeassistant/button/particle_workshop/restart/config",
            "homeassistant/lock/particle_workshop/lock/config",
            "homeassistant/cover/particle_workshop/shutter/config",
        ]
    );
}

#[tokio::test]
async fn should_subscribe_status_and_command_topics() {
    let ws = workshop().await;

    assert_eq!(
        *ws.hass.transport().subscribed.lock().unwrap(),
        vec![
            STATUS_TOPIC.to_string(),
            "homeassistant/button/particle_workshop/restart/command".to_string(),
            "homeassistant/lock/particle_workshop/lock/command".to_string(),
            "homeassistant/cover/particle_workshop/shutter/command".to_string(),
        ]
    );
}

#[tokio::test]
async fn should_publish_hub_compatible_discovery_payload() {
    let ws = workshop().await;

    let payload = ws
        .hass
        .transport()
        .last_payload("homeassistant/sensor/particle_workshop/temperature/config")
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&payload).unwrap();

    assert_eq!(value["name"], "Temperature");
    assert_eq!(value["unique_id"], "0a10aced202194944a02c8c4_temperature");
    assert_eq!(
        value["availability_topic"],
        "homeassistant/sensor/particle_workshop/temperature/availability"
    );
    assert_eq!(value["device"]["identifiers"][0], "particle_workshop");
    assert_eq!(value["device"]["sw_version"], "0.4.0");
    assert_eq!(value["device"]["manufacturer"], "Particle MQTT_HASS");
    assert_eq!(value["device_class"], "temperature");
    assert_eq!(value["unit_of_measurement"], "°C");
    assert!(value.get("entity_category").is_none());
    assert!(value.get("command_topic").is_none());
}

// ---------------------------------------------------------------------------
// Hub restart
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_reannounce_everything_when_hub_comes_back() {
    let ws = workshop().await;
    ws.hass.transport().reset();

    let outcome = ws.hass.on_inbound_message(STATUS_TOPIC, b"online").await;

    match outcome {
        Inbound::HubRestart(report) => {
            assert_eq!(report.replayed, 6);
            assert!(report.is_complete());
        }
        other => panic!("expected a replay, got {other:?}"),
    }
    let topics = ws.hass.transport().published_topics();
    assert_eq!(topics.len(), 12);
    assert!(topics[..6].iter().all(|t| t.ends_with("/config")));
    assert!(topics[6..].iter().all(|t| t.ends_with("/availability")));
}

// ---------------------------------------------------------------------------
// Commands and state
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_route_commands_to_their_entity() {
    let ws = workshop().await;

    ws.hass
        .on_inbound_message("homeassistant/lock/particle_workshop/lock/command", b"UNLOCK")
        .await;
    ws.hass
        .on_inbound_message("homeassistant/cover/particle_workshop/shutter/command", b"CLOSE")
        .await;

    assert_eq!(
        *ws.inbox.lock().unwrap(),
        vec![
            (
                "homeassistant/lock/particle_workshop/lock/command".to_string(),
                "UNLOCK".to_string()
            ),
            (
                "homeassistant/cover/particle_workshop/shutter/command".to_string(),
                "CLOSE".to_string()
            ),
        ]
    );
}

#[tokio::test]
async fn should_publish_state_vocabularies_verbatim() {
    let ws = workshop().await;

    ws.door.update_state(BinarySensorState::On).await.unwrap();
    ws.lock.update_state(LockState::Unlocked).await.unwrap();
    ws.cover.update_state(CoverState::Closing).await.unwrap();

    let log = ws.hass.transport();
    assert_eq!(
        log.last_payload("homeassistant/binary_sensor/particle_workshop/door/state")
            .as_deref(),
        Some("ON")
    );
    assert_eq!(
        log.last_payload("homeassistant/lock/particle_workshop/lock/state")
            .as_deref(),
        Some("UNLOCKED")
    );
    assert_eq!(
        log.last_payload("homeassistant/cover/particle_workshop/shutter/state")
            .as_deref(),
        Some("closing")
    );
}

#[tokio::test]
async fn should_reject_connect_with_empty_password() {
    let hass = Hass::new(BrokerLog::default(), "serial");

    let result = hass.connect(Some(&Credentials::new("hass", ""))).await;

    assert!(matches!(result, Err(HassError::Transport(_))));
    assert!(!hass.is_connected());
}
