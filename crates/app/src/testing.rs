//! In-memory transport double shared by the unit tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use mqtt_hass_domain::device::Device;
use mqtt_hass_domain::error::HassError;

use crate::hass::Hass;
use crate::ports::{Credentials, Transport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Connect(String),
    Publish { topic: String, payload: String },
    Subscribe(String),
}

/// Records every call; publishes and subscribes on a failing topic are
/// recorded and then rejected.
#[derive(Default)]
pub(crate) struct RecordingTransport {
    connected: AtomicBool,
    reject_connect: AtomicBool,
    failing: Mutex<HashSet<String>>,
    calls: Mutex<Vec<Call>>,
}

impl RecordingTransport {
    pub(crate) fn fail_on(&self, topic: &str) {
        self.failing.lock().unwrap().insert(topic.to_string());
    }

    pub(crate) fn recover(&self, topic: &str) {
        self.failing.lock().unwrap().remove(topic);
    }

    pub(crate) fn fail_connect(&self) {
        self.reject_connect.store(true, Ordering::SeqCst);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn published(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Publish { topic, payload } => Some((topic, payload)),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn subscriptions(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Subscribe(topic) => Some(topic),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call, topic: &str) -> Result<(), HassError> {
        self.calls.lock().unwrap().push(call);
        if self.failing.lock().unwrap().contains(topic) {
            return Err(HassError::transport(std::io::Error::other(format!(
                "rejected {topic}"
            ))));
        }
        Ok(())
    }
}

impl Transport for RecordingTransport {
    async fn connect(
        &self,
        client_id: &str,
        _credentials: Option<&Credentials>,
    ) -> Result<(), HassError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Connect(client_id.to_string()));
        if self.reject_connect.load(Ordering::SeqCst) {
            return Err(HassError::transport(std::io::Error::other(
                "connection refused",
            )));
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn publish(&self, topic: &str, payload: &[u8]) -> Result<(), HassError> {
        let call = Call::Publish {
            topic: topic.to_string(),
            payload: String::from_utf8_lossy(payload).into_owned(),
        };
        self.record(call, topic)
    }

    async fn subscribe(&self, topic: &str) -> Result<(), HassError> {
        self.record(Call::Subscribe(topic.to_string()), topic)
    }
}

pub(crate) fn device() -> Arc<Device> {
    Arc::new(
        Device::builder()
            .name("garage")
            .model("Argon")
            .build()
            .unwrap(),
    )
}

pub(crate) fn hass() -> Hass<RecordingTransport> {
    Hass::new(RecordingTransport::default(), "serial")
}
