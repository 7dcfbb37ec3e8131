//! # mqtt-hass-adapter-mqtt
//!
//! MQTT adapter: carries the mqtt-hass registry's traffic over a real
//! broker connection using [`rumqttc`].
//!
//! ## Responsibilities
//! - Open a session with the broker and wait for it to be accepted
//! - Drive the rumqttc event loop on a background task
//! - Forward inbound PUBLISH packets as [`InboundMessage`]s on a channel
//! - Publish and subscribe at QoS 0, never retained
//!
//! ## Dependency rule
//! Depends on `mqtt-hass-app` (for the [`Transport`] port) and
//! `mqtt-hass-domain` (for the error type).

pub mod config;
pub mod error;
mod event_loop;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use mqtt_hass_app::ports::{Credentials, Transport};
use mqtt_hass_domain::error::HassError;
use rumqttc::{AsyncClient, MqttOptions, QoS};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

pub use config::MqttConfig;
pub use error::MqttError;

/// A message received from the broker on one of the subscribed topics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

struct Session {
    client: AsyncClient,
    task: JoinHandle<()>,
}

/// [`Transport`] backed by a rumqttc [`AsyncClient`].
pub struct RumqttTransport {
    config: MqttConfig,
    session: Mutex<Option<Session>>,
    connected: Arc<AtomicBool>,
    inbound_tx: mpsc::Sender<InboundMessage>,
}

impl RumqttTransport {
    /// Create a disconnected transport together with the receiving end of its
    /// inbound message queue.
    #[must_use]
    pub fn new(config: MqttConfig) -> (Self, mpsc::Receiver<InboundMessage>) {
        let (inbound_tx, inbound_rx) = mpsc::channel(config.channel_capacity.max(1));
        let transport = Self {
            config,
            session: Mutex::new(None),
            connected: Arc::new(AtomicBool::new(false)),
            inbound_tx,
        };
        (transport, inbound_rx)
    }

    /// Send a DISCONNECT to the broker and stop the event loop.
    ///
    /// # Errors
    ///
    /// Returns [`MqttError::NotConnected`] if no session is open, or
    /// [`MqttError::Client`] if the request could not be queued.
    pub async fn disconnect(&self) -> Result<(), MqttError> {
        let session = self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(MqttError::NotConnected)?;
        self.connected.store(false, Ordering::SeqCst);
        let result = session.client.disconnect().await.map_err(MqttError::from);
        // Give the event loop a moment to flush the DISCONNECT packet.
        tokio::time::sleep(Duration::from_millis(50)).await;
        session.task.abort();
        tracing::info!("disconnected from broker");
        result
    }

    fn client(&self) -> Result<AsyncClient, MqttError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(MqttError::NotConnected);
        }
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|session| session.client.clone())
            .ok_or(MqttError::NotConnected)
    }

    async fn open(
        &self,
        client_id: &str,
        credentials: Option<&Credentials>,
    ) -> Result<(), MqttError> {
        let stale = self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(stale) = stale {
            stale.task.abort();
        }
        self.connected.store(false, Ordering::SeqCst);

        let mut options = MqttOptions::new(
            client_id,
            self.config.broker_host.as_str(),
            self.config.broker_port,
        );
        options.set_keep_alive(Duration::from_secs(u64::from(self.config.keep_alive_secs)));
        options.set_clean_session(true);
        if let Some(credentials) = credentials {
            options.set_credentials(credentials.username.as_str(), credentials.password.as_str());
        }

        let (client, events) = AsyncClient::new(options, self.config.channel_capacity.max(1));
        let (ready_tx, ready_rx) = oneshot::channel();
        let task = tokio::spawn(event_loop::run(
            events,
            Arc::clone(&self.connected),
            self.inbound_tx.clone(),
            ready_tx,
        ));

        let timeout = Duration::from_secs(u64::from(self.config.connect_timeout_secs));
        let outcome = match tokio::time::timeout(timeout, ready_rx).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(MqttError::NotConnected),
            Err(_) => Err(MqttError::ConnectTimeout(timeout)),
        };
        if let Err(err) = outcome {
            task.abort();
            self.connected.store(false, Ordering::SeqCst);
            return Err(err);
        }

        *self.session.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(Session { client, task });
        Ok(())
    }
}

impl Transport for RumqttTransport {
    #[tracing::instrument(skip(self, credentials), fields(host = %self.config.broker_host, port = self.config.broker_port))]
    async fn connect(
        &self,
        client_id: &str,
        credentials: Option<&Credentials>,
    ) -> Result<(), HassError> {
        self.open(client_id, credentials).await?;
        tracing::info!("connected to broker");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn publish(&self, topic: &str, payload: &[u8]) -> Result<(), HassError> {
        let client = self.client()?;
        client
            .publish(topic, QoS::AtMostOnce, false, payload.to_vec())
            .await
            .map_err(MqttError::from)?;
        tracing::trace!(topic, bytes = payload.len(), "published");
        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> Result<(), HassError> {
        let client = self.client()?;
        client
            .subscribe(topic, QoS::AtMostOnce)
            .await
            .map_err(MqttError::from)?;
        tracing::debug!(topic, "subscribed");
        Ok(())
    }
}
