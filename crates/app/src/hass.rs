//! Registry and dispatcher: owns the registered entities and routes every
//! inbound message.
//!
//! The registry is an explicit context object: the embedding application
//! builds one, hands it by reference to the entity constructors and feeds it
//! the transport's inbound messages. It performs no timing of its own;
//! [`Hass::publish_availabilities`] is meant to be driven by the application
//! every 30 seconds or less.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use mqtt_hass_domain::error::HassError;
use mqtt_hass_domain::topic::{ONLINE, STATUS_TOPIC};

use crate::entity::Entity;
use crate::ports::{Credentials, Transport};
use crate::publisher::Publisher;

/// Outcome of [`Hass::on_inbound_message`].
#[derive(Debug)]
pub enum Inbound {
    /// The hub announced a restart and every entity was replayed.
    HubRestart(ReplayReport),
    /// A message on the status topic other than `online`.
    StatusIgnored,
    /// A command message; holds the number of handlers invoked (0 when no
    /// entity owns the topic).
    Dispatched(usize),
}

/// Result of the discovery replay triggered by a hub restart.
#[derive(Debug)]
pub struct ReplayReport {
    /// Number of entities whose discovery was attempted.
    pub replayed: usize,
    /// Entities whose discovery failed, by name, in registration order.
    pub discovery_failures: Vec<(String, HassError)>,
    /// Outcome of the availability pass that follows the replay.
    pub availability: Result<(), HassError>,
}

impl ReplayReport {
    /// Whether every publish of the replay succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.discovery_failures.is_empty() && self.availability.is_ok()
    }
}

/// Entity registry bound to one transport session and one device serial.
pub struct Hass<T> {
    publisher: Publisher<T>,
    entities: Mutex<Vec<Arc<dyn Entity>>>,
    /// Set once the current session holds every subscription.
    subscribed: AtomicBool,
}

impl<T: Transport> Hass<T> {
    /// Create a registry publishing through `transport`.
    ///
    /// `serial` must be unique per physical device; it scopes unique ids and
    /// client ids.
    pub fn new(transport: T, serial: impl AsRef<str>) -> Self {
        Self {
            publisher: Publisher::new(transport, serial.as_ref()),
            entities: Mutex::new(Vec::new()),
            subscribed: AtomicBool::new(false),
        }
    }

    /// Publishing handle for entities bound to this registry.
    #[must_use]
    pub fn publisher(&self) -> Publisher<T> {
        self.publisher.clone()
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        self.publisher.transport()
    }

    #[must_use]
    pub fn serial(&self) -> &str {
        self.publisher.serial()
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.transport().is_connected()
    }

    /// Whether the session is open and holds the status and command
    /// subscriptions.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.is_connected() && self.subscribed.load(Ordering::SeqCst)
    }

    /// Number of registered entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock_entities().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock_entities().is_empty()
    }

    /// Open a transport session unless a ready one is already open.
    ///
    /// A new session uses the client id `<serial>_<unix-seconds>`, subscribes
    /// to the hub status topic and re-subscribes the command topic of every
    /// registered entity that has a handler. Registered entities are kept.
    /// When a previous call connected but failed to subscribe, the session is
    /// reused and only the subscriptions are retried.
    ///
    /// # Errors
    ///
    /// Returns [`HassError::Transport`] if connecting or any subscribe fails.
    #[tracing::instrument(skip(self, credentials), fields(serial = self.serial()))]
    pub async fn connect(&self, credentials: Option<&Credentials>) -> Result<(), HassError> {
        if self.is_ready() {
            tracing::debug!("already connected");
            return Ok(());
        }

        if !self.is_connected() {
            self.subscribed.store(false, Ordering::SeqCst);
            let client_id = client_id(self.serial(), Utc::now());
            self.transport().connect(&client_id, credentials).await?;
            tracing::info!(%client_id, "session opened");
        }

        self.transport().subscribe(STATUS_TOPIC).await?;
        for entity in self.snapshot() {
            if entity.command_handler().is_some() {
                self.transport()
                    .subscribe(&entity.topic_base().command())
                    .await?;
            }
        }
        self.subscribed.store(true, Ordering::SeqCst);

        tracing::info!(entities = self.len(), "connected");
        Ok(())
    }

    /// Publish the entity's discovery payload, then track it.
    ///
    /// The entity is tracked even when discovery fails: an error means the
    /// announcement may need to be retried, not that the entity is unknown.
    ///
    /// # Errors
    ///
    /// Returns the discovery error, see [`Publisher::publish_discovery`].
    #[tracing::instrument(skip(self, entity), fields(entity = entity.name()))]
    pub async fn register_entity(&self, entity: Arc<dyn Entity>) -> Result<(), HassError> {
        let result = self.publisher.publish_discovery(entity.as_ref()).await;
        if let Err(err) = &result {
            tracing::warn!(%err, "discovery failed, entity registered anyway");
        }
        self.lock_entities().push(entity);
        result
    }

    /// Publish `online` for every entity in registration order.
    ///
    /// Stops at the first failure; the remaining entities are not attempted
    /// and the caller is expected to retry the whole pass.
    ///
    /// # Errors
    ///
    /// Returns the first [`HassError::Transport`] encountered.
    pub async fn publish_availabilities(&self) -> Result<(), HassError> {
        for entity in self.snapshot() {
            self.publisher.publish_availability(entity.as_ref()).await?;
        }
        Ok(())
    }

    /// Route one inbound message.
    ///
    /// `online` on the hub status topic replays discovery for every entity
    /// (best effort, failures are collected) followed by an availability
    /// pass. Any other topic invokes the handler of the entity whose command
    /// topic matches exactly; an unknown topic is not an error.
    #[tracing::instrument(skip(self, payload), fields(len = payload.len()))]
    pub async fn on_inbound_message(&self, topic: &str, payload: &[u8]) -> Inbound {
        if topic == STATUS_TOPIC {
            if payload != ONLINE.as_bytes() {
                tracing::debug!(
                    payload = %String::from_utf8_lossy(payload),
                    "ignoring hub status"
                );
                return Inbound::StatusIgnored;
            }
            return Inbound::HubRestart(self.replay().await);
        }

        let mut invoked = 0;
        for entity in self.snapshot() {
            if !entity.topic_base().is_command_topic(topic) {
                continue;
            }
            if let Some(handler) = entity.command_handler() {
                handler(topic, payload);
                invoked += 1;
            }
        }
        if invoked == 0 {
            tracing::trace!("no entity owns topic");
        }
        Inbound::Dispatched(invoked)
    }

    async fn replay(&self) -> ReplayReport {
        let entities = self.snapshot();
        tracing::info!(entities = entities.len(), "hub restarted, replaying discovery");

        let mut discovery_failures = Vec::new();
        for entity in &entities {
            if let Err(err) = self.publisher.publish_discovery(entity.as_ref()).await {
                tracing::warn!(%err, entity = entity.name(), "discovery replay failed");
                discovery_failures.push((entity.name().to_string(), err));
            }
        }

        let availability = self.publish_availabilities().await;
        if let Err(err) = &availability {
            tracing::warn!(%err, "availability pass after replay failed");
        }

        ReplayReport {
            replayed: entities.len(),
            discovery_failures,
            availability,
        }
    }

    /// Copy of the entity list so the lock is never held across a transport
    /// call.
    fn snapshot(&self) -> Vec<Arc<dyn Entity>> {
        self.lock_entities().clone()
    }

    fn lock_entities(&self) -> std::sync::MutexGuard<'_, Vec<Arc<dyn Entity>>> {
        self.entities
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Client id unique per device and per connection attempt.
fn client_id(serial: &str, at: DateTime<Utc>) -> String {
    format!("{serial}_{}", at.timestamp())
}
