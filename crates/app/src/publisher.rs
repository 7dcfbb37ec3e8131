//! Publishing handle shared by the registry and the entities.

use std::sync::Arc;

use mqtt_hass_domain::error::HassError;
use mqtt_hass_domain::topic::{ONLINE, TopicBase};

use crate::entity::Entity;
use crate::ports::Transport;

/// Cheaply cloneable handle on the transport and the device-unique serial.
///
/// Entities keep one of these instead of a reference to the registry, so the
/// registry can own the entities without a reference cycle.
pub struct Publisher<T> {
    transport: Arc<T>,
    serial: Arc<str>,
}

impl<T> Clone for Publisher<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            serial: Arc::clone(&self.serial),
        }
    }
}

impl<T: Transport> Publisher<T> {
    pub(crate) fn new(transport: T, serial: &str) -> Self {
        Self {
            transport: Arc::new(transport),
            serial: Arc::from(serial),
        }
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Device-unique serial used in unique ids and client ids.
    #[must_use]
    pub fn serial(&self) -> &str {
        &self.serial
    }

    /// Publish the entity's discovery payload to its `config` topic, then
    /// subscribe to its `command` topic when it has a handler.
    ///
    /// # Errors
    ///
    /// Returns [`HassError::Validation`] if the payload exceeds the size bound
    /// (nothing is published), or [`HassError::Transport`] if the publish or
    /// the subscribe fails.
    pub async fn publish_discovery(&self, entity: &dyn Entity) -> Result<(), HassError> {
        let payload = entity.discovery_payload(&self.serial).to_json()?;
        let base = entity.topic_base();
        tracing::debug!(entity = entity.name(), bytes = payload.len(), "publishing discovery");
        self.transport
            .publish(&base.config(), payload.as_bytes())
            .await?;
        if entity.command_handler().is_some() {
            self.transport.subscribe(&base.command()).await?;
        }
        Ok(())
    }

    /// Publish `online` to the entity's `availability` topic.
    ///
    /// # Errors
    ///
    /// Returns [`HassError::Transport`] if the publish fails.
    pub async fn publish_availability(&self, entity: &dyn Entity) -> Result<(), HassError> {
        self.transport
            .publish(&entity.topic_base().availability(), ONLINE.as_bytes())
            .await
    }

    /// Publish `value` to the `state` topic below `topic_base`.
    ///
    /// # Errors
    ///
    /// Returns [`HassError::Transport`] if the publish fails.
    pub async fn publish_state(&self, topic_base: &TopicBase, value: &str) -> Result<(), HassError> {
        tracing::trace!(topic_base = %topic_base, value, "publishing state");
        self.transport
            .publish(&topic_base.state(), value.as_bytes())
            .await
    }
}
