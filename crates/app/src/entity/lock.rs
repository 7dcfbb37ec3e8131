//! Lock: stateful entity controlled from the hub.

use std::sync::Arc;

use mqtt_hass_domain::device::Device;
use mqtt_hass_domain::discovery::DiscoveryPayload;
use mqtt_hass_domain::error::HassError;
use mqtt_hass_domain::taxonomy::LockState;
use mqtt_hass_domain::topic::Component;

use crate::entity::{CommandHandler, Entity, EntityCore};
use crate::hass::Hass;
use crate::ports::Transport;
use crate::publisher::Publisher;

/// A lock receiving `LOCK` / `UNLOCK` / `OPEN` commands and reporting its state.
pub struct Lock<T> {
    core: EntityCore,
    publisher: Publisher<T>,
}

impl<T: Transport> Lock<T> {
    /// Create a lock whose commands invoke `handler`.
    ///
    /// # Errors
    ///
    /// Returns [`HassError::Validation`] if a name is empty or not topic-safe.
    pub fn new(
        hass: &Hass<T>,
        device: &Arc<Device>,
        name: &str,
        display_name: &str,
        handler: CommandHandler,
    ) -> Result<Self, HassError> {
        Ok(Self {
            core: EntityCore::new(Component::Lock, device, name, display_name, Some(handler))?,
            publisher: hass.publisher(),
        })
    }

    /// Publish the new state.
    ///
    /// # Errors
    ///
    /// Returns [`HassError::Transport`] if the publish fails.
    pub async fn update_state(&self, state: LockState) -> Result<(), HassError> {
        self.publisher
            .publish_state(&self.core.topic_base, state.as_str())
            .await
    }
}

impl<T: Transport> Entity for Lock<T> {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn discovery_payload(&self, serial: &str) -> DiscoveryPayload {
        self.core
            .base_payload(serial)
            .with_state_topic(&self.core.topic_base)
            .with_command_topic(&self.core.topic_base)
    }
}
