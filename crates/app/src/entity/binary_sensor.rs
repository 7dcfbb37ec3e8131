//! Binary sensor: read-only two-state entity.

use std::sync::Arc;

use mqtt_hass_domain::device::Device;
use mqtt_hass_domain::discovery::DiscoveryPayload;
use mqtt_hass_domain::error::HassError;
use mqtt_hass_domain::taxonomy::{BinarySensorClass, BinarySensorState};
use mqtt_hass_domain::topic::Component;

use crate::entity::{Entity, EntityCore};
use crate::hass::Hass;
use crate::ports::Transport;
use crate::publisher::Publisher;

/// A two-state sensor publishing `ON` / `OFF`.
pub struct BinarySensor<T> {
    core: EntityCore,
    device_class: Option<BinarySensorClass>,
    publisher: Publisher<T>,
}

impl<T: Transport> BinarySensor<T> {
    /// Create a binary sensor bound to `hass`.
    ///
    /// # Errors
    ///
    /// Returns [`HassError::Validation`] if a name is empty or not topic-safe.
    pub fn new(
        hass: &Hass<T>,
        device: &Arc<Device>,
        name: &str,
        display_name: &str,
        device_class: Option<BinarySensorClass>,
    ) -> Result<Self, HassError> {
        Ok(Self {
            core: EntityCore::new(Component::BinarySensor, device, name, display_name, None)?,
            device_class,
            publisher: hass.publisher(),
        })
    }

    /// Publish the new state.
    ///
    /// # Errors
    ///
    /// Returns [`HassError::Transport`] if the publish fails.
    pub async fn update_state(&self, state: BinarySensorState) -> Result<(), HassError> {
        self.publisher
            .publish_state(&self.core.topic_base, state.as_str())
            .await
    }
}

impl<T: Transport> Entity for BinarySensor<T> {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn discovery_payload(&self, serial: &str) -> DiscoveryPayload {
        self.core
            .base_payload(serial)
            .with_state_topic(&self.core.topic_base)
            .with_device_class(self.device_class.map(BinarySensorClass::as_str))
    }
}
