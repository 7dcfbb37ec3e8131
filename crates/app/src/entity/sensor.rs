//! Sensor: read-only entity with a free-form state.

use std::fmt::Display;
use std::sync::Arc;

use mqtt_hass_domain::device::Device;
use mqtt_hass_domain::discovery::DiscoveryPayload;
use mqtt_hass_domain::error::HassError;
use mqtt_hass_domain::taxonomy::{EntityCategory, SensorClass};
use mqtt_hass_domain::topic::Component;

use crate::entity::{Entity, EntityCore};
use crate::hass::Hass;
use crate::ports::Transport;
use crate::publisher::Publisher;

/// A sensor whose state is any caller-supplied string.
pub struct Sensor<T> {
    core: EntityCore,
    device_class: Option<SensorClass>,
    unit_of_measurement: Option<String>,
    entity_category: Option<EntityCategory>,
    publisher: Publisher<T>,
}

impl<T: Transport> Sensor<T> {
    /// Publish `value` verbatim on the state topic.
    ///
    /// # Errors
    ///
    /// Returns [`HassError::Transport`] if the publish fails.
    pub async fn update_state(&self, value: impl Display + Send) -> Result<(), HassError> {
        let value = value.to_string();
        self.publisher
            .publish_state(&self.core.topic_base, &value)
            .await
    }
}

impl<T: Transport> Entity for Sensor<T> {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn discovery_payload(&self, serial: &str) -> DiscoveryPayload {
        self.core
            .base_payload(serial)
            .with_state_topic(&self.core.topic_base)
            .with_device_class(self.device_class.map(SensorClass::as_str))
            .with_unit_of_measurement(self.unit_of_measurement.clone())
            .with_entity_category(self.entity_category)
    }
}

/// Step-by-step builder for [`Sensor`].
#[derive(Debug)]
pub struct SensorBuilder {
    name: String,
    display_name: String,
    device_class: Option<SensorClass>,
    unit_of_measurement: Option<String>,
    entity_category: Option<EntityCategory>,
}

impl SensorBuilder {
    /// Start building a sensor named `name`, labelled `display_name`.
    #[must_use]
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            device_class: None,
            unit_of_measurement: None,
            entity_category: None,
        }
    }

    #[must_use]
    pub fn device_class(mut self, device_class: SensorClass) -> Self {
        self.device_class = Some(device_class);
        self
    }

    #[must_use]
    pub fn unit_of_measurement(mut self, unit: impl Into<String>) -> Self {
        self.unit_of_measurement = Some(unit.into());
        self
    }

    #[must_use]
    pub fn entity_category(mut self, category: EntityCategory) -> Self {
        self.entity_category = Some(category);
        self
    }

    /// Consume the builder and bind the sensor to `hass`.
    ///
    /// # Errors
    ///
    /// Returns [`HassError::Validation`] if a name is empty or not topic-safe.
    pub fn build<T: Transport>(
        self,
        hass: &Hass<T>,
        device: &Arc<Device>,
    ) -> Result<Sensor<T>, HassError> {
        Ok(Sensor {
            core: EntityCore::new(
                Component::Sensor,
                device,
                &self.name,
                &self.display_name,
                None,
            )?,
            device_class: self.device_class,
            unit_of_measurement: self.unit_of_measurement,
            entity_category: self.entity_category,
            publisher: hass.publisher(),
        })
    }
}
