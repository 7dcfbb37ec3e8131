//! Button: momentary, command-only entity.

use std::sync::Arc;

use mqtt_hass_domain::device::Device;
use mqtt_hass_domain::discovery::DiscoveryPayload;
use mqtt_hass_domain::error::HassError;
use mqtt_hass_domain::taxonomy::ButtonClass;
use mqtt_hass_domain::topic::Component;

use crate::entity::{CommandHandler, Entity, EntityCore};

/// A button pressed from the hub.
///
/// It has no state topic, so unlike the other kinds it keeps no publishing
/// handle and needs no registry to be built.
pub struct Button {
    core: EntityCore,
    device_class: Option<ButtonClass>,
}

impl Button {
    /// Create a button whose presses invoke `handler`.
    ///
    /// # Errors
    ///
    /// Returns [`HassError::Validation`] if a name is empty or not topic-safe.
    pub fn new(
        device: &Arc<Device>,
        name: &str,
        display_name: &str,
        device_class: Option<ButtonClass>,
        handler: CommandHandler,
    ) -> Result<Self, HassError> {
        Ok(Self {
            core: EntityCore::new(Component::Button, device, name, display_name, Some(handler))?,
            device_class,
        })
    }
}

impl Entity for Button {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn discovery_payload(&self, serial: &str) -> DiscoveryPayload {
        self.core
            .base_payload(serial)
            .with_command_topic(&self.core.topic_base)
            .with_device_class(self.device_class.map(ButtonClass::as_str))
    }
}
