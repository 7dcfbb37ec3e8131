//! Cover: garage doors, blinds, shutters and the like.

use std::sync::Arc;

use mqtt_hass_domain::device::Device;
use mqtt_hass_domain::discovery::DiscoveryPayload;
use mqtt_hass_domain::error::HassError;
use mqtt_hass_domain::taxonomy::{CoverClass, CoverState};
use mqtt_hass_domain::topic::Component;

use crate::entity::{CommandHandler, Entity, EntityCore};
use crate::hass::Hass;
use crate::ports::Transport;
use crate::publisher::Publisher;

/// A cover receiving `OPEN` / `CLOSE` / `STOP` commands and reporting its state.
pub struct Cover<T> {
    core: EntityCore,
    device_class: Option<CoverClass>,
    publisher: Publisher<T>,
}

impl<T: Transport> Cover<T> {
    /// Create a cover whose commands invoke `handler`.
    ///
    /// # Errors
    ///
    /// Returns [`HassError::Validation`] if a name is empty or not topic-safe.
    pub fn new(
        hass: &Hass<T>,
        device: &Arc<Device>,
        name: &str,
        display_name: &str,
        device_class: Option<CoverClass>,
        handler: CommandHandler,
    ) -> Result<Self, HassError> {
        Ok(Self {
            core: EntityCore::new(Component::Cover, device, name, display_name, Some(handler))?,
            device_class,
            publisher: hass.publisher(),
        })
    }

    /// Publish the new state (lowercase token).
    ///
    /// # Errors
    ///
    /// Returns [`HassError::Transport`] if the publish fails.
    pub async fn update_state(&self, state: CoverState) -> Result<(), HassError> {
        self.publisher
            .publish_state(&self.core.topic_base, state.as_str())
            .await
    }
}

impl<T: Transport> Entity for Cover<T> {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn discovery_payload(&self, serial: &str) -> DiscoveryPayload {
        self.core
            .base_payload(serial)
            .with_state_topic(&self.core.topic_base)
            .with_command_topic(&self.core.topic_base)
            .with_device_class(self.device_class.map(CoverClass::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::command_handler;
    use crate::testing::{RecordingTransport, device, hass};

    fn cover(hass: &Hass<RecordingTransport>) -> Cover<RecordingTransport> {
        Cover::new(
            hass,
            &device(),
            "gate",
            "Gate",
            Some(CoverClass::Garage),
            command_handler(|_, _| {}),
        )
        .unwrap()
    }

    #[test]
    fn should_announce_device_class() {
        let hass = hass();
        let payload = cover(&hass).discovery_payload("serial");
        assert_eq!(payload.device_class, Some("garage"));
        assert!(payload.state_topic.is_some());
        assert!(payload.command_topic.is_some());
    }

    #[tokio::test]
    async fn should_publish_lowercase_state() {
        let hass = hass();
        cover(&hass).update_state(CoverState::Open).await.unwrap();

        let published = hass.transport().published();
        assert_eq!(
            published,
            vec![(
                "homeassistant/cover/particle_garage/gate/state".to_string(),
                "open".to_string()
            )]
        );
    }
}
