//! Entity: one controllable or observable unit announced to the hub.
//!
//! Every kind implements the flat [`Entity`] capability so the registry can
//! keep them in a single ordered list and dispatch on topics without knowing
//! the concrete type.

use std::fmt;
use std::sync::Arc;

use mqtt_hass_domain::device::Device;
use mqtt_hass_domain::discovery::DiscoveryPayload;
use mqtt_hass_domain::error::{HassError, ValidationError};
use mqtt_hass_domain::topic::{Component, TopicBase};

mod binary_sensor;
mod button;
mod cover;
mod lock;
mod sensor;

pub use binary_sensor::BinarySensor;
pub use button::Button;
pub use cover::Cover;
pub use lock::Lock;
pub use sensor::{Sensor, SensorBuilder};

/// Callback invoked with the raw `(topic, payload)` of a command message.
pub type CommandHandler = Arc<dyn Fn(&str, &[u8]) + Send + Sync>;

/// Wrap a closure as a [`CommandHandler`].
pub fn command_handler<F>(handler: F) -> CommandHandler
where
    F: Fn(&str, &[u8]) + Send + Sync + 'static,
{
    Arc::new(handler)
}

/// Capability shared by every entity kind.
pub trait Entity: Send + Sync {
    /// Identity, topic namespace and handler of this entity.
    fn core(&self) -> &EntityCore;

    /// Kind-specific discovery payload; `serial` scopes the `unique_id`.
    fn discovery_payload(&self, serial: &str) -> DiscoveryPayload;

    fn name(&self) -> &str {
        &self.core().name
    }

    fn topic_base(&self) -> &TopicBase {
        &self.core().topic_base
    }

    fn command_handler(&self) -> Option<&CommandHandler> {
        self.core().handler.as_ref()
    }
}

/// Fields common to every kind, fixed at construction.
///
/// The topic base is derived once here, so an entity can never be registered
/// without one.
pub struct EntityCore {
    pub component: Component,
    pub name: String,
    pub display_name: String,
    pub topic_base: TopicBase,
    pub device: Arc<Device>,
    handler: Option<CommandHandler>,
}

impl EntityCore {
    /// Validate the names and derive the topic base.
    ///
    /// # Errors
    ///
    /// Returns [`HassError::Validation`] when `display_name` is empty or when
    /// the device or entity name is not a valid topic segment.
    pub fn new(
        component: Component,
        device: &Arc<Device>,
        name: &str,
        display_name: &str,
        handler: Option<CommandHandler>,
    ) -> Result<Self, HassError> {
        if display_name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        let topic_base = TopicBase::new(component, &device.name, name)?;
        Ok(Self {
            component,
            name: name.to_string(),
            display_name: display_name.to_string(),
            topic_base,
            device: Arc::clone(device),
            handler,
        })
    }

    /// Discovery fields shared by every kind.
    #[must_use]
    pub fn base_payload(&self, serial: &str) -> DiscoveryPayload {
        DiscoveryPayload::new(
            &self.display_name,
            &self.name,
            &self.topic_base,
            serial,
            &self.device,
        )
    }
}

impl fmt::Debug for EntityCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityCore")
            .field("component", &self.component)
            .field("name", &self.name)
            .field("display_name", &self.display_name)
            .field("topic_base", &self.topic_base)
            .field("has_handler", &self.handler.is_some())
            .finish_non_exhaustive()
    }
}
