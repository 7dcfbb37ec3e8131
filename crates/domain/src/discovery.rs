//! Discovery payload: tells the hub how to present an entity.
//!
//! Fields serialize in declaration order, which keeps the wire output stable
//! for consumers that diff payloads structurally. Optional fields are elided
//! rather than serialized as `null` or `"none"`.

use serde::Serialize;

use crate::device::Device;
use crate::error::ValidationError;
use crate::taxonomy::EntityCategory;
use crate::topic::{TopicBase, device_scoped_id};

/// Upper bound of a serialized discovery payload, in bytes.
pub const MAX_PAYLOAD_LEN: usize = 2048;

/// Device block nested in every discovery payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DevicePayload {
    pub identifiers: Vec<String>,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub sw_version: String,
}

impl From<&Device> for DevicePayload {
    fn from(device: &Device) -> Self {
        Self {
            identifiers: vec![device_scoped_id(&device.name)],
            name: device.name.clone(),
            manufacturer: device.manufacturer.clone(),
            model: device.model.clone(),
            sw_version: device.sw_version.clone(),
        }
    }
}

/// Discovery payload of a single entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_topic: Option<String>,
    pub availability_topic: String,
    pub unique_id: String,
    pub device: DevicePayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_class: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_of_measurement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_category: Option<EntityCategory>,
}

impl DiscoveryPayload {
    /// Start a payload with the fields shared by every component.
    ///
    /// `unique_id` is `<serial>_<entity_name>`.
    #[must_use]
    pub fn new(
        display_name: &str,
        entity_name: &str,
        topic_base: &TopicBase,
        serial: &str,
        device: &Device,
    ) -> Self {
        Self {
            name: display_name.to_string(),
            state_topic: None,
            command_topic: None,
            availability_topic: topic_base.availability(),
            unique_id: format!("{serial}_{entity_name}"),
            device: DevicePayload::from(device),
            device_class: None,
            unit_of_measurement: None,
            entity_category: None,
        }
    }

    #[must_use]
    pub fn with_state_topic(mut self, topic_base: &TopicBase) -> Self {
        self.state_topic = Some(topic_base.state());
        self
    }

    #[must_use]
    pub fn with_command_topic(mut self, topic_base: &TopicBase) -> Self {
        self.command_topic = Some(topic_base.command());
        self
    }

    #[must_use]
    pub fn with_device_class(mut self, device_class: Option<&'static str>) -> Self {
        self.device_class = device_class;
        self
    }

    #[must_use]
    pub fn with_unit_of_measurement(mut self, unit: Option<String>) -> Self {
        self.unit_of_measurement = unit.filter(|unit| !unit.is_empty());
        self
    }

    #[must_use]
    pub fn with_entity_category(mut self, category: Option<EntityCategory>) -> Self {
        self.entity_category = category;
        self
    }

    /// Serialize to JSON, enforcing [`MAX_PAYLOAD_LEN`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::PayloadTooLarge`] when the output exceeds the
    /// bound, or [`ValidationError::Serialize`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ValidationError> {
        let json = serde_json::to_string(self).map_err(ValidationError::Serialize)?;
        if json.len() > MAX_PAYLOAD_LEN {
            return Err(ValidationError::PayloadTooLarge {
                size: json.len(),
                max: MAX_PAYLOAD_LEN,
            });
        }
        Ok(json)
    }
}
