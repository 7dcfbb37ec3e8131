//! Device: the physical unit that groups one or more entities.

use crate::error::{HassError, ValidationError};
use crate::topic::validate_segment;

/// Default `sw_version` announced when none is given.
pub const DEFAULT_SW_VERSION: &str = "1.0";

/// Default `manufacturer` announced when none is given.
pub const DEFAULT_MANUFACTURER: &str = "Particle MQTT_HASS";

/// Descriptive record of a physical unit, shared by all of its entities.
///
/// `name` is used verbatim as a topic level so it must not contain
/// whitespace or MQTT separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub name: String,
    pub model: String,
    pub sw_version: String,
    pub manufacturer: String,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HassError::Validation`] when `name` is empty or not a valid
    /// topic segment.
    pub fn validate(&self) -> Result<(), HassError> {
        validate_segment("device name", &self.name)?;
        Ok(())
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    name: Option<String>,
    model: Option<String>,
    sw_version: Option<String>,
    manufacturer: Option<String>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn sw_version(mut self, sw_version: impl Into<String>) -> Self {
        self.sw_version = Some(sw_version.into());
        self
    }

    #[must_use]
    pub fn manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// # Errors
    ///
    /// Returns [`HassError::Validation`] if `name` is missing, empty or not
    /// topic-safe.
    pub fn build(self) -> Result<Device, HassError> {
        let device = Device {
            name: self.name.ok_or(ValidationError::EmptyName)?,
            model: self.model.unwrap_or_default(),
            sw_version: self
                .sw_version
                .unwrap_or_else(|| DEFAULT_SW_VERSION.to_string()),
            manufacturer: self
                .manufacturer
                .unwrap_or_else(|| DEFAULT_MANUFACTURER.to_string()),
        };
        device.validate()?;
        Ok(device)
    }
}
