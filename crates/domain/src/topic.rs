//! Topic naming convention of the hub's MQTT discovery.
//!
//! Every entity lives under
//! `homeassistant/<component>/<DEVICE_PREFIX><device>/<entity>/` and uses the
//! `config`, `state`, `command` and `availability` suffixes below that base.

use std::fmt;

use crate::error::ValidationError;

/// Root of every discovery topic.
pub const DISCOVERY_PREFIX: &str = "homeassistant";

/// Topic on which the hub announces that it (re)started.
pub const STATUS_TOPIC: &str = "homeassistant/status";

/// Payload of the hub birth message and of every availability publish.
pub const ONLINE: &str = "online";

/// Constant token prepended to the device name in topics and identifiers.
pub const DEVICE_PREFIX: &str = "particle_";

/// Hub component an entity is announced as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    BinarySensor,
    Sensor,
    Button,
    Lock,
    Cover,
}

impl Component {
    /// Wire token used as the `<component>` topic segment.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BinarySensor => "binary_sensor",
            Self::Sensor => "sensor",
            Self::Button => "button",
            Self::Lock => "lock",
            Self::Cover => "cover",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check that `value` can be used verbatim as a single topic level.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyName`] for an empty value and
/// [`ValidationError::InvalidTopicSegment`] when it contains whitespace or one
/// of the MQTT separators/wildcards.
pub fn validate_segment(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '/' | '+' | '#'))
    {
        return Err(ValidationError::InvalidTopicSegment {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Device-scoped identifier: [`DEVICE_PREFIX`] followed by the device name.
#[must_use]
pub fn device_scoped_id(device_name: &str) -> String {
    format!("{DEVICE_PREFIX}{device_name}")
}

/// Immutable topic namespace of one entity, always ending with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopicBase(String);

impl TopicBase {
    /// Build the base for `entity` of `device` announced as `component`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when either name is not a valid topic
    /// segment.
    pub fn new(component: Component, device: &str, entity: &str) -> Result<Self, ValidationError> {
        validate_segment("device name", device)?;
        validate_segment("entity name", entity)?;
        Ok(Self(format!(
            "{DISCOVERY_PREFIX}/{component}/{}/{entity}/",
            device_scoped_id(device)
        )))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn config(&self) -> String {
        self.with_suffix("config")
    }

    #[must_use]
    pub fn state(&self) -> String {
        self.with_suffix("state")
    }

    #[must_use]
    pub fn command(&self) -> String {
        self.with_suffix("command")
    }

    #[must_use]
    pub fn availability(&self) -> String {
        self.with_suffix("availability")
    }

    /// Whether `topic` is this entity's command topic, without allocating.
    #[must_use]
    pub fn is_command_topic(&self, topic: &str) -> bool {
        topic
            .strip_prefix(self.0.as_str())
            .is_some_and(|rest| rest == "command")
    }

    fn with_suffix(&self, suffix: &str) -> String {
        let mut topic = String::with_capacity(self.0.len() + suffix.len());
        topic.push_str(&self.0);
        topic.push_str(suffix);
        topic
    }
}

impl fmt::Display for TopicBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
