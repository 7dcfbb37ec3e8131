//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `mqtt-hass.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use mqtt_hass_adapter_mqtt::MqttConfig;
use mqtt_hass_app::ports::Credentials;
use mqtt_hass_domain::error::ValidationError;
use mqtt_hass_domain::topic::validate_segment;
use serde::Deserialize;

const MACHINE_ID_PATH: &str = "/etc/machine-id";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Broker connection settings.
    pub mqtt: MqttConfig,
    /// Broker credentials.
    pub credentials: CredentialsConfig,
    /// The device announced to the hub.
    pub device: DeviceConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Availability heartbeat settings.
    pub availability: AvailabilityConfig,
}

/// Broker credentials. Both fields empty means an anonymous session.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Identity of the announced device.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Device name, used in topics.
    pub name: String,
    /// Hardware model shown by the hub.
    pub model: String,
    /// Device-unique serial. Read from `/etc/machine-id` when unset.
    pub serial: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Availability heartbeat configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AvailabilityConfig {
    /// Seconds between two availability rounds.
    pub interval_secs: u64,
}

impl Config {
    /// Load configuration from `mqtt-hass.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("mqtt-hass.toml")?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("MQTT_HASS_BROKER") {
            self.apply_broker(&val)?;
        }
        if let Ok(val) = std::env::var("MQTT_HASS_USERNAME") {
            self.credentials.username = val;
        }
        if let Ok(val) = std::env::var("MQTT_HASS_PASSWORD") {
            self.credentials.password = val;
        }
        if let Ok(val) = std::env::var("MQTT_HASS_SERIAL") {
            self.device.serial = Some(val);
        }
        if let Ok(val) = std::env::var("MQTT_HASS_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    /// Accepts `host`, `host:port`, a bare IPv6 literal or `[ipv6]:port`.
    fn apply_broker(&mut self, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::Validation(format!("invalid broker address {value:?}"));
        let (host, port) = if let Some(rest) = value.strip_prefix('[') {
            let (host, tail) = rest.split_once(']').ok_or_else(invalid)?;
            if tail.is_empty() {
                (host, None)
            } else {
                (host, Some(tail.strip_prefix(':').ok_or_else(invalid)?))
            }
        } else if value.matches(':').count() > 1 {
            (value, None)
        } else {
            match value.split_once(':') {
                Some((host, port)) => (host, Some(port)),
                None => (value, None),
            }
        };
        if host.is_empty() {
            return Err(invalid());
        }
        if let Some(port) = port {
            self.mqtt.broker_port = port.parse().map_err(|_| invalid())?;
        }
        self.mqtt.broker_host = host.to_string();
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.mqtt.broker_port == 0 {
            return Err(ConfigError::Validation(
                "broker port must be non-zero".to_string(),
            ));
        }
        if !(1..=30).contains(&self.availability.interval_secs) {
            return Err(ConfigError::Validation(
                "availability interval must be between 1 and 30 seconds".to_string(),
            ));
        }
        validate_segment("device name", &self.device.name)?;
        Ok(())
    }

    /// Credentials for the broker, or `None` for an anonymous session.
    #[must_use]
    pub fn credentials(&self) -> Option<Credentials> {
        if self.credentials.username.is_empty() && self.credentials.password.is_empty() {
            return None;
        }
        Some(Credentials::new(
            self.credentials.username.as_str(),
            self.credentials.password.as_str(),
        ))
    }

    /// The configured serial, falling back to the host's machine id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if no serial is configured and the machine
    /// id cannot be read, or [`ConfigError::Validation`] if the serial is
    /// blank.
    pub fn serial(&self) -> Result<String, ConfigError> {
        let serial = match &self.device.serial {
            Some(serial) => serial.trim().to_string(),
            None => std::fs::read_to_string(MACHINE_ID_PATH)?.trim().to_string(),
        };
        if serial.is_empty() {
            return Err(ConfigError::Validation(
                "device serial must not be empty".to_string(),
            ));
        }
        Ok(serial)
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: "workshop".to_string(),
            model: "Photon 2".to_string(),
            serial: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "mqtt_hassd=info,mqtt_hass_app=info,mqtt_hass_adapter_mqtt=info".to_string(),
        }
    }
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self { interval_secs: 10 }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read configuration input")]
    Io(#[from] std::io::Error),
    /// A value that ends up in a topic is not topic-safe.
    #[error("invalid device configuration")]
    Device(#[from] ValidationError),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.mqtt.broker_host, "localhost");
        assert_eq!(config.mqtt.broker_port, 1883);
        assert_eq!(config.device.name, "workshop");
        assert!(config.device.serial.is_none());
        assert_eq!(config.availability.interval_secs, 10);
        assert!(config.credentials().is_none());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.mqtt.broker_port, 1883);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [mqtt]
            broker_host = 'broker.lan'
            broker_port = 1884

            [credentials]
            username = 'hass'
            password = 'secret'

            [device]
            name = 'garage'
            model = 'Argon'
            serial = 'e00fce68'

            [logging]
            filter = 'debug'

            [availability]
            interval_secs = 5
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.mqtt.broker_host, "broker.lan");
        assert_eq!(config.mqtt.broker_port, 1884);
        assert_eq!(config.device.name, "garage");
        assert_eq!(config.device.model, "Argon");
        assert_eq!(config.serial().unwrap(), "e00fce68");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.availability.interval_secs, 5);

        let credentials = config.credentials().unwrap();
        assert_eq!(credentials.username, "hass");
        assert_eq!(credentials.password, "secret");
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.mqtt.broker_port, 1883);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.mqtt.broker_port = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_bound_availability_interval() {
        let mut config = Config::default();
        config.availability.interval_secs = 0;
        assert!(config.validate().is_err());
        config.availability.interval_secs = 31;
        assert!(config.validate().is_err());
        config.availability.interval_secs = 30;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_reject_device_name_with_topic_separator() {
        let mut config = Config::default();
        config.device.name = "work/shop".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Device(_))));
    }

    #[test]
    fn should_split_broker_host_and_port() {
        let mut config = Config::default();
        config.apply_broker("10.0.0.2:8883").unwrap();
        assert_eq!(config.mqtt.broker_host, "10.0.0.2");
        assert_eq!(config.mqtt.broker_port, 8883);

        config.apply_broker("broker.lan").unwrap();
        assert_eq!(config.mqtt.broker_host, "broker.lan");
        assert_eq!(config.mqtt.broker_port, 8883);
    }

    #[test]
    fn should_reject_unparsable_broker_port() {
        let mut config = Config::default();

        let result = config.apply_broker("broker.lan:notaport");

        assert!(matches!(result, Err(ConfigError::Validation(_))));
        assert_eq!(config.mqtt.broker_host, "localhost");
        assert_eq!(config.mqtt.broker_port, 1883);
    }

    #[test]
    fn should_accept_ipv6_broker_addresses() {
        let mut config = Config::default();
        config.apply_broker("::1").unwrap();
        assert_eq!(config.mqtt.broker_host, "::1");
        assert_eq!(config.mqtt.broker_port, 1883);

        config.apply_broker("[fe80::1]:8883").unwrap();
        assert_eq!(config.mqtt.broker_host, "fe80::1");
        assert_eq!(config.mqtt.broker_port, 8883);

        assert!(config.apply_broker("[fe80::1").is_err());
        assert!(config.apply_broker(":1883").is_err());
    }

    #[test]
    fn should_reject_blank_serial() {
        let mut config = Config::default();
        config.device.serial = Some("  ".to_string());
        assert!(matches!(config.serial(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_redact_password_in_debug_output() {
        let mut config = Config::default();
        config.credentials.password = "secret".to_string();
        assert!(!format!("{config:?}").contains("secret"));
    }
}
