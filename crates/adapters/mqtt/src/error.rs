//! MQTT adapter error types.

use std::time::Duration;

use mqtt_hass_domain::error::HassError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// No session is open with the broker.
    #[error("MQTT client not connected")]
    NotConnected,

    /// The rumqttc client rejected a request.
    #[error("MQTT client error")]
    Client(#[source] Box<rumqttc::ClientError>),

    /// The connection to the broker failed or was lost.
    #[error("MQTT connection error")]
    Connection(#[source] Box<rumqttc::ConnectionError>),

    /// The broker did not accept the connection in time.
    #[error("broker did not accept the connection within {0:?}")]
    ConnectTimeout(Duration),
}

impl MqttError {
    /// Convert into a [`HassError::Transport`] for propagation across port
    /// boundaries.
    #[must_use]
    pub fn into_domain(self) -> HassError {
        HassError::transport(self)
    }
}

impl From<rumqttc::ClientError> for MqttError {
    fn from(err: rumqttc::ClientError) -> Self {
        Self::Client(Box::new(err))
    }
}

impl From<rumqttc::ConnectionError> for MqttError {
    fn from(err: rumqttc::ConnectionError) -> Self {
        Self::Connection(Box::new(err))
    }
}

impl From<MqttError> for HassError {
    fn from(err: MqttError) -> Self {
        err.into_domain()
    }
}
