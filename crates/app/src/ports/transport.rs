//! Transport port: the publish/subscribe client the registry talks through.

use std::future::Future;

use mqtt_hass_domain::error::HassError;

/// Broker credentials passed on connect.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Publish/subscribe client used by the registry and the entities.
///
/// Every call is treated as a bounded operation; implementations perform no
/// retries. Failures are reported as [`HassError::Transport`].
pub trait Transport: Send + Sync {
    /// Open a session with the broker using `client_id`.
    fn connect(
        &self,
        client_id: &str,
        credentials: Option<&Credentials>,
    ) -> impl Future<Output = Result<(), HassError>> + Send;

    /// Whether a session is currently open.
    fn is_connected(&self) -> bool;

    /// Publish `payload` on `topic`.
    fn publish(
        &self,
        topic: &str,
        payload: &[u8],
    ) -> impl Future<Output = Result<(), HassError>> + Send;

    /// Subscribe to `topic`.
    fn subscribe(&self, topic: &str) -> impl Future<Output = Result<(), HassError>> + Send;
}
