//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`HassError`]
//! at port boundaries.

/// Base error for every fallible operation of the library.
#[derive(Debug, thiserror::Error)]
pub enum HassError {
    /// A domain invariant was violated (programming or configuration error).
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The transport failed to connect, publish or subscribe.
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl HassError {
    /// Wrap any transport-level error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Box::new(err))
    }
}

/// Domain invariant violations.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// A required name was empty.
    #[error("name must not be empty")]
    EmptyName,

    /// A name used as a topic segment contains forbidden characters.
    #[error("{field} {value:?} must not contain whitespace, '/', '+' or '#'")]
    InvalidTopicSegment {
        /// Which name was rejected (e.g. "device name").
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The serialized discovery payload exceeds the hub buffer bound.
    #[error("discovery payload is {size} bytes, limit is {max}")]
    PayloadTooLarge {
        /// Serialized size in bytes.
        size: usize,
        /// Maximum accepted size in bytes.
        max: usize,
    },

    /// The discovery payload could not be serialized.
    #[error("failed to serialize discovery payload")]
    Serialize(#[source] serde_json::Error),

    /// A wire token did not match any variant of a taxonomy.
    #[error("unknown {taxonomy} token {token:?}")]
    UnknownToken {
        /// Taxonomy name (e.g. "lock state").
        taxonomy: &'static str,
        /// The unrecognised token.
        token: String,
    },
}
