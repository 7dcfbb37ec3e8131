//! # mqtt-hass-app
//!
//! Application layer: the entity registry, topic dispatch and the **transport
//! port**.
//!
//! ## Responsibilities
//! - Define the [`Transport`](ports::Transport) port that adapters implement
//! - Define the [`Entity`](entity::Entity) capability and its kinds (binary
//!   sensor, sensor, button, lock, cover)
//! - Publish discovery, availability and state through the transport
//! - Route inbound messages: replay everything on a hub restart, otherwise
//!   invoke the command handler of the entity owning the topic
//!
//! ## Dependency rule
//! Depends on `mqtt-hass-domain` only. Never imports adapter crates. Adapters
//! depend on *this* crate, not the reverse.

pub mod entity;
pub mod hass;
pub mod ports;
pub mod publisher;

#[cfg(test)]
pub(crate) mod testing;

pub use entity::{CommandHandler, Entity, EntityCore};
pub use hass::{Hass, Inbound, ReplayReport};
pub use publisher::Publisher;
