//! # mqtt-hass-domain
//!
//! Pure domain model for exposing entities to a Home Assistant hub over MQTT.
//!
//! ## Responsibilities
//! - Foundational types: error conventions, topic construction
//! - Define **Devices** (the physical unit that groups entities)
//! - Define the **taxonomies** of the hub convention (device classes, states,
//!   entity categories)
//! - Define the **discovery payload** and enforce its size bound
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! The transport boundary is expressed as a trait in the `app` crate (port).

pub mod error;
pub mod topic;

pub mod device;
pub mod discovery;
pub mod taxonomy;
