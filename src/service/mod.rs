//! Service layer: domain operations.
//!
//! [`AlthermaClient`] maps "get/set resource" calls onto the
//! request/response cycle of [`super::ws::Connection`].

pub mod altherma_client;

pub use altherma_client::{AlthermaClient, MAX_TARGET_TEMPERATURE, MIN_TARGET_TEMPERATURE};
