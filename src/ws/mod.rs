//! WebSocket layer: transport, message reassembly, envelope codec, and
//! request/response correlation.
//!
//! The adapter speaks oneM2M over a single WebSocket at `/mca`. Only one
//! request may be outstanding at a time; [`Connection`] enforces this.

pub mod connection;
pub mod frame;
pub mod messages;
pub mod reassembler;
pub mod transport;

#[cfg(test)]
pub(crate) mod mock;

pub use connection::{CLIENT_IDENTITY, Connection, ConnectionState, Response};
pub use transport::{Transport, WsTransport};
