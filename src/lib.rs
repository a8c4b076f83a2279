//! # altherma-client
//!
//! Client for the oneM2M interface of Daikin Altherma LAN adapters.
//!
//! The adapter exposes its resource tree (sensors, operation settings,
//! network configuration) over a single WebSocket at `ws://<host>/mca`.
//! Each request carries a short correlation id; the adapter echoes it in
//! the response, and only one request may be outstanding at a time.
//!
//! ## Architecture
//!
//! ```text
//! AlthermaClient (service/)
//!     │  domain validation, aggregation
//!     │
//!     ├── Connection (ws/connection)
//!     │     one in-flight request, response validation
//!     │
//!     ├── Envelope codec (ws/messages)
//!     ├── Message reassembler (ws/reassembler)
//!     ├── Transport (ws/transport, tokio-tungstenite)
//!     │
//!     └── JSON path extraction (json_path)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use altherma_client::domain::PowerState;
//! use altherma_client::service::AlthermaClient;
//!
//! # async fn run() -> Result<(), altherma_client::error::AlthermaError> {
//! let mut client = AlthermaClient::new();
//! client.connect("192.168.1.20").await?;
//!
//! let info = client.get_device_info().await?;
//! println!("indoor: {} °C", info.indoor_temperature);
//!
//! client.set_target_temperature(22).await?;
//! client.set_heating(PowerState::On).await?;
//! client.close().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod json_path;
pub mod service;
pub mod ws;
