//! Domain layer: addressing, identifiers, and the value objects the
//! client returns.
//!
//! This module contains the adapter endpoint, request correlation ids,
//! device result codes, the resource tree addresses, and the aggregate
//! device and network snapshots.

pub mod correlation_id;
pub mod device_info;
pub mod endpoint;
pub mod network_info;
pub mod power_state;
pub mod resource;
pub mod result_code;

pub use correlation_id::CorrelationId;
pub use device_info::DeviceInfo;
pub use endpoint::{Endpoint, Host};
pub use network_info::NetworkInfo;
pub use power_state::PowerState;
pub use resource::{Namespace, Resource};
pub use result_code::ResultCode;
