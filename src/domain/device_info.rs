//! Snapshot of the heat pump's readings and operating state.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::PowerState;

/// Aggregate of several resource reads taken one after another.
///
/// Readings the adapter answered with a non-success result code hold
/// their zero value (or `None` for [`DeviceInfo::target_temperature`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceInfo {
    /// LAN adapter model string.
    pub adapter_model: String,
    /// Indoor temperature in °C.
    pub indoor_temperature: f32,
    /// Outdoor temperature in °C.
    pub outdoor_temperature: f32,
    /// Leaving-water temperature in °C.
    pub leaving_water_temperature: f32,
    /// Target room temperature in °C. `None` outside temperature mode.
    pub target_temperature: Option<f32>,
    /// Heating power state.
    pub power_state: PowerState,
    /// Emergency status code.
    pub emergency_state: i32,
    /// Error status code.
    pub error_state: i32,
    /// Warning status code.
    pub warning_state: i32,
    /// When the last read of this snapshot completed.
    pub retrieved_at: DateTime<Utc>,
}

impl DeviceInfo {
    /// Returns `true` if any of the unit status codes is non-zero.
    #[must_use]
    pub const fn has_fault(&self) -> bool {
        self.emergency_state != 0 || self.error_state != 0 || self.warning_state != 0
    }
}
