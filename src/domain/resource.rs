//! Addresses in the adapter's resource tree.
//!
//! The adapter exposes two namespaces: the bare node (`MNCSE-node/...`)
//! and the heat-pump application entity (`MNAE/...`). Requests address a
//! resource as `/[0]/<namespace>/<path>`.

use std::fmt;

/// Response path of a content-instance value.
pub const CONTENT_VALUE_PATH: &str = "/m2m:rsp/pc/m2m:cin/con";

/// Response path of the adapter model in a device-info resource.
pub const DEVICE_MODEL_PATH: &str = "/m2m:rsp/pc/m2m:dvi/mod";

/// Namespace a resource lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// The adapter node itself.
    Node,
    /// The heat-pump application entity.
    ApplicationEntity,
}

impl Namespace {
    /// Returns the path prefix for this namespace.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Node => "MNCSE-node",
            Self::ApplicationEntity => "MNAE",
        }
    }
}

/// A node in the resource tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    namespace: Namespace,
    path: &'static str,
}

impl Resource {
    /// Adapter device information.
    pub const DEVICE_INFO: Self = Self::node("deviceInfo");
    /// Latest indoor temperature reading.
    pub const INDOOR_TEMPERATURE: Self = Self::entity("1/Sensor/IndoorTemperature/la");
    /// Latest outdoor temperature reading.
    pub const OUTDOOR_TEMPERATURE: Self = Self::entity("1/Sensor/OutdoorTemperature/la");
    /// Latest leaving-water temperature reading.
    pub const LEAVING_WATER_TEMPERATURE: Self =
        Self::entity("1/Sensor/LeavingWaterTemperatureCurrent/la");
    /// Latest target temperature. Only present in temperature mode.
    pub const TARGET_TEMPERATURE: Self = Self::entity("1/Operation/TargetTemperature/la");
    /// Container accepting new target temperatures.
    pub const TARGET_TEMPERATURE_CONTAINER: Self = Self::entity("1/Operation/TargetTemperature");
    /// Latest power state.
    pub const POWER: Self = Self::entity("1/Operation/Power/la");
    /// Container accepting new power states.
    pub const POWER_CONTAINER: Self = Self::entity("1/Operation/Power");
    /// Latest emergency status code.
    pub const EMERGENCY_STATE: Self = Self::entity("1/UnitStatus/EmergencyState/la");
    /// Latest error status code.
    pub const ERROR_STATE: Self = Self::entity("1/UnitStatus/ErrorState/la");
    /// Latest warning status code.
    pub const WARNING_STATE: Self = Self::entity("1/UnitStatus/WarningState/la");
    /// Latest network settings, a JSON document encoded as a string.
    pub const NETWORK_SETTINGS: Self = Self::entity("0/NetworkSettings/la");

    /// A resource under the bare node namespace.
    #[must_use]
    pub const fn node(path: &'static str) -> Self {
        Self {
            namespace: Namespace::Node,
            path,
        }
    }

    /// A resource under the application-entity namespace.
    #[must_use]
    pub const fn entity(path: &'static str) -> Self {
        Self {
            namespace: Namespace::ApplicationEntity,
            path,
        }
    }

    /// Returns the namespace.
    #[must_use]
    pub const fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// Returns the request target, e.g. `/[0]/MNAE/1/Operation/Power/la`.
    #[must_use]
    pub fn target(&self) -> String {
        format!("/[0]/{self}")
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace.prefix(), self.path)
    }
}
