//! Adapter network configuration.
//!
//! The adapter reports its network settings as a JSON document encoded in
//! a string value. [`NetworkInfo::from_settings_document`] re-parses that
//! string and validates every field under `data`.

use std::net::IpAddr;

use serde::Serialize;
use serde_json::Value;

use crate::error::NetworkSettingsError;
use crate::json_path::{FromJsonLeaf, extract, lookup};

/// Network configuration of the LAN adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkInfo {
    /// Adapter IP address.
    pub ip_address: IpAddr,
    /// Subnet mask as reported.
    pub subnet: String,
    /// Default gateway as reported.
    pub gateway: String,
    /// DNS servers, in order.
    pub dns: Vec<String>,
    /// Whether the address was assigned by DHCP.
    pub dhcp: bool,
    /// Adapter MAC address.
    pub mac_address: String,
}

impl NetworkInfo {
    /// Parses the string-encoded settings document.
    ///
    /// # Errors
    ///
    /// Returns the [`NetworkSettingsError`] variant naming the first field
    /// that is missing, blank, or malformed.
    pub fn from_settings_document(document: &str) -> Result<Self, NetworkSettingsError> {
        if document.trim().is_empty() {
            return Err(NetworkSettingsError::EmptyDocument);
        }

        let root: Value = serde_json::from_str(document)
            .map_err(|e| NetworkSettingsError::MalformedDocument(e.to_string()))?;
        let data = lookup(&root, "data")
            .ok()
            .filter(|data| data.is_object())
            .ok_or(NetworkSettingsError::MissingData)?;

        let ip = required_text(data, "ip", NetworkSettingsError::MissingIp)?;
        let subnet = required_text(data, "subnet", NetworkSettingsError::MissingSubnet)?;
        let gateway = required_text(data, "gw", NetworkSettingsError::MissingGateway)?;
        let mac_address = required_text(data, "mac", NetworkSettingsError::MissingMac)?;
        let dhcp = required::<bool>(data, "dhcp", NetworkSettingsError::MissingDhcp)?;

        let dns = lookup(data, "dns")
            .ok()
            .and_then(Value::as_array)
            .ok_or(NetworkSettingsError::MissingDns)?
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                entry
                    .as_str()
                    .filter(|s| !s.trim().is_empty())
                    .map(str::to_string)
                    .ok_or(NetworkSettingsError::BlankDnsEntry(index))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let ip_address = ip
            .trim()
            .parse::<IpAddr>()
            .map_err(|_| NetworkSettingsError::InvalidIpAddress(ip.clone()))?;

        Ok(Self {
            ip_address,
            subnet,
            gateway,
            dns,
            dhcp,
            mac_address,
        })
    }
}

fn required<T: FromJsonLeaf>(
    data: &Value,
    field: &str,
    missing: NetworkSettingsError,
) -> Result<T, NetworkSettingsError> {
    extract::<Option<T>>(data, field).ok().flatten().ok_or(missing)
}

fn required_text(
    data: &Value,
    field: &str,
    missing: NetworkSettingsError,
) -> Result<String, NetworkSettingsError> {
    let value = required::<String>(data, field, missing.clone())?;
    if value.trim().is_empty() {
        return Err(missing);
    }
    Ok(value)
}
