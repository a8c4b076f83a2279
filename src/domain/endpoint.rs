//! Validated adapter address.
//!
//! [`Endpoint::parse`] checks host syntax up front so that a typo never
//! reaches the network stack.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::error::AlthermaError;

/// Path of the oneM2M WebSocket endpoint on the adapter.
pub const MCA_PATH: &str = "/mca";

const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Host part of an [`Endpoint`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Host {
    /// IPv4 or IPv6 literal.
    Ip(IpAddr),
    /// DNS host name.
    Name(String),
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ip(IpAddr::V6(ip)) => write!(f, "[{ip}]"),
            Self::Ip(IpAddr::V4(ip)) => write!(f, "{ip}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Host plus optional port of an adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    host: Host,
    port: Option<u16>,
}

impl Endpoint {
    /// Parses `host`, `host:port`, an IP literal, or `[ipv6]:port`.
    ///
    /// # Errors
    ///
    /// Returns [`AlthermaError::InvalidHost`] if `input` is not a
    /// syntactically valid host name or IP literal.
    pub fn parse(input: &str) -> Result<Self, AlthermaError> {
        let invalid = || AlthermaError::InvalidHost(input.to_string());

        if let Some(rest) = input.strip_prefix('[') {
            let (addr, tail) = rest.split_once(']').ok_or_else(invalid)?;
            let ip: Ipv6Addr = addr.parse().map_err(|_| invalid())?;
            let port = match tail {
                "" => None,
                tail => Some(parse_port(tail.strip_prefix(':')).ok_or_else(invalid)?),
            };
            return Ok(Self {
                host: Host::Ip(IpAddr::V6(ip)),
                port,
            });
        }

        // Bare IPv6 literals contain colons, so try a full IP parse before
        // looking for a port suffix.
        if let Ok(ip) = input.parse::<IpAddr>() {
            return Ok(Self {
                host: Host::Ip(ip),
                port: None,
            });
        }

        let (name, port) = match input.split_once(':') {
            Some((name, port)) => (name, Some(parse_port(Some(port)).ok_or_else(invalid)?)),
            None => (input, None),
        };

        let host = if let Ok(ip) = name.parse::<Ipv4Addr>() {
            Host::Ip(IpAddr::V4(ip))
        } else if is_valid_host_name(name) {
            Host::Name(name.to_string())
        } else {
            return Err(invalid());
        };

        Ok(Self { host, port })
    }

    /// Returns the host part.
    #[must_use]
    pub const fn host(&self) -> &Host {
        &self.host
    }

    /// Returns the explicit port, if any.
    #[must_use]
    pub const fn port(&self) -> Option<u16> {
        self.port
    }

    /// Returns the WebSocket URL of the adapter's oneM2M endpoint.
    #[must_use]
    pub fn url(&self) -> String {
        format!("ws://{self}{MCA_PATH}")
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{port}", self.host),
            None => write!(f, "{}", self.host),
        }
    }
}

fn parse_port(port: Option<&str>) -> Option<u16> {
    port?.parse::<u16>().ok().filter(|p| *p != 0)
}

/// RFC 1123 host name check. All-numeric names are rejected since they
/// can only be a mistyped IPv4 literal.
fn is_valid_host_name(name: &str) -> bool {
    let name = name.strip_suffix('.').unwrap_or(name);
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return false;
    }

    let labels_ok = name.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });

    labels_ok && !name.chars().all(|c| c.is_ascii_digit() || c == '.')
}
