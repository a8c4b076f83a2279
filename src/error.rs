//! Client error types with category mapping.
//!
//! [`AlthermaError`] is the central error type for the client. Every
//! failure surfaces synchronously to the caller of the failing operation;
//! nothing is retried internally.

use crate::domain::CorrelationId;
use crate::ws::frame::MessageKind;

/// Broad classification of an [`AlthermaError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rejected before any I/O (bad host, value out of range).
    Validation,
    /// The device answered, but the envelope was malformed or did not
    /// belong to the outstanding request.
    Protocol,
    /// The WebSocket misbehaved or the connection is unusable.
    Transport,
    /// The device answered with a value the domain model cannot represent.
    Domain,
}

/// Reasons the network-settings blob could not be turned into a
/// [`crate::domain::NetworkInfo`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkSettingsError {
    /// The resource held no blob (or a blank one).
    #[error("network settings document is empty")]
    EmptyDocument,

    /// The blob is not valid JSON.
    #[error("network settings document is not valid JSON: {0}")]
    MalformedDocument(String),

    /// The `data` object is missing.
    #[error("network settings `data` object is missing")]
    MissingData,

    /// `data/ip` is missing or blank.
    #[error("network settings `ip` is missing or blank")]
    MissingIp,

    /// `data/subnet` is missing or blank.
    #[error("network settings `subnet` is missing or blank")]
    MissingSubnet,

    /// `data/gw` is missing or blank.
    #[error("network settings `gw` is missing or blank")]
    MissingGateway,

    /// `data/mac` is missing or blank.
    #[error("network settings `mac` is missing or blank")]
    MissingMac,

    /// `data/dhcp` is missing or not a boolean.
    #[error("network settings `dhcp` is missing")]
    MissingDhcp,

    /// `data/dns` is missing or not an array.
    #[error("network settings `dns` is missing")]
    MissingDns,

    /// A DNS entry at the given index is blank or not a string.
    #[error("network settings `dns[{0}]` is blank")]
    BlankDnsEntry(usize),

    /// `data/ip` is not a well-formed IP literal.
    #[error("network settings `ip` is not a valid IP address: {0}")]
    InvalidIpAddress(String),
}

/// Client-side error enum.
#[derive(Debug, thiserror::Error)]
pub enum AlthermaError {
    /// The host name or IP literal failed syntactic validation.
    #[error("not a valid host name or IP address: '{0}'")]
    InvalidHost(String),

    /// An operation was attempted without an open connection.
    #[error("connection is not open")]
    NotConnected,

    /// A previous request on this connection never received its response.
    #[error("request {0} is still awaiting a response")]
    RequestAlreadyInFlight(CorrelationId),

    /// The request envelope could not be serialized.
    #[error("failed to encode request envelope: {0}")]
    EnvelopeEncoding(String),

    /// The received message is not a JSON object.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// A path segment does not exist in the document.
    #[error("path '{path}' not found (missing segment '{segment}')")]
    PathNotFound {
        /// Full path that was requested.
        path: String,
        /// First segment that could not be resolved.
        segment: String,
    },

    /// The leaf exists but cannot be read as the requested type.
    #[error("value at '{path}' is not {expected}")]
    TypeMismatch {
        /// Full path that was requested.
        path: String,
        /// Human-readable name of the requested type.
        expected: &'static str,
    },

    /// The response belongs to a different request.
    #[error("response correlation id '{received}' does not match request '{expected}'")]
    CorrelationMismatch {
        /// Id generated for the outstanding request.
        expected: CorrelationId,
        /// Id carried by the response.
        received: String,
    },

    /// The response is addressed to somebody else.
    #[error("response addressed to '{received}', expected '{expected}'")]
    IdentityMismatch {
        /// This client's identity.
        expected: &'static str,
        /// Destination carried by the response.
        received: String,
    },

    /// The peer closed the connection with a non-normal status.
    #[error("unexpected close status {0}")]
    UnexpectedCloseStatus(u16),

    /// A complete message arrived that is not a text message.
    #[error("unexpected message type {0}")]
    UnexpectedMessageType(MessageKind),

    /// The stream ended while a response was awaited.
    #[error("connection closed while awaiting a response")]
    ConnectionClosed,

    /// Failure reported by the WebSocket library.
    #[error("transport error: {0}")]
    Transport(String),

    /// A write value is outside the accepted range.
    #[error("value {value} is outside the accepted range {min}..={max}")]
    OutOfRange {
        /// Rejected value.
        value: i32,
        /// Inclusive lower bound.
        min: i32,
        /// Inclusive upper bound.
        max: i32,
    },

    /// The device reported a power state other than `on` or `standby`.
    #[error("unrecognized power state: '{0}'")]
    UnrecognizedPowerState(String),

    /// The network-settings blob is incomplete or invalid.
    #[error("invalid network settings: {0}")]
    InvalidNetworkSettings(#[from] NetworkSettingsError),
}

impl AlthermaError {
    /// Returns the category this error belongs to.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidHost(_) | Self::OutOfRange { .. } => ErrorCategory::Validation,
            Self::RequestAlreadyInFlight(_)
            | Self::EnvelopeEncoding(_)
            | Self::MalformedEnvelope(_)
            | Self::PathNotFound { .. }
            | Self::TypeMismatch { .. }
            | Self::CorrelationMismatch { .. }
            | Self::IdentityMismatch { .. } => ErrorCategory::Protocol,
            Self::NotConnected
            | Self::UnexpectedCloseStatus(_)
            | Self::UnexpectedMessageType(_)
            | Self::ConnectionClosed
            | Self::Transport(_) => ErrorCategory::Transport,
            Self::UnrecognizedPowerState(_) | Self::InvalidNetworkSettings(_) => {
                ErrorCategory::Domain
            }
        }
    }
}
