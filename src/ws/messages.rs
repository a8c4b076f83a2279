//! oneM2M envelope codec.
//!
//! Requests are wrapped under `m2m:rqp`, responses arrive under
//! `m2m:rsp`:
//!
//! ```json
//! { "m2m:rqp": { "fr": "altherma-client", "rqi": "3f9a1", "op": 2,
//!                "to": "/[0]/MNAE/1/Operation/Power/la" } }
//! ```
//!
//! Writes switch `op` to create, add `ty` and nest the new value as a
//! content instance under `pc/m2m:cin`.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::domain::{CorrelationId, Resource};
use crate::error::AlthermaError;

/// Top-level key of a request.
pub const REQUEST_KEY: &str = "m2m:rqp";
/// Top-level key of a response.
pub const RESPONSE_KEY: &str = "m2m:rsp";
/// Content format written with every value.
pub const TEXT_PLAIN_FORMAT: &str = "text/plain:0";
/// Resource type of a content instance.
pub const CONTENT_INSTANCE_TYPE: u8 = 4;

/// Path of the echoed correlation id in a response.
pub const RESPONSE_ID_PATH: &str = "/m2m:rsp/rqi";
/// Path of the destination identity in a response.
pub const RESPONSE_TO_PATH: &str = "/m2m:rsp/to";
/// Path of the result code in a response.
pub const RESPONSE_CODE_PATH: &str = "/m2m:rsp/rsc";

/// Request operation, serialized as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Create a resource (code 1).
    Create,
    /// Retrieve a resource (code 2).
    Retrieve,
}

impl Operation {
    /// Returns the wire code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Create => 1,
            Self::Retrieve => 2,
        }
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// New value pushed onto a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentInstance {
    /// The value itself.
    #[serde(rename = "con")]
    pub value: Value,
    /// Content format marker.
    #[serde(rename = "cnf")]
    pub format: String,
}

impl ContentInstance {
    /// A plain-text content instance holding `value`.
    #[must_use]
    pub fn text(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            format: TEXT_PLAIN_FORMAT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct PrimitiveContent {
    #[serde(rename = "m2m:cin")]
    content_instance: ContentInstance,
}

#[derive(Debug, Clone, Serialize)]
struct RequestPrimitive {
    #[serde(rename = "fr")]
    from: String,
    #[serde(rename = "rqi")]
    request_id: CorrelationId,
    #[serde(rename = "op")]
    operation: Operation,
    #[serde(rename = "to")]
    target: String,
    #[serde(rename = "ty", skip_serializing_if = "Option::is_none")]
    resource_type: Option<u8>,
    #[serde(rename = "pc", skip_serializing_if = "Option::is_none")]
    content: Option<PrimitiveContent>,
}

/// Outgoing request envelope.
#[derive(Debug, Clone, Serialize)]
pub struct RequestEnvelope {
    #[serde(rename = "m2m:rqp")]
    primitive: RequestPrimitive,
}

impl RequestEnvelope {
    /// Builds a request for `resource`. Without content this is a
    /// retrieve; with content it creates a new content instance.
    #[must_use]
    pub fn new(
        correlation_id: CorrelationId,
        sender: &str,
        resource: &Resource,
        content: Option<ContentInstance>,
    ) -> Self {
        let (operation, resource_type) = match content {
            Some(_) => (Operation::Create, Some(CONTENT_INSTANCE_TYPE)),
            None => (Operation::Retrieve, None),
        };
        Self {
            primitive: RequestPrimitive {
                from: sender.to_string(),
                request_id: correlation_id,
                operation,
                target: resource.target(),
                resource_type,
                content: content.map(|content_instance| PrimitiveContent { content_instance }),
            },
        }
    }

    /// Returns the operation this envelope requests.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.primitive.operation
    }

    /// Returns the correlation id.
    #[must_use]
    pub const fn correlation_id(&self) -> &CorrelationId {
        &self.primitive.request_id
    }

    /// Returns the request target.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.primitive.target
    }

    /// Serializes the envelope to its JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns [`AlthermaError::EnvelopeEncoding`] if serialization fails.
    pub fn encode(&self) -> Result<String, AlthermaError> {
        serde_json::to_string(self).map_err(|e| AlthermaError::EnvelopeEncoding(e.to_string()))
    }
}

/// Parses a received message into a JSON document.
///
/// # Errors
///
/// Returns [`AlthermaError::MalformedEnvelope`] if `bytes` is not JSON or
/// is not a JSON object.
pub fn decode(bytes: &[u8]) -> Result<Value, AlthermaError> {
    let document: Value =
        serde_json::from_slice(bytes).map_err(|e| AlthermaError::MalformedEnvelope(e.to_string()))?;
    if !document.is_object() {
        return Err(AlthermaError::MalformedEnvelope(
            "expected a JSON object".to_string(),
        ));
    }
    Ok(document)
}
