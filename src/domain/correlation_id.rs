//! Request correlation identifier.
//!
//! [`CorrelationId`] pairs a request with its response. The device echoes
//! it back verbatim in `m2m:rsp/rqi`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of hex characters in a generated id.
const CORRELATION_ID_LEN: usize = 5;

/// Short per-request token carried in `rqi`.
///
/// Generated from the first hex digits of a UUID v4, which keeps the wire
/// format compact while collisions over one connection stay negligible
/// (only one request is ever outstanding).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generates a fresh random id.
    #[must_use]
    pub fn generate() -> Self {
        let id = uuid::Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(CORRELATION_ID_LEN)
            .collect();
        Self(id)
    }

    /// Returns the id as it appears on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CorrelationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl PartialEq<str> for CorrelationId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn generated_id_is_short_lowercase_hex() {
        let id = CorrelationId::generate();
        assert_eq!(id.as_str().len(), CORRELATION_ID_LEN);
        assert!(
            id.as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn generated_ids_differ() {
        let ids: std::collections::HashSet<_> =
            (0..32).map(|_| CorrelationId::generate()).collect();
        // 32 draws from 16^5 values; a single collision is possible but
        // more than one is not plausible.
        assert!(ids.len() >= 31);
    }

    #[test]
    fn compares_with_wire_string() {
        let id = CorrelationId::from("a1b2c");
        assert!(id == *"a1b2c");
        assert_eq!(id.to_string(), "a1b2c");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = CorrelationId::from("0f0f0");
        let Ok(json) = serde_json::to_string(&id) else {
            panic!("serialization failed");
        };
        assert_eq!(json, "\"0f0f0\"");
    }
}
