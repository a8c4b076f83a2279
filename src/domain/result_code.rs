//! Device-reported response status code (`m2m:rsp/rsc`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of a request as reported by the device, independent of whether
/// the exchange itself succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultCode(i64);

impl ResultCode {
    /// The single code meaning "OK".
    pub const OK: Self = Self(2000);
    /// Returned by the adapter when a content instance was created.
    pub const CREATED: Self = Self(2001);

    /// Wraps a raw code.
    #[must_use]
    pub const fn new(code: i64) -> Self {
        Self(code)
    }

    /// Returns the raw code.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Returns `true` only for [`ResultCode::OK`].
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 == Self::OK.0
    }

    /// Returns `true` if a write was accepted ([`ResultCode::OK`] or
    /// [`ResultCode::CREATED`]).
    #[must_use]
    pub const fn is_accepted_write(self) -> bool {
        self.0 == Self::OK.0 || self.0 == Self::CREATED.0
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_2000_is_success() {
        assert!(ResultCode::new(2000).is_success());
        assert!(!ResultCode::new(2001).is_success());
        assert!(!ResultCode::new(4004).is_success());
        assert!(!ResultCode::new(0).is_success());
    }

    #[test]
    fn created_is_an_accepted_write_but_not_success() {
        assert!(ResultCode::CREATED.is_accepted_write());
        assert!(ResultCode::OK.is_accepted_write());
        assert!(!ResultCode::CREATED.is_success());
        assert!(!ResultCode::new(4000).is_accepted_write());
    }
}
