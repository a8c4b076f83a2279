//! Typed lookups into loosely-typed JSON documents.
//!
//! A path is a `/`-separated list of object keys. Empty segments are
//! skipped, so `/m2m:rsp/rqi`, `m2m:rsp/rqi` and `m2m:rsp//rqi` all name
//! the same leaf. Array indices are not supported.
//!
//! ```
//! use altherma_client::json_path::extract;
//! use serde_json::json;
//!
//! let doc = json!({ "m2m:rsp": { "rsc": 2000 } });
//! let rsc: i64 = extract(&doc, "/m2m:rsp/rsc").unwrap_or_default();
//! assert_eq!(rsc, 2000);
//! ```

use serde_json::Value;

use crate::error::AlthermaError;

/// Conversion from a JSON leaf into a Rust value.
pub trait FromJsonLeaf: Sized {
    /// Type name used in [`AlthermaError::TypeMismatch`].
    const EXPECTED: &'static str;

    /// Converts `value`, returning `None` if it has the wrong shape.
    fn from_leaf(value: &Value) -> Option<Self>;
}

impl FromJsonLeaf for String {
    const EXPECTED: &'static str = "a string";

    fn from_leaf(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromJsonLeaf for bool {
    const EXPECTED: &'static str = "a boolean";

    fn from_leaf(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromJsonLeaf for i64 {
    const EXPECTED: &'static str = "an integer";

    fn from_leaf(value: &Value) -> Option<Self> {
        value.as_i64()
    }
}

impl FromJsonLeaf for i32 {
    const EXPECTED: &'static str = "a 32-bit integer";

    fn from_leaf(value: &Value) -> Option<Self> {
        value.as_i64().and_then(|v| i32::try_from(v).ok())
    }
}

impl FromJsonLeaf for f64 {
    const EXPECTED: &'static str = "a number";

    fn from_leaf(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl FromJsonLeaf for f32 {
    const EXPECTED: &'static str = "a number";

    #[allow(clippy::cast_possible_truncation)]
    fn from_leaf(value: &Value) -> Option<Self> {
        value.as_f64().map(|v| v as f32)
    }
}

impl FromJsonLeaf for Value {
    const EXPECTED: &'static str = "a JSON value";

    fn from_leaf(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl<T: FromJsonLeaf> FromJsonLeaf for Option<T> {
    const EXPECTED: &'static str = T::EXPECTED;

    fn from_leaf(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_leaf(other).map(Some),
        }
    }
}

/// Walks `document` along `path` and returns the node found there.
///
/// # Errors
///
/// Returns [`AlthermaError::PathNotFound`] if the path is blank, a key is
/// absent, or an intermediate node is not an object.
pub fn lookup<'a>(document: &'a Value, path: &str) -> Result<&'a Value, AlthermaError> {
    let mut segments = path.split('/').filter(|s| !s.is_empty()).peekable();
    if segments.peek().is_none() {
        return Err(AlthermaError::PathNotFound {
            path: path.to_string(),
            segment: String::new(),
        });
    }

    segments.try_fold(document, |node, segment| {
        node.as_object()
            .and_then(|object| object.get(segment))
            .ok_or_else(|| AlthermaError::PathNotFound {
                path: path.to_string(),
                segment: segment.to_string(),
            })
    })
}

/// Extracts the leaf at `path` as a `T`.
///
/// # Errors
///
/// Returns [`AlthermaError::PathNotFound`] if the path does not resolve and
/// [`AlthermaError::TypeMismatch`] if the leaf cannot be read as `T`.
pub fn extract<T: FromJsonLeaf>(document: &Value, path: &str) -> Result<T, AlthermaError> {
    let leaf = lookup(document, path)?;
    T::from_leaf(leaf).ok_or_else(|| AlthermaError::TypeMismatch {
        path: path.to_string(),
        expected: T::EXPECTED,
    })
}
