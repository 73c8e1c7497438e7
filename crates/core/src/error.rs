//! Errors shared by every bounded context.

use thiserror::Error;

/// Failure inside a storage adapter.
///
/// Ports report a missing row as `Ok(None)`; this type is reserved for the
/// backend itself misbehaving (lost connection, poisoned lock, corrupt row).
/// Aggregate-level rule violations never surface through it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("storage failure: {0}")]
pub struct StorageError(String);

impl StorageError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// An identifier string did not parse as a UUID.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {reason}")]
pub struct IdParseError {
    kind: &'static str,
    reason: String,
}

impl IdParseError {
    pub fn new(kind: &'static str, source: uuid::Error) -> Self {
        Self {
            kind,
            reason: source.to_string(),
        }
    }
}
