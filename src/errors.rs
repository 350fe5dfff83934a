//! Error types for the crate.
//!
//! This module defines low-level backend errors returned by the concrete
//! pairing backends (blstrs, Arkworks) as well as the high-level `Error`
//! type returned by the access-tree, secret-sharing and scheme APIs.
//!
//! `PolicyNotSatisfied` is an ordinary outcome of decryption with the wrong
//! key and is never retried internally. `AttributeNotPresent` is the
//! leaf-level miss observed during reconstruction; gates absorb it, so
//! callers of the scheme APIs only ever see `PolicyNotSatisfied`.
//!
//! # Examples
//!
//! ```rust
//! use tabe::errors::Error;
//!
//! let err = Error::AttributeOutOfRange { id: 9, universe: 7 };
//! assert_eq!(err.to_string(), "attribute id 9 out of range for a universe of 7");
//! ```

use thiserror::Error;

/// Errors bubbled up from backend implementations (Arkworks, blstrs).
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("unsupported curve: {0}")]
    UnsupportedCurve(&'static str),
    #[error("unsupported backend feature: {0}")]
    UnsupportedFeature(&'static str),
    #[error("serialization failure: {0}")]
    Serialization(&'static str),
    #[error("math error: {0}")]
    Math(&'static str),
    #[error("{0}")]
    Other(String),
}

/// High-level errors returned by the ABE API.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("attribute id {id} out of range for a universe of {universe}")]
    AttributeOutOfRange { id: usize, universe: usize },
    #[error("attribute universe is incomplete, unsorted or has duplicate labels: {0}")]
    BadAttributeUniverse(String),
    #[error("bad access tree encoding: {0}")]
    BadTreeEncoding(String),
    #[error("unknown access tree node kind `{0}`")]
    UnknownNodeKind(String),
    #[error("available attributes do not satisfy the access policy")]
    PolicyNotSatisfied,
    #[error("no key material for attribute at this leaf")]
    AttributeNotPresent,
    #[error("delegated attribute `{0}` does not exist in the source key")]
    SubsetAttributeNotExist(String),
    #[error("key class mismatch: expected `{expected}`, found `{found}`")]
    KeyClassMismatch { expected: String, found: String },
}

impl Error {
    /// Returns true for the misses that a threshold gate absorbs instead of
    /// propagating.
    pub(crate) fn is_soft_miss(&self) -> bool {
        matches!(self, Error::AttributeNotPresent | Error::PolicyNotSatisfied)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedInput(err.to_string())
    }
}
