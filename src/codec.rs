//! Serde support for keys, ciphertexts and their group elements.
//!
//! # Serialization Strategy
//!
//! - **Group and field elements**: written as element records,
//!   `{"field":"Zr"|"G1"|"G2"|"GT","bytes":[...]}`, where `bytes` is the
//!   backend's `to_repr()` output. Decoding checks the field kind before
//!   touching the bytes.
//! - **Key containers**: carry a `"type"` tag, `"public"`, `"master"` or
//!   `"private"`. Decoding a key of one class as another fails with
//!   `KeyClassMismatch`.
//! - **Access trees**: embedded in their tagged JSON form under `"tree"`.
//!   A bad embedded tree reports the tree error (`BadTreeEncoding`,
//!   `UnknownNodeKind`) rather than `MalformedInput`.
//! - **Maps**: written as JSON objects keyed by attribute id, node id or
//!   label.
//!
//! Ciphertexts carry no class tag.

use std::fmt;

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::policy::{AccessTree, PolicyAttribute};
use crate::{CurvePoint, Error, FieldElement, PairingBackend, TargetGroup};

/// Algebraic structure an element record belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Zr,
    G1,
    G2,
    GT,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A serialized group or field element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub field: FieldKind,
    pub bytes: Vec<u8>,
}

impl ElementRecord {
    pub fn scalar<F: FieldElement>(value: &F) -> Self {
        Self {
            field: FieldKind::Zr,
            bytes: value.to_repr(),
        }
    }

    pub fn g1<B: PairingBackend>(value: &B::G1) -> Self {
        Self {
            field: FieldKind::G1,
            bytes: value.to_repr(),
        }
    }

    pub fn g2<B: PairingBackend>(value: &B::G2) -> Self {
        Self {
            field: FieldKind::G2,
            bytes: value.to_repr(),
        }
    }

    pub fn gt<B: PairingBackend>(value: &B::Target) -> Self {
        Self {
            field: FieldKind::GT,
            bytes: value.to_repr(),
        }
    }

    fn bytes_of<E: de::Error>(&self, expected: FieldKind) -> Result<&[u8], E> {
        if self.field != expected {
            return Err(E::custom(format!(
                "expected a {expected} element, found {}",
                self.field
            )));
        }
        Ok(&self.bytes)
    }

    pub fn to_scalar<F: FieldElement, E: de::Error>(&self) -> Result<F, E> {
        F::from_repr(self.bytes_of(FieldKind::Zr)?).map_err(E::custom)
    }

    pub fn to_g1<B: PairingBackend, E: de::Error>(&self) -> Result<B::G1, E> {
        B::G1::from_repr(self.bytes_of(FieldKind::G1)?).map_err(E::custom)
    }

    pub fn to_g2<B: PairingBackend, E: de::Error>(&self) -> Result<B::G2, E> {
        B::G2::from_repr(self.bytes_of(FieldKind::G2)?).map_err(E::custom)
    }

    pub fn to_gt<B: PairingBackend, E: de::Error>(&self) -> Result<B::Target, E> {
        B::Target::from_repr(self.bytes_of(FieldKind::GT)?).map_err(E::custom)
    }
}

/// Class tag written into every key container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyClass {
    Public,
    Master,
    Private,
}

impl fmt::Display for KeyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyClass::Public => f.write_str("public"),
            KeyClass::Master => f.write_str("master"),
            KeyClass::Private => f.write_str("private"),
        }
    }
}

impl KeyClass {
    /// Fails inside a `Deserialize` impl when a decoded tag is not `self`.
    pub(crate) fn check<E: de::Error>(self, found: KeyClass) -> Result<(), E> {
        if found != self {
            return Err(E::custom(format!(
                "key class mismatch: expected `{self}`, found `{found}`"
            )));
        }
        Ok(())
    }
}

/// Serializes a key or ciphertext to JSON bytes.
pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>, Error> {
    serde_json::to_vec(value).map_err(|err| Error::MalformedInput(err.to_string()))
}

/// Deserializes a ciphertext, or any other untagged container.
pub(crate) fn from_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(bytes).map_err(Error::from)
}

/// Deserializes an untagged container that embeds an access tree.
pub(crate) fn from_json_with_tree<T, A>(bytes: &[u8]) -> Result<T, Error>
where
    T: DeserializeOwned,
    A: PolicyAttribute,
{
    let value: Value = serde_json::from_slice(bytes)?;
    check_tree::<A>(&value)?;
    serde_json::from_value(value).map_err(Error::from)
}

/// Deserializes a key container, reporting a wrong class tag as
/// `KeyClassMismatch` rather than a generic parse failure.
pub(crate) fn from_tagged_json<T: DeserializeOwned>(bytes: &[u8], expected: KeyClass) -> Result<T, Error> {
    let value = tagged_value(bytes, expected)?;
    serde_json::from_value(value).map_err(Error::from)
}

/// Tagged counterpart of [`from_json_with_tree`].
pub(crate) fn from_tagged_json_with_tree<T, A>(bytes: &[u8], expected: KeyClass) -> Result<T, Error>
where
    T: DeserializeOwned,
    A: PolicyAttribute,
{
    let value = tagged_value(bytes, expected)?;
    check_tree::<A>(&value)?;
    serde_json::from_value(value).map_err(Error::from)
}

fn tagged_value(bytes: &[u8], expected: KeyClass) -> Result<Value, Error> {
    let value: Value = serde_json::from_slice(bytes)?;
    let tag = value
        .get("type")
        .ok_or_else(|| Error::MalformedInput("key container has no `type` tag".into()))?;
    let found = KeyClass::deserialize(tag).map_err(|_| Error::KeyClassMismatch {
        expected: expected.to_string(),
        found: tag.to_string(),
    })?;
    if found != expected {
        return Err(Error::KeyClassMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        });
    }
    Ok(value)
}

// A missing tree is left to the container's own deserializer.
fn check_tree<A: PolicyAttribute>(value: &Value) -> Result<(), Error> {
    match value.get("tree") {
        Some(tree) => AccessTree::<A>::from_value(tree).map(|_| ()),
        None => Ok(()),
    }
}
