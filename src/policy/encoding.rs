//! JSON wire form of access trees.
//!
//! Decoding walks a `serde_json::Value` by hand instead of deriving, so a
//! missing or mistyped field reports `BadTreeEncoding` and an unrecognised
//! `kind` reports `UnknownNodeKind`.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{AccessTree, Operator, Policy, PolicyAttribute};
use crate::Error;

impl<A: PolicyAttribute> AccessTree<A> {
    /// Encodes the tree as canonical JSON.
    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        serde_json::to_vec(&self.to_policy()).map_err(|err| Error::BadTreeEncoding(err.to_string()))
    }

    /// Decodes a tree written by [`encode`](Self::encode).
    ///
    /// The arena is rebuilt top-down in pre-order, so shape, sibling indices
    /// and parent links match the encoded tree exactly.
    pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|err| Error::BadTreeEncoding(err.to_string()))?;
        Self::from_value(&value)
    }

    pub(crate) fn from_value(value: &Value) -> Result<Self, Error> {
        AccessTree::from_policy(&policy_from_value(value)?)
    }
}

fn field<'a>(object: &'a Map<String, Value>, name: &str) -> Result<&'a Value, Error> {
    object
        .get(name)
        .ok_or_else(|| Error::BadTreeEncoding(format!("node is missing `{name}`")))
}

fn policy_from_value<A: PolicyAttribute>(value: &Value) -> Result<Policy<A>, Error> {
    let object = value
        .as_object()
        .ok_or_else(|| Error::BadTreeEncoding("node is not an object".into()))?;
    let kind = field(object, "kind")?
        .as_str()
        .ok_or_else(|| Error::BadTreeEncoding("`kind` is not a string".into()))?;

    match kind {
        "leaf" => {
            let attribute = A::deserialize(field(object, "attribute")?)
                .map_err(|err| Error::BadTreeEncoding(format!("bad leaf attribute: {err}")))?;
            Ok(Policy::Leaf { attribute })
        }
        "gate" => {
            let operator = Operator::deserialize(field(object, "operator")?)
                .map_err(|err| Error::BadTreeEncoding(format!("bad gate operator: {err}")))?;
            let children = field(object, "children")?
                .as_array()
                .ok_or_else(|| Error::BadTreeEncoding("`children` is not an array".into()))?;
            if children.is_empty() {
                return Err(Error::BadTreeEncoding("gate has no children".into()));
            }
            let children = children
                .iter()
                .map(policy_from_value)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Policy::Gate { operator, children })
        }
        other => Err(Error::UnknownNodeKind(other.to_string())),
    }
}

impl<'de, A: PolicyAttribute> Deserialize<'de> for Policy<A> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        policy_from_value(&value).map_err(de::Error::custom)
    }
}

impl<A: PolicyAttribute> Serialize for AccessTree<A> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_policy().serialize(serializer)
    }
}

impl<'de, A: PolicyAttribute> Deserialize<'de> for AccessTree<A> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        AccessTree::from_value(&value).map_err(de::Error::custom)
    }
}
