//! Access policies: monotone threshold trees over attributes.
//!
//! A [`Policy`] is the owned, recursive description of a policy. It is what
//! callers build and what goes on the wire. An [`AccessTree`] is the same
//! policy laid out in an arena with parent links, sibling indices and
//! thresholds, which is the form secret sharing and reconstruction walk.
//!
//! # Example
//!
//! ```rust
//! use std::collections::BTreeSet;
//!
//! use tabe::{AccessTree, Policy};
//!
//! // ("1" OR "2") AND ("3" AND "4")
//! let policy = Policy::and(vec![
//!     Policy::or(vec![Policy::leaf("1"), Policy::leaf("2")]),
//!     Policy::and(vec![Policy::leaf("3"), Policy::leaf("4")]),
//! ]);
//! let tree: AccessTree<String> = AccessTree::from_policy(&policy).unwrap();
//!
//! let present: BTreeSet<String> = ["1", "3", "4"].iter().map(|s| s.to_string()).collect();
//! assert!(tree.satisfy(&present));
//! ```

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

mod encoding;
mod tree;

pub use tree::{AccessTree, NodeId};

/// Bound for values that can label the leaves of an access tree.
///
/// Key-policy trees carry universe ids (`usize`); ciphertext-policy trees
/// carry attribute labels (`String`).
pub trait PolicyAttribute:
    Clone + Ord + Debug + Send + Sync + Serialize + DeserializeOwned + 'static
{
}

impl<T> PolicyAttribute for T where
    T: Clone + Ord + Debug + Send + Sync + Serialize + DeserializeOwned + 'static
{
}

/// A named attribute of a fixed, ordered universe.
///
/// `id` is the attribute's position in the universe; the key-policy scheme
/// indexes its public and master key components by it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    pub label: String,
    pub id: usize,
}

impl Attribute {
    pub fn new(label: impl Into<String>, id: usize) -> Self {
        Self {
            label: label.into(),
            id,
        }
    }

    /// Builds a universe from `labels`, assigning ids `0..n` in order.
    pub fn universe<I, S>(labels: I) -> Vec<Attribute>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        labels
            .into_iter()
            .enumerate()
            .map(|(id, label)| Attribute::new(label, id))
            .collect()
    }
}

/// Gate operator.
///
/// `Or` has threshold 1; `And` has a threshold equal to its number of
/// children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Or,
    And,
}

/// Owned description of an access policy.
///
/// Serializes as tagged JSON records with the `kind` tag first:
/// `{"kind":"leaf","attribute":A}` or
/// `{"kind":"gate","operator":"or","children":[...]}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Policy<A> {
    Leaf {
        attribute: A,
    },
    Gate {
        operator: Operator,
        children: Vec<Policy<A>>,
    },
}

impl<A> Policy<A> {
    pub fn leaf(attribute: impl Into<A>) -> Self {
        Policy::Leaf {
            attribute: attribute.into(),
        }
    }

    pub fn or(children: Vec<Policy<A>>) -> Self {
        Policy::Gate {
            operator: Operator::Or,
            children,
        }
    }

    pub fn and(children: Vec<Policy<A>>) -> Self {
        Policy::Gate {
            operator: Operator::And,
            children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn universe_assigns_positions() {
        let universe = Attribute::universe(["a", "b", "c"]);
        assert_eq!(universe[0], Attribute::new("a", 0));
        assert_eq!(universe[2], Attribute::new("c", 2));
    }

    #[test]
    fn policy_json_writes_kind_first() {
        let policy: Policy<String> = Policy::or(vec![Policy::leaf("x"), Policy::leaf("y")]);
        let json = serde_json::to_string(&policy).unwrap();
        assert!(json.starts_with(r#"{"kind":"gate","operator":"or","children":[{"kind":"leaf""#));
    }
}
