use std::collections::BTreeMap;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::codec::{self, ElementRecord};
use crate::policy::{AccessTree, NodeId};
use crate::{Error, PairingBackend};

/// Ciphertext material for one leaf of the embedded policy.
///
/// - `c1`: `g2^q_y(0)`
/// - `c2`: `H(attr(y))^q_y(0)`
#[derive(Debug)]
pub struct LeafComponent<B: PairingBackend> {
    pub c1: B::G2,
    pub c2: B::G1,
}

/// Ciphertext-policy ciphertext.
///
/// Carries the access tree it was encrypted under, `enc_msg = M · e(g1, g2)^(αs)`,
/// `c = h^s`, and a [`LeafComponent`] for every leaf of the tree.
#[derive(Debug)]
pub struct CpCiphertext<B: PairingBackend> {
    pub policy: AccessTree<String>,
    pub enc_msg: B::Target,
    pub c: B::G2,
    pub leaves: BTreeMap<NodeId, LeafComponent<B>>,
}

impl<B: PairingBackend> CpCiphertext<B> {
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        codec::to_json(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        codec::from_json_with_tree::<_, String>(bytes)
    }
}

impl<B: PairingBackend> Clone for LeafComponent<B> {
    fn clone(&self) -> Self {
        Self {
            c1: self.c1,
            c2: self.c2,
        }
    }
}

impl<B: PairingBackend> Clone for CpCiphertext<B> {
    fn clone(&self) -> Self {
        Self {
            policy: self.policy.clone(),
            enc_msg: self.enc_msg,
            c: self.c,
            leaves: self.leaves.clone(),
        }
    }
}

impl<B: PairingBackend> PartialEq for LeafComponent<B> {
    fn eq(&self, other: &Self) -> bool {
        self.c1 == other.c1 && self.c2 == other.c2
    }
}

impl<B: PairingBackend> PartialEq for CpCiphertext<B> {
    fn eq(&self, other: &Self) -> bool {
        self.policy == other.policy
            && self.enc_msg == other.enc_msg
            && self.c == other.c
            && self.leaves == other.leaves
    }
}

impl<B: PairingBackend> Serialize for CpCiphertext<B> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let c1: BTreeMap<NodeId, ElementRecord> = self
            .leaves
            .iter()
            .map(|(leaf, component)| (*leaf, ElementRecord::g2::<B>(&component.c1)))
            .collect();
        let c2: BTreeMap<NodeId, ElementRecord> = self
            .leaves
            .iter()
            .map(|(leaf, component)| (*leaf, ElementRecord::g1::<B>(&component.c2)))
            .collect();
        let mut state = serializer.serialize_struct("CpCiphertext", 5)?;
        state.serialize_field("tree", &self.policy)?;
        state.serialize_field("msg", &ElementRecord::gt::<B>(&self.enc_msg))?;
        state.serialize_field("c", &ElementRecord::g2::<B>(&self.c))?;
        state.serialize_field("c1", &c1)?;
        state.serialize_field("c2", &c2)?;
        state.end()
    }
}

impl<'de, B: PairingBackend> Deserialize<'de> for CpCiphertext<B> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct CpCiphertextHelper {
            tree: AccessTree<String>,
            msg: ElementRecord,
            c: ElementRecord,
            c1: BTreeMap<NodeId, ElementRecord>,
            c2: BTreeMap<NodeId, ElementRecord>,
        }

        let helper = CpCiphertextHelper::deserialize(deserializer)?;
        let tree_leaves: Vec<NodeId> = helper.tree.leaves().map(|(id, _)| id).collect();
        if !helper.c1.keys().eq(tree_leaves.iter()) || !helper.c2.keys().eq(tree_leaves.iter()) {
            return Err(de::Error::custom(
                "ciphertext components do not match the leaves of its tree",
            ));
        }

        let leaves = helper
            .c1
            .iter()
            .zip(helper.c2.values())
            .map(|((leaf, c1), c2)| {
                Ok((
                    *leaf,
                    LeafComponent {
                        c1: c1.to_g2::<B, D::Error>()?,
                        c2: c2.to_g1::<B, D::Error>()?,
                    },
                ))
            })
            .collect::<Result<BTreeMap<_, _>, D::Error>>()?;
        Ok(CpCiphertext {
            policy: helper.tree,
            enc_msg: helper.msg.to_gt::<B, D::Error>()?,
            c: helper.c.to_g2::<B, D::Error>()?,
            leaves,
        })
    }
}
