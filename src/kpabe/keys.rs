use std::collections::BTreeMap;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::codec::{self, ElementRecord, KeyClass};
use crate::policy::{AccessTree, NodeId};
use crate::{Error, PairingBackend};

/// Key-policy public key.
///
/// - `t`: `T_i = g2^t_i` for every attribute `i` of the universe
/// - `y`: `Y = e(g1, g2)^y`
#[derive(Debug)]
pub struct KpPublicKey<B: PairingBackend> {
    pub t: Vec<B::G2>,
    pub y: B::Target,
}

/// Key-policy master key: the exponents behind [`KpPublicKey`].
///
/// # Security
///
/// Anyone holding the master key can issue decryption keys for any policy.
#[derive(Debug)]
pub struct KpMasterKey<B: PairingBackend> {
    pub t: Vec<B::Scalar>,
    pub y: B::Scalar,
}

/// Key-policy decryption key.
///
/// Embeds the access tree it was issued for. `components` holds
/// `D_x = g1^(q_x(0) / t_i)` for every leaf `x` labelled with attribute `i`,
/// keyed by leaf so an attribute may appear in several leaves.
#[derive(Debug)]
pub struct KpDecryptKey<B: PairingBackend> {
    pub tree: AccessTree<usize>,
    pub components: BTreeMap<NodeId, B::G1>,
}

impl<B: PairingBackend> Clone for KpPublicKey<B> {
    fn clone(&self) -> Self {
        Self {
            t: self.t.clone(),
            y: self.y,
        }
    }
}

impl<B: PairingBackend> Clone for KpMasterKey<B> {
    fn clone(&self) -> Self {
        Self {
            t: self.t.clone(),
            y: self.y,
        }
    }
}

impl<B: PairingBackend> Clone for KpDecryptKey<B> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
            components: self.components.clone(),
        }
    }
}

impl<B: PairingBackend> PartialEq for KpPublicKey<B> {
    fn eq(&self, other: &Self) -> bool {
        self.t == other.t && self.y == other.y
    }
}

impl<B: PairingBackend> PartialEq for KpMasterKey<B> {
    fn eq(&self, other: &Self) -> bool {
        self.t == other.t && self.y == other.y
    }
}

impl<B: PairingBackend> PartialEq for KpDecryptKey<B> {
    fn eq(&self, other: &Self) -> bool {
        self.tree == other.tree && self.components == other.components
    }
}

impl<B: PairingBackend> KpPublicKey<B> {
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        codec::to_json(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        codec::from_tagged_json(bytes, KeyClass::Public)
    }
}

impl<B: PairingBackend> KpMasterKey<B> {
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        codec::to_json(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        codec::from_tagged_json(bytes, KeyClass::Master)
    }
}

impl<B: PairingBackend> KpDecryptKey<B> {
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        codec::to_json(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        codec::from_tagged_json_with_tree::<_, usize>(bytes, KeyClass::Private)
    }
}

impl<B: PairingBackend> Serialize for KpPublicKey<B> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("KpPublicKey", 3)?;
        state.serialize_field("type", &KeyClass::Public)?;
        state.serialize_field(
            "t",
            &self.t.iter().map(ElementRecord::g2::<B>).collect::<Vec<_>>(),
        )?;
        state.serialize_field("y", &ElementRecord::gt::<B>(&self.y))?;
        state.end()
    }
}

impl<'de, B: PairingBackend> Deserialize<'de> for KpPublicKey<B> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct KpPublicKeyHelper {
            #[serde(rename = "type")]
            class: KeyClass,
            t: Vec<ElementRecord>,
            y: ElementRecord,
        }

        let helper = KpPublicKeyHelper::deserialize(deserializer)?;
        KeyClass::Public.check::<D::Error>(helper.class)?;
        Ok(KpPublicKey {
            t: helper
                .t
                .iter()
                .map(|record| record.to_g2::<B, D::Error>())
                .collect::<Result<Vec<_>, _>>()?,
            y: helper.y.to_gt::<B, D::Error>()?,
        })
    }
}

impl<B: PairingBackend> Serialize for KpMasterKey<B> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("KpMasterKey", 3)?;
        state.serialize_field("type", &KeyClass::Master)?;
        state.serialize_field(
            "t",
            &self.t.iter().map(ElementRecord::scalar).collect::<Vec<_>>(),
        )?;
        state.serialize_field("y", &ElementRecord::scalar(&self.y))?;
        state.end()
    }
}

impl<'de, B: PairingBackend> Deserialize<'de> for KpMasterKey<B> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct KpMasterKeyHelper {
            #[serde(rename = "type")]
            class: KeyClass,
            t: Vec<ElementRecord>,
            y: ElementRecord,
        }

        let helper = KpMasterKeyHelper::deserialize(deserializer)?;
        KeyClass::Master.check::<D::Error>(helper.class)?;
        Ok(KpMasterKey {
            t: helper
                .t
                .iter()
                .map(|record| record.to_scalar::<B::Scalar, D::Error>())
                .collect::<Result<Vec<_>, _>>()?,
            y: helper.y.to_scalar::<B::Scalar, D::Error>()?,
        })
    }
}

impl<B: PairingBackend> Serialize for KpDecryptKey<B> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let d: BTreeMap<NodeId, ElementRecord> = self
            .components
            .iter()
            .map(|(leaf, point)| (*leaf, ElementRecord::g1::<B>(point)))
            .collect();
        let mut state = serializer.serialize_struct("KpDecryptKey", 3)?;
        state.serialize_field("type", &KeyClass::Private)?;
        state.serialize_field("tree", &self.tree)?;
        state.serialize_field("d", &d)?;
        state.end()
    }
}

impl<'de, B: PairingBackend> Deserialize<'de> for KpDecryptKey<B> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct KpDecryptKeyHelper {
            #[serde(rename = "type")]
            class: KeyClass,
            tree: AccessTree<usize>,
            d: BTreeMap<NodeId, ElementRecord>,
        }

        let helper = KpDecryptKeyHelper::deserialize(deserializer)?;
        KeyClass::Private.check::<D::Error>(helper.class)?;

        let leaves = helper.tree.leaves().count();
        if helper.d.len() != leaves
            || helper
                .d
                .keys()
                .any(|id| !helper.tree.contains(*id) || !helper.tree.is_leaf(*id))
        {
            return Err(de::Error::custom(
                "decryption key components do not match the leaves of its tree",
            ));
        }

        let components = helper
            .d
            .iter()
            .map(|(leaf, record)| Ok((*leaf, record.to_g1::<B, D::Error>()?)))
            .collect::<Result<BTreeMap<_, _>, D::Error>>()?;
        Ok(KpDecryptKey {
            tree: helper.tree,
            components,
        })
    }
}
