use std::collections::{BTreeMap, BTreeSet};

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::codec::{self, ElementRecord, KeyClass};
use crate::{Error, PairingBackend};

/// Ciphertext-policy public key.
///
/// - `h`: `g2^β`
/// - `e`: `e(g1, g2)^α`
#[derive(Debug)]
pub struct CpPublicKey<B: PairingBackend> {
    pub h: B::G2,
    pub e: B::Target,
}

/// Ciphertext-policy master key: `g1^α` and `β`.
///
/// # Security
///
/// Anyone holding the master key can issue decryption keys for any
/// attribute set.
#[derive(Debug)]
pub struct CpMasterKey<B: PairingBackend> {
    pub g_alpha: B::G1,
    pub beta: B::Scalar,
}

/// Per-attribute material of a [`CpDecryptKey`].
///
/// - `d1`: `g1^r · H(j)^r_j`
/// - `d2`: `g2^r_j`
#[derive(Debug)]
pub struct KeyComponent<B: PairingBackend> {
    pub d1: B::G1,
    pub d2: B::G2,
}

/// Ciphertext-policy decryption key for a set of attribute labels.
///
/// - `d`: `g1^((α + r) / β)`
/// - `f`: `g1^(1 / β)`, kept so the key can be delegated
/// - `components`: one [`KeyComponent`] per attribute; the key set is the
///   key's attribute set
#[derive(Debug)]
pub struct CpDecryptKey<B: PairingBackend> {
    pub d: B::G1,
    pub f: B::G1,
    pub components: BTreeMap<String, KeyComponent<B>>,
}

impl<B: PairingBackend> CpDecryptKey<B> {
    /// The attribute labels this key was issued for.
    pub fn attributes(&self) -> BTreeSet<String> {
        self.components.keys().cloned().collect()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        codec::to_json(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        codec::from_tagged_json(bytes, KeyClass::Private)
    }
}

impl<B: PairingBackend> CpPublicKey<B> {
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        codec::to_json(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        codec::from_tagged_json(bytes, KeyClass::Public)
    }
}

impl<B: PairingBackend> CpMasterKey<B> {
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        codec::to_json(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        codec::from_tagged_json(bytes, KeyClass::Master)
    }
}

impl<B: PairingBackend> Clone for CpPublicKey<B> {
    fn clone(&self) -> Self {
        Self {
            h: self.h,
            e: self.e,
        }
    }
}

impl<B: PairingBackend> Clone for CpMasterKey<B> {
    fn clone(&self) -> Self {
        Self {
            g_alpha: self.g_alpha,
            beta: self.beta,
        }
    }
}

impl<B: PairingBackend> Clone for KeyComponent<B> {
    fn clone(&self) -> Self {
        Self {
            d1: self.d1,
            d2: self.d2,
        }
    }
}

impl<B: PairingBackend> Clone for CpDecryptKey<B> {
    fn clone(&self) -> Self {
        Self {
            d: self.d,
            f: self.f,
            components: self.components.clone(),
        }
    }
}

impl<B: PairingBackend> PartialEq for CpPublicKey<B> {
    fn eq(&self, other: &Self) -> bool {
        self.h == other.h && self.e == other.e
    }
}

impl<B: PairingBackend> PartialEq for CpMasterKey<B> {
    fn eq(&self, other: &Self) -> bool {
        self.g_alpha == other.g_alpha && self.beta == other.beta
    }
}

impl<B: PairingBackend> PartialEq for KeyComponent<B> {
    fn eq(&self, other: &Self) -> bool {
        self.d1 == other.d1 && self.d2 == other.d2
    }
}

impl<B: PairingBackend> PartialEq for CpDecryptKey<B> {
    fn eq(&self, other: &Self) -> bool {
        self.d == other.d && self.f == other.f && self.components == other.components
    }
}

impl<B: PairingBackend> Serialize for CpPublicKey<B> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("CpPublicKey", 3)?;
        state.serialize_field("type", &KeyClass::Public)?;
        state.serialize_field("h", &ElementRecord::g2::<B>(&self.h))?;
        state.serialize_field("e", &ElementRecord::gt::<B>(&self.e))?;
        state.end()
    }
}

impl<'de, B: PairingBackend> Deserialize<'de> for CpPublicKey<B> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct CpPublicKeyHelper {
            #[serde(rename = "type")]
            class: KeyClass,
            h: ElementRecord,
            e: ElementRecord,
        }

        let helper = CpPublicKeyHelper::deserialize(deserializer)?;
        KeyClass::Public.check::<D::Error>(helper.class)?;
        Ok(CpPublicKey {
            h: helper.h.to_g2::<B, D::Error>()?,
            e: helper.e.to_gt::<B, D::Error>()?,
        })
    }
}

impl<B: PairingBackend> Serialize for CpMasterKey<B> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("CpMasterKey", 3)?;
        state.serialize_field("type", &KeyClass::Master)?;
        state.serialize_field("a", &ElementRecord::g1::<B>(&self.g_alpha))?;
        state.serialize_field("b", &ElementRecord::scalar(&self.beta))?;
        state.end()
    }
}

impl<'de, B: PairingBackend> Deserialize<'de> for CpMasterKey<B> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct CpMasterKeyHelper {
            #[serde(rename = "type")]
            class: KeyClass,
            a: ElementRecord,
            b: ElementRecord,
        }

        let helper = CpMasterKeyHelper::deserialize(deserializer)?;
        KeyClass::Master.check::<D::Error>(helper.class)?;
        Ok(CpMasterKey {
            g_alpha: helper.a.to_g1::<B, D::Error>()?,
            beta: helper.b.to_scalar::<B::Scalar, D::Error>()?,
        })
    }
}

impl<B: PairingBackend> Serialize for CpDecryptKey<B> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let d1: BTreeMap<&str, ElementRecord> = self
            .components
            .iter()
            .map(|(label, component)| (label.as_str(), ElementRecord::g1::<B>(&component.d1)))
            .collect();
        let d2: BTreeMap<&str, ElementRecord> = self
            .components
            .iter()
            .map(|(label, component)| (label.as_str(), ElementRecord::g2::<B>(&component.d2)))
            .collect();
        let mut state = serializer.serialize_struct("CpDecryptKey", 5)?;
        state.serialize_field("type", &KeyClass::Private)?;
        state.serialize_field("d", &ElementRecord::g1::<B>(&self.d))?;
        state.serialize_field("f", &ElementRecord::g1::<B>(&self.f))?;
        state.serialize_field("d1", &d1)?;
        state.serialize_field("d2", &d2)?;
        state.end()
    }
}

impl<'de, B: PairingBackend> Deserialize<'de> for CpDecryptKey<B> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct CpDecryptKeyHelper {
            #[serde(rename = "type")]
            class: KeyClass,
            d: ElementRecord,
            f: ElementRecord,
            d1: BTreeMap<String, ElementRecord>,
            d2: BTreeMap<String, ElementRecord>,
        }

        let helper = CpDecryptKeyHelper::deserialize(deserializer)?;
        KeyClass::Private.check::<D::Error>(helper.class)?;

        if !helper.d1.keys().eq(helper.d2.keys()) {
            return Err(de::Error::custom(
                "decryption key `d1` and `d2` name different attributes",
            ));
        }

        let components = helper
            .d1
            .iter()
            .zip(helper.d2.values())
            .map(|((label, d1), d2)| {
                Ok((
                    label.clone(),
                    KeyComponent {
                        d1: d1.to_g1::<B, D::Error>()?,
                        d2: d2.to_g2::<B, D::Error>()?,
                    },
                ))
            })
            .collect::<Result<BTreeMap<_, _>, D::Error>>()?;
        Ok(CpDecryptKey {
            d: helper.d.to_g1::<B, D::Error>()?,
            f: helper.f.to_g1::<B, D::Error>()?,
            components,
        })
    }
}
