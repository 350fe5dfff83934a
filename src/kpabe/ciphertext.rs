use std::collections::{BTreeMap, BTreeSet};

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec::{self, ElementRecord};
use crate::{Error, PairingBackend};

/// Key-policy ciphertext.
///
/// - `enc_msg`: `M · Y^s`
/// - `components`: `E_i = T_i^s` for every attribute id `i` the message was
///   encrypted under; the key set is the ciphertext's attribute set
#[derive(Debug)]
pub struct KpCiphertext<B: PairingBackend> {
    pub enc_msg: B::Target,
    pub components: BTreeMap<usize, B::G2>,
}

impl<B: PairingBackend> KpCiphertext<B> {
    /// The attribute ids this ciphertext was encrypted under.
    pub fn attributes(&self) -> BTreeSet<usize> {
        self.components.keys().copied().collect()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        codec::to_json(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        codec::from_json(bytes)
    }
}

impl<B: PairingBackend> Clone for KpCiphertext<B> {
    fn clone(&self) -> Self {
        Self {
            enc_msg: self.enc_msg,
            components: self.components.clone(),
        }
    }
}

impl<B: PairingBackend> PartialEq for KpCiphertext<B> {
    fn eq(&self, other: &Self) -> bool {
        self.enc_msg == other.enc_msg && self.components == other.components
    }
}

impl<B: PairingBackend> Serialize for KpCiphertext<B> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let attrs: BTreeMap<usize, ElementRecord> = self
            .components
            .iter()
            .map(|(id, point)| (*id, ElementRecord::g2::<B>(point)))
            .collect();
        let mut state = serializer.serialize_struct("KpCiphertext", 2)?;
        state.serialize_field("msg", &ElementRecord::gt::<B>(&self.enc_msg))?;
        state.serialize_field("attrs", &attrs)?;
        state.end()
    }
}

impl<'de, B: PairingBackend> Deserialize<'de> for KpCiphertext<B> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct KpCiphertextHelper {
            msg: ElementRecord,
            attrs: BTreeMap<usize, ElementRecord>,
        }

        let helper = KpCiphertextHelper::deserialize(deserializer)?;
        let components = helper
            .attrs
            .iter()
            .map(|(id, record)| Ok((*id, record.to_g2::<B, D::Error>()?)))
            .collect::<Result<BTreeMap<_, _>, D::Error>>()?;
        Ok(KpCiphertext {
            enc_msg: helper.msg.to_gt::<B, D::Error>()?,
            components,
        })
    }
}
