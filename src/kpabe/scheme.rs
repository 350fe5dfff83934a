use std::collections::BTreeSet;
use std::marker::PhantomData;

use rand_core::RngCore;
use rayon::prelude::*;
use tracing::{debug, instrument};

use super::{KpCiphertext, KpDecryptKey, KpMasterKey, KpPublicKey};
use crate::config::KpAbeParameters;
use crate::errors::{BackendError, Error};
use crate::policy::{AccessTree, Attribute, NodeId, Policy};
use crate::reconstruct::combine;
use crate::sharing::distribute_secret;
use crate::{CurvePoint, FieldElement, Message, PairingBackend, TargetGroup};

/// Key-policy ABE over a fixed attribute universe (GPSW06).
///
/// Ciphertexts are labelled with attribute ids; decryption keys carry an
/// access tree over those ids. A key decrypts a ciphertext iff the
/// ciphertext's attribute set satisfies the key's tree.
#[derive(Debug)]
pub struct KpAbe<B: PairingBackend> {
    universe: Vec<Attribute>,
    _phantom: PhantomData<B>,
}

impl<B: PairingBackend> Clone for KpAbe<B> {
    fn clone(&self) -> Self {
        Self {
            universe: self.universe.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<B: PairingBackend> KpAbe<B> {
    /// Creates a scheme instance for the universe in `params`.
    ///
    /// # Errors
    ///
    /// - `BadAttributeUniverse` if the universe is empty, unordered or has
    ///   duplicate labels
    /// - `Backend`/`InvalidConfig` if the configured backend is not `B`
    pub fn new(params: &KpAbeParameters) -> Result<Self, Error> {
        params.validate()?;
        params.backend.ensure_matches::<B>()?;
        Ok(Self {
            universe: params.universe.clone(),
            _phantom: PhantomData,
        })
    }

    pub fn universe(&self) -> &[Attribute] {
        &self.universe
    }

    /// Looks up an attribute id by label.
    pub fn attribute_id(&self, label: &str) -> Option<usize> {
        self.universe
            .iter()
            .find(|attribute| attribute.label == label)
            .map(|attribute| attribute.id)
    }

    /// Builds a leaf policy for the attribute called `label`.
    pub fn leaf(&self, label: &str) -> Result<Policy<usize>, Error> {
        self.attribute_id(label)
            .map(Policy::leaf)
            .ok_or_else(|| Error::MalformedInput(format!("unknown attribute `{label}`")))
    }

    fn check_id(&self, id: usize) -> Result<(), Error> {
        if id >= self.universe.len() {
            return Err(Error::AttributeOutOfRange {
                id,
                universe: self.universe.len(),
            });
        }
        Ok(())
    }

    /// Samples a public key and the matching master key.
    ///
    /// One exponent `t_i` per attribute with `T_i = g2^t_i`, and `y` with
    /// `Y = e(g1, g2)^y`.
    #[instrument(level = "info", skip_all, fields(universe = self.universe.len()))]
    pub fn setup<R: RngCore + ?Sized>(&self, rng: &mut R) -> (KpPublicKey<B>, KpMasterKey<B>) {
        let g2 = B::G2::generator();
        let t: Vec<B::Scalar> = (0..self.universe.len())
            .map(|_| B::Scalar::random(rng))
            .collect();
        let y = B::Scalar::random(rng);

        let public_t = t.par_iter().map(|t_i| g2.mul_scalar(t_i)).collect();
        let public_y = B::pairing(&B::G1::generator(), &g2).mul_scalar(&y);

        (
            KpPublicKey {
                t: public_t,
                y: public_y,
            },
            KpMasterKey { t, y },
        )
    }

    /// Encrypts `msg` under the attribute set `attributes`.
    ///
    /// # Errors
    ///
    /// - `AttributeOutOfRange` if an id is outside the universe
    /// - `InvalidConfig` if `pk` was generated for a different universe
    #[instrument(level = "info", skip_all, fields(attributes = attributes.len()))]
    pub fn encrypt<R: RngCore + ?Sized>(
        &self,
        rng: &mut R,
        msg: &Message<B>,
        attributes: &BTreeSet<usize>,
        pk: &KpPublicKey<B>,
    ) -> Result<KpCiphertext<B>, Error> {
        if pk.t.len() != self.universe.len() {
            return Err(Error::InvalidConfig(format!(
                "public key covers {} attributes, universe has {}",
                pk.t.len(),
                self.universe.len()
            )));
        }
        for id in attributes {
            self.check_id(*id)?;
        }

        let s = B::Scalar::random(rng);
        let enc_msg = msg.element().combine(&pk.y.mul_scalar(&s));
        let components = attributes
            .par_iter()
            .map(|id| (*id, pk.t[*id].mul_scalar(&s)))
            .collect();
        Ok(KpCiphertext {
            enc_msg,
            components,
        })
    }

    /// Issues a decryption key for `tree`.
    ///
    /// Shares `y` over the tree and gives every leaf `x` labelled `i` the
    /// component `g1^(q_x(0) / t_i)`.
    ///
    /// # Errors
    ///
    /// - `AttributeOutOfRange` if a leaf names an id outside the universe
    #[instrument(level = "info", skip_all, fields(nodes = tree.len()))]
    pub fn keygen<R: RngCore + ?Sized>(
        &self,
        rng: &mut R,
        tree: &AccessTree<usize>,
        msk: &KpMasterKey<B>,
    ) -> Result<KpDecryptKey<B>, Error> {
        for (_, id) in tree.leaves() {
            self.check_id(*id)?;
            if *id >= msk.t.len() {
                return Err(Error::AttributeOutOfRange {
                    id: *id,
                    universe: msk.t.len(),
                });
            }
        }

        let shares = distribute_secret(tree, msk.y, rng);
        let g1 = B::G1::generator();
        let leaf_shares: Vec<_> = shares.leaf_shares().collect();
        let components = leaf_shares
            .par_iter()
            .map(|(leaf, id, share)| -> Result<(NodeId, B::G1), Error> {
                let t_inv = msk.t[**id]
                    .invert()
                    .ok_or(BackendError::Math("attribute exponent is zero"))?;
                Ok((*leaf, g1.mul_scalar(&(*share * t_inv))))
            })
            .collect::<Result<_, Error>>()?;
        debug!(leaves = leaf_shares.len(), "decryption key issued");

        Ok(KpDecryptKey {
            tree: tree.clone(),
            components,
        })
    }

    /// Recovers the message if the ciphertext's attributes satisfy the key's
    /// tree.
    ///
    /// Each usable leaf contributes `e(D_x, E_i) = e(g1, g2)^(s · q_x(0))`;
    /// reconstruction yields `Y^s`, which is divided out of `enc_msg`.
    ///
    /// # Errors
    ///
    /// - `PolicyNotSatisfied` if the attributes do not satisfy the tree
    /// - `MalformedInput` if the key lacks a component for a usable leaf
    #[instrument(level = "info", skip_all, fields(attributes = ct.components.len(), nodes = dk.tree.len()))]
    pub fn decrypt(&self, ct: &KpCiphertext<B>, dk: &KpDecryptKey<B>) -> Result<Message<B>, Error> {
        if !dk.tree.satisfy(&ct.attributes()) {
            return Err(Error::PolicyNotSatisfied);
        }

        let leaf_value = |leaf: NodeId, id: &usize| -> Result<B::Target, Error> {
            let e = ct.components.get(id).ok_or(Error::AttributeNotPresent)?;
            let d = dk
                .components
                .get(&leaf)
                .ok_or_else(|| Error::MalformedInput(format!("key has no component for leaf {}", leaf.as_usize())))?;
            Ok(B::pairing(d, e))
        };
        let y_s = combine(&dk.tree, &leaf_value)?;
        Ok(Message::from_element(ct.enc_msg.divide(&y_s)))
    }
}
