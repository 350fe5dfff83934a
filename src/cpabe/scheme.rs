use std::collections::{BTreeMap, BTreeSet};
use std::marker::PhantomData;

use rand_core::RngCore;
use rayon::prelude::*;
use tracing::{debug, instrument};

use super::{CpCiphertext, CpDecryptKey, CpMasterKey, CpPublicKey, KeyComponent, LeafComponent};
use crate::config::BackendConfig;
use crate::errors::{BackendError, Error};
use crate::policy::{AccessTree, NodeId};
use crate::reconstruct::combine;
use crate::sharing::distribute_secret;
use crate::{CurvePoint, FieldElement, Message, PairingBackend, TargetGroup};

/// Ciphertext-policy ABE over free-form attribute labels (BSW07).
///
/// Ciphertexts embed an access tree over labels; decryption keys carry a
/// set of labels. Labels are hashed onto G1, so there is no fixed universe.
#[derive(Debug)]
pub struct CpAbe<B: PairingBackend> {
    config: BackendConfig,
    _phantom: PhantomData<B>,
}

impl<B: PairingBackend> Clone for CpAbe<B> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            _phantom: PhantomData,
        }
    }
}

/// `H(label)` on G1.
fn hash_attribute<B: PairingBackend>(label: &str) -> Result<B::G1, Error> {
    Ok(B::hash_to_g1(label.as_bytes())?)
}

impl<B: PairingBackend> CpAbe<B> {
    /// Creates a scheme instance.
    ///
    /// # Errors
    ///
    /// - `Backend` if the configured backend is not compiled in
    /// - `InvalidConfig` if the configuration does not name `B`
    pub fn new(config: &BackendConfig) -> Result<Self, Error> {
        config.ensure_matches::<B>()?;
        Ok(Self {
            config: config.clone(),
            _phantom: PhantomData,
        })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Samples `α, β` and returns `(h = g2^β, e(g1, g2)^α)` with the master
    /// key `(g1^α, β)`.
    #[instrument(level = "info", skip_all)]
    pub fn setup<R: RngCore + ?Sized>(&self, rng: &mut R) -> (CpPublicKey<B>, CpMasterKey<B>) {
        let g1 = B::G1::generator();
        let g2 = B::G2::generator();
        let alpha = B::Scalar::random(rng);
        let beta = B::Scalar::random(rng);

        let pk = CpPublicKey {
            h: g2.mul_scalar(&beta),
            e: B::pairing(&g1, &g2).mul_scalar(&alpha),
        };
        let msk = CpMasterKey {
            g_alpha: g1.mul_scalar(&alpha),
            beta,
        };
        (pk, msk)
    }

    /// Encrypts `msg` under `policy`.
    ///
    /// Shares a fresh `s` over the tree; every leaf `y` gets
    /// `C1 = g2^q_y(0)` and `C2 = H(attr(y))^q_y(0)`.
    #[instrument(level = "info", skip_all, fields(nodes = policy.len()))]
    pub fn encrypt<R: RngCore + ?Sized>(
        &self,
        rng: &mut R,
        pk: &CpPublicKey<B>,
        msg: &Message<B>,
        policy: &AccessTree<String>,
    ) -> Result<CpCiphertext<B>, Error> {
        let s = B::Scalar::random(rng);
        let enc_msg = msg.element().combine(&pk.e.mul_scalar(&s));
        let c = pk.h.mul_scalar(&s);

        let shares = distribute_secret(policy, s, rng);
        let g2 = B::G2::generator();
        let leaf_shares: Vec<_> = shares.leaf_shares().collect();
        let leaves = leaf_shares
            .par_iter()
            .map(|(leaf, label, share)| -> Result<(NodeId, LeafComponent<B>), Error> {
                let hashed = hash_attribute::<B>(label)?;
                Ok((
                    *leaf,
                    LeafComponent {
                        c1: g2.mul_scalar(share),
                        c2: hashed.mul_scalar(share),
                    },
                ))
            })
            .collect::<Result<BTreeMap<_, _>, Error>>()?;
        debug!(leaves = leaves.len(), "ciphertext components computed");

        Ok(CpCiphertext {
            policy: policy.clone(),
            enc_msg,
            c,
            leaves,
        })
    }

    /// Issues a decryption key for `attributes`.
    ///
    /// `D = (g1^α · g1^r)^(1/β)`, `F = g1^(1/β)`, and per attribute `j` with
    /// fresh `r_j`: `D1 = g1^r · H(j)^r_j`, `D2 = g2^r_j`.
    #[instrument(level = "info", skip_all, fields(attributes = attributes.len()))]
    pub fn keygen<R: RngCore + ?Sized>(
        &self,
        rng: &mut R,
        msk: &CpMasterKey<B>,
        attributes: &BTreeSet<String>,
    ) -> Result<CpDecryptKey<B>, Error> {
        let g1 = B::G1::generator();
        let beta_inv = msk
            .beta
            .invert()
            .ok_or(BackendError::Math("master exponent is zero"))?;
        let r = B::Scalar::random(rng);

        let d = msk.g_alpha.add(&g1.mul_scalar(&r)).mul_scalar(&beta_inv);
        let f = g1.mul_scalar(&beta_inv);
        let g_r = g1.mul_scalar(&r);

        let randomness: Vec<(&String, B::Scalar)> = attributes
            .iter()
            .map(|label| (label, B::Scalar::random(rng)))
            .collect();
        let components = randomness
            .par_iter()
            .map(|(label, r_j)| -> Result<(String, KeyComponent<B>), Error> {
                let hashed = hash_attribute::<B>(label)?;
                Ok((
                    (*label).clone(),
                    KeyComponent {
                        d1: g_r.add(&hashed.mul_scalar(r_j)),
                        d2: B::G2::generator().mul_scalar(r_j),
                    },
                ))
            })
            .collect::<Result<BTreeMap<_, _>, Error>>()?;

        Ok(CpDecryptKey { d, f, components })
    }

    /// Derives a key for `subset` from `key`, re-randomized so it is
    /// unlinkable to its parent.
    ///
    /// With fresh `r'`: `D' = D · F^r'`; per attribute `k` with fresh `r_k`:
    /// `D1' = D1_k · g1^r' · H(k)^r_k` and `D2' = D2_k · g2^r_k`.
    ///
    /// # Errors
    ///
    /// - `SubsetAttributeNotExist` if `subset` names an attribute the key
    ///   does not hold
    #[instrument(level = "info", skip_all, fields(from = key.components.len(), to = subset.len()))]
    pub fn delegate<R: RngCore + ?Sized>(
        &self,
        rng: &mut R,
        key: &CpDecryptKey<B>,
        subset: &BTreeSet<String>,
    ) -> Result<CpDecryptKey<B>, Error> {
        if let Some(missing) = subset.iter().find(|label| !key.components.contains_key(*label)) {
            return Err(Error::SubsetAttributeNotExist(missing.clone()));
        }

        let g1 = B::G1::generator();
        let r = B::Scalar::random(rng);
        let d = key.d.add(&key.f.mul_scalar(&r));
        let g_r = g1.mul_scalar(&r);

        let randomness: Vec<(&String, B::Scalar)> = subset
            .iter()
            .map(|label| (label, B::Scalar::random(rng)))
            .collect();
        let components = randomness
            .par_iter()
            .map(|(label, r_k)| -> Result<(String, KeyComponent<B>), Error> {
                let parent = &key.components[*label];
                let hashed = hash_attribute::<B>(label)?;
                Ok((
                    (*label).clone(),
                    KeyComponent {
                        d1: parent.d1.add(&g_r).add(&hashed.mul_scalar(r_k)),
                        d2: parent.d2.add(&B::G2::generator().mul_scalar(r_k)),
                    },
                ))
            })
            .collect::<Result<BTreeMap<_, _>, Error>>()?;

        Ok(CpDecryptKey {
            d,
            f: key.f,
            components,
        })
    }

    /// Recovers the message if the key's attributes satisfy the ciphertext's
    /// policy.
    ///
    /// Each usable leaf contributes `e(D1, C1) / e(C2, D2) = e(g1, g2)^(r · q_y(0))`;
    /// reconstruction yields `A = e(g1, g2)^(rs)` and the message is
    /// `enc_msg / (e(D, C) / A)`.
    ///
    /// # Errors
    ///
    /// - `PolicyNotSatisfied` if the key's attributes do not satisfy the tree
    /// - `MalformedInput` if the ciphertext lacks material for a leaf
    #[instrument(level = "info", skip_all, fields(nodes = ct.policy.len(), attributes = dk.components.len()))]
    pub fn decrypt(&self, ct: &CpCiphertext<B>, dk: &CpDecryptKey<B>) -> Result<Message<B>, Error> {
        if !ct.policy.satisfy(&dk.attributes()) {
            return Err(Error::PolicyNotSatisfied);
        }

        let leaf_value = |leaf: NodeId, label: &String| -> Result<B::Target, Error> {
            let key = dk.components.get(label).ok_or(Error::AttributeNotPresent)?;
            let component = ct.leaves.get(&leaf).ok_or_else(|| {
                Error::MalformedInput(format!("ciphertext has no component for leaf {}", leaf.as_usize()))
            })?;
            Ok(B::multi_pairing(
                &[key.d1, component.c2.negate()],
                &[component.c1, key.d2],
            )?)
        };
        let a = combine(&ct.policy, &leaf_value)?;
        let blinding = B::pairing(&dk.d, &ct.c).divide(&a);
        Ok(Message::from_element(ct.enc_msg.divide(&blinding)))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::config::{BackendId, CurveId};
    use crate::policy::Policy;

    fn scheme<B: PairingBackend>(backend: BackendId) -> CpAbe<B> {
        CpAbe::new(&BackendConfig::new(backend, CurveId::Bls12_381)).unwrap()
    }

    fn labels(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn tree(policy: Policy<String>) -> AccessTree<String> {
        AccessTree::from_policy(&policy).unwrap()
    }

    // ("1" OR "2") AND ("3" AND "4")
    fn nested_policy() -> AccessTree<String> {
        tree(Policy::and(vec![
            Policy::or(vec![Policy::leaf("1"), Policy::leaf("2")]),
            Policy::and(vec![Policy::leaf("3"), Policy::leaf("4")]),
        ]))
    }

    fn nested_policy_decrypts<B: PairingBackend>(backend: BackendId) {
        let abe = scheme::<B>(backend);
        let mut rng = StdRng::from_entropy();
        let (pk, msk) = abe.setup(&mut rng);

        let msg = Message::<B>::random(&mut rng);
        let ct = abe.encrypt(&mut rng, &pk, &msg, &nested_policy()).unwrap();
        assert_eq!(ct.leaves.len(), 4);

        let dk = abe.keygen(&mut rng, &msk, &labels(&["1", "3", "4"])).unwrap();
        assert_eq!(abe.decrypt(&ct, &dk).unwrap(), msg);

        let dk = abe.keygen(&mut rng, &msk, &labels(&["2", "3", "4", "9"])).unwrap();
        assert_eq!(abe.decrypt(&ct, &dk).unwrap(), msg);

        let dk = abe.keygen(&mut rng, &msk, &labels(&["2"])).unwrap();
        assert!(matches!(abe.decrypt(&ct, &dk), Err(Error::PolicyNotSatisfied)));

        let dk = abe.keygen(&mut rng, &msk, &labels(&["1", "2", "3"])).unwrap();
        assert!(matches!(abe.decrypt(&ct, &dk), Err(Error::PolicyNotSatisfied)));
    }

    fn delegated_keys<B: PairingBackend>(backend: BackendId) {
        let abe = scheme::<B>(backend);
        let mut rng = StdRng::from_entropy();
        let (pk, msk) = abe.setup(&mut rng);

        let policy = tree(Policy::and(vec![Policy::leaf("a"), Policy::leaf("f")]));
        let msg = Message::<B>::random(&mut rng);
        let ct = abe.encrypt(&mut rng, &pk, &msg, &policy).unwrap();

        let parent = abe.keygen(&mut rng, &msk, &labels(&["a", "b", "f", "h"])).unwrap();
        let child = abe.delegate(&mut rng, &parent, &labels(&["a", "f"])).unwrap();
        assert_eq!(child.attributes(), labels(&["a", "f"]));
        assert!(child.d != parent.d);
        assert!(child.f == parent.f);
        assert_eq!(abe.decrypt(&ct, &child).unwrap(), msg);

        let grandchild = abe.delegate(&mut rng, &child, &labels(&["a"])).unwrap();
        assert!(matches!(
            abe.decrypt(&ct, &grandchild),
            Err(Error::PolicyNotSatisfied)
        ));

        match abe.delegate(&mut rng, &child, &labels(&["a", "h"])) {
            Err(Error::SubsetAttributeNotExist(label)) => assert_eq!(label, "h"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    fn repeated_labels_and_thresholds<B: PairingBackend>(backend: BackendId) {
        let abe = scheme::<B>(backend);
        let mut rng = StdRng::from_entropy();
        let (pk, msk) = abe.setup(&mut rng);

        // x AND (x OR y): "x" labels two leaves with different shares.
        let policy = tree(Policy::and(vec![
            Policy::leaf("x"),
            Policy::or(vec![Policy::leaf("x"), Policy::leaf("y")]),
        ]));
        let msg = Message::<B>::random(&mut rng);
        let ct = abe.encrypt(&mut rng, &pk, &msg, &policy).unwrap();
        assert_eq!(ct.leaves.len(), 3);

        let dk = abe.keygen(&mut rng, &msk, &labels(&["x"])).unwrap();
        assert_eq!(abe.decrypt(&ct, &dk).unwrap(), msg);

        let dk = abe.keygen(&mut rng, &msk, &labels(&["y"])).unwrap();
        assert!(matches!(abe.decrypt(&ct, &dk), Err(Error::PolicyNotSatisfied)));
    }

    fn codecs<B: PairingBackend>(backend: BackendId) {
        let abe = scheme::<B>(backend);
        let mut rng = StdRng::from_entropy();
        let (pk, msk) = abe.setup(&mut rng);

        let msg = Message::<B>::random(&mut rng);
        let ct = abe.encrypt(&mut rng, &pk, &msg, &nested_policy()).unwrap();
        let dk = abe.keygen(&mut rng, &msk, &labels(&["4", "3", "1"])).unwrap();

        let pk_back = CpPublicKey::<B>::from_bytes(&pk.to_bytes().unwrap()).unwrap();
        let msk_back = CpMasterKey::<B>::from_bytes(&msk.to_bytes().unwrap()).unwrap();
        let dk_back = CpDecryptKey::<B>::from_bytes(&dk.to_bytes().unwrap()).unwrap();
        let ct_back = CpCiphertext::<B>::from_bytes(&ct.to_bytes().unwrap()).unwrap();
        assert!(pk_back == pk);
        assert!(msk_back == msk);
        assert!(dk_back == dk);
        assert!(ct_back == ct);
        assert_eq!(abe.decrypt(&ct_back, &dk_back).unwrap(), msg);

        // Keys issued from a decoded master key still work.
        let dk = abe.keygen(&mut rng, &msk_back, &labels(&["2", "3", "4"])).unwrap();
        assert_eq!(abe.decrypt(&ct, &dk).unwrap(), msg);

        assert!(matches!(
            CpDecryptKey::<B>::from_bytes(&msk.to_bytes().unwrap()),
            Err(Error::KeyClassMismatch { .. })
        ));
        assert!(matches!(
            CpMasterKey::<B>::from_bytes(&pk.to_bytes().unwrap()),
            Err(Error::KeyClassMismatch { .. })
        ));
        assert!(CpCiphertext::<B>::from_bytes(b"{\"tree\":1}").is_err());

        // A corrupted embedded tree reports the tree error itself.
        let mut value: serde_json::Value = serde_json::from_slice(&ct.to_bytes().unwrap()).unwrap();
        value["tree"]["kind"] = "threshold".into();
        match CpCiphertext::<B>::from_bytes(&serde_json::to_vec(&value).unwrap()) {
            Err(Error::UnknownNodeKind(kind)) => assert_eq!(kind, "threshold"),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
        value["tree"] = serde_json::json!({"kind": "gate", "operator": "or", "children": []});
        assert!(matches!(
            CpCiphertext::<B>::from_bytes(&serde_json::to_vec(&value).unwrap()),
            Err(Error::BadTreeEncoding(_))
        ));
    }

    #[cfg(feature = "blst")]
    mod blst {
        use super::*;
        use crate::BlstBackend;

        #[test]
        fn nested_policy_decrypts_only_with_enough_attributes() {
            nested_policy_decrypts::<BlstBackend>(BackendId::Blst);
        }

        #[test]
        fn delegation_narrows_keys() {
            delegated_keys::<BlstBackend>(BackendId::Blst);
        }

        #[test]
        fn repeated_labels_decrypt() {
            repeated_labels_and_thresholds::<BlstBackend>(BackendId::Blst);
        }

        #[test]
        fn keys_and_ciphertexts_survive_json() {
            codecs::<BlstBackend>(BackendId::Blst);
        }

        #[test]
        fn ciphertext_with_missing_leaf_is_rejected() {
            let abe = scheme::<BlstBackend>(BackendId::Blst);
            let mut rng = StdRng::from_entropy();
            let (pk, _) = abe.setup(&mut rng);
            let msg = Message::random(&mut rng);
            let mut ct = abe.encrypt(&mut rng, &pk, &msg, &nested_policy()).unwrap();
            let first = *ct.leaves.keys().next().unwrap();
            ct.leaves.remove(&first);
            assert!(CpCiphertext::<BlstBackend>::from_bytes(&ct.to_bytes().unwrap()).is_err());
        }

        #[test]
        fn mismatched_backend_is_rejected() {
            let config = BackendConfig::new(BackendId::Arkworks, CurveId::Bls12_381);
            assert!(CpAbe::<BlstBackend>::new(&config).is_err());
        }
    }

    #[cfg(feature = "ark_bls12381")]
    mod arkworks {
        use super::*;
        use crate::ArkworksBls12;

        #[test]
        fn nested_policy_decrypts_only_with_enough_attributes() {
            nested_policy_decrypts::<ArkworksBls12>(BackendId::Arkworks);
        }

        #[test]
        fn delegation_narrows_keys() {
            delegated_keys::<ArkworksBls12>(BackendId::Arkworks);
        }

        #[test]
        fn keys_and_ciphertexts_survive_json() {
            codecs::<ArkworksBls12>(BackendId::Arkworks);
        }
    }
}
