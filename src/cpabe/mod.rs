//! Ciphertext-policy attribute-based encryption (BSW07).
//!
//! The policy travels with the ciphertext and the attributes live in the
//! decryption key. Attributes are arbitrary labels hashed onto G1, so keys
//! can be issued for labels nobody anticipated at setup.
//!
//! Elements are placed for an asymmetric pairing `G1 × G2 → GT`: hashed
//! attributes and key material sit in G1, `h` and the per-leaf `C1` sit in
//! G2.
//!
//! # Protocol Overview
//!
//! 1. **Setup** ([`CpAbe::setup`]): sample `α, β`; publish `h = g2^β` and
//!    `e(g1, g2)^α`; keep `(g1^α, β)`.
//! 2. **Encrypt** ([`CpAbe::encrypt`]): share a random `s` over the policy;
//!    output `M · e(g1, g2)^(αs)`, `C = h^s` and per leaf `g2^q_y(0)`,
//!    `H(attr)^q_y(0)`.
//! 3. **KeyGen** ([`CpAbe::keygen`]): `D = g1^((α + r)/β)` plus one
//!    randomized component pair per attribute.
//! 4. **Delegate** ([`CpAbe::delegate`]): re-randomize a key restricted to a
//!    subset of its attributes.
//! 5. **Decrypt** ([`CpAbe::decrypt`]): recover `e(g1, g2)^(rs)` from the
//!    leaves and strip `e(D, C) / e(g1, g2)^(rs) = e(g1, g2)^(αs)`.
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "blst")]
//! # {
//! use std::collections::BTreeSet;
//!
//! use rand::thread_rng;
//! use tabe::{AccessTree, BackendConfig, BackendId, BlstBackend, CpAbe, CurveId, Message, Policy};
//!
//! let mut rng = thread_rng();
//! let abe = CpAbe::<BlstBackend>::new(&BackendConfig::new(BackendId::Blst, CurveId::Bls12_381)).unwrap();
//! let (pk, msk) = abe.setup(&mut rng);
//!
//! let policy = Policy::or(vec![Policy::leaf("admin"), Policy::leaf("auditor")]);
//! let msg = Message::random(&mut rng);
//! let ct = abe.encrypt(&mut rng, &pk, &msg, &AccessTree::from_policy(&policy).unwrap()).unwrap();
//!
//! let attributes = BTreeSet::from(["auditor".to_string()]);
//! let dk = abe.keygen(&mut rng, &msk, &attributes).unwrap();
//! assert_eq!(abe.decrypt(&ct, &dk).unwrap(), msg);
//! # }
//! ```

mod ciphertext;
pub use ciphertext::{CpCiphertext, LeafComponent};

mod keys;
pub use keys::{CpDecryptKey, CpMasterKey, CpPublicKey, KeyComponent};

mod scheme;
pub use scheme::CpAbe;
