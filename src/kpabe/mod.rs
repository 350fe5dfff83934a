//! Key-policy attribute-based encryption (GPSW06).
//!
//! The policy lives in the decryption key and the attributes live in the
//! ciphertext. The universe of attributes is fixed when the scheme is
//! created; public and master keys hold one component per attribute.
//!
//! # Protocol Overview
//!
//! 1. **Setup** ([`KpAbe::setup`]): sample `t_i` per attribute and `y`;
//!    publish `T_i = g2^t_i` and `Y = e(g1, g2)^y`.
//! 2. **Encrypt** ([`KpAbe::encrypt`]): for random `s`, output `M · Y^s` and
//!    `E_i = T_i^s` for each attribute `i` of the ciphertext.
//! 3. **KeyGen** ([`KpAbe::keygen`]): share `y` over the access tree and give
//!    each leaf `x` labelled `i` the component `D_x = g1^(q_x(0) / t_i)`.
//! 4. **Decrypt** ([`KpAbe::decrypt`]): pair `D_x` with `E_i` at satisfied
//!    leaves, interpolate up to `Y^s`, and divide it out.
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "blst")]
//! # {
//! use std::collections::BTreeSet;
//!
//! use rand::thread_rng;
//! use tabe::{
//!     AccessTree, BackendConfig, BackendId, BlstBackend, CurveId, KpAbe, KpAbeParameters,
//!     Message, Policy,
//! };
//!
//! let mut rng = thread_rng();
//! let params = KpAbeParameters::new(
//!     BackendConfig::new(BackendId::Blst, CurveId::Bls12_381),
//!     ["finance", "legal", "audit"],
//! )
//! .unwrap();
//! let abe = KpAbe::<BlstBackend>::new(&params).unwrap();
//! let (pk, msk) = abe.setup(&mut rng);
//!
//! let policy = Policy::and(vec![abe.leaf("finance").unwrap(), abe.leaf("audit").unwrap()]);
//! let dk = abe.keygen(&mut rng, &AccessTree::from_policy(&policy).unwrap(), &msk).unwrap();
//!
//! let msg = Message::random(&mut rng);
//! let ct = abe.encrypt(&mut rng, &msg, &BTreeSet::from([0, 2]), &pk).unwrap();
//! assert_eq!(abe.decrypt(&ct, &dk).unwrap(), msg);
//! # }
//! ```

mod ciphertext;
pub use ciphertext::KpCiphertext;

mod keys;
pub use keys::{KpDecryptKey, KpMasterKey, KpPublicKey};

mod scheme;
pub use scheme::KpAbe;
