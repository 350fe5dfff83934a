//! # TABE: Tree-policy Attribute-Based Encryption
//!
//! TABE implements two attribute-based encryption schemes whose access
//! policies are monotone trees of AND/OR gates over attributes, on top of an
//! asymmetric pairing over BLS12-381.
//!
//! ## Overview
//!
//! - **Key-policy ABE** ([`KpAbe`], GPSW06): ciphertexts are labelled with
//!   attributes from a fixed universe; each decryption key embeds an access
//!   tree. A key opens a ciphertext iff the ciphertext's attributes satisfy
//!   the key's tree.
//! - **Ciphertext-policy ABE** ([`CpAbe`], BSW07): ciphertexts embed an
//!   access tree over free-form labels; each key holds a set of labels. Keys
//!   can be [delegated](CpAbe::delegate) to a subset of their attributes.
//!
//! Both schemes encrypt a [`Message`], an element of the pairing target
//! group. Use it to [`seal`](Message::seal) arbitrary payloads.
//!
//! ## Architecture
//!
//! - **[`arith`]**: backend traits for scalars, G1/G2, GT and the pairing,
//!   with blstrs and Arkworks implementations, plus polynomials and Lagrange
//!   coefficients.
//! - **[`policy`]**: the [`Policy`] builder, the arena-backed [`AccessTree`]
//!   and its JSON encoding.
//! - **[`sharing`]** / **[`reconstruct`]**: secret sharing down a tree and
//!   bottom-up interpolation in the exponent of GT.
//! - **[`kpabe`]** / **[`cpabe`]**: the two schemes and their keys and
//!   ciphertexts.
//! - **[`codec`]**: the JSON wire format of keys and ciphertexts.
//! - **[`config`]**: backend selection and key-policy parameters.
//! - **[`errors`]**: error types for backend and scheme operations.
//!
//! ## Quick Example
//!
//! ```rust
//! # #[cfg(feature = "blst")]
//! # fn main() -> Result<(), tabe::errors::Error> {
//! use std::collections::BTreeSet;
//!
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use tabe::{AccessTree, BackendConfig, BackendId, BlstBackend, CpAbe, CurveId, Message, Policy};
//!
//! let mut rng = StdRng::from_entropy();
//! let abe = CpAbe::<BlstBackend>::new(&BackendConfig::new(BackendId::Blst, CurveId::Bls12_381))?;
//! let (pk, msk) = abe.setup(&mut rng);
//!
//! // ("doctor" OR "nurse") AND "cardiology"
//! let policy = Policy::and(vec![
//!     Policy::or(vec![Policy::leaf("doctor"), Policy::leaf("nurse")]),
//!     Policy::leaf("cardiology"),
//! ]);
//! let tree: AccessTree<String> = AccessTree::from_policy(&policy)?;
//!
//! let session = Message::random(&mut rng);
//! let ct = abe.encrypt(&mut rng, &pk, &session, &tree)?;
//! let sealed = session.seal(b"patient record")?;
//!
//! let attributes: BTreeSet<String> = ["nurse", "cardiology"].map(String::from).into();
//! let dk = abe.keygen(&mut rng, &msk, &attributes)?;
//! let recovered = abe.decrypt(&ct, &dk)?;
//! assert_eq!(recovered.open(&sealed)?, b"patient record");
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "blst"))]
//! # fn main() {}
//! ```
//!
//! ## Feature Flags
//!
//! - **`blst`** (default): blstrs backend for BLS12-381
//! - **`ark_bls12381`**: Arkworks backend for BLS12-381
//!
//! ## Performance
//!
//! Rayon parallelises the per-leaf and per-attribute group operations of
//! encryption and key generation, and sibling subtrees during decryption.
//! Leaf values in ciphertext-policy decryption share one final
//! exponentiation via [`PairingBackend::multi_pairing`].
//!
//! ## Security Considerations
//!
//! - Master keys can issue keys for any policy or attribute set; keep them
//!   offline.
//! - Every randomized operation draws from the caller's RNG; pass a
//!   cryptographically secure one.
//! - The schemes are CPA-secure only. [`Message::seal`] adds an integrity tag
//!   to the payload, not to the ABE ciphertext.

pub mod arith;
pub mod codec;
pub mod config;
pub mod cpabe;
pub mod errors;
pub mod kpabe;
pub mod message;
pub mod policy;
pub mod reconstruct;
pub mod sharing;
pub mod sym_enc;

pub use arith::*;
pub use codec::{ElementRecord, FieldKind, KeyClass};
pub use config::{BackendConfig, BackendId, CurveId, KpAbeParameters};
pub use cpabe::{CpAbe, CpCiphertext, CpDecryptKey, CpMasterKey, CpPublicKey, KeyComponent, LeafComponent};
pub use errors::{BackendError, Error};
pub use kpabe::{KpAbe, KpCiphertext, KpDecryptKey, KpMasterKey, KpPublicKey};
pub use message::Message;
pub use policy::{AccessTree, Attribute, NodeId, Operator, Policy, PolicyAttribute};
pub use reconstruct::combine;
pub use sharing::{Shares, distribute_secret};
pub use sym_enc::{Blake3Envelope, SymmetricEncryption};
