//! Algebraic backend abstractions and implementations.
//!
//! This module provides the trait abstractions the ABE schemes are written
//! against, so multiple backend implementations (blstrs, Arkworks) can drive
//! them through one interface.
//!
//! # Architecture
//!
//! - **[`field`]**: Scalar field operations (Zr) - addition, multiplication, inversion
//! - **[`group`]**: Source groups G1, G2 and the target group GT
//! - **[`pairing`]**: Bilinear pairing `e(G1, G2) -> GT` and hash-to-G1
//! - **[`poly`]**: Dense polynomials used by secret sharing
//! - **[`lagrange`]**: Lagrange coefficients at zero used by reconstruction
//!
//! # Backend Support
//!
//! | Feature | Backend type | Curve |
//! |---------|--------------|-------|
//! | `blst` (default) | [`BlstBackend`] | BLS12-381 |
//! | `ark_bls12381` | [`ArkworksBls12`] | BLS12-381 |
//!
//! Both features may be enabled together; each backend is a distinct type.
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "blst")]
//! # {
//! use rand::thread_rng;
//! use tabe::{BlstBackend, CurvePoint, FieldElement, PairingBackend};
//!
//! type Scalar = <BlstBackend as PairingBackend>::Scalar;
//! type G1 = <BlstBackend as PairingBackend>::G1;
//! type G2 = <BlstBackend as PairingBackend>::G2;
//!
//! let mut rng = thread_rng();
//! let scalar = Scalar::random(&mut rng);
//! let point = G1::generator().mul_scalar(&scalar);
//! let gt = BlstBackend::pairing(&point, &G2::generator());
//! println!("{:?}", gt);
//! # }
//! ```

mod field;
pub use field::*;

mod group;
pub use group::*;

mod pairing;
pub use pairing::*;

mod poly;
pub use poly::*;

mod lagrange;
pub use lagrange::*;
