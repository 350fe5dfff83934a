use std::fmt::Debug;
use std::ops::{Add, Mul, Neg, Sub};

use rand_core::RngCore;

use crate::BackendError;

#[cfg(feature = "blst")]
mod blst_bls12_381;

#[cfg(feature = "ark_bls12381")]
mod ark_bls12_381;

/// Field element abstraction for scalar field operations.
///
/// This trait abstracts over the scalar field Zr of the pairing group. Secret
/// sharing, Lagrange interpolation and every exponent in the ABE schemes live
/// here. Arithmetic comes from the standard operator traits so shares can be
/// combined with ordinary `+`, `-` and `*`.
///
/// # Example
///
/// ```rust
/// # #[cfg(feature = "blst")]
/// # {
/// use rand::thread_rng;
/// use tabe::{BlstBackend, FieldElement, PairingBackend};
///
/// type Fr = <BlstBackend as PairingBackend>::Scalar;
///
/// let mut rng = thread_rng();
/// let a = Fr::random(&mut rng);
/// let inv = a.invert().expect("non-zero element");
/// assert_eq!(a * inv, Fr::one());
///
/// let bytes = a.to_repr();
/// let recovered = Fr::from_repr(&bytes).expect("valid repr");
/// assert_eq!(a, recovered);
/// # }
/// ```
pub trait FieldElement:
    Copy
    + Eq
    + Send
    + Sync
    + Debug
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
{
    /// Returns the additive identity (zero) element.
    fn zero() -> Self;

    /// Returns the multiplicative identity (one) element.
    fn one() -> Self;

    /// Generates a uniformly random field element using the provided RNG.
    fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self;

    /// Computes the multiplicative inverse, returning `None` for zero.
    fn invert(&self) -> Option<Self>;

    /// Serializes this field element to its fixed-width byte representation.
    fn to_repr(&self) -> Vec<u8>;

    /// Deserializes a field element from its byte representation.
    ///
    /// Returns an error if the length is wrong or the value is not reduced
    /// modulo the field order.
    fn from_repr(repr: &[u8]) -> Result<Self, BackendError>;

    /// Converts a small integer into the field.
    fn from_u64(n: u64) -> Self;
}
