use std::fmt::Debug;

use crate::{BackendError, FieldElement};

#[cfg(feature = "blst")]
mod blst_bls12_381;

#[cfg(feature = "ark_bls12381")]
mod ark_bls12_381;
#[cfg(feature = "ark_bls12381")]
pub use ark_bls12_381::{ArkG1, ArkG2, ArkGt};

/// Elliptic curve point abstraction for the G1 and G2 source groups.
///
/// Points are held in projective form; `to_repr` writes the compressed affine
/// encoding and `from_repr` checks that the bytes decode to a point of the
/// prime-order subgroup.
///
/// # Example
///
/// ```rust
/// # #[cfg(feature = "blst")]
/// # {
/// use rand::thread_rng;
/// use tabe::{BlstBackend, CurvePoint, FieldElement, PairingBackend};
///
/// type G1 = <BlstBackend as PairingBackend>::G1;
/// type Scalar = <BlstBackend as PairingBackend>::Scalar;
///
/// let mut rng = thread_rng();
/// let scalar = Scalar::random(&mut rng);
///
/// let point = G1::generator().mul_scalar(&scalar);
/// let doubled = point.add(&point);
/// assert_eq!(doubled.sub(&point), point);
/// assert!(point.add(&point.negate()).is_identity());
/// # }
/// ```
pub trait CurvePoint<F: FieldElement>: Copy + Eq + Send + Sync + Debug + 'static {
    /// Returns the point at infinity (identity element).
    fn identity() -> Self;

    /// Returns the standard generator for this group.
    fn generator() -> Self;

    /// Checks if this point is the identity element.
    fn is_identity(&self) -> bool;

    /// Performs elliptic curve point addition.
    fn add(&self, other: &Self) -> Self;

    /// Performs elliptic curve point subtraction.
    fn sub(&self, other: &Self) -> Self;

    /// Returns the additive inverse of this point.
    fn negate(&self) -> Self;

    /// Performs scalar multiplication: returns `scalar * self`.
    fn mul_scalar(&self, scalar: &F) -> Self;

    /// Serializes the point in compressed affine form.
    fn to_repr(&self) -> Vec<u8>;

    /// Deserializes a compressed point, rejecting points off the subgroup.
    fn from_repr(bytes: &[u8]) -> Result<Self, BackendError>;
}

/// Pairing target group (GT) abstraction.
///
/// GT is a multiplicative group; the method names follow that notation even
/// though the backends implement it additively. `combine` is the group
/// product and `mul_scalar` is exponentiation.
///
/// # Example
///
/// ```rust
/// # #[cfg(feature = "blst")]
/// # {
/// use tabe::{BlstBackend, CurvePoint, FieldElement, PairingBackend, TargetGroup};
///
/// type G1 = <BlstBackend as PairingBackend>::G1;
/// type G2 = <BlstBackend as PairingBackend>::G2;
/// type Scalar = <BlstBackend as PairingBackend>::Scalar;
///
/// let gt = BlstBackend::pairing(&G1::generator(), &G2::generator());
/// let squared = gt.combine(&gt);
/// assert_eq!(squared, gt.mul_scalar(&Scalar::from_u64(2)));
/// assert_eq!(squared.divide(&gt), gt);
/// # }
/// ```
pub trait TargetGroup: Copy + Eq + Send + Sync + Debug + 'static {
    /// Scalar field type for exponentiation.
    type Scalar: FieldElement;

    /// Returns the multiplicative identity element.
    fn identity() -> Self;

    /// Raises this element to the power `scalar`.
    fn mul_scalar(&self, scalar: &Self::Scalar) -> Self;

    /// Multiplies two target group elements.
    fn combine(&self, other: &Self) -> Self;

    /// Returns the group inverse.
    fn invert(&self) -> Self;

    /// Returns `self / other`.
    fn divide(&self, other: &Self) -> Self {
        self.combine(&other.invert())
    }

    /// Serializes this element to its byte representation.
    fn to_repr(&self) -> Vec<u8>;

    /// Deserializes an element from its byte representation.
    fn from_repr(bytes: &[u8]) -> Result<Self, BackendError>;
}
