use std::fmt::Debug;

use rand_core::RngCore;

#[cfg(feature = "blst")]
mod blst_bls12_381;
#[cfg(feature = "blst")]
pub use blst_bls12_381::BlstBackend;

#[cfg(feature = "ark_bls12381")]
mod ark_bls12_381;
#[cfg(feature = "ark_bls12381")]
pub use ark_bls12_381::ArkworksBls12;

use crate::config::{BackendId, CurveId};
use crate::{BackendError, CurvePoint, FieldElement, TargetGroup};

/// Domain separation tag for hashing attribute labels onto G1.
pub const ATTRIBUTE_HASH_DST: &[u8] = b"TABE-V01-CS01-with-BLS12381G1_XMD:SHA-256_SSWU_RO_";

/// Main backend trait that ties together all cryptographic operations.
///
/// Concrete backends ([`BlstBackend`], [`ArkworksBls12`]) implement this over
/// an asymmetric pairing `e: G1 x G2 -> GT`. Both schemes are generic over
/// `B: PairingBackend`, so any compiled backend can drive them.
///
/// # Example
///
/// ```rust
/// # #[cfg(feature = "blst")]
/// # {
/// use tabe::{BlstBackend, CurvePoint, FieldElement, PairingBackend, TargetGroup};
///
/// type Scalar = <BlstBackend as PairingBackend>::Scalar;
/// type G1 = <BlstBackend as PairingBackend>::G1;
/// type G2 = <BlstBackend as PairingBackend>::G2;
///
/// let a = Scalar::from_u64(3);
/// let b = Scalar::from_u64(5);
///
/// // Bilinearity: e(aP, bQ) = e(P, Q)^(ab)
/// let lhs = BlstBackend::pairing(&G1::generator().mul_scalar(&a), &G2::generator().mul_scalar(&b));
/// let rhs = BlstBackend::pairing(&G1::generator(), &G2::generator()).mul_scalar(&(a * b));
/// assert_eq!(lhs, rhs);
/// # }
/// ```
pub trait PairingBackend: Send + Sync + Debug + Sized + 'static {
    /// Scalar field type (Zr).
    type Scalar: FieldElement;
    /// First curve group (G1); the hash-to-curve target.
    type G1: CurvePoint<Self::Scalar>;
    /// Second curve group (G2).
    type G2: CurvePoint<Self::Scalar>;
    /// Pairing target group (GT).
    type Target: TargetGroup<Scalar = Self::Scalar>;

    /// Identifies this backend for configuration checks.
    fn backend_id() -> BackendId;

    /// Identifies the curve this backend operates on.
    fn curve_id() -> CurveId;

    /// Computes the bilinear pairing: `e(g1, g2) -> GT`.
    fn pairing(g1: &Self::G1, g2: &Self::G2) -> Self::Target;

    /// Computes a product of pairings: `∏ e(g1[i], g2[i])`.
    ///
    /// Shares a single final exponentiation across all terms. Returns an
    /// error if the input slices have different lengths.
    fn multi_pairing(g1: &[Self::G1], g2: &[Self::G2]) -> Result<Self::Target, BackendError>;

    /// Hashes arbitrary bytes onto G1 (RFC 9380, SSWU, random oracle).
    fn hash_to_g1(msg: &[u8]) -> Result<Self::G1, BackendError>;

    /// Samples a uniformly random GT element as `e(g1, g2)^r`.
    fn random_target<R: RngCore + ?Sized>(rng: &mut R) -> Self::Target {
        let r = Self::Scalar::random(rng);
        Self::pairing(&Self::G1::generator(), &Self::G2::generator()).mul_scalar(&r)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn bilinearity<B: PairingBackend>() {
        let mut rng = StdRng::from_entropy();
        let a = B::Scalar::random(&mut rng);
        let b = B::Scalar::random(&mut rng);
        let p = B::G1::generator().mul_scalar(&a);
        let q = B::G2::generator().mul_scalar(&b);
        let base = B::pairing(&B::G1::generator(), &B::G2::generator());
        assert_eq!(B::pairing(&p, &q), base.mul_scalar(&(a * b)));
    }

    fn multi_pairing_matches_product<B: PairingBackend>() {
        let mut rng = StdRng::from_entropy();
        let g1: Vec<B::G1> = (0..3)
            .map(|_| B::G1::generator().mul_scalar(&B::Scalar::random(&mut rng)))
            .collect();
        let g2: Vec<B::G2> = (0..3)
            .map(|_| B::G2::generator().mul_scalar(&B::Scalar::random(&mut rng)))
            .collect();
        let expected = g1
            .iter()
            .zip(&g2)
            .fold(B::Target::identity(), |acc, (p, q)| {
                acc.combine(&B::pairing(p, q))
            });
        assert_eq!(B::multi_pairing(&g1, &g2).unwrap(), expected);
        assert!(B::multi_pairing(&g1, &g2[..2]).is_err());
    }

    fn hash_is_deterministic<B: PairingBackend>() {
        let a = B::hash_to_g1(b"doctor").unwrap();
        assert_eq!(a, B::hash_to_g1(b"doctor").unwrap());
        assert_ne!(a, B::hash_to_g1(b"nurse").unwrap());
        assert!(!a.is_identity());
    }

    #[cfg(feature = "blst")]
    mod blst {
        use super::*;
        use crate::BlstBackend;

        #[test]
        fn bilinearity_holds() {
            bilinearity::<BlstBackend>();
        }

        #[test]
        fn multi_pairing_is_product() {
            multi_pairing_matches_product::<BlstBackend>();
        }

        #[test]
        fn hash_to_g1_is_deterministic() {
            hash_is_deterministic::<BlstBackend>();
        }
    }

    #[cfg(feature = "ark_bls12381")]
    mod arkworks {
        use super::*;
        use crate::ArkworksBls12;

        #[test]
        fn bilinearity_holds() {
            bilinearity::<ArkworksBls12>();
        }

        #[test]
        fn multi_pairing_is_product() {
            multi_pairing_matches_product::<ArkworksBls12>();
        }

        #[test]
        fn hash_to_g1_is_deterministic() {
            hash_is_deterministic::<ArkworksBls12>();
        }
    }
}
