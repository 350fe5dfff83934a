//! blstrs implementations of the group traits for BLS12-381.
//!
//! G1 and G2 use the standard compressed encodings (48 and 96 bytes). GT uses
//! blstrs' torus-compressed encoding, which is valid for every pairing output.

use std::io::Cursor;

use blstrs::{Compress, G1Affine, G1Projective, G2Affine, G2Projective, Gt, Scalar};
use group::{Curve, Group};

use crate::{BackendError, CurvePoint, TargetGroup};

const G1_BYTES: usize = 48;
const G2_BYTES: usize = 96;
const GT_BYTES: usize = 288;

impl CurvePoint<Scalar> for G1Projective {
    fn identity() -> Self {
        <G1Projective as Group>::identity()
    }

    fn generator() -> Self {
        <G1Projective as Group>::generator()
    }

    fn is_identity(&self) -> bool {
        <Self as Group>::is_identity(self).into()
    }

    fn add(&self, other: &Self) -> Self {
        self + other
    }

    fn sub(&self, other: &Self) -> Self {
        self - other
    }

    fn negate(&self) -> Self {
        -self
    }

    fn mul_scalar(&self, scalar: &Scalar) -> Self {
        self * scalar
    }

    fn to_repr(&self) -> Vec<u8> {
        self.to_affine().to_compressed().to_vec()
    }

    fn from_repr(bytes: &[u8]) -> Result<Self, BackendError> {
        let bytes: [u8; G1_BYTES] = bytes
            .try_into()
            .map_err(|_| BackendError::Serialization("invalid G1 length"))?;
        Option::<G1Affine>::from(G1Affine::from_compressed(&bytes))
            .map(G1Projective::from)
            .ok_or(BackendError::Serialization("invalid G1 bytes"))
    }
}

impl CurvePoint<Scalar> for G2Projective {
    fn identity() -> Self {
        <G2Projective as Group>::identity()
    }

    fn generator() -> Self {
        <G2Projective as Group>::generator()
    }

    fn is_identity(&self) -> bool {
        <Self as Group>::is_identity(self).into()
    }

    fn add(&self, other: &Self) -> Self {
        self + other
    }

    fn sub(&self, other: &Self) -> Self {
        self - other
    }

    fn negate(&self) -> Self {
        -self
    }

    fn mul_scalar(&self, scalar: &Scalar) -> Self {
        self * scalar
    }

    fn to_repr(&self) -> Vec<u8> {
        self.to_affine().to_compressed().to_vec()
    }

    fn from_repr(bytes: &[u8]) -> Result<Self, BackendError> {
        let bytes: [u8; G2_BYTES] = bytes
            .try_into()
            .map_err(|_| BackendError::Serialization("invalid G2 length"))?;
        Option::<G2Affine>::from(G2Affine::from_compressed(&bytes))
            .map(G2Projective::from)
            .ok_or(BackendError::Serialization("invalid G2 bytes"))
    }
}

impl TargetGroup for Gt {
    type Scalar = Scalar;

    fn identity() -> Self {
        <Gt as Group>::identity()
    }

    fn mul_scalar(&self, scalar: &Scalar) -> Self {
        self * scalar
    }

    fn combine(&self, other: &Self) -> Self {
        self + other
    }

    fn invert(&self) -> Self {
        -self
    }

    fn to_repr(&self) -> Vec<u8> {
        // Pairing outputs lie in the cyclotomic subgroup, so torus
        // compression into a Vec cannot fail.
        let mut bytes = Vec::with_capacity(GT_BYTES);
        self.write_compressed(&mut bytes)
            .map_err(|_| BackendError::Serialization("gt serialization failure"))
            .expect("in-memory serialization should not fail");
        bytes
    }

    fn from_repr(bytes: &[u8]) -> Result<Self, BackendError> {
        if bytes.len() != GT_BYTES {
            return Err(BackendError::Serialization("invalid GT length"));
        }
        Gt::read_compressed(&mut Cursor::new(bytes))
            .map_err(|_| BackendError::Serialization("invalid GT bytes"))
    }
}

#[cfg(test)]
mod tests {
    use blstrs::Bls12;
    use group::prime::PrimeCurveAffine;
    use pairing::Engine;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::FieldElement;

    #[test]
    fn compressed_points_round_trip() {
        let mut rng = StdRng::from_entropy();
        let s = <Scalar as FieldElement>::random(&mut rng);
        let p = CurvePoint::mul_scalar(&<G1Projective as Group>::generator(), &s);
        let q = CurvePoint::mul_scalar(&<G2Projective as Group>::generator(), &s);

        let p_bytes = CurvePoint::to_repr(&p);
        let q_bytes = CurvePoint::to_repr(&q);
        assert_eq!(p_bytes.len(), G1_BYTES);
        assert_eq!(q_bytes.len(), G2_BYTES);
        assert_eq!(<G1Projective as CurvePoint<Scalar>>::from_repr(&p_bytes).unwrap(), p);
        assert_eq!(<G2Projective as CurvePoint<Scalar>>::from_repr(&q_bytes).unwrap(), q);
        assert!(<G1Projective as CurvePoint<Scalar>>::from_repr(&q_bytes).is_err());
    }

    #[test]
    fn target_group_is_multiplicative_in_name() {
        let base = Bls12::pairing(&G1Affine::generator(), &G2Affine::generator());
        let two = <Scalar as FieldElement>::from_u64(2);
        let squared = TargetGroup::combine(&base, &base);
        assert_eq!(squared, TargetGroup::mul_scalar(&base, &two));
        assert_eq!(TargetGroup::divide(&squared, &base), base);
        assert_eq!(
            TargetGroup::combine(&base, &TargetGroup::invert(&base)),
            <Gt as TargetGroup>::identity()
        );

        let bytes = TargetGroup::to_repr(&squared);
        assert_eq!(bytes.len(), GT_BYTES);
        assert_eq!(<Gt as TargetGroup>::from_repr(&bytes).unwrap(), squared);
    }
}
