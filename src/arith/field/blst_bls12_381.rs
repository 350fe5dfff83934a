//! `FieldElement` for the blstrs BLS12-381 scalar field.
//!
//! Scalars are encoded as 32 big-endian bytes.

use blstrs::Scalar;
use ff::Field;
use rand_core::RngCore;

use crate::{BackendError, FieldElement};

const SCALAR_BYTES: usize = 32;

impl FieldElement for Scalar {
    fn zero() -> Self {
        Scalar::ZERO
    }

    fn one() -> Self {
        Scalar::ONE
    }

    fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        <Scalar as Field>::random(rng)
    }

    fn invert(&self) -> Option<Self> {
        Field::invert(self).into()
    }

    fn to_repr(&self) -> Vec<u8> {
        self.to_bytes_be().to_vec()
    }

    fn from_repr(repr: &[u8]) -> Result<Self, BackendError> {
        let bytes: [u8; SCALAR_BYTES] = repr
            .try_into()
            .map_err(|_| BackendError::Serialization("invalid scalar length"))?;
        Option::<Scalar>::from(Scalar::from_bytes_be(&bytes))
            .ok_or(BackendError::Serialization("invalid scalar bytes"))
    }

    fn from_u64(n: u64) -> Self {
        Scalar::from(n)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn repr_is_fixed_width_and_reversible() {
        let mut rng = StdRng::from_entropy();
        let x = <Scalar as FieldElement>::random(&mut rng);
        let bytes = FieldElement::to_repr(&x);
        assert_eq!(bytes.len(), SCALAR_BYTES);
        assert_eq!(<Scalar as FieldElement>::from_repr(&bytes).unwrap(), x);
    }

    #[test]
    fn short_and_unreduced_encodings_are_rejected() {
        assert!(<Scalar as FieldElement>::from_repr(&[1u8; 31]).is_err());
        assert!(<Scalar as FieldElement>::from_repr(&[0xffu8; 32]).is_err());
    }

    #[test]
    fn zero_has_no_inverse() {
        assert!(FieldElement::invert(&<Scalar as FieldElement>::zero()).is_none());
    }
}
