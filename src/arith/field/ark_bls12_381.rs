use ark_bls12_381::Fr;
use ark_ff::{Field, One, UniformRand, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand_core::RngCore;

use crate::{BackendError, FieldElement};

impl FieldElement for Fr {
    fn zero() -> Self {
        <Fr as Zero>::zero()
    }

    fn one() -> Self {
        <Fr as One>::one()
    }

    fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        Fr::rand(rng)
    }

    fn invert(&self) -> Option<Self> {
        self.inverse()
    }

    fn to_repr(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.compressed_size());
        self.serialize_compressed(&mut bytes)
            .map_err(|_| BackendError::Serialization("scalar serialization failure"))
            .expect("in-memory serialization should not fail");
        bytes
    }

    fn from_repr(repr: &[u8]) -> Result<Self, BackendError> {
        Self::deserialize_compressed(repr)
            .map_err(|_| BackendError::Serialization("invalid scalar bytes"))
    }

    fn from_u64(n: u64) -> Self {
        Fr::from(n)
    }
}
