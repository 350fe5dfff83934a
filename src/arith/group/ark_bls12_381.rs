//! Arkworks implementations of the group traits for BLS12-381.
//!
//! Both source groups are `Projective` over a curve config reached through
//! `Bls12Config`, which coherence cannot tell apart, so G1 and G2 are local
//! wrappers.

use ark_bls12_381::{Bls12_381, Fr, G1Affine, G1Projective, G2Affine, G2Projective};
use ark_ec::pairing::PairingOutput;
use ark_ec::{CurveGroup, PrimeGroup};
use ark_ff::Zero;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

use crate::{BackendError, CurvePoint, TargetGroup};

/// G1 group element wrapper for the Arkworks BLS12-381 backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArkG1(pub G1Projective);

/// G2 group element wrapper for the Arkworks BLS12-381 backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArkG2(pub G2Projective);

/// Target group type for the Arkworks BLS12-381 backend.
pub type ArkGt = PairingOutput<Bls12_381>;

// Writing into a Vec cannot fail and every element held here is valid.
fn to_compressed<T: CanonicalSerialize>(value: &T) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(value.compressed_size());
    value
        .serialize_compressed(&mut bytes)
        .map_err(|_| BackendError::Serialization("compressed serialization failure"))
        .expect("in-memory serialization should not fail");
    bytes
}

impl CurvePoint<Fr> for ArkG1 {
    fn identity() -> Self {
        ArkG1(G1Projective::zero())
    }

    fn generator() -> Self {
        ArkG1(<G1Projective as PrimeGroup>::generator())
    }

    fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    fn add(&self, other: &Self) -> Self {
        ArkG1(self.0 + other.0)
    }

    fn sub(&self, other: &Self) -> Self {
        ArkG1(self.0 - other.0)
    }

    fn negate(&self) -> Self {
        ArkG1(-self.0)
    }

    fn mul_scalar(&self, scalar: &Fr) -> Self {
        ArkG1(self.0 * scalar)
    }

    fn to_repr(&self) -> Vec<u8> {
        to_compressed(&self.0.into_affine())
    }

    fn from_repr(bytes: &[u8]) -> Result<Self, BackendError> {
        let affine = G1Affine::deserialize_compressed(bytes)
            .map_err(|_| BackendError::Serialization("invalid G1 bytes"))?;
        Ok(ArkG1(affine.into()))
    }
}

impl CurvePoint<Fr> for ArkG2 {
    fn identity() -> Self {
        ArkG2(G2Projective::zero())
    }

    fn generator() -> Self {
        ArkG2(<G2Projective as PrimeGroup>::generator())
    }

    fn is_identity(&self) -> bool {
        self.0.is_zero()
    }

    fn add(&self, other: &Self) -> Self {
        ArkG2(self.0 + other.0)
    }

    fn sub(&self, other: &Self) -> Self {
        ArkG2(self.0 - other.0)
    }

    fn negate(&self) -> Self {
        ArkG2(-self.0)
    }

    fn mul_scalar(&self, scalar: &Fr) -> Self {
        ArkG2(self.0 * scalar)
    }

    fn to_repr(&self) -> Vec<u8> {
        to_compressed(&self.0.into_affine())
    }

    fn from_repr(bytes: &[u8]) -> Result<Self, BackendError> {
        let affine = G2Affine::deserialize_compressed(bytes)
            .map_err(|_| BackendError::Serialization("invalid G2 bytes"))?;
        Ok(ArkG2(affine.into()))
    }
}

impl TargetGroup for ArkGt {
    type Scalar = Fr;

    fn identity() -> Self {
        <ArkGt as Zero>::zero()
    }

    fn mul_scalar(&self, scalar: &Fr) -> Self {
        *self * *scalar
    }

    fn combine(&self, other: &Self) -> Self {
        *self + *other
    }

    fn invert(&self) -> Self {
        -*self
    }

    fn to_repr(&self) -> Vec<u8> {
        to_compressed(self)
    }

    fn from_repr(bytes: &[u8]) -> Result<Self, BackendError> {
        ArkGt::deserialize_compressed(bytes)
            .map_err(|_| BackendError::Serialization("invalid GT bytes"))
    }
}
