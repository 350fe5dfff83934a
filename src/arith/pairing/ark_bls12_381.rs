use ark_bls12_381::{Bls12_381, Fr, G1Projective, g1};
use ark_ec::hashing::HashToCurve;
use ark_ec::hashing::curve_maps::wb::WBMap;
use ark_ec::hashing::map_to_curve_hasher::MapToCurveBasedHasher;
use ark_ec::pairing::Pairing;
use ark_ff::field_hashers::DefaultFieldHasher;
use sha2::Sha256;

use super::ATTRIBUTE_HASH_DST;
use crate::config::{BackendId, CurveId};
use crate::{ArkG1, ArkG2, ArkGt, BackendError, PairingBackend};

type G1Hasher = MapToCurveBasedHasher<G1Projective, DefaultFieldHasher<Sha256, 128>, WBMap<g1::Config>>;

/// Arkworks-backed `PairingBackend` implementation for BLS12-381.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArkworksBls12;

impl PairingBackend for ArkworksBls12 {
    type Scalar = Fr;
    type G1 = ArkG1;
    type G2 = ArkG2;
    type Target = ArkGt;

    fn backend_id() -> BackendId {
        BackendId::Arkworks
    }

    fn curve_id() -> CurveId {
        CurveId::Bls12_381
    }

    fn pairing(g1: &Self::G1, g2: &Self::G2) -> Self::Target {
        Bls12_381::pairing(g1.0, g2.0)
    }

    fn multi_pairing(g1: &[Self::G1], g2: &[Self::G2]) -> Result<Self::Target, BackendError> {
        if g1.len() != g2.len() {
            return Err(BackendError::Math("pairing length mismatch"));
        }
        Ok(Bls12_381::multi_pairing(
            g1.iter().map(|p| p.0),
            g2.iter().map(|q| q.0),
        ))
    }

    fn hash_to_g1(msg: &[u8]) -> Result<Self::G1, BackendError> {
        let hasher = G1Hasher::new(ATTRIBUTE_HASH_DST)
            .map_err(|_| BackendError::Other("hash-to-curve setup failed".into()))?;
        let point = hasher
            .hash(msg)
            .map_err(|_| BackendError::Math("hash-to-curve failed"))?;
        Ok(ArkG1(point.into()))
    }
}
