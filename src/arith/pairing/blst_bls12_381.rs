use blstrs::{Bls12, G1Affine, G1Projective, G2Affine, G2Prepared, G2Projective, Gt, Scalar};
use group::Curve;
use group::prime::PrimeCurveAffine;
use pairing::{MillerLoopResult, MultiMillerLoop};

use super::ATTRIBUTE_HASH_DST;
use crate::config::{BackendId, CurveId};
use crate::{BackendError, PairingBackend};

/// blst-backed `PairingBackend` implementation for BLS12-381.
///
/// Ties the blstrs scalar, curve and target types together with the
/// Miller-loop pairing and the RFC 9380 hash-to-G1 that blst ships.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlstBackend;

impl PairingBackend for BlstBackend {
    type Scalar = Scalar;
    type G1 = G1Projective;
    type G2 = G2Projective;
    type Target = Gt;

    fn backend_id() -> BackendId {
        BackendId::Blst
    }

    fn curve_id() -> CurveId {
        CurveId::Bls12_381
    }

    fn pairing(g1: &Self::G1, g2: &Self::G2) -> Self::Target {
        blstrs::pairing(&g1.to_affine(), &g2.to_affine())
    }

    fn multi_pairing(g1: &[Self::G1], g2: &[Self::G2]) -> Result<Self::Target, BackendError> {
        if g1.len() != g2.len() {
            return Err(BackendError::Math("pairing length mismatch"));
        }
        let mut g1_affine = vec![G1Affine::identity(); g1.len()];
        let mut g2_affine = vec![G2Affine::identity(); g2.len()];
        G1Projective::batch_normalize(g1, &mut g1_affine);
        G2Projective::batch_normalize(g2, &mut g2_affine);
        let g2_prepared: Vec<G2Prepared> = g2_affine.iter().map(|aff| G2Prepared::from(*aff)).collect();
        let terms: Vec<_> = g1_affine.iter().zip(g2_prepared.iter()).collect();
        Ok(Bls12::multi_miller_loop(&terms).final_exponentiation())
    }

    fn hash_to_g1(msg: &[u8]) -> Result<Self::G1, BackendError> {
        Ok(G1Projective::hash_to_curve(msg, ATTRIBUTE_HASH_DST, &[]))
    }
}
