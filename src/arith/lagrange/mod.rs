//! Lagrange coefficients for interpolation at zero.
//!
//! Reconstruction in an access tree recovers `q(0)` of a gate polynomial from
//! the values its children hold at their sibling indices. For a set of
//! distinct points `x_0, ..., x_{k-1}` the coefficient of point `i` is
//!
//! ```text
//! Δ_i(0) = ∏_{j ≠ i} (0 - x_j) / (x_i - x_j)
//! ```
//!
//! so that `q(0) = Σ Δ_i(0) · q(x_i)` for any `q` of degree below `k`. The
//! schemes apply the same coefficients in the exponent of GT.

use crate::{BackendError, FieldElement};

/// Computes `Δ_i(0)` for every point in `points`.
///
/// The numerator and denominator products are accumulated separately so each
/// coefficient costs one inversion.
///
/// # Errors
///
/// - `BackendError::Math` if two points coincide
///
/// # Example
///
/// ```rust
/// # #[cfg(feature = "blst")]
/// # {
/// use tabe::{BlstBackend, FieldElement, PairingBackend, coefficients_at_zero};
///
/// type Fr = <BlstBackend as PairingBackend>::Scalar;
///
/// // q(x) = 5 + 3x sampled at x = 1 and x = 2
/// let points = [Fr::from_u64(1), Fr::from_u64(2)];
/// let values = [Fr::from_u64(8), Fr::from_u64(11)];
/// let coeffs = coefficients_at_zero(&points).unwrap();
/// let q0 = coeffs[0] * values[0] + coeffs[1] * values[1];
/// assert_eq!(q0, Fr::from_u64(5));
/// # }
/// ```
pub fn coefficients_at_zero<F: FieldElement>(points: &[F]) -> Result<Vec<F>, BackendError> {
    points
        .iter()
        .enumerate()
        .map(|(i, x_i)| {
            let (num, den) = points
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .fold((F::one(), F::one()), |(num, den), (_, x_j)| {
                    (num * -*x_j, den * (*x_i - *x_j))
                });
            let den_inv = den
                .invert()
                .ok_or(BackendError::Math("duplicate interpolation point"))?;
            Ok(num * den_inv)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::DensePolynomial;

    fn recovers_constant_term<F: FieldElement>() {
        let mut rng = StdRng::from_entropy();
        let secret = F::random(&mut rng);
        let poly = DensePolynomial::random_with_constant(&mut rng, 3, secret);

        // Any three distinct indices interpolate the degree-2 polynomial.
        let points: Vec<F> = [2u64, 5, 7].iter().map(|&x| F::from_u64(x)).collect();
        let coeffs = coefficients_at_zero(&points).unwrap();
        let recovered = points
            .iter()
            .zip(&coeffs)
            .fold(F::zero(), |acc, (x, c)| acc + *c * poly.evaluate(x));
        assert_eq!(recovered, secret);
    }

    fn single_point_has_unit_coefficient<F: FieldElement>() {
        let coeffs = coefficients_at_zero(&[F::from_u64(4)]).unwrap();
        assert_eq!(coeffs, vec![F::one()]);
    }

    fn duplicate_points_fail<F: FieldElement>() {
        let points = [F::from_u64(1), F::from_u64(1)];
        assert!(matches!(
            coefficients_at_zero(&points),
            Err(BackendError::Math(_))
        ));
    }

    #[cfg(feature = "blst")]
    #[test]
    fn blst_lagrange() {
        recovers_constant_term::<blstrs::Scalar>();
        single_point_has_unit_coefficient::<blstrs::Scalar>();
        duplicate_points_fail::<blstrs::Scalar>();
    }

    #[cfg(feature = "ark_bls12381")]
    #[test]
    fn ark_lagrange() {
        recovers_constant_term::<ark_bls12_381::Fr>();
        single_point_has_unit_coefficient::<ark_bls12_381::Fr>();
        duplicate_points_fail::<ark_bls12_381::Fr>();
    }
}
