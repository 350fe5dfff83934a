//! Univariate polynomials over the scalar field.
//!
//! Polynomials are represented in **coefficient form** with coefficients in
//! ascending order:
//! - `p(x) = c_0 + c_1*x + c_2*x^2 + ... + c_n*x^n`
//! - Stored as `[c_0, c_1, c_2, ..., c_n]`
//!
//! Secret sharing needs a polynomial of an exact length (a node's threshold),
//! so unlike a canonical representation, trailing zero coefficients are kept.
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "blst")]
//! # {
//! use tabe::{BlstBackend, DensePolynomial, FieldElement, PairingBackend};
//!
//! type Fr = <BlstBackend as PairingBackend>::Scalar;
//!
//! // p(x) = 1 + 2x + 3x^2
//! let coeffs = vec![Fr::from_u64(1), Fr::from_u64(2), Fr::from_u64(3)];
//! let poly = DensePolynomial::from_coefficients_vec(coeffs);
//! assert_eq!(poly.evaluate(&Fr::from_u64(2)), Fr::from_u64(17));
//! assert_eq!(poly.degree(), 2);
//! # }
//! ```

use rand_core::RngCore;

use crate::FieldElement;

/// Dense coefficient-form polynomial.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DensePolynomial<F: FieldElement> {
    coeffs: Vec<F>,
}

impl<F: FieldElement> DensePolynomial<F> {
    /// Creates a polynomial from coefficients in ascending order.
    pub fn from_coefficients_vec(coeffs: Vec<F>) -> Self {
        Self { coeffs }
    }

    /// Samples a polynomial with `len` coefficients whose constant term is
    /// `constant` and whose remaining coefficients are uniform.
    ///
    /// `len` is clamped to at least one so the constant term always exists.
    pub fn random_with_constant<R: RngCore + ?Sized>(rng: &mut R, len: usize, constant: F) -> Self {
        let mut coeffs = Vec::with_capacity(len.max(1));
        coeffs.push(constant);
        coeffs.extend((1..len).map(|_| F::random(rng)));
        Self { coeffs }
    }

    /// Returns the coefficients in ascending order (constant term first).
    pub fn coeffs(&self) -> &[F] {
        &self.coeffs
    }

    /// Returns the nominal degree, `len - 1`.
    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    /// Returns `p(0)`.
    pub fn constant(&self) -> F {
        self.coeffs.first().copied().unwrap_or_else(F::zero)
    }

    /// Evaluates the polynomial at `point` using Horner's method.
    pub fn evaluate(&self, point: &F) -> F {
        self.coeffs
            .iter()
            .rev()
            .fold(F::zero(), |acc, coeff| acc * *point + *coeff)
    }
}
