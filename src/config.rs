//! Configuration types for the ABE schemes.
//!
//! This module provides the backend/curve selection shared by both scheme
//! families and the attribute-universe parameters of the key-policy scheme.
//!
//! # Example
//!
//! ```rust
//! use tabe::{BackendConfig, BackendId, CurveId, KpAbeParameters};
//!
//! let backend = BackendConfig::new(BackendId::Blst, CurveId::Bls12_381);
//! let params = KpAbeParameters::new(backend, ["doctor", "nurse", "admin"])
//!     .expect("valid parameters");
//! assert_eq!(params.universe.len(), 3);
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::PairingBackend;
use crate::errors::{BackendError, Error};
use crate::policy::Attribute;

/// Supported pairing-friendly elliptic curves.
///
/// Both schemes need an asymmetric (type-3) pairing with a standard
/// hash-to-G1, which currently restricts the choice to BLS12-381.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum CurveId {
    /// BLS12-381 curve (~128-bit security)
    Bls12_381,
}

/// Cryptographic backend implementations.
///
/// - **Blst**: blstrs, assembly-optimised BLS12-381 (feature `blst`, default).
/// - **Arkworks**: pure Rust BLS12-381 (feature `ark_bls12381`).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum BackendId {
    /// Arkworks backend (pure Rust)
    Arkworks,
    /// blstrs backend (optimized assembly)
    Blst,
}

/// Backend and curve configuration.
///
/// # Example
///
/// ```rust
/// use tabe::{BackendConfig, BackendId, CurveId};
///
/// let config = BackendConfig::new(BackendId::Blst, CurveId::Bls12_381);
/// config.ensure_supported().expect("supported combination");
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// The cryptographic backend to use
    pub backend: BackendId,
    /// The pairing-friendly curve to use
    pub curve: CurveId,
}

impl BackendConfig {
    /// Creates a new backend configuration.
    pub fn new(backend: BackendId, curve: CurveId) -> Self {
        Self { backend, curve }
    }

    /// Validates that this backend/curve combination is compiled in.
    pub fn ensure_supported(&self) -> Result<(), BackendError> {
        match (self.backend, self.curve) {
            (BackendId::Arkworks, CurveId::Bls12_381) => {
                if cfg!(feature = "ark_bls12381") {
                    Ok(())
                } else {
                    Err(BackendError::UnsupportedFeature(
                        "compile with `ark_bls12381` feature to use Arkworks BLS12-381",
                    ))
                }
            }
            (BackendId::Blst, CurveId::Bls12_381) => {
                if cfg!(feature = "blst") {
                    Ok(())
                } else {
                    Err(BackendError::UnsupportedFeature(
                        "compile with `blst` feature to use the blstrs backend",
                    ))
                }
            }
        }
    }

    /// Checks that the configuration is supported and names backend `B`.
    pub fn ensure_matches<B: PairingBackend>(&self) -> Result<(), Error> {
        self.ensure_supported()?;
        if B::backend_id() != self.backend || B::curve_id() != self.curve {
            return Err(Error::InvalidConfig(format!(
                "configuration names {:?}/{:?} but the scheme was instantiated with {:?}/{:?}",
                self.backend,
                self.curve,
                B::backend_id(),
                B::curve_id()
            )));
        }
        Ok(())
    }
}

/// Parameters of the key-policy scheme.
///
/// - `backend`: backend and curve configuration
/// - `universe`: the fixed, ordered attribute universe; attribute `i` must
///   carry id `i`
///
/// Parameters are plain serde values so they can be loaded from a config
/// file; call [`validate`](KpAbeParameters::validate) after deserializing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KpAbeParameters {
    pub backend: BackendConfig,
    pub universe: Vec<Attribute>,
}

impl KpAbeParameters {
    /// Builds the universe from `labels` (ids assigned in order) and
    /// validates the result.
    pub fn new<I, S>(backend: BackendConfig, labels: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let params = Self {
            backend,
            universe: Attribute::universe(labels),
        };
        params.validate()?;
        Ok(params)
    }

    /// Validates the parameters.
    ///
    /// This checks that:
    /// - The backend/curve combination is supported
    /// - The universe is non-empty
    /// - Attribute ids are exactly `0..n` in order
    /// - Labels are non-empty and unique
    pub fn validate(&self) -> Result<(), Error> {
        self.backend.ensure_supported().map_err(Error::Backend)?;
        if self.universe.is_empty() {
            return Err(Error::BadAttributeUniverse(
                "universe must contain at least one attribute".into(),
            ));
        }
        let mut labels = BTreeSet::new();
        for (position, attribute) in self.universe.iter().enumerate() {
            if attribute.id != position {
                return Err(Error::BadAttributeUniverse(format!(
                    "attribute `{}` has id {} at position {}",
                    attribute.label, attribute.id, position
                )));
            }
            if attribute.label.is_empty() {
                return Err(Error::BadAttributeUniverse(format!(
                    "attribute {position} has an empty label"
                )));
            }
            if !labels.insert(attribute.label.as_str()) {
                return Err(Error::BadAttributeUniverse(format!(
                    "duplicate label `{}`",
                    attribute.label
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blst_config() -> BackendConfig {
        BackendConfig::new(BackendId::Blst, CurveId::Bls12_381)
    }

    #[cfg(feature = "blst")]
    #[test]
    fn universe_ids_follow_label_order() {
        let params = KpAbeParameters::new(blst_config(), ["a", "b", "c"]).unwrap();
        let ids: Vec<usize> = params.universe.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[cfg(feature = "blst")]
    #[test]
    fn non_contiguous_universe_is_rejected() {
        let mut params = KpAbeParameters::new(blst_config(), ["a", "b", "c"]).unwrap();
        params.universe[2].id = 5;
        assert!(matches!(
            params.validate(),
            Err(Error::BadAttributeUniverse(_))
        ));
    }

    #[cfg(feature = "blst")]
    #[test]
    fn duplicate_and_empty_universes_are_rejected() {
        assert!(matches!(
            KpAbeParameters::new(blst_config(), ["a", "a"]),
            Err(Error::BadAttributeUniverse(_))
        ));
        assert!(matches!(
            KpAbeParameters::new(blst_config(), Vec::<String>::new()),
            Err(Error::BadAttributeUniverse(_))
        ));
    }

    #[test]
    fn parameters_survive_json() {
        let params = KpAbeParameters {
            backend: blst_config(),
            universe: Attribute::universe(["x", "y"]),
        };
        let json = serde_json::to_string(&params).unwrap();
        let back: KpAbeParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(back.backend, params.backend);
        assert_eq!(back.universe, params.universe);
    }

    #[cfg(feature = "blst")]
    #[test]
    fn backend_type_must_match_configuration() {
        use crate::BlstBackend;

        assert!(blst_config().ensure_matches::<BlstBackend>().is_ok());
        let ark = BackendConfig::new(BackendId::Arkworks, CurveId::Bls12_381);
        assert!(ark.ensure_matches::<BlstBackend>().is_err());
    }

    #[cfg(not(feature = "ark_bls12381"))]
    #[test]
    fn missing_backend_feature_is_reported() {
        let config = BackendConfig::new(BackendId::Arkworks, CurveId::Bls12_381);
        assert!(matches!(
            config.ensure_supported(),
            Err(BackendError::UnsupportedFeature(_))
        ));
    }
}
