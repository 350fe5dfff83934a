//! Plaintext messages.
//!
//! Both schemes encrypt an element of GT. For arbitrary payloads, pick a
//! random message, encrypt it under the policy, and [`seal`](Message::seal)
//! the payload with it:
//!
//! ```rust
//! # #[cfg(feature = "blst")]
//! # {
//! use rand::thread_rng;
//! use tabe::{BlstBackend, Message};
//!
//! let mut rng = thread_rng();
//! let message = Message::<BlstBackend>::random(&mut rng);
//! let sealed = message.seal(b"quarterly numbers").unwrap();
//! assert_eq!(message.open(&sealed).unwrap(), b"quarterly numbers");
//! # }
//! ```

use rand_core::RngCore;

use crate::sym_enc::{Blake3Envelope, SymmetricEncryption};
use crate::{Error, PairingBackend, TargetGroup};

/// A GT element used as an ABE plaintext.
#[derive(Debug)]
pub struct Message<B: PairingBackend> {
    element: B::Target,
}

impl<B: PairingBackend> Clone for Message<B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: PairingBackend> Copy for Message<B> {}

impl<B: PairingBackend> PartialEq for Message<B> {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element
    }
}

impl<B: PairingBackend> Eq for Message<B> {}

impl<B: PairingBackend> Message<B> {
    /// Samples a uniformly random message.
    pub fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        Self {
            element: B::random_target(rng),
        }
    }

    pub fn from_element(element: B::Target) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &B::Target {
        &self.element
    }

    /// Raw GT encoding.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.element.to_repr()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self {
            element: B::Target::from_repr(bytes)?,
        })
    }

    /// Encrypts and authenticates `plaintext` under a key derived from this
    /// message. Use each message for one payload only.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, Error> {
        Blake3Envelope::default().encrypt(&self.to_bytes(), plaintext)
    }

    /// Opens a payload sealed with [`seal`](Self::seal).
    ///
    /// Fails with `MalformedInput` if the payload was sealed under a
    /// different message or modified.
    pub fn open(&self, sealed: &[u8]) -> Result<Vec<u8>, Error> {
        Blake3Envelope::default().decrypt(&self.to_bytes(), sealed)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn byte_codec_round_trips<B: PairingBackend>() {
        let mut rng = StdRng::from_entropy();
        let message = Message::<B>::random(&mut rng);
        let decoded = Message::<B>::from_bytes(&message.to_bytes()).unwrap();
        assert_eq!(decoded, message);
        assert_ne!(Message::<B>::random(&mut rng), message);
        assert!(Message::<B>::from_bytes(&[7u8; 5]).is_err());
    }

    fn sealing_is_bound_to_message<B: PairingBackend>() {
        let mut rng = StdRng::from_entropy();
        let message = Message::<B>::random(&mut rng);
        let other = Message::<B>::random(&mut rng);
        let sealed = message.seal(b"payload").unwrap();
        assert_eq!(message.open(&sealed).unwrap(), b"payload");
        assert!(matches!(other.open(&sealed), Err(Error::MalformedInput(_))));
    }

    #[cfg(feature = "blst")]
    #[test]
    fn blst_messages() {
        byte_codec_round_trips::<crate::BlstBackend>();
        sealing_is_bound_to_message::<crate::BlstBackend>();
    }

    #[cfg(feature = "ark_bls12381")]
    #[test]
    fn ark_messages() {
        byte_codec_round_trips::<crate::ArkworksBls12>();
        sealing_is_bound_to_message::<crate::ArkworksBls12>();
    }
}
