//! Symmetric payload sealing keyed by a GT message.
//!
//! ABE encrypts a group element, not arbitrary bytes. Hybrid use picks a
//! random [`Message`](crate::Message), encrypts it under the policy, and seals
//! the actual payload with a key derived from the message's encoding.
//!
//! # Implementations
//!
//! - **[`Blake3Envelope`]**: BLAKE3 XOF keystream with a BLAKE3 keyed-hash tag
//!
//! # Example
//!
//! ```rust
//! use tabe::{Blake3Envelope, SymmetricEncryption};
//!
//! let envelope = Blake3Envelope::default();
//! let secret = b"bytes of a GT element";
//! let sealed = envelope.encrypt(secret, b"patient record").unwrap();
//! let opened = envelope.decrypt(secret, &sealed).unwrap();
//! assert_eq!(&opened[..], b"patient record");
//! assert!(envelope.decrypt(b"another key", &sealed).is_err());
//! ```

use std::fmt::Debug;

use blake3::{Hash, Hasher};

use crate::Error;

const TAG_BYTES: usize = blake3::OUT_LEN;

/// Trait for symmetric encryption/decryption operations.
pub trait SymmetricEncryption: Debug + Send + Sync {
    /// Encrypts `plaintext` under `secret`.
    fn encrypt(&self, secret: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, Error>;

    /// Decrypts `ciphertext` under `secret`, failing if it was tampered with.
    fn decrypt(&self, secret: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, Error>;
}

/// BLAKE3 stream encryption with an appended 32-byte authentication tag.
///
/// Two independent keys are derived from the secret with BLAKE3's KDF mode,
/// one for the keystream and one for the tag. The output is
/// `ciphertext || keyed_hash(mac_key, ciphertext)`.
///
/// Every secret must seal a single payload: the keystream depends only on
/// the secret and the payload length.
#[derive(Debug, Clone)]
pub struct Blake3Envelope {
    /// Context string for BLAKE3 key derivation.
    context: &'static str,
}

impl Blake3Envelope {
    /// Creates an envelope with the given key-derivation context.
    pub fn new(context: &'static str) -> Self {
        Self { context }
    }

    fn derive_key(&self, purpose: &str, secret: &[u8]) -> [u8; 32] {
        let mut hasher = Hasher::new_derive_key(self.context);
        hasher.update(purpose.as_bytes());
        hasher.update(secret);
        *hasher.finalize().as_bytes()
    }

    fn keystream(&self, secret: &[u8], len: usize) -> Vec<u8> {
        let key = self.derive_key("stream", secret);
        let mut hasher = Hasher::new_keyed(&key);
        hasher.update(&(len as u64).to_le_bytes());
        let mut keystream = vec![0u8; len];
        hasher.finalize_xof().fill(&mut keystream);
        keystream
    }

    fn tag(&self, secret: &[u8], ciphertext: &[u8]) -> Hash {
        let key = self.derive_key("tag", secret);
        blake3::keyed_hash(&key, ciphertext)
    }
}

impl Default for Blake3Envelope {
    fn default() -> Self {
        Self::new("tabe 2024-01-01 payload envelope v1")
    }
}

impl SymmetricEncryption for Blake3Envelope {
    fn encrypt(&self, secret: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, Error> {
        let keystream = self.keystream(secret, plaintext.len());
        let mut sealed = xor_bytes(&keystream, plaintext);
        let tag = self.tag(secret, &sealed);
        sealed.extend_from_slice(tag.as_bytes());
        Ok(sealed)
    }

    fn decrypt(&self, secret: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, Error> {
        if ciphertext.len() < TAG_BYTES {
            return Err(Error::MalformedInput("sealed payload is shorter than its tag".into()));
        }
        let (body, tag) = ciphertext.split_at(ciphertext.len() - TAG_BYTES);
        let mut tag_bytes = [0u8; TAG_BYTES];
        tag_bytes.copy_from_slice(tag);
        // `Hash` equality is constant time.
        if self.tag(secret, body) != Hash::from(tag_bytes) {
            return Err(Error::MalformedInput("payload authentication failed".into()));
        }
        let keystream = self.keystream(secret, body.len());
        Ok(xor_bytes(&keystream, body))
    }
}

/// XORs two byte slices together.
fn xor_bytes(a: &[u8], b: &[u8]) -> Vec<u8> {
    a.iter().zip(b.iter()).map(|(x, y)| x ^ y).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_and_open() {
        let envelope = Blake3Envelope::default();
        let sealed = envelope.encrypt(b"key", b"hello").unwrap();
        assert_eq!(sealed.len(), 5 + TAG_BYTES);
        assert_ne!(&sealed[..5], b"hello");
        assert_eq!(envelope.decrypt(b"key", &sealed).unwrap(), b"hello");
    }

    #[test]
    fn empty_payload_still_authenticates() {
        let envelope = Blake3Envelope::default();
        let sealed = envelope.encrypt(b"key", b"").unwrap();
        assert_eq!(sealed.len(), TAG_BYTES);
        assert!(envelope.decrypt(b"key", &sealed).unwrap().is_empty());
        assert!(envelope.decrypt(b"other", &sealed).is_err());
    }

    #[test]
    fn tampering_is_detected() {
        let envelope = Blake3Envelope::default();
        let mut sealed = envelope.encrypt(b"key", b"attack at dawn").unwrap();
        sealed[3] ^= 1;
        assert!(matches!(
            envelope.decrypt(b"key", &sealed),
            Err(Error::MalformedInput(_))
        ));
        assert!(envelope.decrypt(b"key", &sealed[..10]).is_err());
    }

    #[test]
    fn contexts_separate_keys() {
        let a = Blake3Envelope::new("context a");
        let b = Blake3Envelope::new("context b");
        let sealed = a.encrypt(b"key", b"payload").unwrap();
        assert!(b.decrypt(b"key", &sealed).is_err());
    }
}
