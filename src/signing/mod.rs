//! ECDSA P-384 signing, verification and key fingerprints.
//!
//! Messages are hashed with SHA-256 before signing. Signatures are IEEE P1363
//! (raw r||s, 96 bytes), lowercase hex on the wire.

pub mod context;

pub use context::SigningContext;

use ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use p384::ecdsa::{Signature, SigningKey, VerifyingKey};
use sha2::{Digest, Sha256};

use crate::error::SigningError;

/// Length in bytes of an encoded signature.
pub const SIGNATURE_LEN: usize = 96;

/// Sign `message` with ECDSA P-384 over its SHA-256 digest.
///
/// Returns the hex-encoded r||s signature.
pub fn sign(message: &[u8], key: &SigningKey) -> Result<String, SigningError> {
    let digest = Sha256::digest(message);
    let signature: Signature = key
        .sign_prehash(&digest)
        .map_err(|e| SigningError::SigningFailed(e.to_string()))?;
    Ok(hex::encode(signature.to_bytes()))
}

/// Verify a hex-encoded signature over `message`.
///
/// `Err` means the signature could not be decoded at all; a well-formed
/// signature that does not match yields `Ok(false)`.
pub fn verify(message: &[u8], signature_hex: &str, key: &VerifyingKey) -> Result<bool, SigningError> {
    let bytes =
        hex::decode(signature_hex).map_err(|e| SigningError::MalformedSignature(e.to_string()))?;
    if bytes.len() != SIGNATURE_LEN {
        return Err(SigningError::MalformedSignature(format!(
            "expected {} bytes, got {}",
            SIGNATURE_LEN,
            bytes.len()
        )));
    }
    let signature =
        Signature::from_slice(&bytes).map_err(|e| SigningError::MalformedSignature(e.to_string()))?;
    let digest = Sha256::digest(message);
    Ok(key.verify_prehash(&digest, &signature).is_ok())
}

/// Lowercase hex SHA-256 of a compact public-key string.
pub fn fingerprint(public_key: &str) -> String {
    hex::encode(Sha256::digest(public_key.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    fn keypair() -> (SigningKey, VerifyingKey) {
        let signing_key = SigningKey::random(&mut OsRng);
        let verifying_key = *signing_key.verifying_key();
        (signing_key, verifying_key)
    }

    #[test]
    fn sign_verify_round_trip() {
        let (signing_key, verifying_key) = keypair();
        let signature = sign(b"hello defiads", &signing_key).unwrap();
        assert_eq!(signature.len(), SIGNATURE_LEN * 2);
        assert!(verify(b"hello defiads", &signature, &verifying_key).unwrap());
    }

    #[test]
    fn wrong_key_fails() {
        let (signing_key, _) = keypair();
        let (_, other) = keypair();
        let signature = sign(b"hello", &signing_key).unwrap();
        assert!(!verify(b"hello", &signature, &other).unwrap());
    }

    #[test]
    fn wrong_message_fails() {
        let (signing_key, verifying_key) = keypair();
        let signature = sign(b"message", &signing_key).unwrap();
        assert!(!verify(b"tampered", &signature, &verifying_key).unwrap());
    }

    #[test]
    fn malformed_signatures_are_errors() {
        let (_, verifying_key) = keypair();
        assert!(verify(b"x", "not hex", &verifying_key).is_err());
        assert!(verify(b"x", "abcd", &verifying_key).is_err());
        // r = s = 0 is outside the scalar range
        let zeros = "00".repeat(SIGNATURE_LEN);
        assert!(verify(b"x", &zeros, &verifying_key).is_err());
    }

    #[test]
    fn fingerprint_is_sha256_hex() {
        assert_eq!(
            fingerprint(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(fingerprint("abc").len(), 64);
    }
}
