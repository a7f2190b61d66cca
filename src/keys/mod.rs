//! Key codec: compact `x.y` / `d.x.y` encoding of P-384 key material.
//!
//! Key material is carried in a JWK-shaped struct so that keys exported by
//! browser clients (`crypto.subtle.exportKey("jwk", ...)`) and keys produced
//! here share one compact text form:
//!
//! - public: `"<x>.<y>"`
//! - private: `"<d>.<x>.<y>"`
//!
//! Coordinates and the scalar are unpadded base64url, which never contains `.`.
//! [`decode`] is purely structural; curve validation happens on import
//! ([`import_signing_key`], [`import_verifying_key`]).

mod base64url;

pub use base64url::{base64url_decode, base64url_encode};

use p384::ecdsa::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::KeyError;

/// JWK key type of every supported key.
pub const KEY_TYPE: &str = "EC";

/// The single supported curve.
pub const CURVE: &str = "P-384";

/// Byte length of a P-384 field element.
const FIELD_LEN: usize = 48;

/// Declared usage of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyOp {
    Sign,
    Verify,
}

/// JWK-shaped EC key material. Classification (public vs private) is derived
/// by [`is_private`], never stored.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMaterial {
    pub kty: String,
    pub crv: String,
    pub x: String,
    pub y: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
    #[serde(default)]
    pub key_ops: Vec<KeyOp>,
    #[serde(default)]
    pub ext: bool,
}

impl KeyMaterial {
    fn p384(x: String, y: String, d: Option<String>, key_ops: Vec<KeyOp>) -> Self {
        Self {
            kty: KEY_TYPE.to_string(),
            crv: CURVE.to_string(),
            x,
            y,
            d,
            key_ops,
            ext: true,
        }
    }

    fn matches_profile(&self) -> bool {
        self.kty == KEY_TYPE
            && self.crv == CURVE
            && self.ext
            && !self.x.is_empty()
            && !self.y.is_empty()
    }

    fn has_op(&self, op: KeyOp) -> bool {
        self.key_ops.contains(&op)
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("kty", &self.kty)
            .field("crv", &self.crv)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("d", &self.d.as_ref().map(|_| "<redacted>"))
            .field("key_ops", &self.key_ops)
            .field("ext", &self.ext)
            .finish()
    }
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        if let Some(d) = self.d.as_mut() {
            d.zeroize();
        }
    }
}

/// A freshly generated key pair.
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub private: KeyMaterial,
    pub public: KeyMaterial,
}

/// Generate a new extractable P-384 key pair.
pub fn generate_key_pair() -> Result<KeyPair, KeyError> {
    let signing_key = SigningKey::random(&mut OsRng);
    let private = export_signing_key(&signing_key)?;
    let public = to_public(&private);
    Ok(KeyPair { private, public })
}

/// Encode key material in compact form. Returns `None` when the key does not
/// match the supported EC/P-384 extractable profile.
pub fn encode(key: &KeyMaterial) -> Option<String> {
    if !key.matches_profile() {
        return None;
    }
    match (&key.d, is_private(key)) {
        (Some(d), true) => Some(format!("{}.{}.{}", d, key.x, key.y)),
        _ => Some(format!("{}.{}", key.x, key.y)),
    }
}

/// Decode compact key material: 2 fields for public, 3 for private.
pub fn decode(text: &str) -> Option<KeyMaterial> {
    let chunks: Vec<&str> = text.split('.').collect();
    match chunks.as_slice() {
        [x, y] => Some(KeyMaterial::p384(
            x.to_string(),
            y.to_string(),
            None,
            vec![KeyOp::Verify],
        )),
        [d, x, y] => Some(KeyMaterial::p384(
            x.to_string(),
            y.to_string(),
            Some(d.to_string()),
            vec![KeyOp::Sign],
        )),
        _ => None,
    }
}

/// Strip the private scalar and restrict usage to verification.
pub fn to_public(key: &KeyMaterial) -> KeyMaterial {
    KeyMaterial {
        kty: key.kty.clone(),
        crv: key.crv.clone(),
        x: key.x.clone(),
        y: key.y.clone(),
        d: None,
        key_ops: vec![KeyOp::Verify],
        ext: key.ext,
    }
}

/// True iff a private scalar is present and `sign` is a declared usage.
pub fn is_private(key: &KeyMaterial) -> bool {
    key.d.is_some() && key.has_op(KeyOp::Sign)
}

/// Import the verifying half of any key material.
pub fn import_verifying_key(key: &KeyMaterial) -> Result<VerifyingKey, KeyError> {
    check_profile(key)?;
    let x = decode_field("x", &key.x)?;
    let y = decode_field("y", &key.y)?;

    // SEC1 uncompressed point: 0x04 || x || y
    let mut uncompressed = Vec::with_capacity(1 + 2 * FIELD_LEN);
    uncompressed.push(0x04);
    uncompressed.extend_from_slice(&x);
    uncompressed.extend_from_slice(&y);

    VerifyingKey::from_sec1_bytes(&uncompressed).map_err(|e| KeyError::InvalidPoint(e.to_string()))
}

/// Import a private key. The scalar must belong to the declared public point.
pub fn import_signing_key(key: &KeyMaterial) -> Result<SigningKey, KeyError> {
    if !is_private(key) {
        return Err(KeyError::NotPrivate);
    }
    check_profile(key)?;
    let d = key.d.as_deref().ok_or(KeyError::NotPrivate)?;
    let mut scalar = decode_field("d", d)?;
    let imported = SigningKey::from_slice(&scalar);
    scalar.zeroize();
    let signing_key = imported.map_err(|e| KeyError::InvalidScalar(e.to_string()))?;

    if *signing_key.verifying_key() != import_verifying_key(key)? {
        return Err(KeyError::Mismatch);
    }
    Ok(signing_key)
}

/// Export a verifying key as public key material.
pub fn export_verifying_key(key: &VerifyingKey) -> Result<KeyMaterial, KeyError> {
    let (x, y) = coordinates(key)?;
    Ok(KeyMaterial::p384(x, y, None, vec![KeyOp::Verify]))
}

/// Export a signing key as private key material.
pub fn export_signing_key(key: &SigningKey) -> Result<KeyMaterial, KeyError> {
    let (x, y) = coordinates(key.verifying_key())?;
    let mut scalar = key.to_bytes().to_vec();
    let d = base64url_encode(&scalar);
    scalar.zeroize();
    Ok(KeyMaterial::p384(x, y, Some(d), vec![KeyOp::Sign]))
}

fn coordinates(key: &VerifyingKey) -> Result<(String, String), KeyError> {
    let point = key.to_encoded_point(false);
    match (point.x(), point.y()) {
        (Some(x), Some(y)) => Ok((base64url_encode(x), base64url_encode(y))),
        _ => Err(KeyError::InvalidPoint("point has no affine coordinates".into())),
    }
}

fn check_profile(key: &KeyMaterial) -> Result<(), KeyError> {
    if key.kty != KEY_TYPE || key.crv != CURVE {
        return Err(KeyError::UnsupportedProfile {
            kty: key.kty.clone(),
            crv: key.crv.clone(),
        });
    }
    Ok(())
}

/// Decode one field element, left-padding short encodings to 48 bytes.
fn decode_field(field: &'static str, value: &str) -> Result<Vec<u8>, KeyError> {
    let bytes = base64url_decode(value).map_err(|e| KeyError::InvalidEncoding {
        field,
        reason: e.to_string(),
    })?;
    if bytes.is_empty() || bytes.len() > FIELD_LEN {
        return Err(KeyError::CoordinateLength {
            field,
            len: bytes.len(),
            max: FIELD_LEN,
        });
    }
    let mut padded = vec![0u8; FIELD_LEN - bytes.len()];
    padded.extend_from_slice(&bytes);
    Ok(padded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_pair_has_expected_usages() {
        let pair = generate_key_pair().unwrap();
        assert!(is_private(&pair.private));
        assert!(!is_private(&pair.public));
        assert_eq!(pair.private.key_ops, vec![KeyOp::Sign]);
        assert_eq!(pair.public.key_ops, vec![KeyOp::Verify]);
        assert!(pair.public.d.is_none());
    }

    #[test]
    fn private_key_survives_compact_round_trip() {
        let pair = generate_key_pair().unwrap();
        let text = encode(&pair.private).unwrap();
        assert_eq!(text.split('.').count(), 3);

        let decoded = decode(&text).unwrap();
        assert!(is_private(&decoded));
        assert_eq!(decoded, pair.private);
    }

    #[test]
    fn public_projection_is_not_private() {
        let pair = generate_key_pair().unwrap();
        let text = encode(&to_public(&pair.private)).unwrap();
        assert_eq!(text.split('.').count(), 2);
        assert!(!is_private(&decode(&text).unwrap()));
    }

    #[test]
    fn private_scalar_without_sign_usage_encodes_as_public() {
        let pair = generate_key_pair().unwrap();
        let mut key = pair.private.clone();
        key.key_ops = vec![KeyOp::Verify];
        assert!(!is_private(&key));
        assert_eq!(encode(&key).unwrap(), format!("{}.{}", key.x, key.y));
    }

    #[test]
    fn decode_rejects_wrong_field_counts() {
        assert!(decode("").is_none());
        assert!(decode("only").is_none());
        assert!(decode("a.b.c.d").is_none());
        assert!(decode("a.b").is_some());
        assert!(decode("a.b.c").is_some());
    }

    #[test]
    fn encode_rejects_foreign_profiles() {
        let pair = generate_key_pair().unwrap();

        let mut other_curve = pair.public.clone();
        other_curve.crv = "P-256".into();
        assert!(encode(&other_curve).is_none());

        let mut not_extractable = pair.public.clone();
        not_extractable.ext = false;
        assert!(encode(&not_extractable).is_none());
    }

    #[test]
    fn import_round_trips_through_platform_keys() {
        let pair = generate_key_pair().unwrap();
        let signing_key = import_signing_key(&pair.private).unwrap();
        let verifying_key = import_verifying_key(&pair.public).unwrap();
        assert_eq!(*signing_key.verifying_key(), verifying_key);
        assert_eq!(export_verifying_key(&verifying_key).unwrap(), pair.public);
    }

    #[test]
    fn import_rejects_structurally_invalid_material() {
        let garbage = decode("not*base64.also-not").unwrap();
        assert!(matches!(
            import_verifying_key(&garbage),
            Err(KeyError::InvalidEncoding { field: "x", .. })
        ));

        let off_curve = decode(&format!(
            "{}.{}",
            base64url_encode(&[1u8; 48]),
            base64url_encode(&[2u8; 48])
        ))
        .unwrap();
        assert!(matches!(
            import_verifying_key(&off_curve),
            Err(KeyError::InvalidPoint(_))
        ));

        let too_long = decode(&format!("{}.{}", base64url_encode(&[1u8; 49]), "AQ")).unwrap();
        assert!(matches!(
            import_verifying_key(&too_long),
            Err(KeyError::CoordinateLength { len: 49, .. })
        ));
    }

    #[test]
    fn import_rejects_mismatched_scalar() {
        let a = generate_key_pair().unwrap();
        let b = generate_key_pair().unwrap();
        let mut franken = a.private.clone();
        franken.d = b.private.d.clone();
        assert_eq!(import_signing_key(&franken).unwrap_err(), KeyError::Mismatch);
    }

    #[test]
    fn import_signing_key_requires_private_material() {
        let pair = generate_key_pair().unwrap();
        assert_eq!(
            import_signing_key(&pair.public).unwrap_err(),
            KeyError::NotPrivate
        );
    }

    #[test]
    fn debug_output_redacts_scalar() {
        let pair = generate_key_pair().unwrap();
        let rendered = format!("{:?}", pair.private);
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains(pair.private.d.as_deref().unwrap()));
    }
}
