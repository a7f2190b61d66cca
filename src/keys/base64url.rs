use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

/// Base64url encode bytes without padding.
pub fn base64url_encode(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Base64url decode an unpadded string.
pub fn base64url_decode(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(s)
}
