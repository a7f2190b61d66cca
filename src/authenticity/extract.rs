//! Metadata extraction and signature verification.

use serde_json::{Map, Value};

use super::{AdContent, Metadata, WithMetadata, METADATA_SEPARATOR, METADATA_VERSION};
use crate::keys::{decode, import_verifying_key};
use crate::signing::{fingerprint, verify, SigningContext};

/// Strip the metadata suffix from `ad` and evaluate it.
///
/// Never fails: every problem is recorded in the returned [`Metadata`].
pub fn extract_metadata<T: AdContent>(mut ad: T) -> WithMetadata<T> {
    let raw = ad.abstract_text().to_string();
    let chunks: Vec<&str> = raw.split(METADATA_SEPARATOR).collect();
    let plain = chunks.first().copied().unwrap_or_default().to_string();

    let mut metadata = Metadata::default();
    if chunks.len() > 2 {
        metadata.valid = false;
    }
    if let [_, suffix] = chunks.as_slice() {
        evaluate_suffix(&ad, &plain, suffix, &mut metadata);
    }

    ad.set_abstract_text(plain);
    WithMetadata { ad, metadata }
}

fn evaluate_suffix<T: AdContent>(ad: &T, plain: &str, suffix: &str, metadata: &mut Metadata) {
    if suffix.get(..METADATA_VERSION.len()) != Some(METADATA_VERSION) {
        metadata.supported = false;
        metadata.valid = false;
        return;
    }

    let body = &suffix[METADATA_VERSION.len()..];
    let fields = match serde_json::from_str::<Map<String, Value>>(body) {
        Ok(fields) => fields,
        Err(err) => {
            tracing::debug!(error = %err, "metadata suffix is not a JSON object");
            metadata.valid = false;
            return;
        }
    };

    metadata.link = string_field(&fields, "link");

    let (Some(public_key), Some(signature)) = (
        string_field(&fields, "publicKey"),
        string_field(&fields, "signature"),
    ) else {
        return;
    };
    metadata.signed = true;

    let Some(key) = decode(&public_key) else {
        return;
    };
    metadata.fingerprint = Some(fingerprint(&public_key));

    let context = SigningContext::for_ad(
        ad.category(),
        plain,
        ad.content(),
        metadata.link.as_deref(),
    );
    metadata.verified = match import_verifying_key(&key) {
        Ok(verifying_key) => {
            verify(&context.to_message(), &signature, &verifying_key).unwrap_or_else(|err| {
                tracing::debug!(error = %err, "undecodable ad signature");
                false
            })
        }
        Err(err) => {
            tracing::debug!(error = %err, "embedded public key does not import");
            false
        }
    };
}

fn string_field(fields: &Map<String, Value>, name: &str) -> Option<String> {
    fields.get(name).and_then(Value::as_str).map(str::to_string)
}
