//! Signing prepared ads.

use serde::Serialize;

use super::{METADATA_SEPARATOR, METADATA_VERSION};
use crate::domain::prepared::PreparedAd;
use crate::error::SigningError;
use crate::keys::{encode, import_signing_key, to_public, KeyMaterial};
use crate::signing::{sign, SigningContext};

#[derive(Serialize)]
struct SignatureBlock<'a> {
    #[serde(rename = "publicKey")]
    public_key: String,
    signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    link: Option<&'a str>,
}

/// Sign `prepared` with a private key and append the metadata suffix to its
/// abstract. An empty link counts as no link.
pub fn sign_prepared(
    prepared: &PreparedAd,
    key: &KeyMaterial,
    link: Option<&str>,
) -> Result<PreparedAd, SigningError> {
    if prepared.abstract_text.contains(METADATA_SEPARATOR) {
        return Err(SigningError::SeparatorInAbstract);
    }
    let link = link.filter(|link| !link.is_empty());

    let signing_key = import_signing_key(key)?;
    let context = SigningContext::for_ad(
        &prepared.category,
        &prepared.abstract_text,
        &prepared.content,
        link,
    );
    let signature = sign(&context.to_message(), &signing_key)?;

    let block = SignatureBlock {
        public_key: encode(&to_public(key)).ok_or(SigningError::Encoding)?,
        signature,
        link,
    };
    let block = serde_json::to_string(&block).map_err(|_| SigningError::Encoding)?;

    Ok(PreparedAd {
        category: prepared.category.clone(),
        abstract_text: format!(
            "{}{}{}{}",
            prepared.abstract_text, METADATA_SEPARATOR, METADATA_VERSION, block
        ),
        content: prepared.content.clone(),
    })
}
