//! Signing and verification through the public API only.

use defiads_sdk::authenticity::{extract_metadata, sign_prepared, TrustLevel};
use defiads_sdk::domain::prepared::PreparedAd;
use defiads_sdk::keys::{decode, encode, generate_key_pair, import_signing_key, import_verifying_key, to_public};
use defiads_sdk::signing::{context, fingerprint, sign, verify, SigningContext};

fn ad() -> PreparedAd {
    PreparedAd::new("bikes", "red bike", "barely used, pick up in town")
}

#[test]
fn signed_ad_verifies_with_the_embedded_key() {
    let pair = generate_key_pair().unwrap();
    let signed = sign_prepared(&ad(), &pair.private, Some("https://example.org/bike")).unwrap();

    let checked = extract_metadata(signed);
    assert_eq!(checked.abstract_text, "red bike");
    assert!(checked.metadata.signed);
    assert!(checked.metadata.verified);

    let public = encode(&pair.public).unwrap();
    let expected = fingerprint(&public);
    assert_eq!(checked.trust(), TrustLevel::Verified { fingerprint: expected });
    assert_eq!(checked.metadata.link.as_deref(), Some("https://example.org/bike"));
}

#[test]
fn tampering_breaks_verification() {
    let pair = generate_key_pair().unwrap();
    let signed = sign_prepared(&ad(), &pair.private, None).unwrap();

    let mut content = signed.clone();
    content.content.push('!');
    assert!(!extract_metadata(content).metadata.verified);

    let mut category = signed.clone();
    category.category = "boats".into();
    assert!(!extract_metadata(category).metadata.verified);

    let mut plain = signed;
    plain.abstract_text = plain.abstract_text.replacen("red", "blue", 1);
    let checked = extract_metadata(plain);
    assert!(checked.metadata.signed);
    assert!(matches!(checked.trust(), TrustLevel::Unverified { .. }));
}

#[test]
fn plain_ads_are_unsigned() {
    let checked = extract_metadata(ad());
    assert_eq!(checked.trust(), TrustLevel::Unsigned);
    assert!(!checked.trust().is_trusted());

    let release = extract_metadata(PreparedAd::new("webapp:release", "release-3", "notes"));
    assert_eq!(release.trust(), TrustLevel::MissingSignature);
}

#[test]
fn unknown_metadata_versions_are_unsupported() {
    let checked = extract_metadata(PreparedAd::new("bikes", "red bike##0001{}", "x"));
    assert_eq!(checked.abstract_text, "red bike");
    assert_eq!(checked.trust(), TrustLevel::Unsupported);
}

#[test]
fn keys_survive_text_encoding() {
    let pair = generate_key_pair().unwrap();
    let text = encode(&pair.private).unwrap();
    let restored = decode(&text).unwrap();
    assert_eq!(restored, pair.private);
    assert_eq!(to_public(&restored), pair.public);

    let message = SigningContext::for_ad("c", "a", "t", None).to_message();
    let signature = sign(&message, &import_signing_key(&restored).unwrap()).unwrap();
    let verifying = import_verifying_key(&pair.public).unwrap();
    assert!(verify(&message, &signature, &verifying).unwrap());
    assert!(!verify(b"other", &signature, &verifying).unwrap());
}

#[test]
fn context_is_length_prefixed() {
    let context = SigningContext::for_ad("bikes", "red", "x", None);
    assert_eq!(context.serialize(), "00000005bikes00000003red00000001x");
    assert_eq!(
        context::deserialize(&context.serialize()),
        Some(vec!["bikes".to_string(), "red".to_string(), "x".to_string()])
    );
}
