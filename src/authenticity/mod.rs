//! Ad authenticity: metadata suffixes, signatures and the release trust root.
//!
//! A signed ad carries its signature inside the abstract:
//!
//! ```text
//! <plain abstract>##0000{"publicKey":"<x>.<y>","signature":"<hex>","link":"..."}
//! ```
//!
//! The signature covers the canonical context of category, plain abstract,
//! content and link. [`extract_metadata`] strips the suffix and classifies the
//! ad; [`sign_prepared`] produces it.

pub mod extract;
pub mod release;
pub mod sign;

pub use extract::extract_metadata;
pub use release::{scan_for_update, ReleaseCandidate};
pub use sign::sign_prepared;

use crate::domain::ad::Ad;
use crate::domain::prepared::PreparedAd;
use serde::{Deserialize, Serialize};

/// Separates the plain abstract from the metadata block.
pub const METADATA_SEPARATOR: &str = "##";

/// The only metadata format version understood.
pub const METADATA_VERSION: &str = "0000";

/// Category of web-app release announcements.
pub const RELEASE_CATEGORY: &str = "webapp:release";

/// Abstract prefix of a release announcement, followed by the version.
pub const RELEASE_PREFIX: &str = "release-";

/// Fingerprint of the only key allowed to announce releases.
pub const AUTHORIZED_RELEASE_ISSUER: &str =
    "e237cb4bf87442aff8b40a305332b02e3973d6cc01dd4abbf3f7f1057c806f5f";

// ─── Metadata ────────────────────────────────────────────────────────────────

/// What the metadata suffix of an abstract says about the ad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// The metadata version tag is understood.
    pub supported: bool,
    /// The suffix is well-formed.
    pub valid: bool,
    /// A public key and a signature are present.
    pub signed: bool,
    /// The signature verifies against the embedded key.
    pub verified: bool,
    /// SHA-256 of the embedded compact public key.
    pub fingerprint: Option<String>,
    pub link: Option<String>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            supported: true,
            valid: true,
            signed: false,
            verified: false,
            fingerprint: None,
            link: None,
        }
    }
}

impl Metadata {
    /// Classify an ad of `category` carrying this metadata.
    pub fn trust(&self, category: &str) -> TrustLevel {
        self.trust_with_issuer(category, AUTHORIZED_RELEASE_ISSUER)
    }

    pub(crate) fn trust_with_issuer(&self, category: &str, issuer: &str) -> TrustLevel {
        let is_release = category == RELEASE_CATEGORY;
        if !self.supported {
            return TrustLevel::Unsupported;
        }
        if !self.valid {
            return TrustLevel::Corrupted;
        }
        if !self.signed {
            return if is_release {
                TrustLevel::MissingSignature
            } else {
                TrustLevel::Unsigned
            };
        }
        let fingerprint = match (&self.fingerprint, self.verified) {
            (Some(fingerprint), true) => fingerprint.clone(),
            (fingerprint, _) => {
                return TrustLevel::Unverified {
                    fingerprint: fingerprint.clone(),
                }
            }
        };
        if !is_release {
            TrustLevel::Verified { fingerprint }
        } else if fingerprint != issuer {
            TrustLevel::UntrustedIssuer { fingerprint }
        } else {
            TrustLevel::AuthorizedRelease { fingerprint }
        }
    }

    /// Signed, verified, and issued by `issuer`.
    pub(crate) fn is_issued_by(&self, issuer: &str) -> bool {
        self.signed && self.verified && self.fingerprint.as_deref() == Some(issuer)
    }
}

/// Trust classification of an ad, from least to most trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrustLevel {
    /// Unknown metadata version.
    Unsupported,
    /// Malformed metadata suffix.
    Corrupted,
    /// A release announcement without a signature.
    MissingSignature,
    Unsigned,
    /// Signed, but the signature does not verify.
    Unverified { fingerprint: Option<String> },
    /// Verified signature on a regular ad.
    Verified { fingerprint: String },
    /// Verified release announcement from someone other than the release issuer.
    UntrustedIssuer { fingerprint: String },
    AuthorizedRelease { fingerprint: String },
}

impl TrustLevel {
    /// The signature checks out and, for releases, comes from the release issuer.
    pub fn is_trusted(&self) -> bool {
        matches!(
            self,
            TrustLevel::Verified { .. } | TrustLevel::AuthorizedRelease { .. }
        )
    }
}

// ─── Content ─────────────────────────────────────────────────────────────────

/// Ads whose abstract may carry a metadata suffix.
pub trait AdContent {
    fn category(&self) -> &str;
    fn abstract_text(&self) -> &str;
    fn content(&self) -> &str;
    fn set_abstract_text(&mut self, abstract_text: String);
}

impl AdContent for Ad {
    fn category(&self) -> &str {
        &self.category
    }

    fn abstract_text(&self) -> &str {
        &self.abstract_text
    }

    fn content(&self) -> &str {
        &self.content
    }

    fn set_abstract_text(&mut self, abstract_text: String) {
        self.abstract_text = abstract_text;
    }
}

impl AdContent for PreparedAd {
    fn category(&self) -> &str {
        &self.category
    }

    fn abstract_text(&self) -> &str {
        &self.abstract_text
    }

    fn content(&self) -> &str {
        &self.content
    }

    fn set_abstract_text(&mut self, abstract_text: String) {
        self.abstract_text = abstract_text;
    }
}

/// An ad with its metadata suffix stripped and evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithMetadata<T> {
    /// The ad, with the plain abstract.
    pub ad: T,
    pub metadata: Metadata,
}

impl<T: AdContent> WithMetadata<T> {
    pub fn trust(&self) -> TrustLevel {
        self.metadata.trust(self.ad.category())
    }
}

impl<T> std::ops::Deref for WithMetadata<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.ad
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed(verified: bool, fingerprint: &str) -> Metadata {
        Metadata {
            signed: true,
            verified,
            fingerprint: Some(fingerprint.to_string()),
            ..Metadata::default()
        }
    }

    #[test]
    fn classification_order() {
        let unsupported = Metadata {
            supported: false,
            valid: false,
            ..Metadata::default()
        };
        assert_eq!(unsupported.trust("any"), TrustLevel::Unsupported);

        let corrupted = Metadata {
            valid: false,
            ..Metadata::default()
        };
        assert_eq!(corrupted.trust("any"), TrustLevel::Corrupted);

        assert_eq!(Metadata::default().trust("bikes"), TrustLevel::Unsigned);
        assert_eq!(
            Metadata::default().trust(RELEASE_CATEGORY),
            TrustLevel::MissingSignature
        );

        assert_eq!(
            signed(false, "ff").trust("bikes"),
            TrustLevel::Unverified {
                fingerprint: Some("ff".into())
            }
        );
        assert_eq!(
            signed(true, "ff").trust("bikes"),
            TrustLevel::Verified {
                fingerprint: "ff".into()
            }
        );
    }

    #[test]
    fn releases_require_the_authorized_issuer() {
        assert_eq!(
            signed(true, "ff").trust(RELEASE_CATEGORY),
            TrustLevel::UntrustedIssuer {
                fingerprint: "ff".into()
            }
        );
        let authorized = signed(true, AUTHORIZED_RELEASE_ISSUER).trust(RELEASE_CATEGORY);
        assert!(authorized.is_trusted());
        assert_eq!(
            authorized,
            TrustLevel::AuthorizedRelease {
                fingerprint: AUTHORIZED_RELEASE_ISSUER.into()
            }
        );
    }

    #[test]
    fn issuer_check_needs_a_verified_signature() {
        assert!(signed(true, "ff").is_issued_by("ff"));
        assert!(!signed(false, "ff").is_issued_by("ff"));
        assert!(!signed(true, "ff").is_issued_by("ee"));
    }
}
