//! Update scan over release announcements.

use super::{extract_metadata, WithMetadata, AUTHORIZED_RELEASE_ISSUER, RELEASE_PREFIX};
use crate::domain::ad::Ad;

/// The newest authorized release found by a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseCandidate {
    pub version: i64,
    pub ad: WithMetadata<Ad>,
}

/// Version announced by a plain release abstract (`release-<n>`).
pub fn release_version(abstract_text: &str) -> Option<i64> {
    abstract_text.strip_prefix(RELEASE_PREFIX)?.parse().ok()
}

/// Pick the highest-versioned release above `current_version` that is signed
/// by the authorized issuer. Ads that are not releases are skipped.
pub fn scan_for_update(ads: Vec<Ad>, current_version: i64) -> Option<ReleaseCandidate> {
    scan_for_update_with_issuer(ads, current_version, AUTHORIZED_RELEASE_ISSUER)
}

pub(crate) fn scan_for_update_with_issuer(
    ads: Vec<Ad>,
    current_version: i64,
    issuer: &str,
) -> Option<ReleaseCandidate> {
    let mut max_version = current_version;
    let mut candidate = None;

    for ad in ads {
        let ad = extract_metadata(ad);
        let Some(version) = release_version(&ad.abstract_text) else {
            continue;
        };
        if version <= max_version {
            continue;
        }
        if !ad.metadata.is_issued_by(issuer) {
            tracing::debug!(
                version,
                id = %ad.id,
                fingerprint = ?ad.metadata.fingerprint,
                "ignoring release not signed by the release issuer"
            );
            continue;
        }
        max_version = version;
        candidate = Some(ReleaseCandidate { version, ad });
    }

    candidate
}
