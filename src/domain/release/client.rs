//! Releases sub-client.

use crate::authenticity::release::{scan_for_update, ReleaseCandidate};
use crate::authenticity::RELEASE_CATEGORY;
use crate::client::DefiadsClient;

/// Sub-client for release announcements.
pub struct Releases<'a> {
    pub(crate) client: &'a DefiadsClient,
}

impl<'a> Releases<'a> {
    /// Newest authorized release above `current_version`, if any.
    pub async fn check_for_update(&self, current_version: i64) -> Option<ReleaseCandidate> {
        let ads = self.client.ads();
        let items = ads.list(&[RELEASE_CATEGORY]).await?;
        let ids: Vec<_> = items.into_iter().map(|item| item.id).collect();
        let released = ads.read(&ids).await?;
        tracing::debug!(candidates = released.len(), current_version, "scanning releases");
        scan_for_update(released, current_version)
    }
}
