//! Catalog domain: published ads and category listings.

pub mod client;
mod convert;
pub mod wire;

pub(crate) use convert::{ads_from_value, list_items_from_value};

use crate::domain::wallet::format_bitcoin_amount;
use crate::shared::DefiadId;
use serde::{Deserialize, Serialize};

// ─── Ad ──────────────────────────────────────────────────────────────────────

/// A published ad as read from the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ad {
    pub id: DefiadId,
    pub category: String,
    /// May carry a metadata suffix; see [`crate::authenticity`].
    pub abstract_text: String,
    pub content: String,
    pub weight: u64,
    pub length: u64,
    pub height: u64,
    pub publisher: String,
    pub term: u64,
    pub start: u64,
    pub end: u64,
}

impl Ad {
    /// Funding amount in satoshi.
    pub fn amount_sat(&self) -> u64 {
        self.weight.saturating_mul(self.length)
    }

    /// Funding amount formatted for display (`"75000 sat"`, `"0.015 BTC"`).
    pub fn formatted_amount(&self) -> String {
        format_bitcoin_amount(self.amount_sat())
    }
}

// ─── ListItem ────────────────────────────────────────────────────────────────

/// One entry of a category listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub id: DefiadId,
    pub category: String,
    pub abstract_text: String,
}
