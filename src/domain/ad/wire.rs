//! Wire types for catalog responses.

use serde::{Deserialize, Serialize};

/// Raw ad object as returned by `read`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdResponse {
    pub id: String,
    pub cat: String,
    pub abs: String,
    pub text: String,
    pub weight: u64,
    pub length: u64,
    pub height: u64,
    pub publisher: String,
    pub term: u64,
    pub start: u64,
    pub end: u64,
}

/// Raw listing entry as returned by `list`: `[id, cat, abs]`.
pub type ListItemResponse = (String, String, String);
