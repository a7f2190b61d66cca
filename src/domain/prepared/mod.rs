//! Publishing domain: ads drafted locally and staged on the node.

pub mod client;
mod convert;

pub(crate) use convert::prepared_from_value;

use serde::{Deserialize, Serialize};

/// An ad staged for publication. It has no id until the node assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedAd {
    pub category: String,
    /// May carry a metadata suffix once signed.
    pub abstract_text: String,
    pub content: String,
}

impl PreparedAd {
    pub fn new(
        category: impl Into<String>,
        abstract_text: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            abstract_text: abstract_text.into(),
            content: content.into(),
        }
    }
}
