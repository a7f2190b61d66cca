//! Conversion: raw catalog results → Ad / ListItem.

use super::wire::{AdResponse, ListItemResponse};
use super::{Ad, ListItem};
use crate::domain::shaped;
use crate::error::ShapeError;
use crate::shared::DefiadId;
use serde_json::Value;

impl From<AdResponse> for Ad {
    fn from(source: AdResponse) -> Self {
        Self {
            id: DefiadId::from(source.id),
            category: source.cat,
            abstract_text: source.abs,
            content: source.text,
            weight: source.weight,
            length: source.length,
            height: source.height,
            publisher: source.publisher,
            term: source.term,
            start: source.start,
            end: source.end,
        }
    }
}

impl From<ListItemResponse> for ListItem {
    fn from((id, category, abstract_text): ListItemResponse) -> Self {
        Self {
            id: DefiadId::from(id),
            category,
            abstract_text,
        }
    }
}

const ADS_EXPECTED: &str = "array of ad objects";

pub(crate) fn ads_from_value(value: Value) -> Result<Vec<Ad>, ShapeError> {
    // serde would also accept an ad as a positional array
    if let Some(index) = value
        .as_array()
        .and_then(|items| items.iter().position(|item| !item.is_object()))
    {
        return Err(ShapeError::new(ADS_EXPECTED, format!("element {} is not an object", index)));
    }
    let raw: Vec<AdResponse> = shaped(value, ADS_EXPECTED)?;
    Ok(raw.into_iter().map(Ad::from).collect())
}

pub(crate) fn list_items_from_value(value: Value) -> Result<Vec<ListItem>, ShapeError> {
    let raw: Vec<ListItemResponse> = shaped(value, "array of [id, cat, abs] string triples")?;
    Ok(raw.into_iter().map(ListItem::from).collect())
}
