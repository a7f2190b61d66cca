//! Conversion: `[cat, abs, text]` ↔ PreparedAd.

use super::PreparedAd;
use crate::domain::shaped;
use crate::error::ShapeError;
use serde_json::Value;

impl From<(String, String, String)> for PreparedAd {
    fn from((category, abstract_text, content): (String, String, String)) -> Self {
        Self {
            category,
            abstract_text,
            content,
        }
    }
}

impl PreparedAd {
    /// Positional params of the `prepare` call.
    pub(crate) fn to_params(&self) -> Vec<Value> {
        vec![
            Value::from(self.category.as_str()),
            Value::from(self.abstract_text.as_str()),
            Value::from(self.content.as_str()),
        ]
    }
}

pub(crate) fn prepared_from_value(value: Value) -> Result<PreparedAd, ShapeError> {
    let raw: (String, String, String) = shaped(value, "[cat, abs, text] string triple")?;
    Ok(PreparedAd::from(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_positional_triple() {
        let prepared = prepared_from_value(json!(["bikes", "red bike", "barely used"])).unwrap();
        assert_eq!(prepared, PreparedAd::new("bikes", "red bike", "barely used"));
        assert_eq!(prepared.to_params(), vec![json!("bikes"), json!("red bike"), json!("barely used")]);
    }

    #[test]
    fn rejects_other_shapes() {
        assert!(prepared_from_value(json!(["a", "b"])).is_err());
        assert!(prepared_from_value(json!({"cat": "a", "abs": "b", "text": "c"})).is_err());
        assert!(prepared_from_value(json!(["a", "b", null])).is_err());
    }
}
