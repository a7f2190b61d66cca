//! Canonical, injective serialization of the signable fields of an ad.
//!
//! Each present field is written as an 8-digit lowercase hex length followed by
//! the field itself. Lengths count UTF-16 code units so that signatures made by
//! browser clients verify here byte for byte.

const LENGTH_WIDTH: usize = 8;

/// The ordered signable fields of an ad: category, abstract (metadata
/// stripped), content and optional link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningContext {
    fields: Vec<Option<String>>,
}

impl SigningContext {
    pub fn for_ad(category: &str, abstract_text: &str, content: &str, link: Option<&str>) -> Self {
        Self {
            fields: vec![
                Some(category.to_string()),
                Some(abstract_text.to_string()),
                Some(content.to_string()),
                link.map(str::to_string),
            ],
        }
    }

    pub fn fields(&self) -> &[Option<String>] {
        &self.fields
    }

    pub fn serialize(&self) -> String {
        let fields: Vec<Option<&str>> = self.fields.iter().map(Option::as_deref).collect();
        serialize(&fields)
    }

    /// Message bytes fed to the signature scheme.
    pub fn to_message(&self) -> Vec<u8> {
        self.serialize().into_bytes()
    }
}

/// Serialize present fields in order; absent fields are skipped.
pub fn serialize(fields: &[Option<&str>]) -> String {
    fields
        .iter()
        .flatten()
        .map(|value| format!("{:08x}{}", utf16_len(value), value))
        .collect()
}

/// Parse a serialized context back into its present fields.
///
/// Returns `None` when a length prefix is not exactly eight hex digits or the
/// remaining text is shorter than the declared length.
pub fn deserialize(text: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let prefix = rest.get(..LENGTH_WIDTH)?;
        if !prefix.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let length = usize::from_str_radix(prefix, 16).ok()?;
        rest = &rest[LENGTH_WIDTH..];

        let end = byte_offset_of_utf16(rest, length)?;
        fields.push(rest[..end].to_string());
        rest = &rest[end..];
    }

    Some(fields)
}

fn utf16_len(value: &str) -> usize {
    value.chars().map(char::len_utf16).sum()
}

/// Byte offset in `text` after `units` UTF-16 code units, if that boundary
/// falls on a character boundary within the text.
fn byte_offset_of_utf16(text: &str, units: usize) -> Option<usize> {
    let mut counted = 0;
    for (offset, ch) in text.char_indices() {
        if counted == units {
            return Some(offset);
        }
        counted += ch.len_utf16();
        if counted > units {
            return None;
        }
    }
    (counted == units).then_some(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_hex_length_prefix() {
        assert_eq!(serialize(&[Some("abc")]), "00000003abc");
        assert_eq!(
            serialize(&[Some("cat"), None, Some("")]),
            "00000003cat00000000"
        );
    }

    #[test]
    fn round_trip_drops_absent_fields() {
        let long = "x".repeat(300);
        let fields = [Some("market"), None, Some("a ## b"), Some(long.as_str())];
        let serialized = serialize(&fields);
        let expected: Vec<String> = fields.iter().flatten().map(|s| s.to_string()).collect();
        assert_eq!(deserialize(&serialized).unwrap(), expected);
    }

    #[test]
    fn lengths_count_utf16_units() {
        // 'é' is one unit, '😀' is two
        assert_eq!(serialize(&[Some("é😀")]), "00000003é😀");
        assert_eq!(deserialize("00000003é😀").unwrap(), vec!["é😀".to_string()]);
    }

    #[test]
    fn field_boundaries_are_unambiguous() {
        let a = serialize(&[Some("ab"), Some("c")]);
        let b = serialize(&[Some("a"), Some("bc")]);
        assert_ne!(a, b);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(deserialize("0000").is_none());
        assert!(deserialize("zzzzzzzzabc").is_none());
        assert!(deserialize("+0000003abc").is_none());
        assert!(deserialize("00000005abc").is_none());
        // declared length splits a surrogate pair
        assert!(deserialize("00000001😀").is_none());
    }

    #[test]
    fn empty_input_is_empty_context() {
        assert_eq!(deserialize("").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn ad_context_orders_fields() {
        let context = SigningContext::for_ad("cat", "abs", "text", None);
        assert_eq!(context.serialize(), "00000003cat00000003abs00000004text");

        let linked = SigningContext::for_ad("cat", "abs", "text", Some("https://x"));
        assert!(linked.serialize().ends_with("00000009https://x"));
        assert_eq!(linked.to_message(), linked.serialize().into_bytes());
    }

    mod roundtrip {
        use super::super::{deserialize, serialize};
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn present_fields_survive(
                fields in proptest::collection::vec(proptest::option::of(any::<String>()), 0..8)
            ) {
                let borrowed: Vec<Option<&str>> = fields.iter().map(Option::as_deref).collect();
                let expected: Vec<String> = fields.iter().flatten().cloned().collect();
                prop_assert_eq!(deserialize(&serialize(&borrowed)), Some(expected));
            }
        }
    }
}
