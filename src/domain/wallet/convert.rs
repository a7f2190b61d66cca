//! Conversion: `[total, available]` → Balance.

use super::Balance;
use crate::error::ShapeError;
use serde_json::Value;

const EXPECTED: &str = "[total, available] numeric pair";

/// Numbers and numeric strings are both accepted for each element.
pub(crate) fn balance_from_value(value: Value) -> Result<Balance, ShapeError> {
    let Value::Array(items) = value else {
        return Err(ShapeError::new(EXPECTED, "not an array"));
    };
    let amounts = items
        .iter()
        .map(coerce_amount)
        .collect::<Result<Vec<u64>, ShapeError>>()?;
    match amounts.as_slice() {
        [total, available] => Ok(Balance {
            total: *total,
            available: *available,
        }),
        other => Err(ShapeError::new(
            EXPECTED,
            format!("{} elements", other.len()),
        )),
    }
}

fn coerce_amount(value: &Value) -> Result<u64, ShapeError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| ShapeError::new(EXPECTED, format!("{} is not a satoshi amount", n))),
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|e| ShapeError::new(EXPECTED, format!("{:?}: {}", s, e))),
        other => Err(ShapeError::new(EXPECTED, format!("unexpected element {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_pair_to_balance() {
        let balance = balance_from_value(json!([120000, 80000])).unwrap();
        assert_eq!(balance, Balance { total: 120_000, available: 80_000 });
    }

    #[test]
    fn coerces_numeric_strings() {
        let balance = balance_from_value(json!(["120000", 5])).unwrap();
        assert_eq!(balance.total, 120_000);
        assert_eq!(balance.available, 5);
    }

    #[test]
    fn rejects_wrong_arity_and_non_numbers() {
        assert!(balance_from_value(json!([1, 2, 3])).is_err());
        assert!(balance_from_value(json!([1])).is_err());
        assert!(balance_from_value(json!([1, "lots"])).is_err());
        assert!(balance_from_value(json!([1, -2])).is_err());
        assert!(balance_from_value(json!({"total": 1})).is_err());
    }
}
