//! Wallet domain: balances, amounts and the funding minimum.

pub mod client;
mod convert;

pub(crate) use convert::balance_from_value;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Smallest amount the node accepts to fund an ad.
pub const MIN_FUND_SAT: u64 = 50_000;

/// Amounts above this are displayed in BTC.
const SAT_DISPLAY_LIMIT: u64 = 1_000_000;

const SAT_PER_BTC: u64 = 100_000_000;

/// Wallet balance in satoshi.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub total: u64,
    pub available: u64,
}

/// Format a satoshi amount for display.
///
/// Up to one million satoshi the amount is shown as-is; above that it is
/// converted to BTC and rounded half-up to three decimals.
pub fn format_bitcoin_amount(amount_sat: u64) -> String {
    if amount_sat <= SAT_DISPLAY_LIMIT {
        return format!("{} sat", amount_sat);
    }
    let btc = (Decimal::from(amount_sat) / Decimal::from(SAT_PER_BTC))
        .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    format!("{} BTC", btc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_amounts_stay_in_sat() {
        assert_eq!(format_bitcoin_amount(0), "0 sat");
        assert_eq!(format_bitcoin_amount(50_000), "50000 sat");
        assert_eq!(format_bitcoin_amount(1_000_000), "1000000 sat");
    }

    #[test]
    fn large_amounts_switch_to_btc() {
        assert_eq!(format_bitcoin_amount(1_500_000), "0.015 BTC");
        assert_eq!(format_bitcoin_amount(1_050_000), "0.011 BTC");
        assert_eq!(format_bitcoin_amount(100_000_000), "1 BTC");
        assert_eq!(format_bitcoin_amount(123_456_789), "1.235 BTC");
    }
}
