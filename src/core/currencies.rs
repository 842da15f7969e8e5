//! Currency code validation.
//!
//! The service accepts exactly the currencies that appear in its country
//! table, so the currency set is derived from [`countries`](super::countries).

use super::countries::countries;

/// Check whether `code` is a currency the service recognizes.
pub fn is_valid_currency(code: &str) -> bool {
    !code.is_empty() && countries().iter().any(|c| c.currency == Some(code))
}

/// Sorted, de-duplicated list of every currency the service recognizes.
pub fn currencies() -> Vec<&'static str> {
    let mut codes: Vec<&'static str> = countries().iter().filter_map(|c| c.currency).collect();
    codes.sort_unstable();
    codes.dedup();
    codes
}
