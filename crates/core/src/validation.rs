//! Shape validation shared by every store operation.

use crate::error::{StoreError, StoreResult};

/// Fewest digits an identity may have.
pub const ISBN_MIN_DIGITS: u32 = 1;

/// Most digits an identity may have.
pub const ISBN_MAX_DIGITS: u32 = 10;

/// Decimal digit count of a positive value.
pub fn digit_count(value: i64) -> u32 {
    value.unsigned_abs().checked_ilog10().map_or(1, |log| log + 1)
}

/// Copy counts must be non-negative.
pub fn copies(n: i64) -> StoreResult<u64> {
    u64::try_from(n).map_err(|_| StoreError::InvalidQuantity(n))
}

/// Prices are minor currency units and must be non-negative.
pub fn price(cents: i64) -> StoreResult<u64> {
    u64::try_from(cents).map_err(|_| StoreError::InvalidPrice(cents))
}

/// Title and author must carry at least one non-whitespace character.
pub fn non_empty(field: &str, value: &str) -> StoreResult<()> {
    if value.trim().is_empty() {
        return Err(StoreError::invalid_entry(format!("{field} cannot be empty")));
    }
    Ok(())
}
