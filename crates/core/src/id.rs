//! Entry identity.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::validation::{ISBN_MAX_DIGITS, ISBN_MIN_DIGITS, digit_count};

/// Format-validated identity of an inventory entry.
///
/// Raw identities arrive as `i64` so malformed values can be reported back
/// as `InvalidIdentity` instead of being unrepresentable.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Isbn(i64);

impl Isbn {
    /// Validate a raw identity: positive, with a digit count inside
    /// `ISBN_MIN_DIGITS..=ISBN_MAX_DIGITS`.
    pub fn parse(raw: i64) -> Result<Self, StoreError> {
        if raw <= 0 {
            return Err(StoreError::InvalidIdentity(raw));
        }
        let digits = digit_count(raw);
        if !(ISBN_MIN_DIGITS..=ISBN_MAX_DIGITS).contains(&digits) {
            return Err(StoreError::InvalidIdentity(raw));
        }
        Ok(Self(raw))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for Isbn {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<i64> for Isbn {
    type Error = StoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Isbn> for i64 {
    fn from(value: Isbn) -> Self {
        value.0
    }
}

impl FromStr for Isbn {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<i64>()
            .map_err(|_| StoreError::UnparsableIdentity(s.to_string()))?;
        Self::parse(raw)
    }
}
