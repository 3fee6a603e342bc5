//! Store error model.

use thiserror::Error;

use crate::id::Isbn;

/// Result type used across the store.
pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error.
///
/// Every variant except `StockUnavailable` is reported before any state is
/// touched. A failed purchase still leaves its recorded sale misses behind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A required collection argument was absent.
    #[error("required input is missing")]
    NullInput,

    /// An identity failed format validation.
    #[error("invalid isbn: {0}")]
    InvalidIdentity(i64),

    /// Text that does not read as an identity number at all.
    #[error("isbn {0:?} is not a number")]
    UnparsableIdentity(String),

    /// An add request targeted an identity that is already stocked.
    #[error("isbn {0} is duplicated")]
    DuplicateIdentity(Isbn),

    /// An operation targeted an identity that is not stocked.
    #[error("isbn {0} is not available")]
    IdentityNotFound(Isbn),

    /// A copy count or sample size was negative or out of range.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// A unit price was negative.
    #[error("invalid price: {0}")]
    InvalidPrice(i64),

    /// An add request carried an empty title or author.
    #[error("invalid entry: {0}")]
    InvalidEntry(String),

    /// At least one requested entry could not cover its purchase.
    #[error("stock unavailable for {} isbn(s)", .0.len())]
    StockUnavailable(Vec<Isbn>),

    /// An entry mutator was called against its contract.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// A lock was poisoned by a panicking holder.
    #[error("lock poisoned")]
    LockPoisoned,

    /// The operation belongs to the unimplemented reporting family.
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
}

impl StoreError {
    pub fn invalid_entry(msg: impl Into<String>) -> Self {
        Self::InvalidEntry(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn not_found(isbn: Isbn) -> Self {
        Self::IdentityNotFound(isbn)
    }

    pub fn duplicate(isbn: Isbn) -> Self {
        Self::DuplicateIdentity(isbn)
    }

    pub fn not_implemented(operation: &'static str) -> Self {
        Self::NotImplemented(operation)
    }

    /// True for failures detected before any mutation took place.
    pub fn is_validation(&self) -> bool {
        !matches!(
            self,
            Self::StockUnavailable(_) | Self::LockPoisoned | Self::InvariantViolation(_)
        )
    }
}
