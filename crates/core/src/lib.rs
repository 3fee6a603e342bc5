//! `stockroom-core` — identity, validation and error building blocks.
//!
//! This crate contains no locking and no storage.

pub mod error;
pub mod id;
pub mod validation;

pub use error::{StoreError, StoreResult};
pub use id::Isbn;
