//! Concurrent in-memory inventory.
//!
//! A coarse structure lock guards which entries exist; a per-entry lock
//! guards each entry's stock, sale-miss counter and featured flag. See
//! [`store`] for the locking protocol and [`key_locks`] for the global lock
//! order that keeps multi-entry operations deadlock-free.

pub mod command;
pub mod item;
pub mod key_locks;
pub mod store;

pub use command::{InventoryCommand, InventoryReply};
pub use item::{CopyDelta, Entry, FeaturedFlag, Item, NewEntry, Rating, StockItem};
pub use key_locks::KeyLocks;
pub use store::Inventory;
