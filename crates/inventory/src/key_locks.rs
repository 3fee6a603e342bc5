//! Per-entry lock registry.
//!
//! Every live entry sits behind its own `RwLock`, and the registry remembers
//! the order in which entries were appended. That append order is the one
//! global lock order: any operation that needs more than one entry lock walks
//! the registry front to back and locks the entries it wants as it passes
//! them. Two operations with overlapping targets therefore always contend for
//! their shared entries in the same relative order, so no wait cycle can form.
//!
//! The registry itself lives inside the store's structure lock. Entry locks
//! are borrowed from it, so holding one without also holding the structure
//! lock (read or write) does not type-check.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use stockroom_core::{Isbn, StoreError, StoreResult};

use crate::item::Entry;

#[derive(Debug)]
struct Slot {
    isbn: Isbn,
    entry: RwLock<Entry>,
}

/// Identity -> entry mapping plus the append-ordered lock registry.
///
/// Slots are keyed by a monotonically increasing sequence number; iteration
/// over `order` is append order and is never rearranged. `index` resolves an
/// identity to its slot. The two maps change together or not at all.
#[derive(Debug, Default)]
pub struct KeyLocks {
    next_seq: u64,
    order: BTreeMap<u64, Slot>,
    index: HashMap<Isbn, u64>,
}

pub(crate) fn read<T>(lock: &RwLock<T>) -> StoreResult<RwLockReadGuard<'_, T>> {
    lock.read().map_err(|_| StoreError::LockPoisoned)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> StoreResult<RwLockWriteGuard<'_, T>> {
    lock.write().map_err(|_| StoreError::LockPoisoned)
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, isbn: Isbn) -> bool {
        self.index.contains_key(&isbn)
    }

    /// Register a new entry behind a fresh lock at the end of the order.
    pub fn append(&mut self, entry: Entry) -> StoreResult<()> {
        let isbn = entry.isbn();
        if self.contains(isbn) {
            return Err(StoreError::duplicate(isbn));
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.insert(
            seq,
            Slot {
                isbn,
                entry: RwLock::new(entry),
            },
        );
        self.index.insert(isbn, seq);
        Ok(())
    }

    /// Drop every slot whose identity is in `isbns`. Returns how many went.
    pub fn remove(&mut self, isbns: &HashSet<Isbn>) -> usize {
        let mut removed = 0;
        for isbn in isbns {
            if let Some(seq) = self.index.remove(isbn) {
                self.order.remove(&seq);
                removed += 1;
            }
        }
        removed
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.index.clear();
    }

    /// Walk `(identity, lock)` pairs in the global lock order.
    pub fn iter_in_order(&self) -> impl Iterator<Item = (Isbn, &RwLock<Entry>)> + '_ {
        self.order.values().map(|slot| (slot.isbn, &slot.entry))
    }

    pub fn for_each_in_order<F>(&self, mut f: F)
    where
        F: FnMut(Isbn, &RwLock<Entry>),
    {
        for (isbn, lock) in self.iter_in_order() {
            f(isbn, lock);
        }
    }

    /// Write-lock a single entry. Holding only one entry lock needs no order.
    pub fn write_one(&self, isbn: Isbn) -> StoreResult<RwLockWriteGuard<'_, Entry>> {
        let seq = self.index.get(&isbn).ok_or(StoreError::not_found(isbn))?;
        let slot = self.order.get(seq).ok_or(StoreError::not_found(isbn))?;
        write(&slot.entry)
    }

    /// Read-lock every entry, in order.
    pub fn read_all(&self) -> StoreResult<Vec<RwLockReadGuard<'_, Entry>>> {
        let mut guards = Vec::with_capacity(self.len());
        for (_, lock) in self.iter_in_order() {
            guards.push(read(lock)?);
        }
        tracing::trace!(locked = guards.len(), "read-locked all entries");
        Ok(guards)
    }

    /// Read-lock the entries in `targets`, in order.
    pub fn read_many(&self, targets: &HashSet<Isbn>) -> StoreResult<Vec<RwLockReadGuard<'_, Entry>>> {
        let mut guards = Vec::with_capacity(targets.len());
        for (isbn, lock) in self.iter_in_order() {
            if targets.contains(&isbn) {
                guards.push(read(lock)?);
            }
        }
        tracing::trace!(locked = guards.len(), "read-locked entries");
        Ok(guards)
    }

    /// Write-lock the entries in `targets`, in order.
    pub fn write_many(&self, targets: &HashSet<Isbn>) -> StoreResult<Vec<RwLockWriteGuard<'_, Entry>>> {
        let mut guards = Vec::with_capacity(targets.len());
        for (isbn, lock) in self.iter_in_order() {
            if targets.contains(&isbn) {
                guards.push(write(lock)?);
            }
        }
        tracing::trace!(locked = guards.len(), "write-locked entries");
        Ok(guards)
    }
}
