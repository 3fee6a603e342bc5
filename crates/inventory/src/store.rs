//! The inventory store: structure lock over the registry, per-entry locks
//! beneath it.
//!
//! Lock tiers, always taken top-down:
//!
//! 1. The structure lock guards which identities exist. Item-level work
//!    (restock, purchase, flags, listings) holds it in read mode; adding or
//!    removing entries holds it in write mode, which excludes everything else.
//! 2. Per-entry locks guard an entry's counters and flag. They are only
//!    reachable through a held structure guard, and multi-entry operations
//!    take them in registry order (see [`crate::key_locks`]).
//!
//! Structural operations validate and commit under one write guard, so two
//! racing adds of the same identity cannot both succeed.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rand::Rng;

use stockroom_core::{Isbn, StoreError, StoreResult, validation};

use crate::item::{CopyDelta, Entry, FeaturedFlag, Item, NewEntry, Rating, StockItem};
use crate::key_locks::{self, KeyLocks};

/// Thread-safe in-memory inventory.
#[derive(Debug, Default)]
pub struct Inventory {
    catalog: RwLock<KeyLocks>,
}

/// Per-identity totals of a request, in first-seen order.
#[derive(Debug, Default)]
struct Tally {
    totals: Vec<(Isbn, u64)>,
    index: HashMap<Isbn, usize>,
}

impl Tally {
    fn add(&mut self, isbn: Isbn, n: u64) {
        match self.index.get(&isbn) {
            Some(&at) => self.totals[at].1 = self.totals[at].1.saturating_add(n),
            None => {
                self.index.insert(isbn, self.totals.len());
                self.totals.push((isbn, n));
            }
        }
    }

    fn get(&self, isbn: Isbn) -> u64 {
        self.index.get(&isbn).map_or(0, |&at| self.totals[at].1)
    }

    fn targets(&self) -> HashSet<Isbn> {
        self.index.keys().copied().collect()
    }
}

/// Run an operation and log why it failed. Validation failures are routine
/// and go to debug; `StockUnavailable` is logged where it is detected.
fn traced<T>(op: &'static str, run: impl FnOnce() -> StoreResult<T>) -> StoreResult<T> {
    run().inspect_err(|e| match e {
        StoreError::StockUnavailable(_) => {}
        e if e.is_validation() => tracing::debug!(op, error = %e, "operation rejected"),
        e => tracing::warn!(op, error = %e, "operation failed"),
    })
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn read_catalog(&self) -> StoreResult<RwLockReadGuard<'_, KeyLocks>> {
        key_locks::read(&self.catalog)
    }

    fn write_catalog(&self) -> StoreResult<RwLockWriteGuard<'_, KeyLocks>> {
        key_locks::write(&self.catalog)
    }

    /// Validate a raw identity and check that it is stocked.
    fn resolve(catalog: &KeyLocks, raw: i64) -> StoreResult<Isbn> {
        let isbn = Isbn::parse(raw)?;
        if !catalog.contains(isbn) {
            return Err(StoreError::not_found(isbn));
        }
        Ok(isbn)
    }

    fn stage(req: &NewEntry) -> StoreResult<Entry> {
        let isbn = Isbn::parse(req.isbn)?;
        validation::non_empty("title", &req.title)?;
        validation::non_empty("author", &req.author)?;
        let copies = validation::copies(req.copies)?;
        let price = validation::price(req.price_cents)?;
        Ok(Entry::new(
            isbn,
            req.title.as_str(),
            req.author.as_str(),
            price,
            copies,
            req.featured,
        ))
    }

    /// Number of live entries.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read_catalog()?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read_catalog()?.is_empty())
    }

    /// Stock new entries. All-or-nothing: any invalid field or duplicated
    /// identity (already stocked, or repeated within the batch) rejects the
    /// whole batch.
    pub fn add_entries(&self, entries: &[NewEntry]) -> StoreResult<()> {
        traced("add_entries", || {
            let staged = entries
                .iter()
                .map(Self::stage)
                .collect::<StoreResult<Vec<_>>>()?;

            let mut catalog = self.write_catalog()?;
            let mut batch = HashSet::with_capacity(staged.len());
            for entry in &staged {
                let isbn = entry.isbn();
                if catalog.contains(isbn) || !batch.insert(isbn) {
                    return Err(StoreError::duplicate(isbn));
                }
            }

            let added = staged.len();
            for entry in staged {
                catalog.append(entry)?;
            }
            tracing::debug!(added, total = catalog.len(), "entries added");
            Ok(())
        })
    }

    /// Restock existing entries. Every delta is validated before any entry
    /// is touched.
    pub fn add_copies(&self, deltas: &[CopyDelta]) -> StoreResult<()> {
        traced("add_copies", || {
            let catalog = self.read_catalog()?;

            let mut tally = Tally::default();
            for delta in deltas {
                let isbn = Self::resolve(&catalog, delta.isbn)?;
                let n = validation::copies(delta.copies)?;
                tally.add(isbn, n);
            }

            let mut guards = catalog.write_many(&tally.targets())?;
            for entry in guards.iter_mut() {
                let n = tally.get(entry.isbn());
                entry.add_copies(n);
            }
            Ok(())
        })
    }

    /// Sell copies, all-or-nothing.
    ///
    /// Every entry short of stock gets a sale miss recorded, and the whole
    /// purchase then fails with `StockUnavailable`, deducting nothing. The
    /// recorded misses stay.
    pub fn buy_entries(&self, purchases: &[CopyDelta]) -> StoreResult<()> {
        traced("buy_entries", || {
            let catalog = self.read_catalog()?;

            let mut tally = Tally::default();
            for purchase in purchases {
                let n = validation::copies(purchase.copies)?;
                let isbn = Self::resolve(&catalog, purchase.isbn)?;
                tally.add(isbn, n);
            }

            // Check phase: one entry lock at a time, so no ordering applies.
            let mut missed = Vec::new();
            for &(isbn, n) in &tally.totals {
                let mut entry = catalog.write_one(isbn)?;
                if !entry.has_copies(n) {
                    entry.record_sale_miss();
                    missed.push(isbn);
                }
            }
            if !missed.is_empty() {
                tracing::info!(?missed, "purchase aborted, stock unavailable");
                return Err(StoreError::StockUnavailable(missed));
            }

            // Commit phase: all targets, in registry order. Stock may have moved
            // since the check, so verify again before deducting anything.
            let mut guards = catalog.write_many(&tally.targets())?;
            for entry in guards.iter_mut() {
                let n = tally.get(entry.isbn());
                if !entry.has_copies(n) {
                    entry.record_sale_miss();
                    missed.push(entry.isbn());
                }
            }
            if !missed.is_empty() {
                tracing::warn!(?missed, "purchase aborted, stock drained by a concurrent sale");
                return Err(StoreError::StockUnavailable(missed));
            }
            for entry in guards.iter_mut() {
                let n = tally.get(entry.isbn());
                entry.buy_copies(n)?;
            }
            Ok(())
        })
    }

    /// Set or clear featured flags. A repeated identity takes its last flag.
    pub fn set_featured(&self, flags: &[FeaturedFlag]) -> StoreResult<()> {
        traced("set_featured", || {
            let catalog = self.read_catalog()?;

            let mut wanted = HashMap::with_capacity(flags.len());
            for flag in flags {
                let isbn = Self::resolve(&catalog, flag.isbn)?;
                wanted.insert(isbn, flag.featured);
            }

            let targets: HashSet<Isbn> = wanted.keys().copied().collect();
            let mut guards = catalog.write_many(&targets)?;
            for entry in guards.iter_mut() {
                if let Some(&featured) = wanted.get(&entry.isbn()) {
                    entry.set_featured(featured);
                }
            }
            Ok(())
        })
    }

    /// Remove entries and retire their lock slots. Fails without change if
    /// any identity is invalid or not stocked.
    pub fn remove_entries(&self, isbns: &[i64]) -> StoreResult<()> {
        traced("remove_entries", || {
            let mut catalog = self.write_catalog()?;

            let mut targets = HashSet::with_capacity(isbns.len());
            for &raw in isbns {
                targets.insert(Self::resolve(&catalog, raw)?);
            }

            let removed = catalog.remove(&targets);
            tracing::debug!(removed, total = catalog.len(), "entries removed");
            Ok(())
        })
    }

    pub fn remove_all(&self) -> StoreResult<()> {
        let mut catalog = self.write_catalog()?;
        let removed = catalog.len();
        catalog.clear();
        tracing::debug!(removed, "inventory cleared");
        Ok(())
    }

    /// Point-in-time snapshot of every entry, in registry order.
    pub fn list_all(&self) -> StoreResult<Vec<StockItem>> {
        let catalog = self.read_catalog()?;
        let guards = catalog.read_all()?;
        Ok(guards.iter().map(|entry| entry.stock_item()).collect())
    }

    fn read_subset<T>(&self, isbns: &[i64], view: impl Fn(&Entry) -> T) -> StoreResult<Vec<T>> {
        let catalog = self.read_catalog()?;

        let mut targets = HashSet::with_capacity(isbns.len());
        for &raw in isbns {
            targets.insert(Self::resolve(&catalog, raw)?);
        }

        let guards = catalog.read_many(&targets)?;
        Ok(guards.iter().map(|entry| view(&**entry)).collect())
    }

    /// Full snapshots of the requested entries.
    pub fn list_by_isbn(&self, isbns: &[i64]) -> StoreResult<Vec<StockItem>> {
        traced("list_by_isbn", || self.read_subset(isbns, Entry::stock_item))
    }

    /// Public snapshots of the requested entries.
    pub fn list_items(&self, isbns: &[i64]) -> StoreResult<Vec<Item>> {
        traced("list_items", || self.read_subset(isbns, Entry::item))
    }

    /// Up to `count` distinct featured entries, chosen uniformly at random.
    pub fn list_featured(&self, count: i64) -> StoreResult<Vec<Item>> {
        self.list_featured_with_rng(count, &mut rand::rng())
    }

    pub fn list_featured_with_rng<R: Rng>(&self, count: i64, rng: &mut R) -> StoreResult<Vec<Item>> {
        traced("list_featured", || {
            let count = usize::try_from(validation::copies(count)?).unwrap_or(usize::MAX);

            let pool: Vec<Item> = {
                let catalog = self.read_catalog()?;
                let guards = catalog.read_all()?;
                let featured = guards
                    .iter()
                    .filter(|entry| entry.is_featured())
                    .map(|entry| entry.item())
                    .collect();
                featured
            };

            if pool.len() <= count {
                return Ok(pool);
            }

            // Rejection sampling of distinct indices.
            let mut picked = Vec::with_capacity(count);
            let mut seen = HashSet::with_capacity(count);
            while picked.len() < count {
                let at = rng.random_range(0..pool.len());
                if seen.insert(at) {
                    picked.push(at);
                }
            }

            let mut slots: Vec<Option<Item>> = pool.into_iter().map(Some).collect();
            Ok(picked
                .into_iter()
                .filter_map(|at| slots[at].take())
                .collect())
        })
    }

    pub fn top_rated(&self, _count: i64) -> StoreResult<Vec<Item>> {
        Err(StoreError::not_implemented("top_rated"))
    }

    pub fn in_demand(&self) -> StoreResult<Vec<StockItem>> {
        Err(StoreError::not_implemented("in_demand"))
    }

    pub fn rate_entries(&self, _ratings: &[Rating]) -> StoreResult<()> {
        Err(StoreError::not_implemented("rate_entries"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const ISBN1: i64 = 30345653;
    const ISBN2: i64 = 30345651;
    const ISBN3: i64 = 30345654;
    const ISBN4: i64 = 30345655;

    fn stocked() -> Inventory {
        let inventory = Inventory::new();
        inventory
            .add_entries(&[
                NewEntry::new(ISBN1, "Harry Potter and JUnit", "JK Unit", 1000, 5),
                NewEntry::new(ISBN2, "Does and donts of teamwork", "Kasper", 1000, 2),
                NewEntry::new(ISBN3, "Java adventures", "Eventyrsgruppen", 1000, 7),
            ])
            .unwrap();
        inventory
    }

    fn stock_of(inventory: &Inventory, isbn: i64) -> StockItem {
        inventory.list_by_isbn(&[isbn]).unwrap().remove(0)
    }

    #[test]
    fn add_entries_then_list_all() {
        let inventory = stocked();
        let all = inventory.list_all().unwrap();
        let isbns: Vec<i64> = all.iter().map(|s| s.isbn.get()).collect();
        assert_eq!(isbns, vec![ISBN1, ISBN2, ISBN3]);
        assert_eq!(all[0].copies_in_store, 5);
        assert_eq!(all[0].total_copies, 5);
        assert_eq!(all[0].sale_misses, 0);
    }

    #[test]
    fn add_entries_rejects_duplicates_without_change() {
        let inventory = stocked();
        let err = inventory
            .add_entries(&[
                NewEntry::new(ISBN4, "New", "Author", 100, 1),
                NewEntry::new(ISBN1, "Again", "Author", 100, 1),
            ])
            .unwrap_err();
        assert_eq!(err, StoreError::DuplicateIdentity(Isbn::parse(ISBN1).unwrap()));
        assert_eq!(inventory.len().unwrap(), 3);
    }

    #[test]
    fn add_entries_rejects_repeats_within_a_batch() {
        let inventory = Inventory::new();
        let err = inventory
            .add_entries(&[
                NewEntry::new(ISBN4, "One", "Author", 100, 1),
                NewEntry::new(ISBN4, "Two", "Author", 100, 1),
            ])
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateIdentity(_)));
        assert!(inventory.is_empty().unwrap());
    }

    #[test]
    fn add_entries_reports_the_violated_constraint() {
        let inventory = Inventory::new();
        assert_eq!(
            inventory.add_entries(&[NewEntry::new(-1, "t", "a", 1, 1)]),
            Err(StoreError::InvalidIdentity(-1))
        );
        assert_eq!(
            inventory.add_entries(&[NewEntry::new(ISBN1, "t", "a", -5, 1)]),
            Err(StoreError::InvalidPrice(-5))
        );
        assert_eq!(
            inventory.add_entries(&[NewEntry::new(ISBN1, "t", "a", 5, -1)]),
            Err(StoreError::InvalidQuantity(-1))
        );
        assert!(matches!(
            inventory.add_entries(&[NewEntry::new(ISBN1, " ", "a", 5, 1)]),
            Err(StoreError::InvalidEntry(_))
        ));
        assert!(inventory.is_empty().unwrap());
    }

    #[test]
    fn add_copies_validates_everything_first() {
        let inventory = stocked();
        let err = inventory
            .add_copies(&[CopyDelta::new(ISBN1, 3), CopyDelta::new(ISBN4, 1)])
            .unwrap_err();
        assert_eq!(err, StoreError::IdentityNotFound(Isbn::parse(ISBN4).unwrap()));
        assert_eq!(stock_of(&inventory, ISBN1).copies_in_store, 5);

        let err = inventory
            .add_copies(&[CopyDelta::new(ISBN1, 3), CopyDelta::new(ISBN2, -1)])
            .unwrap_err();
        assert_eq!(err, StoreError::InvalidQuantity(-1));
        assert_eq!(stock_of(&inventory, ISBN1).copies_in_store, 5);
    }

    #[test]
    fn add_copies_sums_repeated_identities() {
        let inventory = stocked();
        inventory
            .add_copies(&[CopyDelta::new(ISBN1, 3), CopyDelta::new(ISBN1, 2)])
            .unwrap();
        let item = stock_of(&inventory, ISBN1);
        assert_eq!(item.copies_in_store, 10);
        assert_eq!(item.total_copies, 10);
    }

    #[test]
    fn buy_entries_deducts_stock() {
        let inventory = stocked();
        inventory
            .buy_entries(&[CopyDelta::new(ISBN1, 2), CopyDelta::new(ISBN3, 7)])
            .unwrap();
        assert_eq!(stock_of(&inventory, ISBN1).copies_in_store, 3);
        assert_eq!(stock_of(&inventory, ISBN3).copies_in_store, 0);
        assert_eq!(stock_of(&inventory, ISBN3).total_copies, 7);
    }

    #[test]
    fn failed_purchase_records_misses_and_deducts_nothing() {
        let inventory = stocked();
        let err = inventory
            .buy_entries(&[CopyDelta::new(ISBN1, 1), CopyDelta::new(ISBN2, 5)])
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::StockUnavailable(vec![Isbn::parse(ISBN2).unwrap()])
        );

        let sufficient = stock_of(&inventory, ISBN1);
        assert_eq!(sufficient.copies_in_store, 5);
        assert_eq!(sufficient.sale_misses, 0);

        let short = stock_of(&inventory, ISBN2);
        assert_eq!(short.copies_in_store, 2);
        assert_eq!(short.sale_misses, 1);
    }

    #[test]
    fn every_short_entry_gets_a_miss() {
        let inventory = stocked();
        let err = inventory
            .buy_entries(&[
                CopyDelta::new(ISBN1, 50),
                CopyDelta::new(ISBN2, 50),
                CopyDelta::new(ISBN3, 1),
            ])
            .unwrap_err();
        assert!(matches!(err, StoreError::StockUnavailable(ref m) if m.len() == 2));
        assert_eq!(stock_of(&inventory, ISBN1).sale_misses, 1);
        assert_eq!(stock_of(&inventory, ISBN2).sale_misses, 1);
        assert_eq!(stock_of(&inventory, ISBN3).sale_misses, 0);
    }

    #[test]
    fn repeated_purchase_lines_count_together() {
        let inventory = stocked();
        let err = inventory
            .buy_entries(&[CopyDelta::new(ISBN2, 2), CopyDelta::new(ISBN2, 1)])
            .unwrap_err();
        assert!(matches!(err, StoreError::StockUnavailable(_)));
        assert_eq!(stock_of(&inventory, ISBN2).copies_in_store, 2);
    }

    #[test]
    fn buy_entries_validation_failures_leave_no_trace() {
        let inventory = stocked();
        assert_eq!(
            inventory.buy_entries(&[CopyDelta::new(ISBN2, 50), CopyDelta::new(ISBN1, -1)]),
            Err(StoreError::InvalidQuantity(-1))
        );
        assert_eq!(
            inventory.buy_entries(&[CopyDelta::new(0, 1)]),
            Err(StoreError::InvalidIdentity(0))
        );
        assert_eq!(stock_of(&inventory, ISBN2).sale_misses, 0);
    }

    #[test]
    fn set_featured_flags_entries() {
        let inventory = stocked();
        inventory
            .set_featured(&[FeaturedFlag::new(ISBN1, true), FeaturedFlag::new(ISBN3, true)])
            .unwrap();
        let flags: Vec<bool> = inventory.list_all().unwrap().iter().map(|s| s.featured).collect();
        assert_eq!(flags, vec![true, false, true]);

        assert!(matches!(
            inventory.set_featured(&[FeaturedFlag::new(ISBN2, true), FeaturedFlag::new(ISBN4, true)]),
            Err(StoreError::IdentityNotFound(_))
        ));
        assert!(!stock_of(&inventory, ISBN2).featured);
    }

    #[test]
    fn remove_entries_is_all_or_nothing() {
        let inventory = stocked();
        assert!(matches!(
            inventory.remove_entries(&[ISBN1, ISBN4]),
            Err(StoreError::IdentityNotFound(_))
        ));
        assert_eq!(inventory.len().unwrap(), 3);

        inventory.remove_entries(&[ISBN1, ISBN3]).unwrap();
        let left: Vec<i64> = inventory.list_all().unwrap().iter().map(|s| s.isbn.get()).collect();
        assert_eq!(left, vec![ISBN2]);

        // The identity is free again once removed.
        inventory
            .add_entries(&[NewEntry::new(ISBN1, "Back", "Again", 1, 1)])
            .unwrap();
        assert_eq!(inventory.len().unwrap(), 2);
    }

    #[test]
    fn remove_all_clears_the_store() {
        let inventory = stocked();
        inventory.remove_all().unwrap();
        assert!(inventory.list_all().unwrap().is_empty());
        inventory
            .add_entries(&[NewEntry::new(ISBN2, "Fresh", "Start", 1, 1)])
            .unwrap();
        assert_eq!(inventory.len().unwrap(), 1);
    }

    #[test]
    fn list_by_isbn_rejects_unknown_and_invalid_identities() {
        let inventory = stocked();
        assert_eq!(
            inventory.list_by_isbn(&[ISBN1, -7]),
            Err(StoreError::InvalidIdentity(-7))
        );
        assert!(matches!(
            inventory.list_by_isbn(&[ISBN4]),
            Err(StoreError::IdentityNotFound(_))
        ));
        assert_eq!(inventory.list_by_isbn(&[ISBN1, ISBN1]).unwrap().len(), 1);
    }

    #[test]
    fn list_items_returns_public_view() {
        let inventory = stocked();
        let items = inventory.list_items(&[ISBN2]).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Does and donts of teamwork");
        assert_eq!(items[0].price_cents, 1000);
    }

    #[test]
    fn list_featured_returns_whole_pool_when_count_covers_it() {
        let inventory = stocked();
        inventory
            .set_featured(&[FeaturedFlag::new(ISBN1, true), FeaturedFlag::new(ISBN2, true)])
            .unwrap();
        let picks = inventory.list_featured(5).unwrap();
        assert_eq!(picks.len(), 2);
        assert!(picks.iter().all(|i| i.featured));
        assert!(inventory.list_featured(0).unwrap().is_empty());
        assert_eq!(inventory.list_featured(-1), Err(StoreError::InvalidQuantity(-1)));
    }

    #[test]
    fn poisoned_structure_lock_is_reported() {
        let inventory = stocked();
        std::thread::scope(|s| {
            let holder = s.spawn(|| {
                let _catalog = inventory.write_catalog().unwrap();
                panic!("writer died holding the structure lock");
            });
            assert!(holder.join().is_err());
        });

        assert_eq!(inventory.list_all(), Err(StoreError::LockPoisoned));
        assert_eq!(inventory.remove_all(), Err(StoreError::LockPoisoned));
        assert_eq!(
            inventory.add_copies(&[CopyDelta::new(ISBN1, 1)]),
            Err(StoreError::LockPoisoned)
        );
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn direct_calls_log_their_rejections() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();

        let inventory = stocked();
        tracing::subscriber::with_default(subscriber, || {
            assert_eq!(
                inventory.add_entries(&[NewEntry::new(ISBN4, "Priced badly", "Someone", -5, 1)]),
                Err(StoreError::InvalidPrice(-5))
            );
            assert_eq!(
                inventory.buy_entries(&[CopyDelta::new(ISBN4, 1)]),
                Err(StoreError::not_found(Isbn::parse(ISBN4).unwrap()))
            );
        });

        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("DEBUG"), "{output}");
        assert!(output.contains("add_entries"), "{output}");
        assert!(output.contains("invalid price: -5"), "{output}");
        assert!(output.contains("buy_entries"), "{output}");
        assert!(output.contains("operation rejected"), "{output}");
    }

    #[test]
    fn reporting_operations_are_not_implemented() {
        let inventory = stocked();
        assert_eq!(
            inventory.top_rated(3),
            Err(StoreError::NotImplemented("top_rated"))
        );
        assert_eq!(
            inventory.in_demand(),
            Err(StoreError::NotImplemented("in_demand"))
        );
        assert_eq!(
            inventory.rate_entries(&[Rating { isbn: ISBN1, rating: 5 }]),
            Err(StoreError::NotImplemented("rate_entries"))
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        /// Property: the featured sample has exactly min(count, pool) distinct
        /// members, all drawn from the featured pool.
        #[test]
        fn featured_sample_is_distinct_and_bounded(
            flags in prop::collection::vec(any::<bool>(), 0..24),
            count in 0i64..30,
            seed in any::<u64>(),
        ) {
            let inventory = Inventory::new();
            let entries: Vec<NewEntry> = flags
                .iter()
                .enumerate()
                .map(|(i, &f)| NewEntry::new(1000 + i as i64, "title", "author", 1, 1).featured(f))
                .collect();
            inventory.add_entries(&entries).unwrap();

            let pool = flags.iter().filter(|f| **f).count();
            let mut rng = StdRng::seed_from_u64(seed);
            let picks = inventory.list_featured_with_rng(count, &mut rng).unwrap();

            prop_assert_eq!(picks.len(), pool.min(count as usize));
            let distinct: HashSet<Isbn> = picks.iter().map(|i| i.isbn).collect();
            prop_assert_eq!(distinct.len(), picks.len());
            prop_assert!(picks.iter().all(|i| i.featured));
        }
    }
}
