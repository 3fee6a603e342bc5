use serde::{Deserialize, Serialize};

use stockroom_core::{Isbn, StoreError, StoreResult};

/// One inventory record.
///
/// Pure data plus mutators. An `Entry` never locks anything itself: the store
/// keeps each one behind its own per-entry lock and only calls the mutators
/// while holding that lock in write mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    isbn: Isbn,
    title: String,
    author: String,
    price_cents: u64,
    total_copies: u64,
    copies_in_store: u64,
    sale_misses: u64,
    featured: bool,
}

impl Entry {
    /// A freshly stocked entry; `copies` count towards both the lifetime
    /// total and the sellable stock.
    pub fn new(
        isbn: Isbn,
        title: impl Into<String>,
        author: impl Into<String>,
        price_cents: u64,
        copies: u64,
        featured: bool,
    ) -> Self {
        Self {
            isbn,
            title: title.into(),
            author: author.into(),
            price_cents,
            total_copies: copies,
            copies_in_store: copies,
            sale_misses: 0,
            featured,
        }
    }

    pub fn isbn(&self) -> Isbn {
        self.isbn
    }

    pub fn copies_in_store(&self) -> u64 {
        self.copies_in_store
    }

    pub fn total_copies(&self) -> u64 {
        self.total_copies
    }

    pub fn sale_misses(&self) -> u64 {
        self.sale_misses
    }

    pub fn is_featured(&self) -> bool {
        self.featured
    }

    pub fn has_copies(&self, n: u64) -> bool {
        self.copies_in_store >= n
    }

    pub fn add_copies(&mut self, n: u64) {
        self.total_copies = self.total_copies.saturating_add(n);
        self.copies_in_store = self.copies_in_store.saturating_add(n);
    }

    /// Deduct sold copies. The caller checks availability first; asking for
    /// more than is in store leaves the entry untouched and reports the
    /// contract violation.
    pub fn buy_copies(&mut self, n: u64) -> StoreResult<()> {
        if !self.has_copies(n) {
            return Err(StoreError::invariant(format!(
                "isbn {} has {} copies in store, cannot sell {n}",
                self.isbn, self.copies_in_store
            )));
        }
        self.copies_in_store -= n;
        Ok(())
    }

    pub fn record_sale_miss(&mut self) {
        self.sale_misses += 1;
    }

    pub fn set_featured(&mut self, featured: bool) {
        self.featured = featured;
    }

    /// Full snapshot for the stock-manager role.
    pub fn stock_item(&self) -> StockItem {
        StockItem {
            isbn: self.isbn,
            title: self.title.clone(),
            author: self.author.clone(),
            price_cents: self.price_cents,
            total_copies: self.total_copies,
            copies_in_store: self.copies_in_store,
            sale_misses: self.sale_misses,
            featured: self.featured,
        }
    }

    /// Public snapshot for the store-front role (no stock counters).
    pub fn item(&self) -> Item {
        Item {
            isbn: self.isbn,
            title: self.title.clone(),
            author: self.author.clone(),
            price_cents: self.price_cents,
            featured: self.featured,
        }
    }
}

/// Immutable copy of an entry's full state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    pub isbn: Isbn,
    pub title: String,
    pub author: String,
    pub price_cents: u64,
    pub total_copies: u64,
    pub copies_in_store: u64,
    pub sale_misses: u64,
    pub featured: bool,
}

/// Immutable copy of an entry's public fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub isbn: Isbn,
    pub title: String,
    pub author: String,
    pub price_cents: u64,
    pub featured: bool,
}

/// Request: stock a new entry.
///
/// Fields are raw so malformed requests can be reported precisely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub isbn: i64,
    pub title: String,
    pub author: String,
    pub price_cents: i64,
    pub copies: i64,
    #[serde(default)]
    pub featured: bool,
}

impl NewEntry {
    pub fn new(
        isbn: i64,
        title: impl Into<String>,
        author: impl Into<String>,
        price_cents: i64,
        copies: i64,
    ) -> Self {
        Self {
            isbn,
            title: title.into(),
            author: author.into(),
            price_cents,
            copies,
            featured: false,
        }
    }

    pub fn featured(mut self, featured: bool) -> Self {
        self.featured = featured;
        self
    }
}

/// Request: a copy count against one identity (restock or purchase).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CopyDelta {
    pub isbn: i64,
    pub copies: i64,
}

impl CopyDelta {
    pub fn new(isbn: i64, copies: i64) -> Self {
        Self { isbn, copies }
    }
}

/// Request: set or clear the featured flag of one identity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeaturedFlag {
    pub isbn: i64,
    pub featured: bool,
}

impl FeaturedFlag {
    pub fn new(isbn: i64, featured: bool) -> Self {
        Self { isbn, featured }
    }
}

/// Request: a customer rating. Accepted by the command surface but the
/// rating operations are not implemented.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub isbn: i64,
    pub rating: i64,
}
