//! Caller-facing command surface.
//!
//! Commands arrive as data (typically deserialized); collection arguments are
//! optional so an absent collection can be reported as `NullInput` instead of
//! failing to parse.

use serde::{Deserialize, Serialize};

use stockroom_core::{StoreError, StoreResult};

use crate::item::{CopyDelta, FeaturedFlag, Item, NewEntry, Rating, StockItem};
use crate::store::Inventory;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum InventoryCommand {
    AddEntries { entries: Option<Vec<NewEntry>> },
    AddCopies { copies: Option<Vec<CopyDelta>> },
    BuyEntries { purchases: Option<Vec<CopyDelta>> },
    SetFeatured { flags: Option<Vec<FeaturedFlag>> },
    RemoveEntries { isbns: Option<Vec<i64>> },
    RemoveAll,
    ListAll,
    ListByIsbn { isbns: Option<Vec<i64>> },
    ListItems { isbns: Option<Vec<i64>> },
    ListFeatured { count: i64 },
    TopRated { count: i64 },
    InDemand,
    RateEntries { ratings: Option<Vec<Rating>> },
}

impl InventoryCommand {
    pub fn name(&self) -> &'static str {
        match self {
            InventoryCommand::AddEntries { .. } => "add_entries",
            InventoryCommand::AddCopies { .. } => "add_copies",
            InventoryCommand::BuyEntries { .. } => "buy_entries",
            InventoryCommand::SetFeatured { .. } => "set_featured",
            InventoryCommand::RemoveEntries { .. } => "remove_entries",
            InventoryCommand::RemoveAll => "remove_all",
            InventoryCommand::ListAll => "list_all",
            InventoryCommand::ListByIsbn { .. } => "list_by_isbn",
            InventoryCommand::ListItems { .. } => "list_items",
            InventoryCommand::ListFeatured { .. } => "list_featured",
            InventoryCommand::TopRated { .. } => "top_rated",
            InventoryCommand::InDemand => "in_demand",
            InventoryCommand::RateEntries { .. } => "rate_entries",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reply", content = "items", rename_all = "snake_case")]
pub enum InventoryReply {
    Done,
    Stock(Vec<StockItem>),
    Items(Vec<Item>),
}

/// Store operations log their own rejections; a missing collection never
/// reaches them, so it is logged here.
fn required<T>(op: &'static str, input: Option<T>) -> StoreResult<T> {
    input.ok_or_else(|| {
        tracing::debug!(op, error = %StoreError::NullInput, "command rejected");
        StoreError::NullInput
    })
}

impl Inventory {
    /// Dispatch a command to the matching store operation.
    pub fn handle(&self, command: InventoryCommand) -> StoreResult<InventoryReply> {
        let op = command.name();
        match command {
            InventoryCommand::AddEntries { entries } => self
                .add_entries(&required(op, entries)?)
                .map(|()| InventoryReply::Done),
            InventoryCommand::AddCopies { copies } => self
                .add_copies(&required(op, copies)?)
                .map(|()| InventoryReply::Done),
            InventoryCommand::BuyEntries { purchases } => self
                .buy_entries(&required(op, purchases)?)
                .map(|()| InventoryReply::Done),
            InventoryCommand::SetFeatured { flags } => self
                .set_featured(&required(op, flags)?)
                .map(|()| InventoryReply::Done),
            InventoryCommand::RemoveEntries { isbns } => self
                .remove_entries(&required(op, isbns)?)
                .map(|()| InventoryReply::Done),
            InventoryCommand::RemoveAll => self.remove_all().map(|()| InventoryReply::Done),
            InventoryCommand::ListAll => self.list_all().map(InventoryReply::Stock),
            InventoryCommand::ListByIsbn { isbns } => {
                self.list_by_isbn(&required(op, isbns)?).map(InventoryReply::Stock)
            }
            InventoryCommand::ListItems { isbns } => {
                self.list_items(&required(op, isbns)?).map(InventoryReply::Items)
            }
            InventoryCommand::ListFeatured { count } => {
                self.list_featured(count).map(InventoryReply::Items)
            }
            InventoryCommand::TopRated { count } => self.top_rated(count).map(InventoryReply::Items),
            InventoryCommand::InDemand => self.in_demand().map(InventoryReply::Stock),
            InventoryCommand::RateEntries { ratings } => self
                .rate_entries(&required(op, ratings)?)
                .map(|()| InventoryReply::Done),
        }
    }
}
