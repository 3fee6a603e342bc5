//! Stress scenarios exercising the store's locking protocol.
//!
//! Each scenario builds its own store, runs concurrent clients against it and
//! reports every anomaly it observed. A clean run has no anomalies.

use std::sync::Arc;

use stockroom_inventory::{CopyDelta, Inventory, NewEntry, StockItem};

use crate::client::{Client, ClientReport};
use crate::config::StressConfig;
use crate::error::HarnessError;

pub const ISBN1: i64 = 30345653;
pub const ISBN2: i64 = 30345651;
pub const ISBN3: i64 = 30345654;
pub const ISBN4: i64 = 30345655;

#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub name: &'static str,
    pub clients: Vec<ClientReport>,
    pub observations: usize,
    pub anomalies: Vec<String>,
    pub final_stock: Vec<StockItem>,
}

impl ScenarioOutcome {
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }

    fn collect_client_errors(&mut self) {
        for report in &self.clients {
            if let Some(e) = &report.error {
                self.anomalies.push(format!(
                    "{} stopped after {} iterations: {e}",
                    report.name, report.completed
                ));
            }
        }
    }
}

/// The four entries every scenario starts from.
pub fn default_entries(stock: i64) -> Vec<NewEntry> {
    vec![
        NewEntry::new(ISBN1, "Harry Potter and JUnit", "JK Unit", 1000, stock),
        NewEntry::new(ISBN2, "Does and donts of teamwork", "Kasper", 1000, stock),
        NewEntry::new(ISBN3, "Kasper og NB paa java eventyr", "Eventyrsgruppen", 1000, stock),
        NewEntry::new(ISBN4, "YOLO, livet paa gaden", "Mormor", 1000, stock),
    ]
}

pub fn default_isbns() -> Vec<i64> {
    vec![ISBN1, ISBN2, ISBN3, ISBN4]
}

fn stocked(config: &StressConfig) -> Result<Arc<Inventory>, HarnessError> {
    let store = Inventory::arc();
    store.add_entries(&default_entries(config.stock))?;
    Ok(store)
}

fn check_stock(outcome: &mut ScenarioOutcome, expected: i64) {
    for item in &outcome.final_stock {
        if item.copies_in_store as i64 != expected {
            outcome.anomalies.push(format!(
                "isbn {} ended with {} copies, expected {expected}",
                item.isbn, item.copies_in_store
            ));
        }
        if item.copies_in_store > item.total_copies {
            outcome.anomalies.push(format!(
                "isbn {} has {} in store but only {} ever added",
                item.isbn, item.copies_in_store, item.total_copies
            ));
        }
    }
}

/// A buyer and a stocker move the same quantities in opposite directions;
/// once both finish every entry is back at its starting stock.
pub fn buy_against_restock(config: &StressConfig) -> Result<ScenarioOutcome, HarnessError> {
    let store = stocked(config)?;
    let basket = vec![
        CopyDelta::new(ISBN1, 4),
        CopyDelta::new(ISBN2, 3),
        CopyDelta::new(ISBN3, 2),
        CopyDelta::new(ISBN4, 5),
    ];

    let stocker = Client::stocker(store.clone(), basket.clone(), config.iterations).spawn();
    let buyer = Client::buyer(store.clone(), basket, config.iterations).spawn();
    let clients = vec![
        stocker.join_within(config.timeout)?,
        buyer.join_within(config.timeout)?,
    ];

    let mut outcome = ScenarioOutcome {
        name: "buy_against_restock",
        clients,
        observations: 0,
        anomalies: Vec::new(),
        final_stock: store.list_all()?,
    };
    outcome.collect_client_errors();
    check_stock(&mut outcome, config.stock);
    Ok(outcome)
}

/// One client buys and restocks all four entries as a matched set while this
/// thread keeps snapshotting; every snapshot must show four equal stocks.
pub fn matched_set_snapshots(config: &StressConfig) -> Result<ScenarioOutcome, HarnessError> {
    let store = stocked(config)?;
    let basket: Vec<CopyDelta> = default_isbns().into_iter().map(|i| CopyDelta::new(i, 3)).collect();

    let maker = Client::action_maker(store.clone(), basket, config.iterations).spawn();

    let mut anomalies = Vec::new();
    for _ in 0..config.reads {
        let snapshot = store.list_all()?;
        let first = snapshot.first().map(|s| s.copies_in_store);
        if snapshot.iter().any(|s| Some(s.copies_in_store) != first) {
            let stocks: Vec<u64> = snapshot.iter().map(|s| s.copies_in_store).collect();
            anomalies.push(format!("torn snapshot: {stocks:?}"));
        }
    }

    let mut outcome = ScenarioOutcome {
        name: "matched_set_snapshots",
        clients: vec![maker.join_within(config.timeout)?],
        observations: config.reads,
        anomalies,
        final_stock: store.list_all()?,
    };
    outcome.collect_client_errors();
    check_stock(&mut outcome, config.stock);
    Ok(outcome)
}

/// One client repeatedly removes and re-adds all four entries while this
/// thread counts entries; every count must be 0 or 4.
pub fn remove_readd_snapshots(config: &StressConfig) -> Result<ScenarioOutcome, HarnessError> {
    let store = stocked(config)?;
    let entries = default_entries(config.stock);
    let full = entries.len();

    let deleter = Client::add_deleter(store.clone(), default_isbns(), entries, config.iterations).spawn();

    let mut anomalies = Vec::new();
    for _ in 0..config.reads {
        let seen = store.list_all()?.len();
        if seen != 0 && seen != full {
            anomalies.push(format!("snapshot saw {seen} entries"));
        }
    }

    let mut outcome = ScenarioOutcome {
        name: "remove_readd_snapshots",
        clients: vec![deleter.join_within(config.timeout)?],
        observations: config.reads,
        anomalies,
        final_stock: store.list_all()?,
    };
    outcome.collect_client_errors();
    if outcome.final_stock.len() != full {
        let ended = outcome.final_stock.len();
        outcome.anomalies.push(format!("ended with {ended} entries, expected {full}"));
    }
    Ok(outcome)
}

/// Three clients buy-then-restock {1,2}, {2,3} and {3,1}: a cyclic demand
/// that deadlocks unless entry locks follow one global order. The third
/// client runs on the calling thread.
pub fn cyclic_lock_demand(config: &StressConfig) -> Result<ScenarioOutcome, HarnessError> {
    let store = stocked(config)?;
    let pair = |a: i64, b: i64| vec![CopyDelta::new(a, 10), CopyDelta::new(b, 10)];

    let first = Client::action_maker(store.clone(), pair(ISBN1, ISBN2), config.cyclic_iterations).spawn();
    let second = Client::action_maker(store.clone(), pair(ISBN2, ISBN3), config.cyclic_iterations).spawn();
    let third = Client::action_maker(store.clone(), pair(ISBN3, ISBN1), config.cyclic_iterations).run();

    let clients = vec![
        first.join_within(config.timeout)?,
        second.join_within(config.timeout)?,
        third,
    ];

    let mut outcome = ScenarioOutcome {
        name: "cyclic_lock_demand",
        clients,
        observations: 0,
        anomalies: Vec::new(),
        final_stock: store.list_all()?,
    };
    outcome.collect_client_errors();
    check_stock(&mut outcome, config.stock);
    Ok(outcome)
}

/// Every scenario, in order.
pub fn all(config: &StressConfig) -> Result<Vec<ScenarioOutcome>, HarnessError> {
    Ok(vec![
        buy_against_restock(config)?,
        matched_set_snapshots(config)?,
        remove_readd_snapshots(config)?,
        cyclic_lock_demand(config)?,
    ])
}
