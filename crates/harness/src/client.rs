//! Simulated concurrent callers.
//!
//! A client repeats one workload against a shared store a fixed number of
//! times, either on its own thread ([`Client::spawn`]) or on the calling
//! thread ([`Client::run`]). It stops at the first store error, or when its
//! stop flag is raised, and reports how far it got.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use stockroom_core::{StoreError, StoreResult};
use stockroom_inventory::{CopyDelta, Inventory, NewEntry};

use crate::error::HarnessError;

#[derive(Debug, Clone)]
pub enum Workload {
    /// Purchase the basket.
    Buy(Vec<CopyDelta>),
    /// Restock the basket.
    Restock(Vec<CopyDelta>),
    /// Purchase the basket, then restock the same quantities.
    BuyThenRestock(Vec<CopyDelta>),
    /// Remove the identities, then add the entries back.
    RemoveThenAdd {
        isbns: Vec<i64>,
        entries: Vec<NewEntry>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientReport {
    pub name: &'static str,
    pub completed: usize,
    pub error: Option<StoreError>,
}

impl ClientReport {
    pub fn is_clean(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    name: &'static str,
    store: Arc<Inventory>,
    workload: Workload,
    iterations: usize,
    stop: Arc<AtomicBool>,
}

impl Client {
    pub fn new(name: &'static str, store: Arc<Inventory>, workload: Workload, iterations: usize) -> Self {
        Self {
            name,
            store,
            workload,
            iterations,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn buyer(store: Arc<Inventory>, basket: Vec<CopyDelta>, iterations: usize) -> Self {
        Self::new("buyer", store, Workload::Buy(basket), iterations)
    }

    pub fn stocker(store: Arc<Inventory>, basket: Vec<CopyDelta>, iterations: usize) -> Self {
        Self::new("stocker", store, Workload::Restock(basket), iterations)
    }

    pub fn action_maker(store: Arc<Inventory>, basket: Vec<CopyDelta>, iterations: usize) -> Self {
        Self::new("action_maker", store, Workload::BuyThenRestock(basket), iterations)
    }

    pub fn add_deleter(
        store: Arc<Inventory>,
        isbns: Vec<i64>,
        entries: Vec<NewEntry>,
        iterations: usize,
    ) -> Self {
        Self::new(
            "add_deleter",
            store,
            Workload::RemoveThenAdd { isbns, entries },
            iterations,
        )
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Ask the loop to end before its next iteration.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    fn step(&self) -> StoreResult<()> {
        match &self.workload {
            Workload::Buy(basket) => self.store.buy_entries(basket),
            Workload::Restock(basket) => self.store.add_copies(basket),
            Workload::BuyThenRestock(basket) => {
                self.store.buy_entries(basket)?;
                self.store.add_copies(basket)
            }
            Workload::RemoveThenAdd { isbns, entries } => {
                self.store.remove_entries(isbns)?;
                self.store.add_entries(entries)
            }
        }
    }

    /// Run the whole loop on the calling thread.
    pub fn run(&self) -> ClientReport {
        let mut completed = 0;
        let mut error = None;
        while completed < self.iterations {
            if self.stop.load(Ordering::Relaxed) {
                tracing::debug!(client = self.name, completed, "client stopped on request");
                break;
            }
            if let Err(e) = self.step() {
                tracing::warn!(client = self.name, completed, error = %e, "client stopped");
                error = Some(e);
                break;
            }
            completed += 1;
        }
        tracing::debug!(client = self.name, completed, "client finished");
        ClientReport {
            name: self.name,
            completed,
            error,
        }
    }

    /// Run the loop on a new thread.
    pub fn spawn(self) -> ClientHandle {
        let name = self.name;
        let stop = Arc::clone(&self.stop);
        let join = thread::spawn(move || self.run());
        ClientHandle { name, stop, join }
    }
}

#[derive(Debug)]
pub struct ClientHandle {
    name: &'static str,
    stop: Arc<AtomicBool>,
    join: JoinHandle<ClientReport>,
}

impl ClientHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn join(self) -> Result<ClientReport, HarnessError> {
        self.join
            .join()
            .map_err(|_| HarnessError::ClientPanicked(self.name))
    }

    /// Wait at most `timeout` for the client to finish. A client still
    /// running at the deadline is told to stop and reported as stuck.
    /// One blocked on a lock never sees the flag, so it gets a second wait
    /// of the same length and is abandoned after that.
    pub fn join_within(self, timeout: Duration) -> Result<ClientReport, HarnessError> {
        if !self.wait_until(Instant::now() + timeout) {
            self.stop.store(true, Ordering::Relaxed);
            if self.wait_until(Instant::now() + timeout) {
                let _ = self.join.join();
            }
            return Err(HarnessError::Timeout {
                name: self.name,
                after: timeout,
            });
        }
        self.join()
    }

    fn wait_until(&self, deadline: Instant) -> bool {
        while !self.join.is_finished() {
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(5));
        }
        true
    }
}
