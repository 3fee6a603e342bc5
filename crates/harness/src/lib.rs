//! Concurrent client harness for the inventory store.
//!
//! Test-only driver: thread-backed clients that hammer a shared store, and
//! the stress scenarios built from them.

pub mod client;
pub mod config;
pub mod error;
pub mod scenario;

pub use client::{Client, ClientHandle, ClientReport, Workload};
pub use config::StressConfig;
pub use error::HarnessError;
pub use scenario::ScenarioOutcome;
