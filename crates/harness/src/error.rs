use std::time::Duration;

/// Harness failure (as opposed to a store failure observed by a client).
#[derive(Debug, Clone, thiserror::Error)]
pub enum HarnessError {
    #[error("client {0} panicked")]
    ClientPanicked(&'static str),
    #[error("client {name} did not finish within {after:?}")]
    Timeout { name: &'static str, after: Duration },
    #[error("setup failed: {0}")]
    Setup(#[from] stockroom_core::StoreError),
}
