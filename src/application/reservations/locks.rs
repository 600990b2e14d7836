//! Per-cottage async locks
//!
//! Creating a reservation reads the cottage's calendar and then inserts.
//! Holding the cottage's lock across both keeps concurrent requests for the
//! same cottage from interleaving inside this process.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub struct CottageLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl CottageLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `cottage_id`; released on drop.
    pub async fn acquire(&self, cottage_id: &str) -> OwnedMutexGuard<()> {
        // Clone the Arc out so the shard guard is gone before awaiting.
        let lock = self
            .locks
            .entry(cottage_id.to_string())
            .or_default()
            .value()
            .clone();
        lock.lock_owned().await
    }
}
