//! Per-address request serialization.
//!
//! Two concurrent requests on one OSC address would make FIFO correlation
//! ambiguous the moment a reply is late: the first caller's reply would
//! resolve the second caller's waiter. Serializing per address is the
//! simplest policy that keeps correlation correct; requests on different
//! addresses still run concurrently.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Lazily-populated table of one async mutex per OSC address.
#[derive(Default)]
pub struct AddressLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl AddressLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the lock for `addr`, waiting behind any in-flight request on
    /// the same address. The guard is released on drop, including when the
    /// holding tool call is cancelled.
    pub async fn acquire(&self, addr: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().expect("address lock table poisoned");
            Arc::clone(locks.entry(addr.to_string()).or_default())
        };
        lock.lock_owned().await
    }
}
