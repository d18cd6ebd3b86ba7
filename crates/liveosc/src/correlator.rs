//! Pairs inbound OSC messages to pending request waiters.
//!
//! The wire protocol has no correlation ids, so matching is by address
//! only, FIFO within each address. The gateway guarantees at most one
//! in-flight request per address, which makes FIFO sound; the queue exists
//! so a burst of sequential callers still resolves in enqueue order.
//!
//! Every waiter resolves exactly once: with the reply arguments, with
//! `Timeout`, or with `Cancelled`. A reply arriving when no waiter is
//! queued is dropped silently - late replies after a timeout are a normal
//! race, not an error.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::{debug, trace};

use crate::{OscArg, OscError};

type ReplyResult = Result<Vec<OscArg>, OscError>;

struct Waiter {
    id: u64,
    tx: oneshot::Sender<ReplyResult>,
}

#[derive(Default)]
struct State {
    pending: HashMap<String, VecDeque<Waiter>>,
    next_id: u64,
}

impl State {
    /// Remove a specific waiter from its queue. Returns false when the
    /// waiter is gone already (resolved by a reply or by cancel_all).
    fn remove(&mut self, addr: &str, id: u64) -> bool {
        let Some(queue) = self.pending.get_mut(addr) else {
            return false;
        };
        let before = queue.len();
        queue.retain(|w| w.id != id);
        let removed = queue.len() != before;
        if queue.is_empty() {
            self.pending.remove(addr);
        }
        removed
    }
}

/// Matches inbound OSC replies to outstanding requests.
#[derive(Clone, Default)]
pub struct Correlator {
    state: Arc<Mutex<State>>,
}

impl Correlator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register interest in the next inbound message at `addr`.
    ///
    /// Must be called before the request is sent, otherwise a fast reply
    /// can race past the registration.
    pub fn expect_response(&self, addr: &str) -> PendingReply {
        let (tx, rx) = oneshot::channel();
        let mut state = self.state.lock().expect("correlator lock poisoned");
        state.next_id += 1;
        let id = state.next_id;
        state
            .pending
            .entry(addr.to_string())
            .or_default()
            .push_back(Waiter { id, tx });
        trace!(addr, id, "waiter enqueued");

        PendingReply {
            addr: addr.to_string(),
            id,
            rx,
            state: Arc::clone(&self.state),
            settled: false,
        }
    }

    /// Resolve the head waiter for `addr`, if any. No waiter means the
    /// message is informational or late; it is dropped without comment.
    pub fn handle_response(&self, addr: &str, args: Vec<OscArg>) {
        let waiter = {
            let mut state = self.state.lock().expect("correlator lock poisoned");
            let waiter = state.pending.get_mut(addr).and_then(VecDeque::pop_front);
            if state.pending.get(addr).is_some_and(VecDeque::is_empty) {
                state.pending.remove(addr);
            }
            waiter
        };
        match waiter {
            Some(w) => {
                trace!(addr, id = w.id, "resolving waiter");
                // A failed send means the caller abandoned the request
                // between dequeue and delivery; the reply is dropped.
                let _ = w.tx.send(Ok(args));
            }
            None => trace!(addr, "no waiter, dropping message"),
        }
    }

    /// Fail every pending waiter. Used once, at shutdown.
    pub fn cancel_all(&self) {
        let drained: Vec<Waiter> = {
            let mut state = self.state.lock().expect("correlator lock poisoned");
            state.pending.drain().flat_map(|(_, q)| q).collect()
        };
        if !drained.is_empty() {
            debug!(count = drained.len(), "cancelling pending waiters");
        }
        for w in drained {
            let _ = w.tx.send(Err(OscError::Cancelled));
        }
    }

    /// Number of waiters currently queued at `addr`.
    pub fn pending_count(&self, addr: &str) -> usize {
        let state = self.state.lock().expect("correlator lock poisoned");
        state.pending.get(addr).map_or(0, VecDeque::len)
    }
}

/// Awaitable handle for one expected reply.
///
/// Dropping the handle without waiting deregisters the waiter, so a
/// cancelled tool call cannot leave a stale queue entry to swallow the
/// next caller's reply.
pub struct PendingReply {
    addr: String,
    id: u64,
    rx: oneshot::Receiver<ReplyResult>,
    state: Arc<Mutex<State>>,
    settled: bool,
}

impl PendingReply {
    /// The address this waiter is registered on.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Wait for the reply, the deadline, or cancellation.
    pub async fn wait(mut self, timeout: Duration) -> ReplyResult {
        let outcome = tokio::time::timeout(timeout, &mut self.rx).await;
        self.settled = true;
        match outcome {
            Ok(Ok(result)) => result,
            // Sender dropped without resolving: the correlator itself went
            // away, which only happens on shutdown.
            Ok(Err(_)) => Err(OscError::Cancelled),
            Err(_elapsed) => {
                let removed = self
                    .state
                    .lock()
                    .expect("correlator lock poisoned")
                    .remove(&self.addr, self.id);
                if !removed {
                    // A reply won the race against the timer; prefer it.
                    if let Ok(result) = self.rx.try_recv() {
                        return result;
                    }
                }
                Err(OscError::Timeout {
                    addr: self.addr.clone(),
                    timeout_ms: timeout.as_millis() as u64,
                })
            }
        }
    }
}

impl Drop for PendingReply {
    fn drop(&mut self) {
        if !self.settled {
            if let Ok(mut state) = self.state.lock() {
                state.remove(&self.addr, self.id);
            }
        }
    }
}
