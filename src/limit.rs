//! Per-client request-rate admission.
//!
//! Counts requests per [client key](crate::Request::client_key) in a fixed
//! window and rejects the overflow with 429. The counter store is behind the
//! [`AdmissionStore`] trait so a single-instance deployment can use the
//! in-process [`MemoryStore`] while a multi-instance one plugs in a shared
//! store, without touching caller code.
//!
//! Admission applies to all traffic, authenticated or not, before routing
//! and before token verification.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// The request budget: at most `max_requests` per `window` per client key.
#[derive(Clone, Copy, Debug)]
pub struct AdmissionPolicy {
    pub max_requests: u32,
    pub window: Duration,
}

impl AdmissionPolicy {
    /// The human-readable rejection message.
    ///
    /// Computed from the configured limit so the text can never drift from
    /// the number actually enforced.
    pub fn exceeded_message(&self) -> String {
        format!(
            "you have exceeded the limit of {} requests per {} seconds",
            self.max_requests,
            self.window.as_secs()
        )
    }
}

impl Default for AdmissionPolicy {
    /// 50 requests per 10-minute window.
    fn default() -> Self {
        Self { max_requests: 50, window: Duration::from_secs(600) }
    }
}

/// The admit/reject verdict for one request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Admission {
    pub admitted: bool,
    /// Slots left in the current window (0 when rejected).
    pub remaining: u32,
    /// Time until the window resets for this key.
    pub retry_after: Duration,
}

/// A counter store the admission controller increments.
///
/// `increment` must be linearizable per key: when one slot remains, two
/// concurrent requests must never both be admitted.
pub trait AdmissionStore: Send + Sync {
    fn increment(&self, key: &str) -> Admission;
}

// ── In-process store ──────────────────────────────────────────────────────────

/// Entries are evicted once the table grows past this many keys; only
/// entries whose window already elapsed are dropped.
const EVICTION_THRESHOLD: usize = 4096;

struct Window {
    count: u32,
    started: Instant,
}

/// Fixed-window counters in process memory.
///
/// One mutex guards the whole table; the critical section is a map lookup
/// and an integer bump, so contention across unrelated keys is not a
/// concern at gateway request rates. State does not survive the process.
pub struct MemoryStore {
    policy: AdmissionPolicy,
    windows: Mutex<HashMap<String, Window>>,
}

impl MemoryStore {
    pub fn new(policy: AdmissionPolicy) -> Self {
        Self { policy, windows: Mutex::new(HashMap::new()) }
    }

    fn increment_at(&self, key: &str, now: Instant) -> Admission {
        let mut windows = self.windows.lock();

        if windows.len() >= EVICTION_THRESHOLD {
            let window = self.policy.window;
            windows.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = windows
            .entry(key.to_owned())
            .or_insert(Window { count: 0, started: now });

        // The window starts at the first request seen for a key; once it
        // elapses the counter resets.
        if now.duration_since(entry.started) >= self.policy.window {
            entry.count = 0;
            entry.started = now;
        }

        let retry_after = self
            .policy
            .window
            .saturating_sub(now.duration_since(entry.started));

        if entry.count < self.policy.max_requests {
            entry.count += 1;
            Admission {
                admitted: true,
                remaining: self.policy.max_requests - entry.count,
                retry_after,
            }
        } else {
            Admission { admitted: false, remaining: 0, retry_after }
        }
    }
}

impl AdmissionStore for MemoryStore {
    fn increment(&self, key: &str) -> Admission {
        self.increment_at(key, Instant::now())
    }
}
