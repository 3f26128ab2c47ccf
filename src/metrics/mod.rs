use std::sync::atomic::{AtomicU64, Ordering};

// Process-wide counters. Cheap enough to bump on every queue operation.
static ENQUEUED: AtomicU64 = AtomicU64::new(0);
static DEQUEUED: AtomicU64 = AtomicU64::new(0);
static GROWN: AtomicU64 = AtomicU64::new(0);
static REJECTED_INBOUND: AtomicU64 = AtomicU64::new(0);
static SEND_FAILURES: AtomicU64 = AtomicU64::new(0);

#[inline]
pub fn inc_enqueued(n: u64) {
    ENQUEUED.fetch_add(n, Ordering::Relaxed);
}
#[inline]
pub fn inc_dequeued(n: u64) {
    DEQUEUED.fetch_add(n, Ordering::Relaxed);
}
#[inline]
pub fn inc_grown(n: u64) {
    GROWN.fetch_add(n, Ordering::Relaxed);
}
#[inline]
pub fn inc_rejected_inbound(n: u64) {
    REJECTED_INBOUND.fetch_add(n, Ordering::Relaxed);
}
#[inline]
pub fn inc_send_failures(n: u64) {
    SEND_FAILURES.fetch_add(n, Ordering::Relaxed);
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counters {
    pub enqueued: u64,
    pub dequeued: u64,
    pub grown: u64,
    pub rejected_inbound: u64,
    pub send_failures: u64,
}

pub fn counters() -> Counters {
    Counters {
        enqueued: ENQUEUED.load(Ordering::Relaxed),
        dequeued: DEQUEUED.load(Ordering::Relaxed),
        grown: GROWN.load(Ordering::Relaxed),
        rejected_inbound: REJECTED_INBOUND.load(Ordering::Relaxed),
        send_failures: SEND_FAILURES.load(Ordering::Relaxed),
    }
}

pub fn snapshot() -> String {
    // Prometheus-style text without HELP/TYPE lines
    let c = counters();
    format!(
        "thermoq_enqueued {}\nthermoq_dequeued {}\nthermoq_queue_grown {}\nthermoq_rejected_inbound {}\nthermoq_send_failures {}\n",
        c.enqueued, c.dequeued, c.grown, c.rejected_inbound, c.send_failures,
    )
}
