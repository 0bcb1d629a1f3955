//! Process-wide shutdown flag, set by the ctrlc handler on SIGINT/SIGTERM.
//! The exporter checks it right before committing the copy.
//!
//! Relaxed atomics are sufficient for a one-way "stop" flag.

use std::sync::atomic::{AtomicBool, Ordering};

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Request a cooperative shutdown (idempotent).
#[inline]
pub fn request() {
    SHUTDOWN.store(true, Ordering::Relaxed);
}

#[inline]
pub fn is_requested() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}
