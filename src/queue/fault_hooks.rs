//! queue::fault_hooks
//!
//! Test-only allocation fault injection.
//!
//! Every insertion performs two allocations: the payload copy, then the
//! node. Arming the hook with [`fail_allocation_after`] lets that many
//! allocations succeed and fails the next one, so both rollback paths can
//! be exercised deterministically.
//!
//! # Usage
//!
//! ```ignore
//! use strq::queue::fault_hooks;
//!
//! fault_hooks::fail_allocation_after(1); // payload ok, node fails
//! assert!(queue.insert_back("x").is_err());
//! fault_hooks::clear();
//! ```
//!
//! # Thread Safety
//!
//! The countdown lives in thread-local storage, so concurrent tests do not
//! interfere as long as each runs on its own thread (the `cargo test`
//! default).
//!
//! # Invariants
//!
//! - Only compiled under `cfg(test)` or the `fault_injection` feature
//! - A hook fires at most once, then disarms itself

use std::cell::Cell;

thread_local! {
    static COUNTDOWN: Cell<Option<usize>> = const { Cell::new(None) };
}

/// Let `successes` allocations through, then fail the next one.
pub fn fail_allocation_after(successes: usize) {
    COUNTDOWN.with(|c| c.set(Some(successes)));
}

/// Disarm the hook.
pub fn clear() {
    COUNTDOWN.with(|c| c.set(None));
}

/// Whether a failure is still pending.
pub fn is_armed() -> bool {
    COUNTDOWN.with(|c| c.get().is_some())
}

/// Called before each allocation. Returns `true` when this one must fail.
pub(crate) fn should_fail() -> bool {
    COUNTDOWN.with(|c| match c.get() {
        None => false,
        Some(0) => {
            c.set(None);
            true
        }
        Some(n) => {
            c.set(Some(n - 1));
            false
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arm_and_clear() {
        assert!(!is_armed());
        fail_allocation_after(3);
        assert!(is_armed());
        clear();
        assert!(!is_armed());
    }

    #[test]
    fn fires_once_after_countdown() {
        fail_allocation_after(2);
        assert!(!should_fail());
        assert!(!should_fail());
        assert!(should_fail());
        assert!(!is_armed());
        assert!(!should_fail());
    }
}
