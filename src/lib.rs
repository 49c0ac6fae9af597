//! strq - A linked-list string queue and its command harness
//!
//! The core of the crate is [`queue::StringQueue`], a singly-linked list of
//! owned byte strings with head and tail pointers and a cached length. It
//! supports O(1) insertion at both ends, O(1) removal from the front with a
//! bounded copy-out, O(1) size, and in-place reversal.
//!
//! # Architecture
//!
//! - [`queue`] - The queue itself, invariant checks, and the optional slot
//! - [`harness`] - Script interpreter that exercises a queue
//! - [`core`] - Configuration
//! - [`cli`] - Command-line interface for the `qtest` binary
//! - [`ui`] - Output formatting
//!
//! # Correctness Invariants
//!
//! 1. Length, head, and tail always agree: all absent or all present
//! 2. The chain from head reaches tail in exactly `length` steps
//! 3. Every node and payload has exactly one owner and is freed exactly once
//! 4. A failed insertion leaves the queue exactly as it was

pub mod cli;
pub mod core;
pub mod harness;
pub mod queue;
pub mod ui;
