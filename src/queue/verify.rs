//! queue::verify
//!
//! Structural invariant checks for [`StringQueue`].
//!
//! The harness runs these after every mutating command; tests use them to
//! confirm that no operation leaves head, tail, and length disagreeing.

use thiserror::Error;

use super::StringQueue;

/// A broken structural invariant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("length is {len} but head present = {head}, tail present = {tail}")]
    EmptinessMismatch { len: usize, head: bool, tail: bool },

    /// `walked` stops at `len + 1` when the chain is longer than recorded.
    #[error("walked {walked} nodes from head but length is {len}")]
    LengthMismatch { walked: usize, len: usize },

    #[error("tail has a successor")]
    TailNotTerminal,

    #[error("last node reached from head is not the tail")]
    TailMismatch,
}

impl StringQueue {
    /// Check every structural invariant.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        let (head, tail) = match (self.head, self.tail) {
            (None, None) if self.len == 0 => return Ok(()),
            (Some(head), Some(tail)) if self.len > 0 => (head, tail),
            (head, tail) => {
                return Err(InvariantViolation::EmptinessMismatch {
                    len: self.len,
                    head: head.is_some(),
                    tail: tail.is_some(),
                })
            }
        };

        let mut last = head;
        let mut walked = 1;
        // SAFETY: nodes reachable from `head` are owned by `self`. The walk
        // is bounded by `len + 1`, so a cycle cannot loop forever.
        while let Some(next) = unsafe { last.as_ref() }.next {
            if walked > self.len {
                break;
            }
            last = next;
            walked += 1;
        }

        if walked != self.len {
            return Err(InvariantViolation::LengthMismatch {
                walked,
                len: self.len,
            });
        }
        if last != tail {
            // SAFETY: `tail` points at a node owned by `self`.
            return Err(if unsafe { tail.as_ref() }.next.is_some() {
                InvariantViolation::TailNotTerminal
            } else {
                InvariantViolation::TailMismatch
            });
        }
        Ok(())
    }
}
