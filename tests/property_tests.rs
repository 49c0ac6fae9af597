//! Property-based tests for the string queue.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated operation sequences.

use std::collections::VecDeque;

use proptest::prelude::*;

use strq::queue::{copy_terminated, QueueError, StringQueue};

#[derive(Debug, Clone)]
enum Op {
    InsertFront(String),
    InsertBack(String),
    Remove,
    Reverse,
}

/// Strategy for generating payloads, including empty ones.
fn payload() -> impl Strategy<Value = String> {
    "[a-z0-9]{0,12}"
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        payload().prop_map(Op::InsertFront),
        payload().prop_map(Op::InsertBack),
        Just(Op::Remove),
        Just(Op::Reverse),
    ]
}

fn drain(q: &mut StringQueue) -> Vec<String> {
    std::iter::from_fn(|| q.pop_front())
        .map(|v| String::from_utf8(v.into_vec()).unwrap())
        .collect()
}

proptest! {
    /// Any operation sequence behaves like a deque model, and size tracks
    /// successful insertions minus successful removals.
    #[test]
    fn matches_deque_model(ops in prop::collection::vec(op(), 0..64)) {
        let mut q = StringQueue::new();
        let mut model: VecDeque<String> = VecDeque::new();

        for op in ops {
            match op {
                Op::InsertFront(v) => {
                    q.insert_front(&v).unwrap();
                    model.push_front(v);
                }
                Op::InsertBack(v) => {
                    q.insert_back(&v).unwrap();
                    model.push_back(v);
                }
                Op::Remove => {
                    let removed = q.pop_front();
                    let expected = model.pop_front();
                    prop_assert_eq!(removed.as_deref(), expected.as_deref().map(str::as_bytes));
                }
                Op::Reverse => {
                    q.reverse();
                    model = model.into_iter().rev().collect();
                }
            }
            prop_assert_eq!(q.size(), model.len());
            prop_assert!(q.verify().is_ok());
        }

        prop_assert_eq!(drain(&mut q), Vec::from(model));
    }

    /// Tail insertion plus head removal is FIFO.
    #[test]
    fn back_then_front_is_fifo(values in prop::collection::vec(payload(), 0..32)) {
        let mut q = StringQueue::new();
        for v in &values {
            q.insert_back(v).unwrap();
        }
        prop_assert_eq!(drain(&mut q), values);
    }

    /// Head insertion plus head removal is LIFO.
    #[test]
    fn front_then_front_is_lifo(values in prop::collection::vec(payload(), 0..32)) {
        let mut q = StringQueue::new();
        for v in &values {
            q.insert_front(v).unwrap();
        }
        let mut expected = values;
        expected.reverse();
        prop_assert_eq!(drain(&mut q), expected);
    }

    /// Reversing twice restores the original order and size.
    #[test]
    fn reverse_is_involution(values in prop::collection::vec(payload(), 0..32)) {
        let mut q = StringQueue::new();
        for v in &values {
            q.insert_back(v).unwrap();
        }
        q.reverse();
        prop_assert_eq!(q.size(), values.len());
        q.reverse();
        prop_assert_eq!(q.size(), values.len());
        prop_assert!(q.verify().is_ok());
        prop_assert_eq!(drain(&mut q), values);
    }

    /// Removal never writes past the destination capacity and always
    /// terminates within it.
    #[test]
    fn bounded_copy_respects_capacity(value in "[a-z]{0,40}", capacity in 0usize..48) {
        const CANARY: u8 = 0xAA;
        let mut q = StringQueue::new();
        q.insert_back(&value).unwrap();

        // Guard region past the visible capacity must stay untouched.
        let mut backing = vec![CANARY; capacity + 8];
        let copied = q.remove_front(Some(&mut backing[..capacity])).unwrap();

        prop_assert!(backing[capacity..].iter().all(|&b| b == CANARY));
        if capacity == 0 {
            prop_assert_eq!(copied, 0);
        } else {
            prop_assert_eq!(copied, value.len().min(capacity - 1));
            prop_assert_eq!(&backing[..copied], &value.as_bytes()[..copied]);
            prop_assert_eq!(backing[copied], 0);
        }
        prop_assert!(q.is_empty());
    }

    /// `copy_terminated` agrees with `remove_front` on the bytes written.
    #[test]
    fn copy_terminated_prefix(value in "[a-z]{0,20}", capacity in 1usize..24) {
        let mut buf = vec![0xFFu8; capacity];
        let copied = copy_terminated(value.as_bytes(), &mut buf);
        prop_assert!(copied < capacity);
        prop_assert!(value.as_bytes().starts_with(&buf[..copied]));
    }

    /// Removing from an empty queue always fails and changes nothing.
    #[test]
    fn empty_removal_fails(capacity in 0usize..8) {
        let mut q = StringQueue::new();
        let mut buf = vec![0x55u8; capacity];
        prop_assert_eq!(q.remove_front(Some(&mut buf[..])), Err(QueueError::Empty));
        prop_assert!(buf.iter().all(|&b| b == 0x55));
        prop_assert_eq!(q.size(), 0);
    }
}
