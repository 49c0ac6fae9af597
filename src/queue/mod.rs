//! queue
//!
//! A singly-linked queue of owned byte strings.
//!
//! # Layout
//!
//! ```text
//! head -> [c] -> [a] -> [b] <- tail
//! ```
//!
//! The queue owns `head`; every node owns its successor. `tail` is a
//! non-owning pointer to the last node so that [`StringQueue::insert_back`]
//! runs in O(1) without walking the chain.
//!
//! # Invariants
//!
//! - `len == 0` iff `head` and `tail` are both `None`
//! - Following `next` from `head` reaches `tail` in exactly `len` steps
//! - `tail.next` is always `None`
//! - Every node is reachable from exactly one owner (no sharing, no cycles)
//!
//! [`StringQueue::verify`] checks all of them.
//!
//! # Example
//!
//! ```
//! use strq::queue::StringQueue;
//!
//! let mut q = StringQueue::new();
//! q.insert_back("a").unwrap();
//! q.insert_back("b").unwrap();
//! q.insert_front("c").unwrap();
//! assert_eq!(q.size(), 3);
//!
//! let mut buf = [0u8; 8];
//! let n = q.remove_front(Some(&mut buf[..])).unwrap();
//! assert_eq!(&buf[..n], b"c");
//!
//! q.reverse();
//! assert_eq!(q.pop_front().as_deref(), Some(&b"b"[..]));
//! ```

pub mod slot;
pub mod verify;

// Allocation fault hooks for rollback tests.
#[cfg(any(test, feature = "fault_injection"))]
pub mod fault_hooks;

pub use slot::QueueSlot;
pub use verify::InvariantViolation;

use std::alloc::{self, Layout};
use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

use thiserror::Error;

/// Errors from queue operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// Memory for a node or a payload copy could not be obtained.
    /// The queue is unchanged.
    #[error("failed to allocate {requested} bytes")]
    AllocationFailure { requested: usize },

    #[error("queue is empty")]
    Empty,

    /// The operation targeted a slot that holds no queue.
    #[error("no queue")]
    NoQueue,
}

type Link = Option<NonNull<Node>>;

struct Node {
    value: Box<[u8]>,
    next: Link,
}

impl Node {
    /// Allocate a node holding a private copy of `value`.
    ///
    /// The payload is copied first; if the node allocation then fails the
    /// copy is dropped before returning, so nothing leaks.
    fn allocate(value: &[u8], next: Link) -> Result<NonNull<Node>, QueueError> {
        let value = copy_payload(value)?;
        let layout = Layout::new::<Node>();

        #[cfg(any(test, feature = "fault_injection"))]
        {
            if fault_hooks::should_fail() {
                return Err(QueueError::AllocationFailure {
                    requested: layout.size(),
                });
            }
        }

        // SAFETY: `Node` is not zero-sized.
        let raw = unsafe { alloc::alloc(layout) }.cast::<Node>();
        let ptr = NonNull::new(raw).ok_or(QueueError::AllocationFailure {
            requested: layout.size(),
        })?;
        // SAFETY: `ptr` is freshly allocated with the layout of `Node` and
        // is valid for a write of one `Node`.
        unsafe { ptr.as_ptr().write(Node { value, next }) };
        Ok(ptr)
    }

    /// Reclaim a node that has already been unlinked from the chain.
    ///
    /// # Safety
    ///
    /// `ptr` must come from [`Node::allocate`] and must not be reachable
    /// from any queue anymore.
    unsafe fn reclaim(ptr: NonNull<Node>) -> Box<Node> {
        // Memory from the global allocator with `Layout::new::<Node>()` is
        // exactly what `Box<Node>` expects.
        unsafe { Box::from_raw(ptr.as_ptr()) }
    }
}

fn copy_payload(value: &[u8]) -> Result<Box<[u8]>, QueueError> {
    let failure = QueueError::AllocationFailure {
        requested: value.len(),
    };

    #[cfg(any(test, feature = "fault_injection"))]
    {
        if fault_hooks::should_fail() {
            return Err(failure);
        }
    }

    let mut copy = Vec::new();
    copy.try_reserve_exact(value.len()).map_err(|_| failure)?;
    copy.extend_from_slice(value);
    Ok(copy.into_boxed_slice())
}

/// Copy `src` into `dst` as a NUL-terminated string.
///
/// At most `dst.len() - 1` bytes of `src` are copied, followed by a single
/// `0`. Longer payloads are truncated silently. A zero-length `dst` is never
/// written. Returns the number of payload bytes copied.
pub fn copy_terminated(src: &[u8], dst: &mut [u8]) -> usize {
    let Some(room) = dst.len().checked_sub(1) else {
        return 0;
    };
    let copied = src.len().min(room);
    dst[..copied].copy_from_slice(&src[..copied]);
    dst[copied] = 0;
    copied
}

/// A FIFO/LIFO queue of owned byte strings backed by a singly-linked list.
pub struct StringQueue {
    head: Link,
    tail: Link,
    len: usize,
    marker: PhantomData<Box<Node>>,
}

impl StringQueue {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
            marker: PhantomData,
        }
    }

    /// Number of elements. O(1).
    pub fn size(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a copy of `value` at the front.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::AllocationFailure`] if the node or the payload
    /// copy cannot be allocated. The queue is left untouched.
    pub fn insert_front(&mut self, value: impl AsRef<[u8]>) -> Result<(), QueueError> {
        let node = Node::allocate(value.as_ref(), self.head)?;
        if self.tail.is_none() {
            self.tail = Some(node);
        }
        self.head = Some(node);
        self.len += 1;
        Ok(())
    }

    /// Insert a copy of `value` at the back in O(1).
    ///
    /// # Errors
    ///
    /// Same contract as [`StringQueue::insert_front`].
    pub fn insert_back(&mut self, value: impl AsRef<[u8]>) -> Result<(), QueueError> {
        let node = Node::allocate(value.as_ref(), None)?;
        match self.tail {
            // SAFETY: `tail` is a live node owned by this queue and we hold
            // `&mut self`, so no other reference to it exists.
            Some(mut tail) => unsafe { tail.as_mut().next = Some(node) },
            None => self.head = Some(node),
        }
        self.tail = Some(node);
        self.len += 1;
        Ok(())
    }

    /// Remove the front element and hand its payload to the caller.
    pub fn pop_front(&mut self) -> Option<Box<[u8]>> {
        let head = self.head?;
        // SAFETY: `head` is owned by this queue and is unlinked below before
        // anything else can observe it.
        let node = unsafe { Node::reclaim(head) };
        self.head = node.next;
        if self.head.is_none() {
            self.tail = None;
        }
        self.len -= 1;
        Some(node.value)
    }

    /// Remove the front element, optionally copying its payload out.
    ///
    /// When `out` is given, up to `out.len() - 1` payload bytes are copied
    /// into it followed by a NUL terminator (see [`copy_terminated`]). The
    /// removed node and its payload are freed either way.
    ///
    /// Returns the number of payload bytes written to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Empty`] if there is nothing to remove; `out` is
    /// not touched in that case.
    pub fn remove_front(&mut self, out: Option<&mut [u8]>) -> Result<usize, QueueError> {
        let value = self.pop_front().ok_or(QueueError::Empty)?;
        Ok(out.map_or(0, |buf| copy_terminated(&value, buf)))
    }

    /// Borrow the front payload without removing it.
    pub fn peek_front(&self) -> Option<&[u8]> {
        // SAFETY: nodes reachable from `head` live as long as `&self`.
        self.head.map(|head| unsafe { &*head.as_ptr() }.value.as_ref())
    }

    /// Reverse the queue in place.
    ///
    /// Only `next` links and the head/tail pointers change. No node or
    /// payload is allocated, freed, or copied.
    pub fn reverse(&mut self) {
        let Some(first) = self.head else {
            return;
        };
        if self.len < 2 {
            return;
        }

        let mut reversed = first;
        // SAFETY: `first` is the live head node and `&mut self` rules out any
        // other reference to it.
        let mut remaining = unsafe { first.as_ref() }.next;
        while let Some(mut node) = remaining {
            // SAFETY: `node` was reached through a `next` link of this queue,
            // so it is live; no other reference exists under `&mut self`.
            unsafe {
                remaining = node.as_ref().next;
                node.as_mut().next = Some(reversed);
            }
            reversed = node;
        }

        self.head = Some(reversed);
        self.tail = Some(first);
        let mut tail = first;
        // SAFETY: the old head is still live and is now the last node; its
        // stale link back into the chain must be cleared.
        unsafe { tail.as_mut().next = None };
    }

    /// Walk the payloads front to back.
    fn payloads(&self) -> Payloads<'_> {
        Payloads {
            next: self.head,
            marker: PhantomData,
        }
    }
}

impl Default for StringQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for StringQueue {
    fn drop(&mut self) {
        // Iterative so long chains cannot overflow the stack.
        while self.pop_front().is_some() {}
    }
}

impl fmt::Debug for StringQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.payloads().map(String::from_utf8_lossy))
            .finish()
    }
}

struct Payloads<'a> {
    next: Link,
    marker: PhantomData<&'a Node>,
}

impl<'a> Iterator for Payloads<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        // SAFETY: the queue borrowed for `'a` keeps every node alive.
        let node = unsafe { &*self.next?.as_ptr() };
        self.next = node.next;
        Some(node.value.as_ref())
    }
}
