//! queue::slot
//!
//! A place that may or may not hold a queue.
//!
//! Callers that manage a queue's lifetime explicitly (the harness, for one)
//! need the "no queue yet" and "queue already destroyed" states. Operations
//! on an empty slot fail with [`QueueError::NoQueue`] instead of panicking,
//! except `size` (reports 0) and `reverse` (does nothing).

use super::{InvariantViolation, QueueError, StringQueue};

/// An optional [`StringQueue`] with create/destroy lifecycle.
#[derive(Debug, Default)]
pub struct QueueSlot {
    queue: Option<StringQueue>,
}

impl QueueSlot {
    /// A slot with no queue.
    pub const fn absent() -> Self {
        Self { queue: None }
    }

    /// Install a fresh empty queue, destroying any previous one.
    pub fn create(&mut self) {
        self.queue = Some(StringQueue::new());
    }

    /// Destroy the held queue and every payload in it.
    ///
    /// Returns whether a queue was present. Destroying an empty slot is a
    /// no-op.
    pub fn destroy(&mut self) -> bool {
        self.queue.take().is_some()
    }

    pub fn is_present(&self) -> bool {
        self.queue.is_some()
    }

    pub fn get(&self) -> Option<&StringQueue> {
        self.queue.as_ref()
    }

    pub fn insert_front(&mut self, value: impl AsRef<[u8]>) -> Result<(), QueueError> {
        self.queue_mut()?.insert_front(value)
    }

    pub fn insert_back(&mut self, value: impl AsRef<[u8]>) -> Result<(), QueueError> {
        self.queue_mut()?.insert_back(value)
    }

    /// See [`StringQueue::remove_front`].
    pub fn remove_front(&mut self, out: Option<&mut [u8]>) -> Result<usize, QueueError> {
        self.queue_mut()?.remove_front(out)
    }

    /// Size of the held queue, or 0 when absent.
    pub fn size(&self) -> usize {
        self.queue.as_ref().map_or(0, StringQueue::size)
    }

    pub fn reverse(&mut self) {
        if let Some(queue) = self.queue.as_mut() {
            queue.reverse();
        }
    }

    /// Verify the held queue. An absent queue is trivially consistent.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        self.queue.as_ref().map_or(Ok(()), StringQueue::verify)
    }

    fn queue_mut(&mut self) -> Result<&mut StringQueue, QueueError> {
        self.queue.as_mut().ok_or(QueueError::NoQueue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_slot_contract() {
        let mut slot = QueueSlot::absent();
        assert!(!slot.is_present());
        assert_eq!(slot.size(), 0);
        assert_eq!(slot.insert_front("a"), Err(QueueError::NoQueue));
        assert_eq!(slot.insert_back("a"), Err(QueueError::NoQueue));

        let mut buf = [0xAAu8; 4];
        assert_eq!(slot.remove_front(Some(&mut buf[..])), Err(QueueError::NoQueue));
        assert_eq!(buf, [0xAA; 4]);

        slot.reverse();
        assert_eq!(slot.verify(), Ok(()));
        assert!(!slot.destroy());
    }

    #[test]
    fn create_then_destroy_immediately() {
        let mut slot = QueueSlot::absent();
        slot.create();
        assert!(slot.is_present());
        assert_eq!(slot.size(), 0);
        assert!(slot.destroy());
        assert!(!slot.destroy());
    }

    #[test]
    fn create_replaces_existing_queue() {
        let mut slot = QueueSlot::absent();
        slot.create();
        slot.insert_back("a").unwrap();
        slot.create();
        assert_eq!(slot.size(), 0);
    }

    #[test]
    fn empty_queue_reports_empty_not_absent() {
        let mut slot = QueueSlot::absent();
        slot.create();
        assert_eq!(slot.remove_front(None), Err(QueueError::Empty));
    }

    #[test]
    fn destroy_releases_populated_queue() {
        let mut slot = QueueSlot::absent();
        slot.create();
        for v in ["a", "b", "c"] {
            slot.insert_back(v).unwrap();
        }
        assert!(slot.destroy());
        assert_eq!(slot.size(), 0);
        assert!(slot.get().is_none());
    }
}
