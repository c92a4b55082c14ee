use std::collections::VecDeque;

use super::snapshot::MessageSnapshot;

/// Messages waiting for the screen, oldest first.
#[derive(Debug, Clone, Default)]
pub struct PendingQueue {
    entries: VecDeque<MessageSnapshot>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_back(&mut self, snapshot: MessageSnapshot) {
        self.entries.push_back(snapshot);
    }

    /// Moves every snapshot out of `batch`, keeping its order.
    pub fn append(&mut self, batch: &mut VecDeque<MessageSnapshot>) {
        self.entries.append(batch);
    }

    pub fn append_queue(&mut self, other: &mut PendingQueue) {
        self.entries.append(&mut other.entries);
    }

    pub fn push_front(&mut self, snapshot: MessageSnapshot) {
        self.entries.push_front(snapshot);
    }

    pub fn pop_front(&mut self) -> Option<MessageSnapshot> {
        self.entries.pop_front()
    }

    pub fn front(&self) -> Option<&MessageSnapshot> {
        self.entries.front()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &MessageSnapshot> {
        self.entries.iter()
    }
}

impl Extend<MessageSnapshot> for PendingQueue {
    fn extend<I: IntoIterator<Item = MessageSnapshot>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}
