//! Fixed-capacity FIFO with drop-oldest overflow
//!
//! Every queue in the core (door, handbrake and key events, both intent
//! queues, the deferred queue) is one of these. Pushing into a full queue
//! evicts the oldest element instead of failing.

use heapless::Deque;

/// Drop-oldest ring queue
#[derive(Debug, Clone)]
pub struct RingQueue<T, const N: usize> {
    items: Deque<T, N>,
    dropped: u32,
}

impl<T, const N: usize> Default for RingQueue<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> RingQueue<T, N> {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            items: Deque::new(),
            dropped: 0,
        }
    }

    /// Append an item, evicting and returning the oldest one if full
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.items.is_full() {
            self.dropped = self.dropped.wrapping_add(1);
            self.items.pop_front()
        } else {
            None
        };
        // Room was made above
        let _ = self.items.push_back(item);
        evicted
    }

    /// Remove the oldest item
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Oldest item without removing it
    pub fn peek(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.is_full()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of items evicted by overflow since creation
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}
