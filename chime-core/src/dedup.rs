//! Frame intake and duplicate suppression
//!
//! Many body-bus signals are re-broadcast unchanged at a fixed rate, and a
//! single key press arrives as several identical frames. The history ring
//! collapses those into one logical frame per physical change.

use chime_hal::CanBus;
use chime_protocol::CanFrame;

use crate::config::DedupConfig;

/// Slots in the history ring
pub const HISTORY_CAPACITY: usize = 10;

/// Upper bound on pulls per [`DedupBuffer::read_distinct`] call
pub const MAX_PULLS: u8 = 6;

/// A remembered frame and when it was accepted
#[derive(Debug, Clone, PartialEq, Eq)]
struct HistoryEntry {
    frame: CanFrame,
    at_ms: u32,
}

/// Duplicate filter over the most recently accepted frames
#[derive(Debug, Clone)]
pub struct DedupBuffer {
    /// `None` marks a slot never written since boot
    slots: [Option<HistoryEntry>; HISTORY_CAPACITY],
    /// Next slot to overwrite
    head: usize,
    depth: usize,
    window_ms: u32,
    max_pulls: u8,
}

impl Default for DedupBuffer {
    fn default() -> Self {
        Self::new(&DedupConfig::default())
    }
}

impl DedupBuffer {
    /// Create an empty history
    pub fn new(config: &DedupConfig) -> Self {
        Self {
            slots: Default::default(),
            head: 0,
            depth: usize::from(config.history_depth).clamp(1, HISTORY_CAPACITY),
            window_ms: u32::from(config.window_ms),
            max_pulls: config.max_pulls.clamp(1, MAX_PULLS),
        }
    }

    /// Check a frame against the history and remember it if new
    ///
    /// Returns `true` when the frame is not a duplicate. A duplicate is an
    /// identical frame (id, length, payload) accepted no more than the
    /// window ago, among the `depth` most recent entries.
    pub fn observe(&mut self, frame: &CanFrame, now_ms: u32) -> bool {
        if self.is_duplicate(frame, now_ms) {
            return false;
        }

        self.slots[self.head] = Some(HistoryEntry {
            frame: frame.clone(),
            at_ms: now_ms,
        });
        self.head = (self.head + 1) % HISTORY_CAPACITY;
        true
    }

    /// Pull frames from the bus until one is not a duplicate
    ///
    /// Gives up after the pull cap so a continuous stream of duplicates
    /// cannot stall the loop. `None` means the source ran dry or every
    /// pulled frame was a duplicate.
    pub fn read_distinct<B: CanBus>(&mut self, bus: &mut B, now_ms: u32) -> Option<CanFrame> {
        for _ in 0..self.max_pulls {
            let frame = bus.poll()?;
            if self.observe(&frame, now_ms) {
                return Some(frame);
            }
            trace!("dup {=u16:x}", frame.id());
        }
        None
    }

    /// Forget every remembered frame
    pub fn clear(&mut self) {
        self.slots = Default::default();
        self.head = 0;
    }

    fn is_duplicate(&self, frame: &CanFrame, now_ms: u32) -> bool {
        (1..=self.depth)
            .map(|back| (self.head + HISTORY_CAPACITY - back) % HISTORY_CAPACITY)
            .filter_map(|slot| self.slots[slot].as_ref())
            .any(|entry| {
                now_ms.wrapping_sub(entry.at_ms) <= self.window_ms && entry.frame == *frame
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBus;
    use proptest::prelude::*;

    fn frame(id: u16, payload: &[u8]) -> CanFrame {
        CanFrame::new(id, payload).unwrap()
    }

    #[test]
    fn test_repeat_within_window_is_duplicate() {
        let mut dedup = DedupBuffer::default();
        let f = frame(0x23A, &[0xF0, 0x30, 0x01]);
        assert!(dedup.observe(&f, 1000));
        assert!(!dedup.observe(&f, 1100));
        assert!(!dedup.observe(&f, 1300));
    }

    #[test]
    fn test_repeat_after_window_is_new() {
        let mut dedup = DedupBuffer::default();
        let f = frame(0x130, &[0x45]);
        assert!(dedup.observe(&f, 0));
        assert!(dedup.observe(&f, 301));
    }

    #[test]
    fn test_length_and_payload_matter() {
        let mut dedup = DedupBuffer::default();
        assert!(dedup.observe(&frame(0x130, &[0x45]), 0));
        assert!(dedup.observe(&frame(0x130, &[0x45, 0x00]), 1));
        assert!(dedup.observe(&frame(0x130, &[0x41]), 2));
        assert!(dedup.observe(&frame(0x131, &[0x45]), 3));
        assert!(!dedup.observe(&frame(0x130, &[0x45]), 4));
    }

    #[test]
    fn test_old_entries_age_out_of_depth() {
        let config = DedupConfig {
            history_depth: 2,
            ..DedupConfig::default()
        };
        let mut dedup = DedupBuffer::new(&config);
        let a = frame(0x100, &[1]);
        assert!(dedup.observe(&a, 0));
        assert!(dedup.observe(&frame(0x101, &[2]), 1));
        assert!(dedup.observe(&frame(0x102, &[3]), 2));
        // `a` is still in the ring but beyond the scan depth
        assert!(dedup.observe(&a, 3));
    }

    #[test]
    fn test_ring_overwrites_oldest() {
        let mut dedup = DedupBuffer::default();
        let first = frame(0x100, &[0]);
        assert!(dedup.observe(&first, 0));
        for i in 1..=HISTORY_CAPACITY as u8 {
            assert!(dedup.observe(&frame(0x100, &[i]), 0));
        }
        assert!(dedup.observe(&first, 0));
    }

    #[test]
    fn test_window_across_timer_wrap() {
        let mut dedup = DedupBuffer::default();
        let f = frame(0x2FC, &[0, 1, 0]);
        assert!(dedup.observe(&f, u32::MAX - 100));
        assert!(!dedup.observe(&f, 50));
        assert!(dedup.observe(&f, 250));
    }

    #[test]
    fn test_read_distinct_skips_duplicates() {
        let mut dedup = DedupBuffer::default();
        let mut bus = MockBus::new();
        let key = frame(0x23A, &[0, 0, 1]);
        let door = frame(0x2FC, &[0, 1, 0]);
        bus.push_rx(key.clone());
        bus.push_rx(key.clone());
        bus.push_rx(door.clone());

        assert_eq!(dedup.read_distinct(&mut bus, 0), Some(key));
        assert_eq!(dedup.read_distinct(&mut bus, 0), Some(door));
        assert_eq!(dedup.read_distinct(&mut bus, 0), None);
    }

    #[test]
    fn test_read_distinct_pull_cap() {
        let mut dedup = DedupBuffer::default();
        let mut bus = MockBus::new();
        let f = frame(0x3B4, &[0x5C, 0x03, 0x00]);
        assert!(dedup.observe(&f, 0));
        for _ in 0..10 {
            bus.push_rx(f.clone());
        }
        let fresh = frame(0x130, &[0x45]);
        bus.push_rx(fresh.clone());

        // Six duplicates burn the first call, the second call reaches the
        // remaining four and then the fresh frame.
        assert_eq!(dedup.read_distinct(&mut bus, 10), None);
        assert_eq!(bus.rx_pending(), 5);
        assert_eq!(dedup.read_distinct(&mut bus, 10), Some(fresh));
    }

    proptest! {
        #[test]
        fn prop_second_copy_within_window_is_suppressed(
            id in 0u16..=0x7FF,
            payload in proptest::collection::vec(any::<u8>(), 0..=8),
            start in any::<u32>(),
            gap in 0u32..=300,
        ) {
            let mut dedup = DedupBuffer::default();
            let f = CanFrame::new(id, &payload).unwrap();
            prop_assert!(dedup.observe(&f, start));
            prop_assert!(!dedup.observe(&f, start.wrapping_add(gap)));
        }

        #[test]
        fn prop_copy_after_window_is_new(
            id in 0u16..=0x7FF,
            payload in proptest::collection::vec(any::<u8>(), 0..=8),
            start in any::<u32>(),
            gap in 301u32..=100_000,
        ) {
            let mut dedup = DedupBuffer::default();
            let f = CanFrame::new(id, &payload).unwrap();
            prop_assert!(dedup.observe(&f, start));
            prop_assert!(dedup.observe(&f, start.wrapping_add(gap)));
        }
    }
}
