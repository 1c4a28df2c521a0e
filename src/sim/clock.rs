//! Single logical clock with scheduled callbacks
//!
//! Time only moves when the owner advances it. A scheduled entry never fires
//! before its due time, and entries due at the same instant fire in the order
//! they were scheduled.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug, Clone)]
struct Scheduled<E> {
    due: u64,
    seq: u64,
    event: E,
}

impl<E> PartialEq for Scheduled<E> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<E> Eq for Scheduled<E> {}

impl<E> PartialOrd for Scheduled<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Scheduled<E> {
    // Reversed so the max-heap pops the earliest (due, seq) first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug, Clone)]
pub struct Timeline<E> {
    now: u64,
    next_seq: u64,
    queue: BinaryHeap<Scheduled<E>>,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Timeline<E> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    /// Current logical time (ms)
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Schedule `event` to fire `delay` ms from now
    pub fn schedule(&mut self, delay: u64, event: E) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Scheduled {
            due: self.now.saturating_add(delay),
            seq,
            event,
        });
    }

    /// Due time of the next pending entry
    pub fn next_due(&self) -> Option<u64> {
        self.queue.peek().map(|s| s.due)
    }

    /// Pop the next entry due at or before `until`, moving the clock to its
    /// due time. Returns `None` once nothing else is due; the caller then
    /// finishes with `settle(until)`.
    pub fn pop_due(&mut self, until: u64) -> Option<E> {
        if self.queue.peek()?.due > until {
            return None;
        }
        let entry = self.queue.pop()?;
        self.now = self.now.max(entry.due);
        Some(entry.event)
    }

    /// Move the clock forward to `until` without firing anything
    pub fn settle(&mut self, until: u64) {
        self.now = self.now.max(until);
    }

    /// Drop every pending entry and rewind to zero
    pub fn reset(&mut self) {
        self.queue.clear();
        self.now = 0;
    }
}
