//! Deferred events keyed by monotonic clock time.
//!
//! Escape deadlines, hurt-animation completion and effect expiry all go
//! through one queue that the session polls once per tick.  Events refer to
//! pooled entities by generation-checked handle, so an event that outlives
//! its entity simply fails to resolve.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::pool::PoolHandle;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deferred {
    /// A creature reached the far edge.
    Escape(PoolHandle),
    /// A creature's hurt animation finished; return it to the pool.
    HurtFinished(PoolHandle),
    EffectExpired(PoolHandle),
}

#[derive(Debug)]
struct Entry {
    due_ms: u64,
    /// Insertion order; keeps events with the same due time FIFO.
    seq: u64,
    event: Deferred,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due_ms, self.seq).cmp(&(other.due_ms, other.seq))
    }
}

#[derive(Debug, Default)]
pub struct Timeline {
    queue: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: u64, event: Deferred) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Entry { due_ms, seq, event }));
    }

    /// Pop the earliest event due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Deferred> {
        match self.queue.peek() {
            Some(Reverse(entry)) if entry.due_ms <= now_ms => {
                self.queue.pop().map(|Reverse(entry)| entry.event)
            }
            _ => None,
        }
    }

    /// Drop every pending occurrence of `event`.
    pub fn cancel(&mut self, event: Deferred) {
        self.queue.retain(|Reverse(entry)| entry.event != event);
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn next_due(&self) -> Option<u64> {
        self.queue.peek().map(|Reverse(entry)| entry.due_ms)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
