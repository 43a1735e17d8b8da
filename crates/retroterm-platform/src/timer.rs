//! Virtual-clock timer queue.
//!
//! Components schedule events at absolute deadlines on the session clock
//! (milliseconds since session start) and drain them with [`TimerQueue::pop_due`]
//! as the clock advances. Entries fire in deadline order; entries sharing a
//! deadline fire in the order they were scheduled. Every pending entry can be
//! cancelled individually or all at once, which is how a session tears down
//! without leaving callbacks behind.

use std::collections::{BTreeMap, HashMap};

/// Handle to a scheduled timer, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// A queue of events keyed by their deadline on the session clock.
#[derive(Debug)]
pub struct TimerQueue<E> {
    pending: BTreeMap<(u64, TimerId), E>,
    deadlines: HashMap<TimerId, u64>,
    next_id: u64,
}

impl<E> TimerQueue<E> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            pending: BTreeMap::new(),
            deadlines: HashMap::new(),
            next_id: 0,
        }
    }

    /// Schedule `event` to fire at `deadline_ms`.
    pub fn schedule_at(&mut self, deadline_ms: u64, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.insert((deadline_ms, id), event);
        self.deadlines.insert(id, deadline_ms);
        id
    }

    /// Cancel one timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id) {
            Some(deadline) => self.pending.remove(&(deadline, id)).is_some(),
            None => false,
        }
    }

    /// Cancel every pending timer, returning how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        self.deadlines.clear();
        dropped
    }

    /// Remove and return the earliest event whose deadline is `<= now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(u64, E)> {
        let (&(deadline, id), _) = self.pending.first_key_value()?;
        if deadline > now_ms {
            return None;
        }
        self.deadlines.remove(&id);
        self.pending
            .remove(&(deadline, id))
            .map(|event| (deadline, event))
    }

    /// Deadline of the next pending event, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.keys().next().map(|&(deadline, _)| deadline)
    }

    /// Whether a given timer is still pending.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no timers are pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}
