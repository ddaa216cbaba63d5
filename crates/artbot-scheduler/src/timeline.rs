//! Delayed-callback timeline.
//!
//! Holds pending [`PaintStep`]s ordered by deadline, with ties broken by
//! insertion order. Time is a [`Duration`] since an epoch chosen by the
//! owner: the live bot uses a tokio `Instant` taken at startup, tests
//! simply call [`Timeline::set_now`] to move virtual time forward.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

/// One deferred effect of a paint sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaintStep {
    /// Send one line of text to a channel.
    Line { target: String, text: String },
    /// The sequence is over; clear the painting flag.
    Finish,
}

/// One-shot delayed invocation.
pub trait Timer {
    fn schedule_after(&mut self, delay: Duration, step: PaintStep);
}

#[derive(Debug)]
struct Entry {
    deadline: Duration,
    seq: u64,
    step: PaintStep,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
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
        (self.deadline, self.seq).cmp(&(other.deadline, other.seq))
    }
}

/// Ordered queue of pending paint steps.
#[derive(Debug, Default)]
pub struct Timeline {
    now: Duration,
    next_seq: u64,
    pending: BinaryHeap<Reverse<Entry>>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Advance the clock. Time never moves backwards.
    pub fn set_now(&mut self, now: Duration) {
        if now > self.now {
            self.now = now;
        }
    }

    /// Deadline of the earliest pending step.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.peek().map(|Reverse(e)| e.deadline)
    }

    /// Pop the earliest step whose deadline has been reached.
    pub fn pop_due(&mut self) -> Option<PaintStep> {
        match self.pending.peek() {
            Some(Reverse(e)) if e.deadline <= self.now => {
                self.pending.pop().map(|Reverse(e)| e.step)
            }
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Timer for Timeline {
    fn schedule_after(&mut self, delay: Duration, step: PaintStep) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Reverse(Entry {
            deadline: self.now.saturating_add(delay),
            seq,
            step,
        }));
    }
}
