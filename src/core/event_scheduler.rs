use super::error::SimError;
use super::types::{ComponentId, SimTime};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

/// A pending wake-up for a component.
///
/// `sequence` is assigned at scheduling time and only breaks ties between
/// equal-time events: insertion order, not wall-clock.
#[derive(Debug, Clone, Copy)]
pub struct ScheduledEvent {
    pub time: SimTime,
    pub sequence: u64,
    pub target: ComponentId,
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time && self.sequence == other.sequence
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Ordered queue of pending `(time, sequence, target)` entries.
///
/// A component has at most one live event at a time; re-scheduling replaces
/// the previous entry. Cancelled and replaced entries stay in the heap and
/// are discarded lazily on pop, keyed by the `live` map.
pub struct EventScheduler {
    event_queue: BinaryHeap<ScheduledEvent>,
    live: HashMap<ComponentId, u64>,
    sequence_counter: u64,
}

impl EventScheduler {
    /// Create a new EventScheduler
    pub fn new() -> Self {
        Self {
            event_queue: BinaryHeap::new(),
            live: HashMap::new(),
            sequence_counter: 0,
        }
    }

    /// Schedule a wake-up for `target` at absolute `time`, replacing any
    /// pending one. Rejects times before `now`.
    pub fn schedule(
        &mut self,
        target: ComponentId,
        time: SimTime,
        now: SimTime,
    ) -> Result<u64, SimError> {
        if time < now {
            return Err(SimError::Causality {
                scheduled: time,
                now,
            });
        }

        let sequence = self.sequence_counter;
        self.sequence_counter += 1;

        self.event_queue.push(ScheduledEvent {
            time,
            sequence,
            target,
        });
        self.live.insert(target, sequence);
        Ok(sequence)
    }

    /// Cancel the pending event for `target`, if any. Returns whether one
    /// was pending. The heap entry is dropped lazily.
    pub fn cancel(&mut self, target: ComponentId) -> bool {
        self.live.remove(&target).is_some()
    }

    /// Remove and return the earliest live event by `(time, sequence)`
    pub fn next(&mut self) -> Result<ScheduledEvent, SimError> {
        while let Some(event) = self.event_queue.pop() {
            if self.live.get(&event.target) == Some(&event.sequence) {
                self.live.remove(&event.target);
                return Ok(event);
            }
            // Stale entry: cancelled or replaced by a later schedule call
        }
        Err(SimError::EmptySchedule)
    }

    /// Get the time of the earliest live event without removing it
    pub fn peek_next_time(&mut self) -> Option<SimTime> {
        while let Some(event) = self.event_queue.peek() {
            if self.live.get(&event.target) == Some(&event.sequence) {
                return Some(event.time);
            }
            self.event_queue.pop();
        }
        None
    }

    /// Check if any live events remain
    pub fn has_events(&mut self) -> bool {
        self.peek_next_time().is_some()
    }

    /// Check whether `target` has a pending event
    pub fn is_scheduled(&self, target: ComponentId) -> bool {
        self.live.contains_key(&target)
    }

    /// Number of live pending events
    pub fn pending(&self) -> usize {
        self.live.len()
    }
}

impl Default for EventScheduler {
    fn default() -> Self {
        Self::new()
    }
}
