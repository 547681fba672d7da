use super::monitor::{DurationMonitor, LevelMonitor};
use super::types::{ComponentId, SimTime};
use std::collections::VecDeque;

/// An ordered set of components with entry timestamps and attached
/// statistics: a `length` level monitor sampled on every mutation, and a
/// `length_of_stay` duration monitor fed once per completed stay.
///
/// Used standalone by models (a "system" or waiting-line queue) and embedded
/// in resources as the requester and claimer sets. Discipline is strictly
/// FIFO: entry timestamps are non-decreasing from head to tail.
#[derive(Debug, Clone)]
pub struct Queue {
    name: String,
    members: VecDeque<(ComponentId, SimTime)>,
    length: LevelMonitor,
    length_of_stay: DurationMonitor,
}

impl Queue {
    /// Create an empty queue observed from time `now`
    pub fn new(name: impl Into<String>, now: SimTime) -> Self {
        Self {
            name: name.into(),
            members: VecDeque::new(),
            length: LevelMonitor::new(now, 0.0),
            length_of_stay: DurationMonitor::new(),
        }
    }

    /// Get the queue name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append `component` at the tail
    pub fn add(&mut self, component: ComponentId, now: SimTime) {
        if let Some(&(_, tail_time)) = self.members.back() {
            assert!(
                now >= tail_time,
                "FIFO order violated on '{}': entry at {} after tail at {}",
                self.name,
                now,
                tail_time
            );
        }
        self.members.push_back((component, now));
        self.length.record(now, self.members.len() as f64);
    }

    /// Remove `component` wherever it sits, recording its completed stay.
    /// Returns the entry time, or `None` if it was not a member.
    pub fn remove(&mut self, component: ComponentId, now: SimTime) -> Option<SimTime> {
        let position = self.members.iter().position(|&(id, _)| id == component)?;
        let (_, entered) = self.members.remove(position).unwrap();
        self.length.record(now, self.members.len() as f64);
        self.length_of_stay.record(now, now - entered);
        Some(entered)
    }

    /// Remove and return the head member, recording its completed stay
    pub fn pop_head(&mut self, now: SimTime) -> Option<ComponentId> {
        let (component, entered) = self.members.pop_front()?;
        self.length.record(now, self.members.len() as f64);
        self.length_of_stay.record(now, now - entered);
        Some(component)
    }

    /// Get the head member without removing it
    pub fn head(&self) -> Option<ComponentId> {
        self.members.front().map(|&(id, _)| id)
    }

    /// Check membership
    pub fn contains(&self, component: ComponentId) -> bool {
        self.members.iter().any(|&(id, _)| id == component)
    }

    /// Position of `component` from the head, if a member
    pub fn position(&self, component: ComponentId) -> Option<usize> {
        self.members.iter().position(|&(id, _)| id == component)
    }

    /// Current number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Entry timestamps from head to tail; non-decreasing by construction
    pub fn entry_times(&self) -> impl Iterator<Item = SimTime> + '_ {
        self.members.iter().map(|&(_, entered)| entered)
    }

    /// Time-weighted queue-length statistics
    pub fn length(&self) -> &LevelMonitor {
        &self.length
    }

    /// Completed-stay statistics
    pub fn length_of_stay(&self) -> &DurationMonitor {
        &self.length_of_stay
    }

    /// Restart both monitors at `now`, keeping current members. Used for
    /// warm-up-period exclusion.
    pub fn reset_monitors(&mut self, now: SimTime) {
        self.length.reset(now);
        self.length_of_stay.reset();
    }
}
