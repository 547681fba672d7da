use super::error::SimError;
use super::monitor::LevelMonitor;
use super::queue::Queue;
use super::types::{ComponentId, SimTime};
use std::collections::HashMap;

/// A capacity-limited entity with a FIFO requester queue and a claimer set.
///
/// Capacity is fixed at construction. Claim and release bookkeeping lives
/// here; the decision of *when* to claim, enqueue, or promote belongs to the
/// environment, which is the only mutator. `|claims| <= capacity` is a
/// structural invariant: overrunning it is a kernel bug and panics.
#[derive(Debug, Clone)]
pub struct Resource {
    name: String,
    capacity: u64,
    claimed: u64,
    claims: HashMap<ComponentId, u64>,
    claimers: Queue,
    requesters: Queue,
    pending_quantity: HashMap<ComponentId, u64>,
    occupancy: LevelMonitor,
}

impl Resource {
    /// Create a resource with fixed `capacity` units, observed from `now`
    pub fn new(name: impl Into<String>, capacity: u64, now: SimTime) -> Self {
        let name = name.into();
        assert!(capacity > 0, "resource '{}' needs capacity > 0", name);
        Self {
            claimers: Queue::new(format!("{}.claimers", name), now),
            requesters: Queue::new(format!("{}.requesters", name), now),
            name,
            capacity,
            claimed: 0,
            claims: HashMap::new(),
            pending_quantity: HashMap::new(),
            occupancy: LevelMonitor::new(now, 0.0),
        }
    }

    /// Get the resource name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the fixed capacity
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Total quantity currently claimed
    pub fn claimed(&self) -> u64 {
        self.claimed
    }

    /// Check whether `quantity` more units fit right now
    pub fn fits(&self, quantity: u64) -> bool {
        self.claimed + quantity <= self.capacity
    }

    /// Check whether `component` currently claims this resource
    pub fn is_claiming(&self, component: ComponentId) -> bool {
        self.claims.contains_key(&component)
    }

    /// Number of waiting requesters (spec `length()`)
    pub fn length(&self) -> usize {
        self.requesters.len()
    }

    /// Instantaneous fraction of capacity claimed
    pub fn occupancy_now(&self) -> f64 {
        self.claimed as f64 / self.capacity as f64
    }

    /// Time-weighted occupancy statistics
    pub fn occupancy(&self) -> &LevelMonitor {
        &self.occupancy
    }

    /// The claimer set with its monitors
    pub fn claimers(&self) -> &Queue {
        &self.claimers
    }

    /// The FIFO requester queue with its monitors
    pub fn requesters(&self) -> &Queue {
        &self.requesters
    }

    /// Make `component` a claimer of `quantity` units. The caller must have
    /// established that the quantity fits; a violation here is a kernel bug.
    pub(crate) fn claim(&mut self, component: ComponentId, quantity: u64, now: SimTime) {
        assert!(
            self.fits(quantity),
            "capacity exceeded on '{}': {} + {} > {}",
            self.name,
            self.claimed,
            quantity,
            self.capacity
        );
        self.claimed += quantity;
        self.claims.insert(component, quantity);
        self.claimers.add(component, now);
        self.occupancy.record(now, self.occupancy_now());
    }

    /// Drop `component`'s claim, returning the freed quantity
    pub(crate) fn release_claim(
        &mut self,
        component: ComponentId,
        now: SimTime,
    ) -> Result<u64, SimError> {
        let quantity = self
            .claims
            .remove(&component)
            .ok_or_else(|| SimError::NotClaiming {
                component,
                resource: self.name.clone(),
            })?;
        self.claimed -= quantity;
        self.claimers.remove(component, now);
        self.occupancy.record(now, self.occupancy_now());
        Ok(quantity)
    }

    /// Append `component` to the requester queue for `quantity` units
    pub(crate) fn enqueue_requester(&mut self, component: ComponentId, quantity: u64, now: SimTime) {
        self.pending_quantity.insert(component, quantity);
        self.requesters.add(component, now);
    }

    /// Quantity the head requester is waiting for, if any
    pub(crate) fn head_request(&self) -> Option<(ComponentId, u64)> {
        let head = self.requesters.head()?;
        Some((head, self.pending_quantity[&head]))
    }

    /// Remove the head requester (on promotion)
    pub(crate) fn pop_requester(&mut self, now: SimTime) -> Option<ComponentId> {
        let component = self.requesters.pop_head(now)?;
        self.pending_quantity.remove(&component);
        Some(component)
    }

    /// Drop `component` from the requester queue (on termination). Returns
    /// whether it was waiting here.
    pub(crate) fn remove_requester(&mut self, component: ComponentId, now: SimTime) -> bool {
        self.pending_quantity.remove(&component);
        self.requesters.remove(component, now).is_some()
    }

    /// Restart all attached monitors at `now` for warm-up exclusion
    pub fn reset_monitors(&mut self, now: SimTime) {
        self.claimers.reset_monitors(now);
        self.requesters.reset_monitors(now);
        self.occupancy.reset(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_and_release_bookkeeping() {
        let mut resource = Resource::new("server", 2, 0.0);
        let a = ComponentId(0);
        let b = ComponentId(1);

        resource.claim(a, 1, 1.0);
        resource.claim(b, 1, 2.0);
        assert_eq!(resource.claimed(), 2);
        assert!(!resource.fits(1));
        assert_eq!(resource.occupancy_now(), 1.0);

        assert_eq!(resource.release_claim(a, 3.0), Ok(1));
        assert_eq!(resource.claimed(), 1);
        assert!(resource.fits(1));
        assert!(!resource.is_claiming(a));
        assert!(resource.is_claiming(b));
    }

    #[test]
    fn test_release_without_claim_fails() {
        let mut resource = Resource::new("server", 1, 0.0);
        let result = resource.release_claim(ComponentId(7), 1.0);
        assert_eq!(
            result,
            Err(SimError::NotClaiming {
                component: ComponentId(7),
                resource: "server".to_string()
            })
        );
        assert_eq!(resource.claimed(), 0);
    }

    #[test]
    #[should_panic(expected = "capacity exceeded")]
    fn test_overclaim_panics() {
        let mut resource = Resource::new("server", 1, 0.0);
        resource.claim(ComponentId(0), 1, 0.0);
        resource.claim(ComponentId(1), 1, 0.0);
    }

    #[test]
    fn test_requester_queue_is_fifo() {
        let mut resource = Resource::new("server", 1, 0.0);
        let a = ComponentId(0);
        let b = ComponentId(1);

        resource.enqueue_requester(a, 1, 1.0);
        resource.enqueue_requester(b, 1, 1.0);

        assert_eq!(resource.length(), 2);
        assert_eq!(resource.head_request(), Some((a, 1)));
        assert_eq!(resource.pop_requester(2.0), Some(a));
        assert_eq!(resource.head_request(), Some((b, 1)));
    }

    #[test]
    fn test_remove_requester_on_abandon() {
        let mut resource = Resource::new("server", 1, 0.0);
        let a = ComponentId(0);
        resource.enqueue_requester(a, 1, 1.0);
        assert!(resource.remove_requester(a, 2.0));
        assert!(!resource.remove_requester(a, 2.0));
        assert_eq!(resource.length(), 0);
    }
}
