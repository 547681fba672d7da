/// Simulation time. Logical, unitless, monotonically non-decreasing.
pub type SimTime = f64;

/// Handle for a component registered in an environment.
///
/// Indexes into the environment's component table; slots are never reused
/// within a run, so a handle stays valid (if possibly terminated) for the
/// whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub(crate) usize);

impl ComponentId {
    /// Get the raw table index
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "component#{}", self.0)
    }
}

/// Handle for a resource registered in an environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceId(pub(crate) usize);

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "resource#{}", self.0)
    }
}

/// Handle for a standalone queue registered in an environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueueId(pub(crate) usize);

impl std::fmt::Display for QueueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "queue#{}", self.0)
    }
}

/// Lifecycle state of a component. Exactly one state holds at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentState {
    /// Has a pending timed event in the scheduler
    Scheduled,
    /// Actively executing; at most one component at a time
    Current,
    /// Suspended indefinitely, not in the event queue
    Passive,
    /// Suspended inside a resource's requester queue
    Waiting,
    /// Process finished; removed from all scheduler and resource structures
    Terminated,
}

impl std::fmt::Display for ComponentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ComponentState::Scheduled => "scheduled",
            ComponentState::Current => "current",
            ComponentState::Passive => "passive",
            ComponentState::Waiting => "waiting",
            ComponentState::Terminated => "terminated",
        };
        write!(f, "{}", name)
    }
}

/// Outcome of a resource request made by the current component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Capacity was available; the caller is now a claimer and keeps running
    Granted,
    /// Capacity was exhausted; the caller joined the requester queue and must
    /// return from `resume`. By the time it is resumed, the claim is held.
    Queued,
}
