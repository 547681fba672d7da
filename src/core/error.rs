use super::types::{ComponentId, ComponentState, SimTime};

/// Errors reported back to model code by the kernel primitives.
///
/// None of these corrupt kernel state: a failed call leaves the scheduler,
/// resources, and monitors exactly as they were, and other components keep
/// running. Structural invariant violations (capacity overrun, clock moving
/// backwards) are kernel bugs and panic instead.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Attempted to schedule an event strictly before the current time
    Causality { scheduled: SimTime, now: SimTime },
    /// `hold` called with a negative duration
    InvalidDuration(f64),
    /// `release` called by a component not currently claiming the resource
    NotClaiming {
        component: ComponentId,
        resource: String,
    },
    /// `request` called by a component already claiming the same resource
    AlreadyClaiming {
        component: ComponentId,
        resource: String,
    },
    /// `next`/`step` called with no pending events; the run is idle
    EmptySchedule,
    /// `activate` called on a component that is neither passive nor a
    /// re-timeable scheduled one
    IllegalActivation {
        component: ComponentId,
        state: ComponentState,
    },
    /// A suspension primitive was invoked on behalf of a component that is
    /// not the one currently executing
    NotCurrent(ComponentId),
    /// The component handle does not refer to a registered component
    UnknownComponent(ComponentId),
}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimError::Causality { scheduled, now } => {
                write!(f, "cannot schedule at {} before current time {}", scheduled, now)
            }
            SimError::InvalidDuration(d) => {
                write!(f, "hold duration must be non-negative, got {}", d)
            }
            SimError::NotClaiming { component, resource } => {
                write!(f, "{} does not claim resource '{}'", component, resource)
            }
            SimError::AlreadyClaiming { component, resource } => {
                write!(f, "{} already claims resource '{}'", component, resource)
            }
            SimError::EmptySchedule => write!(f, "no pending events"),
            SimError::IllegalActivation { component, state } => {
                write!(f, "cannot activate {} in state '{}'", component, state)
            }
            SimError::NotCurrent(component) => {
                write!(f, "{} is not the currently executing component", component)
            }
            SimError::UnknownComponent(component) => {
                write!(f, "{} is not registered", component)
            }
        }
    }
}

impl std::error::Error for SimError {}
