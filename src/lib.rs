pub mod core;

// Re-export commonly used types
pub use crate::core::component::Process;
pub use crate::core::environment::Environment;
pub use crate::core::error::SimError;
pub use crate::core::types::{
    ComponentId, ComponentState, QueueId, RequestOutcome, ResourceId, SimTime,
};
