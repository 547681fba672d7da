use super::environment::Environment;
use super::error::SimError;
use super::types::{ComponentId, ComponentState, SimTime};

/// A unit of simulated behavior, driven as an explicit state machine.
///
/// The environment calls `resume` every time a wake-up event for the
/// component fires. The component runs until it arms a suspension point
/// (`hold`, a blocking `request`, or `passivate`) and then returns; the
/// internal phase it keeps is the continuation for the next call. Returning
/// without arming a suspension terminates the process.
///
/// Computation inside `resume` is atomic with respect to other components:
/// nothing else runs until it returns.
///
/// # Example
///
/// ```
/// use desim::core::component::Process;
/// use desim::core::environment::Environment;
/// use desim::core::error::SimError;
/// use desim::core::types::{ComponentId, RequestOutcome, ResourceId};
///
/// enum Phase { Arrive, Service, Leave }
///
/// struct Client { phase: Phase, server: ResourceId, service_time: f64 }
///
/// impl Process for Client {
///     fn resume(&mut self, env: &mut Environment, me: ComponentId) -> Result<(), SimError> {
///         loop {
///             match self.phase {
///                 Phase::Arrive => {
///                     self.phase = Phase::Service;
///                     if env.request_one(me, self.server)? == RequestOutcome::Queued {
///                         return Ok(()); // resumed as a claimer later
///                     }
///                 }
///                 Phase::Service => {
///                     self.phase = Phase::Leave;
///                     env.hold(me, self.service_time)?;
///                     return Ok(());
///                 }
///                 Phase::Leave => {
///                     env.release(me, self.server)?;
///                     return Ok(()); // still current: terminates
///                 }
///             }
///         }
///     }
/// }
/// ```
pub trait Process {
    /// Run until the next suspension point. Errors terminate the process
    /// and surface from the environment's `step`/`run`.
    fn resume(&mut self, env: &mut Environment, me: ComponentId) -> Result<(), SimError>;
}

/// Bookkeeping slot for one component in the environment's table.
///
/// The process box is taken out for the duration of a `resume` call so the
/// component can borrow the environment mutably, and put back afterwards.
pub(crate) struct ComponentSlot {
    pub name: String,
    pub state: ComponentState,
    pub process: Option<Box<dyn Process>>,
    pub created_at: SimTime,
}

impl ComponentSlot {
    pub fn new(name: String, process: Box<dyn Process>, created_at: SimTime) -> Self {
        Self {
            name,
            state: ComponentState::Scheduled,
            process: Some(process),
            created_at,
        }
    }
}
