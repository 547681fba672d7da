use super::clock::Clock;
use super::component::{ComponentSlot, Process};
use super::distributions::Sampler;
use super::error::SimError;
use super::event_scheduler::EventScheduler;
use super::queue::Queue;
use super::resource::Resource;
use super::trace::{Trace, Transition};
use super::types::{ComponentId, ComponentState, QueueId, RequestOutcome, ResourceId, SimTime};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Composes the clock, the event scheduler, and the component, resource, and
/// queue tables; owns the seeded rng and the event trace.
///
/// All shared state is mutated here, on behalf of the currently executing
/// component, inside the single-threaded dispatch loop. An environment is an
/// explicit value: independent replications construct one each and never
/// share anything.
pub struct Environment {
    clock: Clock,
    scheduler: EventScheduler,
    components: Vec<ComponentSlot>,
    resources: Vec<Resource>,
    queues: Vec<Queue>,
    rng: StdRng,
    trace: Trace,
    current: Option<ComponentId>,
    seed: u64,
}

impl Environment {
    /// Create an empty environment at time zero with a seeded rng
    pub fn new(seed: u64) -> Self {
        Self {
            clock: Clock::new(),
            scheduler: EventScheduler::new(),
            components: Vec::new(),
            resources: Vec::new(),
            queues: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            trace: Trace::new(),
            current: None,
            seed,
        }
    }

    /// Get the current simulation time
    pub fn now(&self) -> SimTime {
        self.clock.now()
    }

    /// Get the seed this environment was constructed with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Get the rng shared by all samplers of this run
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Draw one value from `sampler` using the environment's rng
    pub fn sample(&mut self, sampler: &mut dyn Sampler) -> f64 {
        sampler.sample(&mut self.rng)
    }

    // ------------------------------------------------------------------
    // Model setup
    // ------------------------------------------------------------------

    /// Register a resource with fixed `capacity`
    pub fn add_resource(&mut self, name: impl Into<String>, capacity: u64) -> ResourceId {
        let id = ResourceId(self.resources.len());
        self.resources
            .push(Resource::new(name, capacity, self.clock.now()));
        id
    }

    /// Register a standalone queue
    pub fn add_queue(&mut self, name: impl Into<String>) -> QueueId {
        let id = QueueId(self.queues.len());
        self.queues.push(Queue::new(name, self.clock.now()));
        id
    }

    /// Create a component with an immediate wake-up event at the current time
    pub fn spawn(
        &mut self,
        name: impl Into<String>,
        process: Box<dyn Process>,
    ) -> Result<ComponentId, SimError> {
        self.spawn_at(name, process, self.clock.now())
    }

    /// Create a component with its first wake-up at `at`
    pub fn spawn_at(
        &mut self,
        name: impl Into<String>,
        process: Box<dyn Process>,
        at: SimTime,
    ) -> Result<ComponentId, SimError> {
        let now = self.clock.now();
        if at < now {
            return Err(SimError::Causality { scheduled: at, now });
        }

        let id = ComponentId(self.components.len());
        self.components
            .push(ComponentSlot::new(name.into(), process, now));
        self.scheduler.schedule(id, at, now)?;
        self.trace
            .record(now, &self.components[id.0].name, Transition::Spawn);
        debug!("t={}: spawned '{}' ({})", now, self.components[id.0].name, id);
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Suspension primitives, called by the current component's process
    // ------------------------------------------------------------------

    /// Suspend the current component for `duration`, rescheduling it at
    /// `now + duration`. The caller must return from `resume` afterwards.
    pub fn hold(&mut self, me: ComponentId, duration: f64) -> Result<(), SimError> {
        self.require_current(me)?;
        if !(duration >= 0.0) {
            return Err(SimError::InvalidDuration(duration));
        }

        let now = self.clock.now();
        self.scheduler.schedule(me, now + duration, now)?;
        self.components[me.0].state = ComponentState::Scheduled;
        self.trace
            .record(now, &self.components[me.0].name, Transition::Hold);
        Ok(())
    }

    /// Suspend the current component indefinitely. Only `activate` brings it
    /// back. Any pending wake-up is cancelled.
    pub fn passivate(&mut self, me: ComponentId) -> Result<(), SimError> {
        self.require_current(me)?;
        self.scheduler.cancel(me);
        self.components[me.0].state = ComponentState::Passive;
        self.trace
            .record(self.clock.now(), &self.components[me.0].name, Transition::Passivate);
        Ok(())
    }

    /// Request `quantity` units of `resource` for the current component.
    ///
    /// `Granted` means the claim is held and the caller keeps running.
    /// `Queued` means the caller joined the FIFO requester queue and must
    /// return from `resume`; when it is resumed, the claim is held.
    pub fn request(
        &mut self,
        me: ComponentId,
        resource: ResourceId,
        quantity: u64,
    ) -> Result<RequestOutcome, SimError> {
        self.require_current(me)?;
        let now = self.clock.now();

        if self.resources[resource.0].is_claiming(me) {
            return Err(SimError::AlreadyClaiming {
                component: me,
                resource: self.resources[resource.0].name().to_string(),
            });
        }

        if self.resources[resource.0].fits(quantity) {
            self.resources[resource.0].claim(me, quantity, now);
            self.trace
                .record(now, &self.components[me.0].name, Transition::Claim);
            debug!(
                "t={}: '{}' claims {} of '{}'",
                now,
                self.components[me.0].name,
                quantity,
                self.resources[resource.0].name()
            );
            return Ok(RequestOutcome::Granted);
        }

        // A pending hold is superseded by the wait
        self.scheduler.cancel(me);
        self.resources[resource.0].enqueue_requester(me, quantity, now);
        self.components[me.0].state = ComponentState::Waiting;
        self.trace
            .record(now, &self.components[me.0].name, Transition::Wait);
        debug!(
            "t={}: '{}' waits for '{}' at position {}",
            now,
            self.components[me.0].name,
            self.resources[resource.0].name(),
            self.resources[resource.0].length() - 1
        );
        Ok(RequestOutcome::Queued)
    }

    /// Request a single unit of `resource`
    pub fn request_one(
        &mut self,
        me: ComponentId,
        resource: ResourceId,
    ) -> Result<RequestOutcome, SimError> {
        self.request(me, resource, 1)
    }

    /// Drop the current component's claim on `resource`. Freed capacity is
    /// handed to fitting head requesters within the same logical instant: by
    /// the time any other event fires, the claims have already moved.
    pub fn release(&mut self, me: ComponentId, resource: ResourceId) -> Result<(), SimError> {
        self.require_current(me)?;
        let now = self.clock.now();
        self.resources[resource.0].release_claim(me, now)?;
        self.trace
            .record(now, &self.components[me.0].name, Transition::Release);
        debug!(
            "t={}: '{}' releases '{}'",
            now,
            self.components[me.0].name,
            self.resources[resource.0].name()
        );
        self.promote(resource);
        Ok(())
    }

    /// Promote waiting requesters in FIFO order while the head's quantity
    /// fits. Promoted components claim immediately and wake via an event at
    /// the current time, so they run before anything scheduled later.
    fn promote(&mut self, resource: ResourceId) {
        let now = self.clock.now();
        while let Some((head, quantity)) = self.resources[resource.0].head_request() {
            if !self.resources[resource.0].fits(quantity) {
                break;
            }
            self.resources[resource.0].pop_requester(now);
            self.resources[resource.0].claim(head, quantity, now);

            debug_assert_eq!(self.components[head.0].state, ComponentState::Waiting);
            self.components[head.0].state = ComponentState::Scheduled;
            // Waiting components hold no pending event, so this cannot fail
            self.scheduler
                .schedule(head, now, now)
                .expect("wake-up at the current time is never in the past");
            self.trace
                .record(now, &self.components[head.0].name, Transition::Promote);
            debug!(
                "t={}: '{}' promoted to claimer of '{}'",
                now,
                self.components[head.0].name,
                self.resources[resource.0].name()
            );
        }
    }

    /// Move a passive component back into the schedule, waking it at `at`
    /// (default: immediately). Re-timing a scheduled component is allowed;
    /// any other state is an error.
    pub fn activate(
        &mut self,
        target: ComponentId,
        at: Option<SimTime>,
    ) -> Result<(), SimError> {
        let slot = self
            .components
            .get(target.0)
            .ok_or(SimError::UnknownComponent(target))?;
        let now = self.clock.now();
        let time = at.unwrap_or(now);

        match slot.state {
            ComponentState::Passive | ComponentState::Scheduled => {
                self.scheduler.schedule(target, time, now)?;
                self.components[target.0].state = ComponentState::Scheduled;
                self.trace
                    .record(now, &self.components[target.0].name, Transition::Activate);
                debug!(
                    "t={}: '{}' activated for t={}",
                    now, self.components[target.0].name, time
                );
                Ok(())
            }
            state => Err(SimError::IllegalActivation {
                component: target,
                state,
            }),
        }
    }

    /// Cancel the pending wake-up of a scheduled component, leaving it
    /// passive. No-op (returns false) if nothing was pending.
    pub fn cancel(&mut self, target: ComponentId) -> bool {
        let cancelled = self.scheduler.cancel(target);
        if cancelled {
            self.components[target.0].state = ComponentState::Passive;
        }
        cancelled
    }

    // ------------------------------------------------------------------
    // Queue membership (callable by any component, for any component)
    // ------------------------------------------------------------------

    /// Append `component` to a standalone queue
    pub fn queue_add(&mut self, queue: QueueId, component: ComponentId) {
        let now = self.clock.now();
        self.queues[queue.0].add(component, now);
    }

    /// Remove and return the head of a standalone queue
    pub fn queue_pop(&mut self, queue: QueueId) -> Option<ComponentId> {
        let now = self.clock.now();
        self.queues[queue.0].pop_head(now)
    }

    /// Remove `component` from a standalone queue; false if not a member
    pub fn queue_remove(&mut self, queue: QueueId, component: ComponentId) -> bool {
        let now = self.clock.now();
        self.queues[queue.0].remove(component, now).is_some()
    }

    // ------------------------------------------------------------------
    // Control surface
    // ------------------------------------------------------------------

    /// Advance to and execute exactly one event; returns the new clock time.
    /// `EmptySchedule` means the run is idle.
    pub fn step(&mut self) -> Result<SimTime, SimError> {
        let event = self.scheduler.next()?;
        self.clock.advance(event.time);
        self.dispatch(event.target)?;
        Ok(self.clock.now())
    }

    /// Run until the next event would fire past `until`, or the schedule
    /// drains. The clock ends at `until` even if the schedule drained early,
    /// so time-weighted means cover the whole window.
    pub fn run(&mut self, until: SimTime) -> Result<(), SimError> {
        loop {
            match self.scheduler.peek_next_time() {
                Some(time) if time <= until => {
                    self.step()?;
                }
                _ => break,
            }
        }
        if until > self.clock.now() {
            self.clock.advance(until);
        }
        Ok(())
    }

    /// Time of the earliest pending event, if any
    pub fn next_event_time(&mut self) -> Option<SimTime> {
        self.scheduler.peek_next_time()
    }

    /// Check whether any events are pending
    pub fn has_events(&mut self) -> bool {
        self.scheduler.has_events()
    }

    /// Resume the component whose event fired. A process that returns
    /// without arming a suspension has finished; one that returns an error
    /// is terminated and the error surfaces to the `step`/`run` caller.
    fn dispatch(&mut self, id: ComponentId) -> Result<(), SimError> {
        let now = self.clock.now();
        self.components[id.0].state = ComponentState::Current;
        self.current = Some(id);
        self.trace
            .record(now, &self.components[id.0].name, Transition::Resume);
        debug!("t={}: resuming '{}'", now, self.components[id.0].name);

        let mut process = self.components[id.0]
            .process
            .take()
            .expect("current component has a process");
        let result = process.resume(self, id);
        self.components[id.0].process = Some(process);
        self.current = None;

        match result {
            Ok(()) => {
                if self.components[id.0].state == ComponentState::Current {
                    // No suspension armed: the process completed
                    self.terminate(id);
                }
                Ok(())
            }
            Err(error) => {
                warn!(
                    "t={}: '{}' failed: {}",
                    now, self.components[id.0].name, error
                );
                self.terminate(id);
                Err(error)
            }
        }
    }

    /// Remove a component from every scheduler, resource, and queue
    /// structure it participates in. Held claims are released, with
    /// promotion, exactly as an explicit release would.
    fn terminate(&mut self, id: ComponentId) {
        let now = self.clock.now();
        self.scheduler.cancel(id);

        for index in 0..self.resources.len() {
            if self.resources[index].is_claiming(id) {
                self.resources[index]
                    .release_claim(id, now)
                    .expect("claim checked above");
                self.promote(ResourceId(index));
            }
            self.resources[index].remove_requester(id, now);
        }
        for queue in &mut self.queues {
            queue.remove(id, now);
        }

        self.components[id.0].state = ComponentState::Terminated;
        self.components[id.0].process = None;
        self.trace
            .record(now, &self.components[id.0].name, Transition::Terminate);
        debug!("t={}: '{}' terminated", now, self.components[id.0].name);
    }

    fn require_current(&self, me: ComponentId) -> Result<(), SimError> {
        if self.components.get(me.0).is_none() {
            return Err(SimError::UnknownComponent(me));
        }
        if self.current != Some(me) {
            return Err(SimError::NotCurrent(me));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Inspection surface
    // ------------------------------------------------------------------

    /// Get a resource for inspection
    pub fn resource(&self, id: ResourceId) -> &Resource {
        &self.resources[id.0]
    }

    /// Get a standalone queue for inspection
    pub fn queue(&self, id: QueueId) -> &Queue {
        &self.queues[id.0]
    }

    /// Get a component's lifecycle state
    pub fn state(&self, component: ComponentId) -> Result<ComponentState, SimError> {
        self.components
            .get(component.0)
            .map(|slot| slot.state)
            .ok_or(SimError::UnknownComponent(component))
    }

    /// Check whether a component is passive; false for unknown handles
    pub fn is_passive(&self, component: ComponentId) -> bool {
        self.state(component) == Ok(ComponentState::Passive)
    }

    /// Time the component was spawned
    pub fn created_at(&self, component: ComponentId) -> Result<SimTime, SimError> {
        self.components
            .get(component.0)
            .map(|slot| slot.created_at)
            .ok_or(SimError::UnknownComponent(component))
    }

    /// Get a component's name
    pub fn component_name(&self, component: ComponentId) -> Result<&str, SimError> {
        self.components
            .get(component.0)
            .map(|slot| slot.name.as_str())
            .ok_or(SimError::UnknownComponent(component))
    }

    /// The event trace recorded so far
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Toggle trace recording
    pub fn set_tracing(&mut self, enabled: bool) {
        self.trace.set_enabled(enabled);
    }

    /// Drop trace history, keeping the clock and all model state
    pub fn clear_trace(&mut self) {
        self.trace.clear();
    }

    /// Restart every queue and resource monitor at the current time, without
    /// resetting the clock. Call after a warm-up period so steady-state
    /// statistics exclude the transient.
    pub fn reset_monitors(&mut self) {
        let now = self.clock.now();
        for resource in &mut self.resources {
            resource.reset_monitors(now);
        }
        for queue in &mut self.queues {
            queue.reset_monitors(now);
        }
    }
}
