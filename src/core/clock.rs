use super::types::SimTime;

/// Current simulation time. Only the environment's dispatch loop advances it.
#[derive(Debug, Clone)]
pub struct Clock {
    now: SimTime,
}

impl Clock {
    /// Create a clock at time zero
    pub fn new() -> Self {
        Self { now: 0.0 }
    }

    /// Get the current time
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Advance to `time`. Moving backwards is a kernel bug, not a model
    /// error, so it aborts.
    pub fn advance(&mut self, time: SimTime) {
        assert!(
            time >= self.now,
            "clock moved backwards: {} -> {}",
            self.now,
            time
        );
        self.now = time;
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
