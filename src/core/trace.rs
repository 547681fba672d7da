use super::types::SimTime;
use serde::Serialize;

/// The transition a trace record captures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Transition {
    /// Component created and given its initial wake-up event
    Spawn,
    /// Component became current and its process was re-entered
    Resume,
    /// Component scheduled a wake-up after a hold
    Hold,
    /// Component suspended indefinitely
    Passivate,
    /// Component re-entered the schedule from passive
    Activate,
    /// Component joined a resource's requester queue
    Wait,
    /// Component became a claimer on request
    Claim,
    /// Component dropped its claim
    Release,
    /// Waiting component promoted to claimer on another's release
    Promote,
    /// Process finished; component removed everywhere
    Terminate,
}

/// One entry of the event trace: which component did what, and when.
///
/// Two runs built with the same seed and the same model logic produce
/// identical record sequences, which is what the determinism tests compare.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceRecord {
    pub time: SimTime,
    pub component: String,
    pub transition: Transition,
}

/// Ordered log of component transitions, recorded by the environment
#[derive(Debug, Clone)]
pub struct Trace {
    records: Vec<TraceRecord>,
    enabled: bool,
}

impl Trace {
    /// Create an enabled, empty trace
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            enabled: true,
        }
    }

    /// Enable or disable recording. Disabling long statistical runs avoids
    /// unbounded growth of the record vector.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Check whether recording is on
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn record(&mut self, time: SimTime, component: &str, transition: Transition) {
        if self.enabled {
            self.records.push(TraceRecord {
                time,
                component: component.to_string(),
                transition,
            });
        }
    }

    /// All records in firing order
    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    /// Drop recorded history without touching the enabled flag
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl Default for Trace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_trace_records_nothing() {
        let mut trace = Trace::new();
        trace.set_enabled(false);
        trace.record(1.0, "client.0", Transition::Spawn);
        assert!(trace.records().is_empty());

        trace.set_enabled(true);
        trace.record(2.0, "client.0", Transition::Resume);
        assert_eq!(trace.records().len(), 1);
    }

    #[test]
    fn test_clear_keeps_enabled_flag() {
        let mut trace = Trace::new();
        trace.record(1.0, "client.0", Transition::Spawn);
        trace.clear();
        assert!(trace.records().is_empty());
        assert!(trace.is_enabled());
    }
}
