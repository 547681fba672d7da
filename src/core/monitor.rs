use super::types::SimTime;

/// Time-weighted statistics for a quantity that changes in steps, such as a
/// queue length or a claimer count.
///
/// A new sample is recorded on every change of the tracked quantity; the
/// value is assumed to hold until the next sample. `mean` closes the tail
/// interval at the caller-supplied clock time, so the period after the last
/// change still carries its weight.
#[derive(Debug, Clone)]
pub struct LevelMonitor {
    samples: Vec<(SimTime, f64)>,
    origin: SimTime,
    last_time: SimTime,
    last_value: f64,
    weighted_area: f64,
}

impl LevelMonitor {
    /// Create a monitor observing `initial` from time `start`
    pub fn new(start: SimTime, initial: f64) -> Self {
        Self {
            samples: vec![(start, initial)],
            origin: start,
            last_time: start,
            last_value: initial,
            weighted_area: 0.0,
        }
    }

    /// Record a change of the tracked quantity at `time`
    pub fn record(&mut self, time: SimTime, value: f64) {
        assert!(
            time >= self.last_time,
            "level sample out of order: {} after {}",
            time,
            self.last_time
        );
        self.weighted_area += self.last_value * (time - self.last_time);
        self.samples.push((time, value));
        self.last_time = time;
        self.last_value = value;
    }

    /// Current value of the tracked quantity
    pub fn value(&self) -> f64 {
        self.last_value
    }

    /// Time-weighted mean over `[origin, now]`, the tail interval closed at
    /// `now`. With no elapsed time this is just the current value.
    pub fn mean(&self, now: SimTime) -> f64 {
        let elapsed = now - self.origin;
        if elapsed <= 0.0 {
            return self.last_value;
        }
        let tail = self.last_value * (now - self.last_time);
        (self.weighted_area + tail) / elapsed
    }

    /// Ordered `(time, value)` sample series
    pub fn samples(&self) -> &[(SimTime, f64)] {
        &self.samples
    }

    /// Discard history and restart the observation window at `now`, keeping
    /// the current value. Used to exclude a warm-up period without touching
    /// the simulation clock.
    pub fn reset(&mut self, now: SimTime) {
        self.samples.clear();
        self.samples.push((now, self.last_value));
        self.origin = now;
        self.last_time = now;
        self.weighted_area = 0.0;
    }
}

/// Arithmetic statistics over completed intervals, such as sojourn times or
/// waiting times. Fed exactly once per completed stay.
#[derive(Debug, Clone, Default)]
pub struct DurationMonitor {
    samples: Vec<(SimTime, f64)>,
    sum: f64,
}

impl DurationMonitor {
    /// Create an empty monitor
    pub fn new() -> Self {
        Self {
            samples: Vec::new(),
            sum: 0.0,
        }
    }

    /// Record one completed interval of length `duration`, finished at `time`
    pub fn record(&mut self, time: SimTime, duration: f64) {
        debug_assert!(duration >= 0.0, "negative stay duration {}", duration);
        self.samples.push((time, duration));
        self.sum += duration;
    }

    /// Arithmetic mean of recorded durations; zero when nothing was recorded
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.sum / self.samples.len() as f64
    }

    /// Number of completed intervals recorded
    pub fn count(&self) -> usize {
        self.samples.len()
    }

    /// Ordered `(completion time, duration)` sample series
    pub fn samples(&self) -> &[(SimTime, f64)] {
        &self.samples
    }

    /// Discard all samples
    pub fn reset(&mut self) {
        self.samples.clear();
        self.sum = 0.0;
    }
}
