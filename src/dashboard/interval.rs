use rand::Rng;
use std::time::Duration;

/// Bounds of the randomized delay between two fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollInterval {
    min: Duration,
    max: Duration,
}

impl Default for PollInterval {
    fn default() -> Self {
        Self::from_secs(3, 15)
    }
}

impl PollInterval {
    /// Bounds are inclusive; they are swapped when given in the wrong order.
    pub fn new(min: Duration, max: Duration) -> Self {
        if max < min {
            Self { min: max, max: min }
        } else {
            Self { min, max }
        }
    }

    pub fn from_secs(min: u64, max: u64) -> Self {
        Self::new(Duration::from_secs(min), Duration::from_secs(max))
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Draws the next delay. Whole-second bounds yield whole-second delays.
    pub fn next(&self) -> Duration {
        let mut rng = rand::thread_rng();
        if self.min.subsec_nanos() == 0 && self.max.subsec_nanos() == 0 {
            Duration::from_secs(rng.gen_range(self.min.as_secs()..=self.max.as_secs()))
        } else {
            let min = self.min.as_millis() as u64;
            let max = self.max.as_millis() as u64;
            Duration::from_millis(rng.gen_range(min..=max))
        }
    }
}
