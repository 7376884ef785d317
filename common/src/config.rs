use std::time::Duration;

/// Default liveness timeout used when sweeping stale registrations.
pub const DEFAULT_LIVENESS_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct Config {
    /// Sweep dead registrations before listing ports.
    pub clean: bool,
    /// How long a registration may stay silent before it counts as dead.
    pub liveness_timeout: Duration,
    /// Concurrent detail fetches. `1` keeps the scan strictly sequential.
    pub jobs: usize,
    /// Output reduction level, `0` prints everything.
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clean: true,
            liveness_timeout: DEFAULT_LIVENESS_TIMEOUT,
            jobs: 1,
            quiet: 0,
        }
    }
}

impl Config {
    pub fn jobs(&self) -> usize {
        self.jobs.max(1)
    }
}
