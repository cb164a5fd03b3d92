use std::time::Duration;

use reviewer::ReviewConfig;

/// Per-run knobs. `max_workers` bounds concurrent `workerFn` invocations;
/// `worker_timeout` (if set) bounds a single attempt, not the whole retry sequence.
#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    pub max_workers: usize,
    pub worker_timeout: Option<Duration>,
    pub review_config: ReviewConfig,
    pub retry_base_delay: Duration,
    pub retry_max_delay: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            max_workers: 4,
            worker_timeout: None,
            review_config: ReviewConfig::default(),
            retry_base_delay: Duration::from_millis(500),
            retry_max_delay: Duration::from_secs(30),
        }
    }
}

impl SchedulerConfig {
    /// Exponential back-off for the attempt about to be made: `attempts_so_far` is
    /// the number of attempts already spent (1 after the first failure).
    pub fn backoff_for(&self, attempts_so_far: u32) -> Duration {
        let factor = 1u32.checked_shl(attempts_so_far.saturating_sub(1)).unwrap_or(u32::MAX);
        self.retry_base_delay
            .saturating_mul(factor)
            .min(self.retry_max_delay)
    }
}
