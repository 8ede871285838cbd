//! Periodic reporting of bucket growth

use crate::producer::check_interval;
use crate::repository::{PriorityRepository, TierCounts};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use todo_core::{Priority, Result};
use tracing::info;

/// Remembers the last observed bucket sizes and reports growth.
///
/// Only strictly positive deltas are reported. A bucket that shrank simply
/// becomes the new baseline.
#[derive(Debug, Clone, Default)]
pub struct AdditionTracker {
    last: TierCounts,
}

impl AdditionTracker {
    pub fn new(baseline: TierCounts) -> Self {
        Self { last: baseline }
    }

    /// Tiers that grew since the previous observation, with the growth
    pub fn observe(&mut self, current: TierCounts) -> Vec<(Priority, usize)> {
        let grown = Priority::ALL
            .into_iter()
            .filter_map(|tier| {
                let delta = current.get(tier).checked_sub(self.last.get(tier))?;
                (delta > 0).then_some((tier, delta))
            })
            .collect();
        self.last = current;
        grown
    }
}

pub struct AdditionLogger {
    repo: Arc<PriorityRepository>,
    interval: Duration,
}

impl AdditionLogger {
    /// Fails when `interval` is zero
    pub fn new(repo: Arc<PriorityRepository>, interval: Duration) -> Result<Self> {
        check_interval("addition-logger", interval)?;
        Ok(Self { repo, interval })
    }

    /// Log "N new <tier> tasks since last check" for every tier that grew.
    ///
    /// The baseline is taken at start, so hydrated tasks are not reported.
    /// Returns the total number of additions reported.
    pub async fn run(self, cancel: CancellationToken) -> u64 {
        let mut tracker = AdditionTracker::new(self.repo.lens());
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut reported = 0u64;

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            for (tier, added) in tracker.observe(self.repo.lens()) {
                info!(%tier, added, "{added} new {tier} tasks since last check");
                reported += added as u64;
            }
        }

        info!(reported, "addition logger stopped");
        reported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_only_growth() {
        let mut tracker = AdditionTracker::default();
        assert_eq!(
            tracker.observe(TierCounts::new(2, 0, 1)),
            vec![(Priority::Low, 2), (Priority::High, 1)]
        );
        assert!(tracker.observe(TierCounts::new(2, 0, 1)).is_empty());
        assert_eq!(
            tracker.observe(TierCounts::new(2, 3, 1)),
            vec![(Priority::Medium, 3)]
        );
    }

    #[test]
    fn test_shrinking_bucket_resets_baseline() {
        let mut tracker = AdditionTracker::new(TierCounts::new(5, 5, 5));
        assert!(tracker.observe(TierCounts::new(1, 5, 5)).is_empty());
        assert_eq!(
            tracker.observe(TierCounts::new(2, 5, 5)),
            vec![(Priority::Low, 1)]
        );
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let repo = Arc::new(PriorityRepository::new());
        assert!(AdditionLogger::new(repo.clone(), Duration::ZERO).is_err());
        assert!(AdditionLogger::new(repo, Duration::from_millis(1)).is_ok());
    }
}
