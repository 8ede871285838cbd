//! Periodic producers of synthetic tasks

use crate::repository::PriorityRepository;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use todo_core::{
    Error, Priority, Result, Task, TaskId, AUTO_TASK_DESCRIPTION, AUTO_TASK_TITLE_PREFIX,
    EPHEMERAL_ID_LIMIT,
};
use tracing::{debug, info, warn};

/// Where a producer puts what it makes
pub enum Emitter {
    /// Straight into the buckets, bypassing any channel
    Direct(Arc<PriorityRepository>),
    /// Into the bounded channel drained by a distributor
    Channel(mpsc::Sender<Arc<Task>>),
}

/// Emits one synthetic task per tick until cancelled.
///
/// The first task is emitted one full interval after start. Cancellation is
/// checked ahead of every tick and races every channel send, so nothing is
/// emitted once the token fires. In channel mode the sender is dropped on
/// exit, which closes the channel for the distributor.
pub struct PeriodicProducer {
    name: &'static str,
    interval: Duration,
    emitter: Emitter,
    rng: StdRng,
}

impl PeriodicProducer {
    /// Generator feeding the distribution channel
    pub fn generator(interval: Duration, tx: mpsc::Sender<Arc<Task>>) -> Result<Self> {
        Self::new("generator", interval, Emitter::Channel(tx))
    }

    /// Legacy producer writing directly into the buckets
    pub fn legacy(interval: Duration, repo: Arc<PriorityRepository>) -> Result<Self> {
        Self::new("legacy-distributor", interval, Emitter::Direct(repo))
    }

    /// Fails when `interval` is zero
    pub fn new(name: &'static str, interval: Duration, emitter: Emitter) -> Result<Self> {
        check_interval(name, interval)?;
        Ok(Self {
            name,
            interval,
            emitter,
            rng: StdRng::from_entropy(),
        })
    }

    /// Make the random draws reproducible
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run until `cancel` fires or the channel receiver goes away.
    /// Returns how many tasks were emitted.
    pub async fn run(mut self, cancel: CancellationToken) -> u64 {
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut emitted = 0u64;

        info!(worker = self.name, interval = ?self.interval, "producer started");
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let Some(task) = synthetic_task(&mut self.rng) else {
                continue;
            };
            debug!(worker = self.name, id = %task.id(), priority = %task.priority(), "emitting task");

            match &self.emitter {
                Emitter::Direct(repo) => repo.distribute(task),
                Emitter::Channel(tx) => {
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => break,
                        sent = tx.send(task) => {
                            if sent.is_err() {
                                info!(worker = self.name, "distribution channel closed");
                                break;
                            }
                        }
                    }
                }
            }
            emitted += 1;
        }

        info!(worker = self.name, emitted, "producer stopped");
        emitted
    }
}

/// Tick intervals must be non-zero
pub(crate) fn check_interval(worker: &str, interval: Duration) -> Result<()> {
    if interval.is_zero() {
        return Err(Error::configuration(format!(
            "{worker} interval must be greater than zero"
        )));
    }
    Ok(())
}

/// Build one `Auto-Task-<unix seconds>` task with a random tier and an id
/// drawn from `0..EPHEMERAL_ID_LIMIT`
pub fn synthetic_task(rng: &mut impl Rng) -> Option<Arc<Task>> {
    let level = rng.gen_range(1..=3);
    let Some(priority) = Priority::from_level(level) else {
        warn!(level, "unknown priority drawn, skipping tick");
        return None;
    };

    let id = TaskId::new(rng.gen_range(0..EPHEMERAL_ID_LIMIT));
    let title = format!("{AUTO_TASK_TITLE_PREFIX}-{}", Utc::now().timestamp());
    match Task::new(id, &title, AUTO_TASK_DESCRIPTION) {
        Ok(task) => Some(Arc::new(task.with_priority(priority))),
        Err(e) => {
            warn!(error = %e, "could not build synthetic task");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_task_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let task = synthetic_task(&mut rng).unwrap();
            assert!(task.title().starts_with("Auto-Task-"));
            assert_eq!(task.description(), AUTO_TASK_DESCRIPTION);
            assert!((0..EPHEMERAL_ID_LIMIT).contains(&task.id().get()));
        }
    }

    #[test]
    fn test_synthetic_task_covers_every_tier() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 3];
        for _ in 0..200 {
            seen[synthetic_task(&mut rng).unwrap().priority().index()] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let repo = Arc::new(PriorityRepository::new());
        let err = PeriodicProducer::legacy(Duration::ZERO, repo).err().unwrap();
        assert!(matches!(err, Error::Configuration { .. }));
        assert!(err.to_string().contains("legacy-distributor interval"));

        let (tx, _rx) = mpsc::channel(1);
        assert!(PeriodicProducer::generator(Duration::ZERO, tx).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_emission_before_first_interval() {
        let repo = Arc::new(PriorityRepository::new());
        let cancel = CancellationToken::new();
        let producer = PeriodicProducer::legacy(Duration::from_secs(10), repo.clone()).unwrap();
        let handle = tokio::spawn(producer.run(cancel.clone()));

        time::sleep(Duration::from_secs(9)).await;
        assert!(repo.is_empty());
        time::sleep(Duration::from_secs(2)).await;
        assert_eq!(repo.lens().total(), 1);

        cancel.cancel();
        assert_eq!(handle.await.unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_generator_stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let producer = PeriodicProducer::generator(Duration::from_millis(5), tx).unwrap();
        let emitted = producer.run(CancellationToken::new()).await;
        assert_eq!(emitted, 0);
    }
}
