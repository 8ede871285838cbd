//! Lifecycle of the background workers

use crate::distributor::{ChannelDistributor, DistributorExit};
use crate::logger::AdditionLogger;
use crate::producer::PeriodicProducer;
use crate::repository::PriorityRepository;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use todo_config::PipelineSettings;
use todo_core::Result;
use todo_utils::tracing::worker_span;
use tracing::{error, info, Instrument};

/// What a worker returned when it stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerOutcome {
    Produced { worker: &'static str, emitted: u64 },
    Distributed(DistributorExit),
    Logged { reported: u64 },
}

/// Result of joining every worker
#[derive(Debug, Default)]
pub struct ShutdownReport {
    /// Workers that returned normally
    pub joined: usize,
    /// Workers that panicked or were aborted
    pub panicked: usize,
    pub outcomes: Vec<WorkerOutcome>,
}

/// Owns the shared cancellation token and every spawned worker.
///
/// Anything holding a clone of [`Coordinator::token`] can stop the whole
/// pipeline; [`Coordinator::shutdown`] then waits for each worker to finish.
pub struct Coordinator {
    cancel: CancellationToken,
    workers: JoinSet<WorkerOutcome>,
    repo: Arc<PriorityRepository>,
}

impl Coordinator {
    /// Spawn the legacy producer, the generator, the channel distributor and
    /// the addition logger. Must be called from within a tokio runtime.
    pub fn start(settings: &PipelineSettings, repo: Arc<PriorityRepository>) -> Result<Self> {
        settings.validate()?;

        let mut coordinator = Self {
            cancel: CancellationToken::new(),
            workers: JoinSet::new(),
            repo,
        };
        let (tx, rx) = mpsc::channel(settings.channel_capacity);

        let legacy = PeriodicProducer::legacy(settings.legacy_interval, coordinator.repo.clone())?;
        coordinator.spawn(legacy.name(), |cancel| async move {
            let worker = legacy.name();
            let emitted = legacy.run(cancel).await;
            WorkerOutcome::Produced { worker, emitted }
        });

        let generator = PeriodicProducer::generator(settings.generator_interval, tx)?;
        coordinator.spawn(generator.name(), |cancel| async move {
            let worker = generator.name();
            let emitted = generator.run(cancel).await;
            WorkerOutcome::Produced { worker, emitted }
        });

        let distributor = ChannelDistributor::new(rx, coordinator.repo.clone());
        coordinator.spawn("distributor", |cancel| async move {
            WorkerOutcome::Distributed(distributor.run(cancel).await)
        });

        let logger = AdditionLogger::new(coordinator.repo.clone(), settings.logger_interval)?;
        coordinator.spawn("addition-logger", |cancel| async move {
            WorkerOutcome::Logged {
                reported: logger.run(cancel).await,
            }
        });

        info!(workers = coordinator.workers.len(), "pipeline started");
        Ok(coordinator)
    }

    fn spawn<F, Fut>(&mut self, name: &'static str, worker: F)
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = WorkerOutcome> + Send + 'static,
    {
        let future = worker(self.cancel.clone());
        self.workers.spawn(future.instrument(worker_span(name)));
    }

    /// Clone of the shared token, for signal handlers and user commands
    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn repository(&self) -> &Arc<PriorityRepository> {
        &self.repo
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancel, then wait for every worker to stop
    pub async fn shutdown(mut self) -> ShutdownReport {
        self.cancel.cancel();

        let mut report = ShutdownReport::default();
        while let Some(joined) = self.workers.join_next().await {
            match joined {
                Ok(outcome) => {
                    report.joined += 1;
                    report.outcomes.push(outcome);
                }
                Err(e) => {
                    error!(error = %e, "pipeline worker did not finish cleanly");
                    report.panicked += 1;
                }
            }
        }

        info!(
            joined = report.joined,
            panicked = report.panicked,
            buckets = %self.repo.lens(),
            "pipeline stopped"
        );
        report
    }
}
