//! Drains the generator channel into the priority buckets

use crate::repository::PriorityRepository;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use todo_core::Task;
use tracing::{debug, info};

/// Why a distributor stopped, and how many tasks it routed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributorExit {
    /// Every sender is gone and the channel is drained
    ChannelClosed { routed: u64 },
    /// The shared token fired; buffered tasks are left in the channel
    Cancelled { routed: u64 },
}

impl DistributorExit {
    pub fn routed(self) -> u64 {
        match self {
            DistributorExit::ChannelClosed { routed } | DistributorExit::Cancelled { routed } => {
                routed
            }
        }
    }
}

pub struct ChannelDistributor {
    rx: mpsc::Receiver<Arc<Task>>,
    repo: Arc<PriorityRepository>,
}

impl ChannelDistributor {
    pub fn new(rx: mpsc::Receiver<Arc<Task>>, repo: Arc<PriorityRepository>) -> Self {
        Self { rx, repo }
    }

    /// Route each received task to its bucket until the channel closes or
    /// `cancel` fires, whichever is observed first
    pub async fn run(mut self, cancel: CancellationToken) -> DistributorExit {
        let mut routed = 0u64;
        let exit = loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break DistributorExit::Cancelled { routed },
                received = self.rx.recv() => match received {
                    Some(task) => {
                        debug!(id = %task.id(), priority = %task.priority(), "routing task");
                        self.repo.distribute(task);
                        routed += 1;
                    }
                    None => break DistributorExit::ChannelClosed { routed },
                },
            }
        };

        info!(?exit, "distributor stopped");
        exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_core::{Priority, TaskId};

    fn task(id: i64, priority: Priority) -> Arc<Task> {
        Arc::new(
            Task::new(TaskId::new(id), "queued", "")
                .unwrap()
                .with_priority(priority),
        )
    }

    #[tokio::test]
    async fn test_drains_buffer_before_reporting_close() {
        let repo = Arc::new(PriorityRepository::new());
        let (tx, rx) = mpsc::channel(4);
        tx.send(task(1, Priority::High)).await.unwrap();
        tx.send(task(2, Priority::Low)).await.unwrap();
        tx.send(task(3, Priority::High)).await.unwrap();
        drop(tx);

        let exit = ChannelDistributor::new(rx, repo.clone())
            .run(CancellationToken::new())
            .await;

        assert_eq!(exit, DistributorExit::ChannelClosed { routed: 3 });
        assert_eq!(repo.len(Priority::High), 2);
        assert_eq!(repo.len(Priority::Low), 1);
    }

    #[tokio::test]
    async fn test_cancellation_wins_over_pending_items() {
        let repo = Arc::new(PriorityRepository::new());
        let (tx, rx) = mpsc::channel(4);
        tx.send(task(1, Priority::Medium)).await.unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let exit = ChannelDistributor::new(rx, repo.clone()).run(cancel).await;

        assert_eq!(exit, DistributorExit::Cancelled { routed: 0 });
        assert!(repo.is_empty());
        drop(tx);
    }
}
