use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::time;
use tokio_util::sync::CancellationToken;
use todo_config::PipelineSettings;
use todo_core::Priority;
use todo_pipeline::{
    ChannelDistributor, Coordinator, DistributorExit, PeriodicProducer, PriorityRepository,
    WorkerOutcome,
};

const TICK: Duration = Duration::from_millis(10);

fn assert_buckets_consistent(repo: &PriorityRepository) {
    let mut seen = HashSet::new();
    for tier in Priority::ALL {
        for task in repo.snapshot(tier) {
            assert_eq!(task.priority(), tier, "task routed to the wrong bucket");
            assert!(
                seen.insert(Arc::as_ptr(&task) as usize),
                "task distributed twice"
            );
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_producers_fill_buckets_exactly() {
    const PRODUCERS: usize = 6;
    const TICKS: u32 = 25;

    let repo = Arc::new(PriorityRepository::new());
    let cancel = CancellationToken::new();

    let mut handles = Vec::new();
    for seed in 0..PRODUCERS as u64 {
        let producer = PeriodicProducer::legacy(TICK, repo.clone())
            .unwrap()
            .with_seed(seed);
        handles.push(tokio::spawn(producer.run(cancel.clone())));
    }

    time::sleep(TICK * TICKS + TICK / 2).await;
    cancel.cancel();

    let mut emitted = 0;
    for handle in handles {
        let count = handle.await.unwrap();
        assert_eq!(count, u64::from(TICKS));
        emitted += count;
    }

    assert_eq!(repo.lens().total() as u64, emitted);
    assert_buckets_consistent(&repo);
}

#[tokio::test(start_paused = true)]
async fn test_generators_through_channels_lose_nothing_on_close() {
    const PAIRS: u64 = 4;
    const TICKS: u32 = 15;

    let repo = Arc::new(PriorityRepository::new());
    let producers_cancel = CancellationToken::new();
    let distributors_cancel = CancellationToken::new();

    let mut producers = Vec::new();
    let mut distributors = Vec::new();
    for seed in 0..PAIRS {
        let (tx, rx) = mpsc::channel(2);
        let producer = PeriodicProducer::generator(TICK, tx)
            .unwrap()
            .with_seed(seed);
        producers.push(tokio::spawn(producer.run(producers_cancel.clone())));
        distributors.push(tokio::spawn(
            ChannelDistributor::new(rx, repo.clone()).run(distributors_cancel.clone()),
        ));
    }

    time::sleep(TICK * TICKS + TICK / 2).await;
    producers_cancel.cancel();

    let mut emitted = 0;
    for producer in producers {
        emitted += producer.await.unwrap();
    }
    let mut routed = 0;
    for distributor in distributors {
        match distributor.await.unwrap() {
            DistributorExit::ChannelClosed { routed: n } => routed += n,
            other => panic!("distributor should see the channel close, got {other:?}"),
        }
    }

    assert_eq!(emitted, PAIRS * u64::from(TICKS));
    assert_eq!(routed, emitted);
    assert_eq!(repo.lens().total() as u64, emitted);
    assert!(!distributors_cancel.is_cancelled());
    assert_buckets_consistent(&repo);
}

#[tokio::test(start_paused = true)]
async fn test_generator_sends_nothing_after_cancel() {
    let (tx, mut rx) = mpsc::channel(64);
    let cancel = CancellationToken::new();
    let producer = PeriodicProducer::generator(TICK, tx).unwrap();
    let handle = tokio::spawn(producer.run(cancel.clone()));

    time::sleep(TICK * 3 + TICK / 2).await;
    cancel.cancel();
    let emitted = handle.await.unwrap();

    time::sleep(TICK * 10).await;
    let mut received = 0;
    while let Some(task) = rx.recv().await {
        assert!(task.title().starts_with("Auto-Task-"));
        received += 1;
    }
    // recv() returning None proves the sender was dropped
    assert_eq!(emitted, 3);
    assert_eq!(received, 3);
}

#[tokio::test(start_paused = true)]
async fn test_full_channel_does_not_block_cancellation() {
    let (tx, _rx) = mpsc::channel(1);
    let cancel = CancellationToken::new();
    let producer = PeriodicProducer::generator(TICK, tx).unwrap();
    let handle = tokio::spawn(producer.run(cancel.clone()));

    // First send fills the buffer, the second blocks on capacity
    time::sleep(TICK * 5).await;
    cancel.cancel();

    let emitted = time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("producer stuck on a full channel")
        .unwrap();
    assert_eq!(emitted, 1);
}

#[tokio::test(start_paused = true)]
async fn test_coordinator_joins_all_workers() {
    let dir = TempDir::new().unwrap();
    let repo = Arc::new(PriorityRepository::persistent(dir.path()));
    let settings = PipelineSettings {
        generator_interval: Duration::from_millis(50),
        legacy_interval: Duration::from_millis(100),
        logger_interval: Duration::from_millis(20),
        channel_capacity: 4,
        buckets_dir: Some(dir.path().to_path_buf()),
    };

    let coordinator = Coordinator::start(&settings, repo.clone()).unwrap();
    time::sleep(Duration::from_millis(525)).await;
    let report = coordinator.shutdown().await;

    assert_eq!(report.joined, 4);
    assert_eq!(report.panicked, 0);

    let produced: u64 = report
        .outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            WorkerOutcome::Produced { emitted, .. } => Some(*emitted),
            _ => None,
        })
        .sum();
    // 10 generator ticks and 5 legacy ticks
    assert_eq!(produced, 15);
    assert!(report
        .outcomes
        .iter()
        .any(|outcome| matches!(outcome, WorkerOutcome::Logged { .. })));
    assert_buckets_consistent(&repo);

    let reopened = PriorityRepository::persistent(dir.path());
    assert_eq!(reopened.lens(), repo.lens());
}

#[tokio::test]
async fn test_coordinator_rejects_invalid_settings() {
    let settings = PipelineSettings {
        channel_capacity: 0,
        ..PipelineSettings::default()
    };
    let err = Coordinator::start(&settings, Arc::new(PriorityRepository::new()))
        .err()
        .unwrap();
    assert!(err.to_string().contains("capacity"));
}

#[tokio::test]
async fn test_external_token_cancel_stops_pipeline() {
    let coordinator =
        Coordinator::start(&PipelineSettings::default(), Arc::new(PriorityRepository::new()))
            .unwrap();
    let token = coordinator.token();
    token.cancel();
    assert!(coordinator.is_cancelled());

    let report = coordinator.shutdown().await;
    assert_eq!(report.joined, 4);
    assert!(report.outcomes.contains(&WorkerOutcome::Distributed(
        DistributorExit::Cancelled { routed: 0 }
    )) || report.outcomes.contains(&WorkerOutcome::Distributed(
        DistributorExit::ChannelClosed { routed: 0 }
    )));
}
