//! Priority-sharded task buckets

use parking_lot::Mutex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::{Handle, RuntimeFlavor};
use todo_core::{Priority, Result, Task, TaskRecord};
use todo_utils::{read_if_exists, write_atomic};
use tracing::{debug, info, warn};

/// Bucket sizes, one slot per tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierCounts([usize; 3]);

impl TierCounts {
    pub fn new(low: usize, medium: usize, high: usize) -> Self {
        Self([low, medium, high])
    }

    pub fn get(&self, tier: Priority) -> usize {
        self.0[tier.index()]
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }
}

impl fmt::Display for TierCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "low={} medium={} high={}",
            self.0[0], self.0[1], self.0[2]
        )
    }
}

/// Three append-only buckets of generated tasks, one lock per tier.
///
/// Writers to different tiers never contend. In the persistent variant each
/// tier is written to its own file while that tier's lock is held, so a slow
/// write stalls only its own tier.
pub struct PriorityRepository {
    buckets: [Mutex<Vec<Arc<Task>>>; 3],
    dir: Option<PathBuf>,
}

impl Default for PriorityRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl PriorityRepository {
    /// Buckets that live only in memory
    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            dir: None,
        }
    }

    /// Buckets mirrored to `<dir>/<tier>.json`, hydrated from those files.
    ///
    /// A missing file means an empty bucket; an unreadable or corrupt one is
    /// reported and also yields an empty bucket.
    pub fn persistent(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let buckets = Priority::ALL.map(|tier| Mutex::new(hydrate(&dir, tier)));
        Self {
            buckets,
            dir: Some(dir),
        }
    }

    /// File backing one tier under `dir`
    pub fn tier_path(dir: &Path, tier: Priority) -> PathBuf {
        dir.join(format!("{tier}.json"))
    }

    fn bucket(&self, tier: Priority) -> &Mutex<Vec<Arc<Task>>> {
        &self.buckets[tier.index()]
    }

    /// Append `task` to the bucket of its priority
    pub fn distribute(&self, task: Arc<Task>) {
        let tier = task.priority();
        let mut bucket = self.bucket(tier).lock();
        bucket.push(task);
        debug!(%tier, size = bucket.len(), "task distributed");

        if let Some(dir) = &self.dir {
            if let Err(e) = blocking(|| persist_tier(dir, tier, &bucket)) {
                warn!(%tier, error = %e, "failed to persist priority bucket");
            }
        }
    }

    /// Route a raw record; returns `false` when it cannot be distributed.
    ///
    /// Records with an unknown priority (or otherwise invalid) are reported
    /// and dropped.
    pub fn distribute_record(&self, record: TaskRecord) -> bool {
        if Priority::from_level(record.priority).is_none() {
            warn!(
                id = %record.id,
                priority = record.priority,
                "unknown priority, task not distributed"
            );
            return false;
        }
        match Task::try_from(record) {
            Ok(task) => {
                self.distribute(Arc::new(task));
                true
            }
            Err(e) => {
                warn!(error = %e, "invalid task record, not distributed");
                false
            }
        }
    }

    pub fn len(&self, tier: Priority) -> usize {
        self.bucket(tier).lock().len()
    }

    /// Sizes of all three buckets; each is read under its own lock
    pub fn lens(&self) -> TierCounts {
        TierCounts::new(
            self.len(Priority::Low),
            self.len(Priority::Medium),
            self.len(Priority::High),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.lens().total() == 0
    }

    /// Copy of one bucket in append order
    pub fn snapshot(&self, tier: Priority) -> Vec<Arc<Task>> {
        self.bucket(tier).lock().clone()
    }
}

fn persist_tier(dir: &Path, tier: Priority, bucket: &[Arc<Task>]) -> Result<()> {
    let records: Vec<TaskRecord> = bucket.iter().map(|task| task.to_record()).collect();
    let raw = serde_json::to_vec_pretty(&records)?;
    write_atomic(&PriorityRepository::tier_path(dir, tier), &raw)
}

/// Run file I/O without stalling a multi-threaded runtime's worker.
///
/// `block_in_place` panics on a current-thread runtime, so those (and plain
/// threads) run `f` inline.
fn blocking<R>(f: impl FnOnce() -> R) -> R {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(f)
        }
        _ => f(),
    }
}

fn hydrate(dir: &Path, tier: Priority) -> Vec<Arc<Task>> {
    let path = PriorityRepository::tier_path(dir, tier);
    let bytes = match read_if_exists(&path) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(%tier, error = %e, "cannot read priority bucket, starting empty");
            return Vec::new();
        }
    };

    let records: Vec<TaskRecord> = match serde_json::from_slice(&bytes) {
        Ok(records) => records,
        Err(e) => {
            warn!(%tier, path = %path.display(), error = %e, "corrupt priority bucket, starting empty");
            return Vec::new();
        }
    };

    let tasks: Vec<Arc<Task>> = records
        .into_iter()
        .filter_map(|record| match Task::try_from(record) {
            Ok(task) if task.priority() == tier => Some(Arc::new(task)),
            Ok(task) => {
                warn!(%tier, id = %task.id(), found = %task.priority(), "task filed under the wrong tier, skipped");
                None
            }
            Err(e) => {
                warn!(%tier, error = %e, "invalid task in priority bucket, skipped");
                None
            }
        })
        .collect();

    info!(%tier, count = tasks.len(), "priority bucket hydrated");
    tasks
}
