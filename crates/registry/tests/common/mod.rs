#![allow(dead_code)]

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use todo_core::{AuditEvent, Error, Result, TaskRecord};
use todo_registry::{AuditSink, Store, TaskRegistry};

/// In-memory store that counts saves and can be told to fail
#[derive(Default)]
pub struct RecordingStore {
    items: Mutex<Vec<TaskRecord>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
    fail_load: bool,
}

impl RecordingStore {
    pub fn with_records(items: Vec<TaskRecord>) -> Self {
        Self {
            items: Mutex::new(items),
            ..Self::default()
        }
    }

    pub fn failing_load() -> Self {
        Self {
            fail_load: true,
            ..Self::default()
        }
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn records(&self) -> Vec<TaskRecord> {
        self.items.lock().clone()
    }
}

impl Store for RecordingStore {
    fn load(&self) -> Result<Vec<TaskRecord>> {
        if self.fail_load {
            return Err(Error::configuration("boom"));
        }
        Ok(self.items.lock().clone())
    }

    fn save(&self, records: &[TaskRecord]) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Error::configuration("save failed"));
        }
        *self.items.lock() = records.to_vec();
        Ok(())
    }
}

/// Audit sink that keeps every event it is handed
#[derive(Default)]
pub struct RecordingAudit {
    pub events: Mutex<Vec<AuditEvent>>,
    pub reject: bool,
}

impl AuditSink for RecordingAudit {
    fn log_event(&self, event: &AuditEvent) -> Result<()> {
        self.events.lock().push(event.clone());
        if self.reject {
            return Err(Error::configuration("audit backend down"));
        }
        Ok(())
    }
}

pub fn registry_with(records: Vec<TaskRecord>) -> (TaskRegistry, Arc<RecordingStore>) {
    let store = Arc::new(RecordingStore::with_records(records));
    let registry = TaskRegistry::new(store.clone()).expect("registry should load");
    (registry, store)
}

pub fn empty_registry() -> (TaskRegistry, Arc<RecordingStore>) {
    registry_with(Vec::new())
}
