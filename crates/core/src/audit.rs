//! Audit events emitted after each successful registry mutation

use crate::types::{TaskId, TaskRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// The registry operation an audit event describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOp {
    Add,
    UpdateTitle,
    UpdateDesc,
    SetStatus,
    SetPriority,
    SetDue,
    ClearDue,
    Delete,
    RenumberIds,
}

impl AuditOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            AuditOp::Add => "add",
            AuditOp::UpdateTitle => "update_title",
            AuditOp::UpdateDesc => "update_desc",
            AuditOp::SetStatus => "set_status",
            AuditOp::SetPriority => "set_priority",
            AuditOp::SetDue => "set_due",
            AuditOp::ClearDue => "clear_due",
            AuditOp::Delete => "delete",
            AuditOp::RenumberIds => "renumber_ids",
        }
    }
}

impl Display for AuditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Before/after snapshot of one mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub op: AuditOp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    pub at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<TaskRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<TaskRecord>,
}

impl AuditEvent {
    pub fn new(
        op: AuditOp,
        task_id: Option<TaskId>,
        before: Option<TaskRecord>,
        after: Option<TaskRecord>,
    ) -> Self {
        Self {
            op,
            task_id,
            at: Utc::now(),
            before,
            after,
        }
    }

    /// Stable lookup key: `<op>:<task id or 0>:<unix nanos>`
    pub fn key(&self) -> String {
        let nanos = self
            .at
            .timestamp_nanos_opt()
            .unwrap_or_else(|| self.at.timestamp_micros() * 1_000);
        format!(
            "{}:{}:{}",
            self.op,
            self.task_id.map_or(0, TaskId::get),
            nanos
        )
    }
}
