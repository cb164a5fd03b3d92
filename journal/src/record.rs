use chrono::{DateTime, Utc};
use graph::{SessionId, TaskId, TaskType};
use serde::{Deserialize, Serialize};

/// A single NDJSON line of the session journal.
///
/// Every record carries `type`, `timestamp`, and `sessionId` (the latter two present
/// on every variant below) plus type-specific fields.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Record {
    #[serde(rename_all = "camelCase")]
    SessionStart {
        session_id: SessionId,
        task: String,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    SessionComplete {
        session_id: SessionId,
        summary: String,
        metrics: SessionMetrics,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    SessionAbort {
        session_id: SessionId,
        reason: String,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    PhaseStart {
        session_id: SessionId,
        level: usize,
        task_ids: Vec<TaskId>,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    PhaseComplete {
        session_id: SessionId,
        level: usize,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    TaskCreated {
        session_id: SessionId,
        task_id: TaskId,
        title: String,
        task_type: TaskType,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    TaskReady {
        session_id: SessionId,
        task_id: TaskId,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    TaskStart {
        session_id: SessionId,
        task_id: TaskId,
        attempt: u32,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    TaskOutput {
        session_id: SessionId,
        task_id: TaskId,
        chunk: String,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    TaskReviewed {
        session_id: SessionId,
        task_id: TaskId,
        score: i32,
        rejected: bool,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    TaskDone {
        session_id: SessionId,
        task_id: TaskId,
        outputs: Vec<String>,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename_all = "camelCase")]
    TaskFailed {
        session_id: SessionId,
        task_id: TaskId,
        error: String,
        timestamp: DateTime<Utc>,
    },
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SessionMetrics {
    pub completed: usize,
    pub failed: usize,
    pub blocked: usize,
    pub aborted: bool,
}

impl Record {
    pub fn session_id(&self) -> &SessionId {
        match self {
            Record::SessionStart { session_id, .. }
            | Record::SessionComplete { session_id, .. }
            | Record::SessionAbort { session_id, .. }
            | Record::PhaseStart { session_id, .. }
            | Record::PhaseComplete { session_id, .. }
            | Record::TaskCreated { session_id, .. }
            | Record::TaskReady { session_id, .. }
            | Record::TaskStart { session_id, .. }
            | Record::TaskOutput { session_id, .. }
            | Record::TaskReviewed { session_id, .. }
            | Record::TaskDone { session_id, .. }
            | Record::TaskFailed { session_id, .. } => session_id,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Record::SessionStart { timestamp, .. }
            | Record::SessionComplete { timestamp, .. }
            | Record::SessionAbort { timestamp, .. }
            | Record::PhaseStart { timestamp, .. }
            | Record::PhaseComplete { timestamp, .. }
            | Record::TaskCreated { timestamp, .. }
            | Record::TaskReady { timestamp, .. }
            | Record::TaskStart { timestamp, .. }
            | Record::TaskOutput { timestamp, .. }
            | Record::TaskReviewed { timestamp, .. }
            | Record::TaskDone { timestamp, .. }
            | Record::TaskFailed { timestamp, .. } => *timestamp,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Record::SessionComplete { .. } | Record::SessionAbort { .. })
    }
}
