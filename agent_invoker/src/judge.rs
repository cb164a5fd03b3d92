use async_trait::async_trait;

use graph::TaskId;

/// What the Scheduler produced for one session, handed to the Judge agent for a
/// final aggregate verdict.
#[derive(Clone, Debug, Default)]
pub struct SessionSummary {
    pub completed: Vec<TaskId>,
    pub failed: Vec<TaskId>,
    pub blocked: Vec<TaskId>,
    pub average_review_score: Option<i32>,
}

#[derive(Clone, Debug)]
pub struct JudgeVerdict {
    pub approved: bool,
    pub comment: String,
}

/// Opaque handle to the Judge agent: reviews a session's aggregate outcome.
#[async_trait]
pub trait JudgeInvoker: Send + Sync {
    async fn judge(&self, summary: &SessionSummary) -> JudgeVerdict;
}

/// A [`JudgeInvoker`] that approves iff nothing failed, useful for tests and
/// local dry-runs that don't wire up a real Judge agent.
pub struct NoFailuresJudge;

#[async_trait]
impl JudgeInvoker for NoFailuresJudge {
    async fn judge(&self, summary: &SessionSummary) -> JudgeVerdict {
        if summary.failed.is_empty() {
            JudgeVerdict {
                approved: true,
                comment: format!("{} task(s) completed, none failed", summary.completed.len()),
            }
        } else {
            JudgeVerdict {
                approved: false,
                comment: format!("{} task(s) failed", summary.failed.len()),
            }
        }
    }
}
