use graph::TaskId;

use crate::error::JournalError;
use crate::journal;
use crate::record::Record;

/// The context needed to continue a session whose journal was left unterminated, or
/// whose last record is `session_abort`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ResumeContext {
    pub original_task: Option<String>,
    pub abort_reason: Option<String>,
    pub last_phase: Option<usize>,
    pub completed_tasks: Vec<TaskId>,
    pub can_resume: bool,
}

/// Derives a [`ResumeContext`] by a single linear scan of the journal file at `path`.
pub fn extract_resume(path: impl AsRef<std::path::Path>) -> Result<ResumeContext, JournalError> {
    let records = journal::iterate(path)?;
    Ok(extract_resume_from_records(&records))
}

fn extract_resume_from_records(records: &[Record]) -> ResumeContext {
    let mut ctx = ResumeContext::default();

    for record in records {
        match record {
            Record::SessionStart { task, .. } => {
                ctx.original_task = Some(task.clone());
            }
            Record::SessionAbort { reason, .. } => {
                ctx.abort_reason = Some(reason.clone());
            }
            Record::PhaseStart { level, .. } => {
                ctx.last_phase = Some(*level);
            }
            Record::TaskDone { task_id, .. } => {
                ctx.completed_tasks.push(task_id.clone());
            }
            _ => {}
        }
    }

    ctx.can_resume = matches!(records.last(), Some(Record::SessionAbort { .. }));
    ctx
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use graph::{SessionId, TaskId};

    use super::*;

    fn session_id() -> SessionId {
        SessionId::new("s1")
    }

    #[test]
    fn can_resume_iff_last_record_is_session_abort() {
        let records = vec![
            Record::SessionStart {
                session_id: session_id(),
                task: "do the thing".into(),
                timestamp: Utc::now(),
            },
            Record::TaskDone {
                session_id: session_id(),
                task_id: TaskId::from("t1"),
                outputs: vec![],
                timestamp: Utc::now(),
            },
            Record::SessionAbort {
                session_id: session_id(),
                reason: "cancelled".into(),
                timestamp: Utc::now(),
            },
        ];
        let ctx = extract_resume_from_records(&records);
        assert!(ctx.can_resume);
        assert_eq!(ctx.abort_reason.as_deref(), Some("cancelled"));
        assert_eq!(ctx.completed_tasks, vec![TaskId::from("t1")]);
        assert_eq!(ctx.original_task.as_deref(), Some("do the thing"));
    }

    #[test]
    fn completed_session_cannot_resume() {
        let records = vec![
            Record::SessionStart {
                session_id: session_id(),
                task: "do the thing".into(),
                timestamp: Utc::now(),
            },
            Record::SessionComplete {
                session_id: session_id(),
                summary: "done".into(),
                metrics: Default::default(),
                timestamp: Utc::now(),
            },
        ];
        let ctx = extract_resume_from_records(&records);
        assert!(!ctx.can_resume);
    }

    #[test]
    fn extracting_resume_twice_yields_equal_results() {
        let records = vec![
            Record::SessionStart {
                session_id: session_id(),
                task: "do the thing".into(),
                timestamp: Utc::now(),
            },
            Record::SessionAbort {
                session_id: session_id(),
                reason: "cancelled".into(),
                timestamp: Utc::now(),
            },
        ];
        let first = extract_resume_from_records(&records);
        let second = extract_resume_from_records(&records);
        assert_eq!(first, second);
    }
}
