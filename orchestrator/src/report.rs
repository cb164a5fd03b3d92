use std::fmt::Write as _;
use std::path::Path;

use agent_invoker::JudgeVerdict;
use graph::SessionId;
use scheduler::ScheduleResult;

use crate::error::OrchestratorError;

/// Writes `reports/<sessionId>/summary.md`: task counts and the aggregate
/// reviewer score. The richer `00-planning.md`/`01-task-breakdown.md` bodies are
/// an external-collaborator concern (Markdown report rendering is out of scope
/// per spec §1) and are not produced here; their filenames stay reserved in the
/// layout.
pub fn write_summary_report(
    path: impl AsRef<Path>,
    session_id: &SessionId,
    instruction: &str,
    result: &ScheduleResult,
    average_review_score: Option<i32>,
    verdict: &JudgeVerdict,
) -> Result<(), OrchestratorError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut body = String::new();
    let _ = writeln!(body, "# Session {}", session_id.as_str());
    let _ = writeln!(body);
    let _ = writeln!(body, "**Instruction:** {instruction}");
    let _ = writeln!(body);
    let _ = writeln!(body, "## Results");
    let _ = writeln!(body, "- Completed: {}", result.completed.len());
    let _ = writeln!(body, "- Failed: {}", result.failed.len());
    let _ = writeln!(body, "- Blocked: {}", result.blocked.len());
    if !result.cyclic.is_empty() {
        let _ = writeln!(body, "- Blocked on a cyclic dependency: {}", result.cyclic.len());
    }
    let _ = writeln!(body, "- Aborted: {}", result.aborted);
    if let Some(score) = average_review_score {
        let _ = writeln!(body, "- Average review score: {score}");
    }
    let _ = writeln!(body);
    let _ = writeln!(body, "## Judge verdict");
    let _ = writeln!(
        body,
        "- Approved: {}",
        if verdict.approved { "yes" } else { "no" }
    );
    let _ = writeln!(body, "- {}", verdict.comment);

    std::fs::write(path, body)?;
    Ok(())
}
