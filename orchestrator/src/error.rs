use thiserror::Error;

/// The orchestrator's single error type, mirroring spec §7's taxonomy. Every
/// fallible public operation returns `Result<T, OrchestratorError>`; library code
/// never panics for a recoverable condition.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Unknown dependency id, invalid config, or another condition caught before
    /// any work starts. Fatal; maps to CLI exit code 2.
    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Journal(#[from] journal::JournalError),

    #[error(transparent)]
    TaskStore(#[from] task_store::TaskStoreError),

    #[error(transparent)]
    Scheduler(#[from] scheduler::SchedulerError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error("planner failed: {0}")]
    Plan(#[from] agent_invoker::PlanError),

    /// Not really an error: the session was cancelled before or during scheduling.
    /// Kept as a variant so `main` can map it to exit code 130 uniformly with
    /// every other terminal outcome.
    #[error("session cancelled")]
    Cancelled,
}

impl From<graph::GraphError> for OrchestratorError {
    fn from(err: graph::GraphError) -> Self {
        OrchestratorError::Validation(err.to_string())
    }
}

impl OrchestratorError {
    /// Exit code per spec §6.1. `SessionOutcome::exit_code` covers the
    /// already-`Ok` cases (partial failure, abort); this covers the paths that
    /// never reached a `ScheduleResult` at all.
    pub fn exit_code(&self) -> i32 {
        match self {
            OrchestratorError::Validation(_) => 2,
            OrchestratorError::Cancelled => 130,
            OrchestratorError::Plan(_) => 1,
            OrchestratorError::Config(_) => 1,
            OrchestratorError::Io(_)
            | OrchestratorError::Journal(_)
            | OrchestratorError::TaskStore(_)
            | OrchestratorError::Scheduler(_) => 1,
        }
    }
}
