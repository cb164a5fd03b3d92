use async_trait::async_trait;

use graph::Task;

/// Opaque handle to the Planner agent: decomposes a user instruction into a
/// dependency graph of [`Task`]s. The concrete agent (LLM adapter, subprocess,
/// scripted test double) lives entirely on the other side of this trait.
#[async_trait]
pub trait PlannerInvoker: Send + Sync {
    async fn plan(&self, instruction: &str) -> Result<Vec<Task>, PlanError>;
}

#[derive(Clone, Debug, thiserror::Error)]
#[error("planner failed: {0}")]
pub struct PlanError(pub String);

impl PlanError {
    pub fn new(message: impl Into<String>) -> Self {
        PlanError(message.into())
    }
}
