use async_trait::async_trait;

use graph::Task;

use crate::outcome::WorkerOutcome;

/// Opaque handle to a Planner / Worker / Judge agent. The orchestrator only ever
/// depends on this trait; the concrete agent (an LLM adapter, a subprocess, a
/// scripted test double) lives entirely on the other side of it.
#[async_trait]
pub trait AgentInvoker: Send + Sync {
    async fn invoke(&self, task: &Task, attempt: u32) -> WorkerOutcome;
}
