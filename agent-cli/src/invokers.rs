use async_trait::async_trait;

use agent_invoker::{PlanError, PlannerInvoker};
use graph::{Task, TaskType};

/// The default Planner used when no real LLM-backed planner is configured: turns
/// the whole instruction into a single implementation task. Real planning is an
/// opaque `AgentInvoker` concern (spec §1, out of scope for this engine); this
/// exists so `agent plan` has something to schedule against out of the box.
pub struct InstructionEchoPlanner;

#[async_trait]
impl PlannerInvoker for InstructionEchoPlanner {
    async fn plan(&self, instruction: &str) -> Result<Vec<Task>, PlanError> {
        if instruction.trim().is_empty() {
            return Err(PlanError::new("instruction must not be empty"));
        }
        Ok(vec![Task::new(
            "task-1",
            instruction,
            instruction,
            TaskType::Implementation,
        )])
    }
}
