use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use graph::{Task, TaskId};

use crate::invoker::AgentInvoker;
use crate::outcome::WorkerOutcome;
use crate::planner::{PlanError, PlannerInvoker};

/// An in-process [`AgentInvoker`] that replays a scripted sequence of outcomes per
/// task, one per attempt; the last scripted outcome repeats for any attempt beyond
/// the script's length. Useful for exercising retry and cancellation paths without
/// a real agent.
pub struct ScriptedInvoker {
    scripts: HashMap<TaskId, Vec<WorkerOutcome>>,
    invocations: Mutex<HashMap<TaskId, u32>>,
}

impl ScriptedInvoker {
    pub fn new(scripts: HashMap<TaskId, Vec<WorkerOutcome>>) -> Self {
        ScriptedInvoker {
            scripts,
            invocations: Mutex::new(HashMap::new()),
        }
    }

    /// The number of times `invoke` has been called for `task_id` so far.
    pub fn call_count(&self, task_id: &TaskId) -> u32 {
        *self.invocations.lock().get(task_id).unwrap_or(&0)
    }
}

#[async_trait]
impl AgentInvoker for ScriptedInvoker {
    async fn invoke(&self, task: &Task, attempt: u32) -> WorkerOutcome {
        *self.invocations.lock().entry(task.id.clone()).or_insert(0) += 1;

        let script = self.scripts.get(&task.id);
        match script {
            Some(outcomes) if !outcomes.is_empty() => {
                let index = (attempt as usize).saturating_sub(1).min(outcomes.len() - 1);
                outcomes[index].clone()
            }
            _ => WorkerOutcome::success(Default::default(), "no script: default success"),
        }
    }
}

/// An in-process [`PlannerInvoker`] that returns a fixed task list (or a fixed
/// error) regardless of the instruction given to it.
pub struct ScriptedPlanner {
    result: Result<Vec<Task>, String>,
}

impl ScriptedPlanner {
    pub fn new(tasks: Vec<Task>) -> Self {
        ScriptedPlanner { result: Ok(tasks) }
    }

    pub fn failing(error: impl Into<String>) -> Self {
        ScriptedPlanner {
            result: Err(error.into()),
        }
    }
}

#[async_trait]
impl PlannerInvoker for ScriptedPlanner {
    async fn plan(&self, _instruction: &str) -> Result<Vec<Task>, PlanError> {
        self.result.clone().map_err(PlanError::new)
    }
}
