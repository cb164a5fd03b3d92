use thiserror::Error;

use crate::task::TaskId;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("task {from} depends on unknown task {to}")]
    UnknownDependency { from: TaskId, to: TaskId },

    #[error("duplicate task id {0}")]
    DuplicateTaskId(TaskId),
}
