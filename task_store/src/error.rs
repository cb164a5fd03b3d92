use thiserror::Error;

use graph::TaskId;

#[derive(Debug, Error)]
pub enum TaskStoreError {
    #[error("task store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to (de)serialize task: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("task {0} not found")]
    NotFound(TaskId),
}
