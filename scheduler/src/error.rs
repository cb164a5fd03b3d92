use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error(transparent)]
    Graph(#[from] graph::GraphError),

    #[error(transparent)]
    Journal(#[from] journal::JournalError),

    #[error(transparent)]
    TaskStore(#[from] task_store::TaskStoreError),
}
