use thiserror::Error;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("journal I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize journal record: {0}")]
    Serialize(#[from] serde_json::Error),
}
