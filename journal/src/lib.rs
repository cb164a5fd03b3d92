//! The append-only NDJSON session journal and resume protocol.

mod error;
mod journal;
mod pointer;
mod record;
mod resume;

pub use error::JournalError;
pub use journal::{iterate, Journal};
pub use pointer::SessionPointer;
pub use record::{Record, SessionMetrics};
pub use resume::{extract_resume, ResumeContext};

#[cfg(test)]
mod tests;
