use std::io::Write;
use std::path::Path;

use graph::{SessionId, Task};
use serde::{Deserialize, Serialize};

use crate::error::OrchestratorError;

/// `planning-sessions/<sessionId>.json`: the Planner's output, persisted so a
/// resumed session can rebuild its task list without re-invoking the Planner.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningSnapshot {
    pub session_id: SessionId,
    pub instruction: String,
    pub tasks: Vec<Task>,
}

impl PlanningSnapshot {
    /// Persists via the same write-tmp-rename discipline used for the session
    /// pointer and per-task files.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), OrchestratorError> {
        let path = path.as_ref();
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;
        let serialized = serde_json::to_vec_pretty(self)
            .map_err(|err| OrchestratorError::Validation(err.to_string()))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&serialized)?;
        tmp.flush()?;
        tmp.persist(path).map_err(|err| err.error)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<PlanningSnapshot, OrchestratorError> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|err| OrchestratorError::Validation(err.to_string()))
    }
}
