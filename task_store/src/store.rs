use std::io::Write;
use std::path::{Path, PathBuf};

use graph::{Task, TaskId};

use crate::error::TaskStoreError;

/// Durable key-value store of `TaskId -> Task`, one JSON file per task under
/// `<base>/tasks/<id>.json`. Concurrent writers to the same task id are the
/// Scheduler's problem to avoid (RUNNING implies exactly one worker); the store
/// itself takes no lock.
pub struct TaskStore {
    base: PathBuf,
}

impl TaskStore {
    pub fn new(base: impl Into<PathBuf>) -> TaskStore {
        TaskStore { base: base.into() }
    }

    fn path_for(&self, id: &TaskId) -> PathBuf {
        self.base.join(format!("{}.json", id.as_str()))
    }

    pub fn read_task(&self, id: &TaskId) -> Result<Task, TaskStoreError> {
        let path = self.path_for(id);
        let contents = std::fs::read_to_string(&path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                TaskStoreError::NotFound(id.clone())
            } else {
                TaskStoreError::Io(err)
            }
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Persists `task` to its file via a same-directory temp file plus `rename`,
    /// the same write-tmp-rename discipline used for the session pointer.
    pub fn write_task(&self, task: &Task) -> Result<(), TaskStoreError> {
        std::fs::create_dir_all(&self.base)?;
        let serialized = serde_json::to_vec_pretty(task)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.base)?;
        tmp.write_all(&serialized)?;
        tmp.flush()?;
        tmp.persist(self.path_for(&task.id))
            .map_err(|err| TaskStoreError::Io(err.error))?;
        Ok(())
    }

    /// Lists every task currently persisted, in file-system order (not sorted).
    pub fn list_tasks(&self) -> Result<Vec<Task>, TaskStoreError> {
        let entries = match std::fs::read_dir(&self.base) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut tasks = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.path().extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let contents = std::fs::read_to_string(entry.path())?;
            tasks.push(serde_json::from_str(&contents)?);
        }
        Ok(tasks)
    }

    pub fn base(&self) -> &Path {
        &self.base
    }
}
