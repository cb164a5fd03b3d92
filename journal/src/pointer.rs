use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use graph::SessionId;

use crate::error::JournalError;

/// `pointer.json`: a single-file mapping `{sessionId -> journalPath}`, updated
/// atomically (write-tmp-rename) on every session `start` and `complete`.
#[derive(Default, Clone, Debug)]
pub struct SessionPointer {
    entries: BTreeMap<SessionId, PathBuf>,
}

impl SessionPointer {
    pub fn load(path: impl AsRef<Path>) -> Result<SessionPointer, JournalError> {
        let path = path.as_ref();
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SessionPointer::default());
            }
            Err(err) => return Err(err.into()),
        };
        let raw: BTreeMap<String, PathBuf> = serde_json::from_str(&contents)?;
        let entries = raw.into_iter().map(|(id, p)| (SessionId::new(id), p)).collect();
        Ok(SessionPointer { entries })
    }

    pub fn get(&self, session_id: &SessionId) -> Option<&Path> {
        self.entries.get(session_id).map(PathBuf::as_path)
    }

    /// Sets the pointer for `session_id` and atomically persists the whole map to
    /// `path` via a same-directory temp file followed by `rename`.
    pub fn set(
        &mut self,
        path: impl AsRef<Path>,
        session_id: SessionId,
        journal_path: impl Into<PathBuf>,
    ) -> Result<(), JournalError> {
        self.entries.insert(session_id, journal_path.into());
        self.persist(path)
    }

    fn persist(&self, path: impl AsRef<Path>) -> Result<(), JournalError> {
        let path = path.as_ref();
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;

        let raw: BTreeMap<&str, &Path> = self
            .entries
            .iter()
            .map(|(id, p)| (id.as_str(), p.as_path()))
            .collect();
        let serialized = serde_json::to_vec_pretty(&raw)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&serialized)?;
        tmp.flush()?;
        tmp.persist(path)
            .map_err(|err| JournalError::Io(err.error))?;
        Ok(())
    }
}
