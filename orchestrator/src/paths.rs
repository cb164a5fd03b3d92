use std::path::{Path, PathBuf};

use graph::SessionId;

/// The on-disk layout under `<agentCoordPath>` from spec §6.2, centralized so
/// every path is computed the same way everywhere.
#[derive(Clone, Debug)]
pub struct CoordPaths {
    base: PathBuf,
}

impl CoordPaths {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        CoordPaths { base: base.into() }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn config_path(&self) -> PathBuf {
        self.base.join("config.json")
    }

    pub fn journal_path(&self, session_id: &SessionId) -> PathBuf {
        self.base
            .join("sessions")
            .join(format!("{}.jsonl", session_id.as_str()))
    }

    pub fn planning_snapshot_path(&self, session_id: &SessionId) -> PathBuf {
        self.base
            .join("planning-sessions")
            .join(format!("{}.json", session_id.as_str()))
    }

    pub fn tasks_dir(&self) -> PathBuf {
        self.base.join("tasks")
    }

    pub fn pointer_path(&self) -> PathBuf {
        self.base.join("pointer.json")
    }

    pub fn report_dir(&self, session_id: &SessionId) -> PathBuf {
        self.base.join("reports").join(session_id.as_str())
    }

    pub fn summary_report_path(&self, session_id: &SessionId) -> PathBuf {
        self.report_dir(session_id).join("summary.md")
    }
}
