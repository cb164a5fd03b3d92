use serde::{Deserialize, Serialize};

/// One file touched by a task attempt, as handed to the reviewer after a worker run.
#[derive(Clone, Debug)]
pub struct ChangedFile {
    pub path: String,
    pub contents: String,
}

impl ChangedFile {
    pub fn new(path: impl Into<String>, contents: impl Into<String>) -> Self {
        ChangedFile {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackKind {
    NullishCoalescingDefault,
    LogicalOrDefault,
    EmptyCatch,
    SilentSkip,
    FallbackChain,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FindingKind {
    Fallback { pattern: FallbackKind },
    UnusedExport { symbol: String },
    ScopeCreep { relevance: f64 },
    PlausibleButWrong { api: String },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Finding {
    pub file: String,
    pub line: Option<usize>,
    pub kind: FindingKind,
    pub weight: u32,
    pub exempt: bool,
}

impl Finding {
    /// The penalty this finding contributes to the score: half weight once exempted.
    pub fn penalty(&self) -> u32 {
        if self.exempt {
            self.weight / 2
        } else {
            self.weight
        }
    }

    /// Whether this finding counts toward `criticalCount`. Fallback and unused-export
    /// findings stop counting once exempted; plausible-but-wrong never does.
    pub fn is_critical(&self) -> bool {
        match &self.kind {
            FindingKind::Fallback { .. } | FindingKind::UnusedExport { .. } => !self.exempt,
            FindingKind::PlausibleButWrong { .. } => true,
            FindingKind::ScopeCreep { .. } => false,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReviewResult {
    pub score: i32,
    pub rejected: bool,
    pub findings: Vec<Finding>,
}

/// Tunables left as configuration rather than invariants.
#[derive(Clone, Copy, Debug)]
pub struct ReviewConfig {
    pub scope_creep_tolerance: f64,
    pub reject_threshold: u32,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        ReviewConfig {
            scope_creep_tolerance: 0.5,
            reject_threshold: 3,
        }
    }
}
