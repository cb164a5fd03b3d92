use std::collections::BTreeMap;

/// What a single `workerFn` invocation produced. `changed_files` maps a path to its
/// full new contents, which the caller hands to the reviewer before accepting it.
#[derive(Clone, Debug)]
pub enum WorkerOutcome {
    Success {
        changed_files: BTreeMap<String, String>,
        artifact_summary: String,
    },
    Failure {
        error: String,
        retryable: bool,
    },
}

impl WorkerOutcome {
    pub fn success(changed_files: BTreeMap<String, String>, artifact_summary: impl Into<String>) -> Self {
        WorkerOutcome::Success {
            changed_files,
            artifact_summary: artifact_summary.into(),
        }
    }

    pub fn retryable_failure(error: impl Into<String>) -> Self {
        WorkerOutcome::Failure {
            error: error.into(),
            retryable: true,
        }
    }

    pub fn fatal_failure(error: impl Into<String>) -> Self {
        WorkerOutcome::Failure {
            error: error.into(),
            retryable: false,
        }
    }
}
