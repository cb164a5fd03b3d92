use crate::detectors::{
    fallback_findings, plausible_but_wrong_findings, scope_creep_findings, unused_export_findings,
};
use crate::model::{ChangedFile, ReviewConfig, ReviewResult};

/// Runs all four detectors over a task attempt's changed files and scores the result.
pub fn review(
    changed_files: &[ChangedFile],
    task_description: Option<&str>,
    config: &ReviewConfig,
) -> ReviewResult {
    let mut findings = fallback_findings(changed_files);
    findings.extend(unused_export_findings(changed_files));
    findings.extend(scope_creep_findings(changed_files, task_description, config));
    findings.extend(plausible_but_wrong_findings(changed_files));

    let penalty: u32 = findings.iter().map(|f| f.penalty()).sum();
    let score = 100 - penalty as i32;
    let score = score.max(0);

    let critical_count = findings.iter().filter(|f| f.is_critical()).count() as u32;
    let rejected = critical_count >= config.reject_threshold;

    ReviewResult {
        score,
        rejected,
        findings,
    }
}
