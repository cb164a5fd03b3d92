use crate::model::{ChangedFile, ReviewConfig};
use crate::review::review;

fn config() -> ReviewConfig {
    ReviewConfig::default()
}

#[test]
fn nullish_coalescing_default_is_flagged_and_scored() {
    let files = vec![ChangedFile::new(
        "src/widget.ts",
        "const name = user.name ?? \"unknown\";\n",
    )];
    let result = review(&files, None, &config());
    assert_eq!(result.score, 90);
    assert!(!result.rejected);
    assert_eq!(result.findings.len(), 1);
}

#[test]
fn exemption_marker_halves_weight_but_is_still_recorded() {
    let files = vec![ChangedFile::new(
        "src/widget.ts",
        "const name = user.name ?? \"unknown\"; // intentional\n",
    )];
    let result = review(&files, None, &config());
    assert_eq!(result.findings.len(), 1);
    assert!(result.findings[0].exempt);
    assert_eq!(result.score, 95);
}

#[test]
fn comment_only_lines_are_skipped() {
    let files = vec![ChangedFile::new(
        "src/widget.ts",
        "// const name = user.name ?? \"unknown\";\n",
    )];
    let result = review(&files, None, &config());
    assert!(result.findings.is_empty());
    assert_eq!(result.score, 100);
}

#[test]
fn fallback_chain_of_three_or_more_is_its_own_finding() {
    let files = vec![ChangedFile::new(
        "src/widget.ts",
        "const v = a ?? b ?? c ?? d;\n",
    )];
    let result = review(&files, None, &config());
    assert!(result
        .findings
        .iter()
        .any(|f| matches!(f.kind, crate::model::FindingKind::Fallback { pattern: crate::model::FallbackKind::FallbackChain })));
}

#[test]
fn unused_export_used_only_once_in_own_file_is_flagged() {
    let files = vec![
        ChangedFile::new("src/a.rs", "pub fn helper() {}\n"),
        ChangedFile::new("src/b.rs", "fn main() {}\n"),
    ];
    let result = review(&files, None, &config());
    assert_eq!(result.findings.len(), 1);
    assert!(matches!(
        &result.findings[0].kind,
        crate::model::FindingKind::UnusedExport { symbol } if symbol == "helper"
    ));
}

#[test]
fn export_used_in_another_file_is_not_flagged() {
    let files = vec![
        ChangedFile::new("src/a.rs", "pub fn helper() {}\n"),
        ChangedFile::new("src/b.rs", "fn main() { helper(); }\n"),
    ];
    let result = review(&files, None, &config());
    assert!(result.findings.is_empty());
}

#[test]
fn framework_hook_symbol_is_exempted() {
    let files = vec![ChangedFile::new(
        "src/hooks.ts",
        "export function useWidget() {}\n",
    )];
    let result = review(&files, None, &config());
    assert!(result.findings.is_empty());
}

#[test]
fn scope_creep_flags_paths_unrelated_to_the_task() {
    let files = vec![ChangedFile::new("src/billing/invoice.rs", "fn x() {}\n")];
    let result = review(&files, Some("fix the login page redirect"), &config());
    assert!(result
        .findings
        .iter()
        .any(|f| matches!(f.kind, crate::model::FindingKind::ScopeCreep { .. })));
}

#[test]
fn scope_creep_skipped_when_no_task_description() {
    let files = vec![ChangedFile::new("src/billing/invoice.rs", "fn x() {}\n")];
    let result = review(&files, None, &config());
    assert!(result.findings.is_empty());
}

#[test]
fn plausible_but_wrong_api_is_always_critical() {
    let files = vec![ChangedFile::new(
        "src/widget.ts",
        "const root = window.location.href; // intentional\n",
    )];
    let result = review(&files, None, &config());
    assert_eq!(result.findings.len(), 1);
    assert!(result.findings[0].exempt);
    assert_eq!(result.score, 90);
    // Exempted plausible-but-wrong still counts toward criticalCount.
    assert!(result.findings[0].is_critical());
}

#[test]
fn three_critical_findings_trigger_rejection() {
    let files = vec![ChangedFile::new(
        "src/widget.ts",
        concat!(
            "const a = x ?? \"unknown\";\n",
            "const b = window.location.href;\n",
            "const c = document.title;\n",
        ),
    )];
    let result = review(&files, None, &config());
    assert!(result.rejected);
}

/// The S4 scenario: first attempt rejected for a fallback pattern, second attempt
/// (without the pattern) reviews clean.
#[test]
fn reject_then_fix_scenario() {
    let first = vec![ChangedFile::new(
        "src/widget.ts",
        concat!(
            "const a = x ?? \"unknown\";\n",
            "const b = window.location.href;\n",
            "const c = document.title;\n",
        ),
    )];
    let second = vec![ChangedFile::new("src/widget.ts", "const a = x;\n")];

    let first_result = review(&first, None, &config());
    assert!(first_result.rejected);

    let second_result = review(&second, None, &config());
    assert!(!second_result.rejected);
    assert_eq!(second_result.score, 100);
}
