use std::collections::HashSet;

use crate::model::{ChangedFile, Finding, FindingKind, ReviewConfig};
use crate::patterns::{
    is_comment_only, is_fallback_chain, EXPORT_PATTERNS, EXEMPTION_RE, FALLBACK_PATTERNS,
    FRAMEWORK_HOOK_RE, PLAUSIBLE_BUT_WRONG,
};

/// Detector 1: line-by-line regex match against the fallback-pattern table.
pub fn fallback_findings(files: &[ChangedFile]) -> Vec<Finding> {
    let mut findings = Vec::new();
    for file in files {
        for (line_no, line) in file.contents.lines().enumerate() {
            if is_comment_only(line) {
                continue;
            }
            let exempt = EXEMPTION_RE.is_match(line);

            for (kind, pattern, weight) in FALLBACK_PATTERNS.iter() {
                if pattern.is_match(line) {
                    findings.push(Finding {
                        file: file.path.clone(),
                        line: Some(line_no + 1),
                        kind: FindingKind::Fallback { pattern: *kind },
                        weight: *weight,
                        exempt,
                    });
                }
            }
            if is_fallback_chain(line) {
                findings.push(Finding {
                    file: file.path.clone(),
                    line: Some(line_no + 1),
                    kind: FindingKind::Fallback {
                        pattern: crate::model::FallbackKind::FallbackChain,
                    },
                    weight: 10,
                    exempt,
                });
            }
        }
    }
    findings
}

/// Detector 2: top-level exported symbols unused outside, and barely used inside,
/// their own file.
pub fn unused_export_findings(files: &[ChangedFile]) -> Vec<Finding> {
    let mut findings = Vec::new();

    for file in files {
        for line in file.contents.lines() {
            let Some(symbol) = extract_exported_symbol(line) else {
                continue;
            };
            if FRAMEWORK_HOOK_RE.is_match(&symbol) {
                continue;
            }

            let own_occurrences = count_occurrences(&file.contents, &symbol);
            let used_elsewhere = files
                .iter()
                .filter(|other| other.path != file.path)
                .any(|other| other.contents.contains(&symbol));

            if !used_elsewhere && own_occurrences <= 1 {
                findings.push(Finding {
                    file: file.path.clone(),
                    line: None,
                    kind: FindingKind::UnusedExport { symbol },
                    weight: 5,
                    exempt: false,
                });
            }
        }
    }
    findings
}

fn extract_exported_symbol(line: &str) -> Option<String> {
    EXPORT_PATTERNS
        .iter()
        .find_map(|re| re.captures(line))
        .map(|caps| caps[1].to_string())
}

fn count_occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

/// Detector 3: how much of each changed path's vocabulary is explained by the task
/// description. `None` when there is no description to compare against.
pub fn scope_creep_findings(
    files: &[ChangedFile],
    task_description: Option<&str>,
    config: &ReviewConfig,
) -> Vec<Finding> {
    let Some(description) = task_description else {
        return Vec::new();
    };
    let task_tokens = tokenize(description);
    let threshold = 1.0 - config.scope_creep_tolerance;

    let mut findings = Vec::new();
    for file in files {
        let path_tokens = tokenize(&file.path);
        if path_tokens.is_empty() {
            continue;
        }
        let overlap = task_tokens.intersection(&path_tokens).count();
        let relevance = overlap as f64 / path_tokens.len() as f64;

        if relevance < threshold {
            let deviation = threshold - relevance;
            let weight = (15.0 * deviation).round() as u32;
            findings.push(Finding {
                file: file.path.clone(),
                line: None,
                kind: FindingKind::ScopeCreep { relevance },
                weight,
                exempt: false,
            });
        }
    }
    findings
}

fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(|token| token.to_lowercase())
        .collect()
}

/// Detector 4: pattern match against a curated list of runtime-availability-sensitive
/// APIs. Every match is critical, exemption only halves its weight.
pub fn plausible_but_wrong_findings(files: &[ChangedFile]) -> Vec<Finding> {
    let mut findings = Vec::new();
    for file in files {
        for (line_no, line) in file.contents.lines().enumerate() {
            if is_comment_only(line) {
                continue;
            }
            let exempt = EXEMPTION_RE.is_match(line);
            for (api, pattern) in PLAUSIBLE_BUT_WRONG.iter() {
                if pattern.is_match(line) {
                    findings.push(Finding {
                        file: file.path.clone(),
                        line: Some(line_no + 1),
                        kind: FindingKind::PlausibleButWrong {
                            api: (*api).to_string(),
                        },
                        weight: 20,
                        exempt,
                    });
                }
            }
        }
    }
    findings
}
