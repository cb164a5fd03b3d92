use std::sync::LazyLock;

use regex::Regex;

use crate::model::FallbackKind;

/// The authoritative fallback-pattern table, compiled once per process.
pub static FALLBACK_PATTERNS: LazyLock<Vec<(FallbackKind, Regex, u32)>> = LazyLock::new(|| {
    vec![
        (
            FallbackKind::NullishCoalescingDefault,
            Regex::new(r#"\?\?\s*("(unknown|default|error|none|N/A)"|\[\]|"")"#).unwrap(),
            10,
        ),
        (
            FallbackKind::LogicalOrDefault,
            Regex::new(r#"\|\|\s*("(unknown|default|error|none|N/A)"|"")"#).unwrap(),
            10,
        ),
        (
            FallbackKind::EmptyCatch,
            Regex::new(r#"catch\s*(\(.*\))?\s*\{\s*(return\s+(""|null|\[\]|undefined));?\s*\}"#)
                .unwrap(),
            10,
        ),
        (
            FallbackKind::SilentSkip,
            Regex::new(r"if\s*\(\s*!\s*\w+\s*\)\s*return\s*;").unwrap(),
            10,
        ),
    ]
});

/// Case-insensitive: a trailing comment marking a fallback/silent-skip as deliberate.
pub static EXEMPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)//.*\b(intentional|expected|required|ok)\b").unwrap());

/// Prefixes that make a whole line a comment in the languages workers commonly touch.
const COMMENT_PREFIXES: &[&str] = &["//", "#", "--", "/*", "*"];

pub fn is_comment_only(line: &str) -> bool {
    let trimmed = line.trim_start();
    COMMENT_PREFIXES.iter().any(|p| trimmed.starts_with(p))
}

/// Three or more `??` occurrences on a single line is its own fallback shape, not
/// caught by the single-occurrence patterns above.
pub fn is_fallback_chain(line: &str) -> bool {
    line.matches("??").count() >= 3
}

/// APIs whose availability depends on a runtime (browser vs. Node vs. server) the
/// reviewed file may not actually be running under.
pub static PLAUSIBLE_BUT_WRONG: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    vec![
        ("window", Regex::new(r"\bwindow\.\w+").unwrap()),
        ("document", Regex::new(r"\bdocument\.\w+").unwrap()),
        ("localStorage", Regex::new(r"\blocalStorage\b").unwrap()),
        ("process.env", Regex::new(r"\bprocess\.env\b").unwrap()),
        ("__dirname", Regex::new(r"\b__dirname\b").unwrap()),
        ("require", Regex::new(r"\brequire\(").unwrap()),
        ("fs.readFileSync", Regex::new(r"\bfs\.readFileSync\b").unwrap()),
    ]
});

/// Matches a top-level exported symbol declaration, capturing its name.
pub static EXPORT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"^\s*pub fn (\w+)").unwrap(),
        Regex::new(r"^\s*pub struct (\w+)").unwrap(),
        Regex::new(r"^\s*pub enum (\w+)").unwrap(),
        Regex::new(r"^\s*export function (\w+)").unwrap(),
        Regex::new(r"^\s*export const (\w+)").unwrap(),
        Regex::new(r"^\s*export class (\w+)").unwrap(),
    ]
});

/// Framework-hook symbol-name exemptions, checked case-sensitively against the
/// symbol itself rather than the whole line.
pub static FRAMEWORK_HOOK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(use[A-Z]|on[A-Z]|get|post|put|patch|delete|head|options)").unwrap());
