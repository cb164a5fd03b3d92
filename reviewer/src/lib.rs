//! Stateless quality-gate review of a task attempt's changed files.

mod detectors;
mod model;
mod patterns;
mod review;

pub use model::{
    ChangedFile, FallbackKind, Finding, FindingKind, ReviewConfig, ReviewResult,
};
pub use review::review;

#[cfg(test)]
mod tests;
