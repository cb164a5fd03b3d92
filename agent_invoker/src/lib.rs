//! The opaque agent boundary: `AgentInvoker` and an in-process scripted double.

mod invoker;
mod judge;
mod mock;
mod outcome;
mod planner;

pub use invoker::AgentInvoker;
pub use judge::{JudgeInvoker, JudgeVerdict, NoFailuresJudge, SessionSummary};
pub use mock::{ScriptedInvoker, ScriptedPlanner};
pub use outcome::WorkerOutcome;
pub use planner::{PlanError, PlannerInvoker};

#[cfg(test)]
mod tests;
