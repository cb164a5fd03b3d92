use graph::TaskId;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ScheduleResult {
    pub completed: Vec<TaskId>,
    pub failed: Vec<TaskId>,
    pub blocked: Vec<TaskId>,
    /// The subset of `blocked` (plus any unschedulable node) that traces back to a
    /// cyclic dependency rather than a failed worker attempt — `graph::cyclic_ids()`
    /// carried through so callers can distinguish a validation-shaped cycle from an
    /// execution failure (spec §6.1's exit code 2 vs 3).
    pub cyclic: Vec<TaskId>,
    pub aborted: bool,
}
