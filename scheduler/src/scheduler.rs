use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use agent_invoker::{AgentInvoker, WorkerOutcome};
use graph::{DependencyGraph, SessionId, Task, TaskId, TaskState};
use journal::{Journal, Record};
use reviewer::ChangedFile;
use task_store::TaskStore;

use crate::cancel::CancelHandle;
use crate::config::SchedulerConfig;
use crate::error::SchedulerError;
use crate::result::ScheduleResult;

struct TaskRunOutcome {
    task: Task,
}

/// Runs every task to a terminal state (or until cancelled), level by level, with a
/// bounded worker pool, exponential-backoff retries, and antipattern review gating
/// each success before it is accepted.
pub async fn run(
    tasks: Vec<Task>,
    invoker: Arc<dyn AgentInvoker>,
    task_store: Arc<TaskStore>,
    journal: Arc<Journal>,
    session_id: SessionId,
    config: SchedulerConfig,
    cancel: CancelHandle,
) -> Result<ScheduleResult, SchedulerError> {
    let graph = DependencyGraph::build(&tasks)?;
    let levels = graph.compute_levels();

    let mut tasks_by_id: HashMap<TaskId, Task> =
        tasks.into_iter().map(|t| (t.id.clone(), t)).collect();

    let mut cyclic: Vec<TaskId> = graph.cyclic_ids().iter().cloned().collect();
    cyclic.sort();
    if !cyclic.is_empty() {
        log::warn!(
            "cyclic dependency detected in session {}, blocking tasks {:?} before scheduling",
            session_id.as_str(),
            cyclic
        );
        // No dedicated journal record type exists for "blocked by cycle" (spec
        // §3/§6.4's record list is authoritative); reuse task_failed's shape to put
        // the cycle on record against each task actually in it, rather than leaving
        // a resumed/inspected session with no trace of why these tasks are BLOCKED.
        for id in &cyclic {
            journal.append(&Record::TaskFailed {
                session_id: session_id.clone(),
                task_id: id.clone(),
                error: format!("blocked: part of a cyclic dependency among {cyclic:?}"),
                timestamp: Utc::now(),
            })?;
        }
    }

    for id in &levels.unschedulable {
        if let Some(task) = tasks_by_id.get_mut(id) {
            task.state = TaskState::Blocked;
            task_store.write_task(task)?;
        }
    }

    // A resumed session may hand us tasks that are already FAILED (from before the
    // crash); their dependents need blocking just as if they had failed this run.
    let pre_failed: Vec<TaskId> = tasks_by_id
        .values()
        .filter(|t| t.state == TaskState::Failed)
        .map(|t| t.id.clone())
        .collect();
    for id in &pre_failed {
        propagate_blocked(&mut tasks_by_id, &graph, id, &task_store)?;
    }

    let semaphore = Arc::new(Semaphore::new(config.max_workers.max(1)));
    let mut aborted = false;

    for (level_idx, level) in levels.levels.iter().enumerate() {
        if cancel.is_cancelled() {
            aborted = true;
            break;
        }

        // A resumed task already DONE (re-verified from the journal) or a
        // pre-existing FAILED/BLOCKED task is already terminal; skip dispatch.
        let dispatchable: Vec<TaskId> = level
            .iter()
            .filter(|id| {
                !matches!(
                    tasks_by_id[*id].state,
                    TaskState::Blocked | TaskState::Done | TaskState::Failed
                )
            })
            .cloned()
            .collect();
        if dispatchable.is_empty() {
            continue;
        }

        for id in &dispatchable {
            let task = tasks_by_id.get_mut(id).expect("dispatchable id must exist");
            task.state = TaskState::Ready;
            task_store.write_task(task)?;
            journal.append(&Record::TaskReady {
                session_id: session_id.clone(),
                task_id: id.clone(),
                timestamp: Utc::now(),
            })?;
        }

        journal.append(&Record::PhaseStart {
            session_id: session_id.clone(),
            level: level_idx,
            task_ids: dispatchable.clone(),
            timestamp: Utc::now(),
        })?;

        let mut join_set = JoinSet::new();
        for id in &dispatchable {
            let task = tasks_by_id.remove(id).expect("dispatchable id must exist");
            join_set.spawn(run_task(
                task,
                semaphore.clone(),
                invoker.clone(),
                cancel.clone(),
                config.clone(),
                session_id.clone(),
                journal.clone(),
                task_store.clone(),
            ));
        }

        let outcomes = drain_join_set(join_set, &cancel).await?;
        let mut newly_failed = Vec::new();
        for outcome in outcomes {
            let id = outcome.task.id.clone();
            if outcome.task.state == TaskState::Failed {
                newly_failed.push(id.clone());
            }
            tasks_by_id.insert(id, outcome.task);
        }

        journal.append(&Record::PhaseComplete {
            session_id: session_id.clone(),
            level: level_idx,
            timestamp: Utc::now(),
        })?;

        for failed_id in &newly_failed {
            propagate_blocked(&mut tasks_by_id, &graph, failed_id, &task_store)?;
        }

        if cancel.is_cancelled() {
            aborted = true;
            break;
        }
    }

    let mut completed: Vec<TaskId> = Vec::new();
    let mut failed: Vec<TaskId> = Vec::new();
    let mut blocked: Vec<TaskId> = Vec::new();
    for task in tasks_by_id.values() {
        match task.state {
            TaskState::Done => completed.push(task.id.clone()),
            TaskState::Failed => failed.push(task.id.clone()),
            TaskState::Blocked => blocked.push(task.id.clone()),
            _ => {}
        }
    }
    completed.sort();
    failed.sort();
    blocked.sort();

    Ok(ScheduleResult {
        completed,
        failed,
        blocked,
        cyclic,
        aborted,
    })
}

async fn run_task(
    mut task: Task,
    semaphore: Arc<Semaphore>,
    invoker: Arc<dyn AgentInvoker>,
    cancel: CancelHandle,
    config: SchedulerConfig,
    session_id: SessionId,
    journal: Arc<Journal>,
    task_store: Arc<TaskStore>,
) -> Result<TaskRunOutcome, SchedulerError> {
    let _permit = semaphore.acquire_owned().await.expect("semaphore is never closed");

    loop {
        if cancel.is_cancelled() {
            break;
        }

        task.attempts += 1;
        task.state = TaskState::Running;
        journal.append(&Record::TaskStart {
            session_id: session_id.clone(),
            task_id: task.id.clone(),
            attempt: task.attempts,
            timestamp: Utc::now(),
        })?;

        let invocation = invoker.invoke(&task, task.attempts);
        let raw_outcome = match config.worker_timeout {
            Some(duration) => match tokio::time::timeout(duration, invocation).await {
                Ok(outcome) => outcome,
                Err(_) => WorkerOutcome::retryable_failure("worker timed out"),
            },
            None => invocation.await,
        };

        let outcome = apply_review(&task, raw_outcome, &journal, &session_id, &config)?;

        match outcome {
            WorkerOutcome::Success {
                changed_files,
                artifact_summary: _,
            } => {
                for (path, contents) in &changed_files {
                    task.output_files.insert(path.clone(), contents.clone());
                }
                task.state = TaskState::Done;
                task.last_error = None;
                task_store.write_task(&task)?;
                journal.append(&Record::TaskDone {
                    session_id: session_id.clone(),
                    task_id: task.id.clone(),
                    outputs: changed_files.keys().cloned().collect(),
                    timestamp: Utc::now(),
                })?;
                break;
            }
            WorkerOutcome::Failure { error, retryable } => {
                task.last_error = Some(error.clone());
                if retryable && task.attempts < task.max_attempts {
                    task.state = TaskState::Ready;
                    task_store.write_task(&task)?;
                    let delay = config.backoff_for(task.attempts);
                    log::debug!(
                        "task {} attempt {} failed ({error}), retrying in {delay:?}",
                        task.id,
                        task.attempts
                    );
                    tokio::time::sleep(delay).await;
                    continue;
                }
                task.state = TaskState::Failed;
                task_store.write_task(&task)?;
                log::warn!("task {} failed permanently: {error}", task.id);
                journal.append(&Record::TaskFailed {
                    session_id: session_id.clone(),
                    task_id: task.id.clone(),
                    error,
                    timestamp: Utc::now(),
                })?;
                break;
            }
        }
    }

    Ok(TaskRunOutcome { task })
}

/// Runs a successful outcome's changed files through the antipattern reviewer,
/// rewriting an accepted-but-rejected success into a retryable failure.
fn apply_review(
    task: &Task,
    outcome: WorkerOutcome,
    journal: &Journal,
    session_id: &SessionId,
    config: &SchedulerConfig,
) -> Result<WorkerOutcome, SchedulerError> {
    match outcome {
        WorkerOutcome::Success {
            changed_files,
            artifact_summary,
        } => {
            let changed: Vec<ChangedFile> = changed_files
                .iter()
                .map(|(path, contents)| ChangedFile::new(path.clone(), contents.clone()))
                .collect();
            let review = reviewer::review(&changed, Some(&task.description), &config.review_config);
            journal.append(&Record::TaskReviewed {
                session_id: session_id.clone(),
                task_id: task.id.clone(),
                score: review.score,
                rejected: review.rejected,
                timestamp: Utc::now(),
            })?;
            if review.rejected {
                Ok(WorkerOutcome::retryable_failure(format!(
                    "antipattern review rejected this attempt (score {})",
                    review.score
                )))
            } else {
                Ok(WorkerOutcome::Success {
                    changed_files,
                    artifact_summary,
                })
            }
        }
        other => Ok(other),
    }
}

/// Marks every transitive dependent of `start` as BLOCKED, unless it already
/// reached a terminal state of its own.
fn propagate_blocked(
    tasks_by_id: &mut HashMap<TaskId, Task>,
    graph: &DependencyGraph,
    start: &TaskId,
    task_store: &TaskStore,
) -> Result<(), SchedulerError> {
    let mut queue: VecDeque<TaskId> = graph.dependents_of(start).iter().cloned().collect();
    let mut visited: HashSet<TaskId> = HashSet::new();

    while let Some(id) = queue.pop_front() {
        if !visited.insert(id.clone()) {
            continue;
        }
        if let Some(task) = tasks_by_id.get_mut(&id) {
            if matches!(task.state, TaskState::Done | TaskState::Failed) {
                continue;
            }
            task.state = TaskState::Blocked;
            task_store.write_task(task)?;
        }
        for dependent in graph.dependents_of(&id) {
            queue.push_back(dependent.clone());
        }
    }
    Ok(())
}

/// Joins every in-flight task. Once cancellation has fired, waits only up to the
/// configured grace period before giving up and dropping whatever remains, which
/// aborts the still-running futures.
async fn drain_join_set(
    mut join_set: JoinSet<Result<TaskRunOutcome, SchedulerError>>,
    cancel: &CancelHandle,
) -> Result<Vec<TaskRunOutcome>, SchedulerError> {
    let mut outcomes = Vec::new();
    let mut deadline: Option<tokio::time::Instant> = None;

    loop {
        if deadline.is_none() && cancel.is_cancelled() {
            deadline = Some(tokio::time::Instant::now() + cancel.grace_period());
        }

        let next = match deadline {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
                if remaining.is_zero() {
                    break;
                }
                match tokio::time::timeout(remaining, join_set.join_next()).await {
                    Ok(next) => next,
                    Err(_) => break,
                }
            }
            None => join_set.join_next().await,
        };

        match next {
            Some(result) => outcomes.push(result.expect("scheduler task panicked")?),
            None => break,
        }
    }
    Ok(outcomes)
}
