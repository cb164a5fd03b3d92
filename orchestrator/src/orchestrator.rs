use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use config::Config;
use graph::{SessionId, Task, TaskId, TaskState};
use journal::{self, Journal, Record, SessionPointer};
use scheduler::{CancelHandle, ScheduleResult, SchedulerConfig};
use task_store::TaskStore;
use uuid::Uuid;

use agent_invoker::{AgentInvoker, JudgeInvoker, JudgeVerdict, PlannerInvoker, SessionSummary};

use crate::error::OrchestratorError;
use crate::paths::CoordPaths;
use crate::planning::PlanningSnapshot;
use crate::report::write_summary_report;

/// What a finished (or aborted) session produced.
#[derive(Debug)]
pub struct SessionOutcome {
    pub session_id: SessionId,
    pub result: ScheduleResult,
    pub verdict: JudgeVerdict,
}

impl SessionOutcome {
    /// CLI exit code per spec §6.1: 0 clean success, 2 if any task is blocked on a
    /// cyclic dependency (validation error, not an execution failure — cycles are
    /// non-fatal per §4.6/§7: affected tasks just become BLOCKED), 3 if anything
    /// actually failed or is blocked for a non-cyclic reason, 130 if cancelled.
    pub fn exit_code(&self) -> i32 {
        if self.result.aborted {
            130
        } else if !self.result.failed.is_empty() {
            3
        } else if !self.result.cyclic.is_empty() {
            2
        } else if !self.result.blocked.is_empty() {
            3
        } else {
            0
        }
    }
}

/// Session lifecycle: plan → schedule → collect → review → report (spec §4.6,
/// component C7). Owns no mutable state itself; each call opens its own journal
/// and task-store handles rooted at `paths`.
pub struct Orchestrator {
    paths: CoordPaths,
    config: Config,
    planner: Arc<dyn PlannerInvoker>,
    worker: Arc<dyn AgentInvoker>,
    judge: Arc<dyn JudgeInvoker>,
}

impl Orchestrator {
    pub fn new(
        paths: CoordPaths,
        config: Config,
        planner: Arc<dyn PlannerInvoker>,
        worker: Arc<dyn AgentInvoker>,
        judge: Arc<dyn JudgeInvoker>,
    ) -> Self {
        Orchestrator {
            paths,
            config,
            planner,
            worker,
            judge,
        }
    }

    fn scheduler_config(&self) -> SchedulerConfig {
        let mut review_config = reviewer::ReviewConfig::default();
        review_config.reject_threshold = self.config.reject_threshold;
        review_config.scope_creep_tolerance = self.config.scope_creep_tolerance;
        SchedulerConfig {
            max_workers: self.config.max_workers,
            worker_timeout: self
                .config
                .per_task_timeout_secs
                .map(std::time::Duration::from_secs),
            review_config,
            ..SchedulerConfig::default()
        }
    }

    /// Step 1 of spec §4.6: a fresh session from a user instruction.
    pub async fn start_session(
        &self,
        instruction: &str,
        cancel: CancelHandle,
    ) -> Result<SessionOutcome, OrchestratorError> {
        let session_id = SessionId::new(Uuid::new_v4().to_string());
        log::info!("starting session {} for instruction {instruction:?}", session_id.as_str());
        let journal = Arc::new(Journal::open(self.paths.journal_path(&session_id))?);
        journal.append(&Record::SessionStart {
            session_id: session_id.clone(),
            task: instruction.to_string(),
            timestamp: Utc::now(),
        })?;

        let mut pointer = SessionPointer::load(self.paths.pointer_path())?;
        pointer.set(
            self.paths.pointer_path(),
            session_id.clone(),
            self.paths.journal_path(&session_id),
        )?;

        let tasks = match self.planner.plan(instruction).await {
            Ok(tasks) => tasks,
            Err(err) => {
                journal.append(&Record::SessionAbort {
                    session_id: session_id.clone(),
                    reason: err.to_string(),
                    timestamp: Utc::now(),
                })?;
                journal.sync()?;
                return Err(OrchestratorError::Plan(err));
            }
        };

        let task_store = Arc::new(TaskStore::new(self.paths.tasks_dir()));
        for task in &tasks {
            journal.append(&Record::TaskCreated {
                session_id: session_id.clone(),
                task_id: task.id.clone(),
                title: task.title.clone(),
                task_type: task.task_type,
                timestamp: Utc::now(),
            })?;
            task_store.write_task(task)?;
        }

        PlanningSnapshot {
            session_id: session_id.clone(),
            instruction: instruction.to_string(),
            tasks: tasks.clone(),
        }
        .save(self.paths.planning_snapshot_path(&session_id))?;

        self.run_from(session_id, instruction.to_string(), tasks, task_store, journal, cancel)
            .await
    }

    /// Resume protocol from spec §4.6: reconstruct task state from the journal's
    /// `extractResume`, then continue scheduling. Only callable on a session whose
    /// journal's last record is `session_abort`.
    pub async fn resume_session(
        &self,
        session_id: SessionId,
        cancel: CancelHandle,
    ) -> Result<SessionOutcome, OrchestratorError> {
        let journal_path = self.paths.journal_path(&session_id);
        let resume_ctx = journal::extract_resume(&journal_path)?;
        if !resume_ctx.can_resume {
            return Err(OrchestratorError::Validation(format!(
                "session {} is not resumable: its journal has no trailing session_abort",
                session_id.as_str()
            )));
        }

        let snapshot = PlanningSnapshot::load(self.paths.planning_snapshot_path(&session_id))?;
        let task_store = Arc::new(TaskStore::new(self.paths.tasks_dir()));
        let completed: HashSet<TaskId> = resume_ctx.completed_tasks.into_iter().collect();
        log::info!(
            "resuming session {}: {} of {} tasks already done",
            session_id.as_str(),
            completed.len(),
            snapshot.tasks.len()
        );

        let mut tasks = Vec::with_capacity(snapshot.tasks.len());
        for mut task in snapshot.tasks {
            if completed.contains(&task.id) {
                task.state = TaskState::Done;
            } else {
                task.state = TaskState::New;
                task.attempts = 0;
                task.last_error = None;
            }
            task_store.write_task(&task)?;
            tasks.push(task);
        }

        let journal = Arc::new(Journal::open(&journal_path)?);
        self.run_from(session_id, snapshot.instruction, tasks, task_store, journal, cancel)
            .await
    }

    /// Shared tail of both entry points: build the graph (surfacing unknown-
    /// dependency validation errors before any worker runs), hand off to the
    /// Scheduler, invoke the Judge, and write the terminal journal record plus
    /// the summary report.
    async fn run_from(
        &self,
        session_id: SessionId,
        instruction: String,
        tasks: Vec<Task>,
        task_store: Arc<TaskStore>,
        journal: Arc<Journal>,
        cancel: CancelHandle,
    ) -> Result<SessionOutcome, OrchestratorError> {
        if let Err(err) = graph::DependencyGraph::build(&tasks) {
            journal.append(&Record::SessionAbort {
                session_id: session_id.clone(),
                reason: err.to_string(),
                timestamp: Utc::now(),
            })?;
            journal.sync()?;
            return Err(err.into());
        }

        let result = scheduler::run(
            tasks,
            self.worker.clone(),
            task_store,
            journal.clone(),
            session_id.clone(),
            self.scheduler_config(),
            cancel,
        )
        .await;

        let result = match result {
            Ok(result) => result,
            Err(err) => {
                journal.append(&Record::SessionAbort {
                    session_id: session_id.clone(),
                    reason: err.to_string(),
                    timestamp: Utc::now(),
                })?;
                journal.sync()?;
                return Err(err.into());
            }
        };

        let average_review_score = average_review_score(journal.path())?;
        let summary = SessionSummary {
            completed: result.completed.clone(),
            failed: result.failed.clone(),
            blocked: result.blocked.clone(),
            average_review_score,
        };
        let verdict = self.judge.judge(&summary).await;

        if result.aborted {
            journal.append(&Record::SessionAbort {
                session_id: session_id.clone(),
                reason: "cancelled".to_string(),
                timestamp: Utc::now(),
            })?;
        } else {
            journal.append(&Record::SessionComplete {
                session_id: session_id.clone(),
                summary: verdict.comment.clone(),
                metrics: journal::SessionMetrics {
                    completed: result.completed.len(),
                    failed: result.failed.len(),
                    blocked: result.blocked.len(),
                    aborted: result.aborted,
                },
                timestamp: Utc::now(),
            })?;
        }
        journal.sync()?;

        let mut pointer = SessionPointer::load(self.paths.pointer_path())?;
        pointer.set(
            self.paths.pointer_path(),
            session_id.clone(),
            self.paths.journal_path(&session_id),
        )?;

        write_summary_report(
            self.paths.summary_report_path(&session_id),
            &session_id,
            &instruction,
            &result,
            average_review_score,
            &verdict,
        )?;

        Ok(SessionOutcome {
            session_id,
            result,
            verdict,
        })
    }
}

fn average_review_score(journal_path: &std::path::Path) -> Result<Option<i32>, OrchestratorError> {
    let records = journal::iterate(journal_path)?;
    let scores: Vec<i32> = records
        .iter()
        .filter_map(|record| match record {
            Record::TaskReviewed { score, .. } => Some(*score),
            _ => None,
        })
        .collect();
    if scores.is_empty() {
        return Ok(None);
    }
    Ok(Some(scores.iter().sum::<i32>() / scores.len() as i32))
}
