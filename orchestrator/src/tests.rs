use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use graph::{SessionId, Task, TaskId, TaskType};
use journal::{Journal, Record};
use scheduler::CancelHandle;

use agent_invoker::{NoFailuresJudge, ScriptedInvoker, ScriptedPlanner};

use crate::{CoordPaths, Orchestrator, PlanningSnapshot};

fn task(id: &str, deps: &[&str]) -> Task {
    Task::new(id, id, "implement the thing", TaskType::Implementation)
        .with_dependencies(deps.iter().map(|d| TaskId::from(*d)))
}

fn orchestrator(
    dir: &tempfile::TempDir,
    planner: ScriptedPlanner,
    invoker: ScriptedInvoker,
) -> Orchestrator {
    Orchestrator::new(
        CoordPaths::new(dir.path()),
        config::Config::default(),
        Arc::new(planner),
        Arc::new(invoker),
        Arc::new(NoFailuresJudge),
    )
}

#[tokio::test]
async fn fresh_session_runs_diamond_graph_to_completion() {
    let dir = tempfile::tempdir().unwrap();
    let tasks = vec![
        task("A", &[]),
        task("B", &["A"]),
        task("C", &["A"]),
        task("D", &["B", "C"]),
    ];
    let orch = orchestrator(
        &dir,
        ScriptedPlanner::new(tasks),
        ScriptedInvoker::new(HashMap::new()),
    );

    let outcome = orch
        .start_session("build the feature", CancelHandle::new())
        .await
        .unwrap();

    assert_eq!(outcome.result.completed.len(), 4);
    assert!(outcome.result.failed.is_empty());
    assert!(outcome.result.blocked.is_empty());
    assert_eq!(outcome.exit_code(), 0);
    assert!(outcome.verdict.approved);

    let report_path = CoordPaths::new(dir.path()).summary_report_path(&outcome.session_id);
    assert!(report_path.exists());
}

#[tokio::test]
async fn cyclic_dependencies_block_without_failing_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let tasks = vec![task("A", &["B"]), task("B", &["A"])];
    let orch = orchestrator(
        &dir,
        ScriptedPlanner::new(tasks),
        ScriptedInvoker::new(HashMap::new()),
    );

    let outcome = orch
        .start_session("do something circular", CancelHandle::new())
        .await
        .unwrap();

    assert!(outcome.result.completed.is_empty());
    assert!(outcome.result.failed.is_empty());
    assert_eq!(outcome.result.blocked.len(), 2);
    assert_eq!(outcome.result.cyclic.len(), 2);
    assert_eq!(outcome.exit_code(), 2);
}

#[tokio::test]
async fn unknown_dependency_is_a_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let tasks = vec![task("A", &["ghost"])];
    let orch = orchestrator(
        &dir,
        ScriptedPlanner::new(tasks),
        ScriptedInvoker::new(HashMap::new()),
    );

    let err = orch
        .start_session("reference a task that doesn't exist", CancelHandle::new())
        .await
        .unwrap_err();

    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn planner_failure_aborts_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let orch = orchestrator(
        &dir,
        ScriptedPlanner::failing("could not understand the instruction"),
        ScriptedInvoker::new(HashMap::new()),
    );

    let err = orch
        .start_session("???", CancelHandle::new())
        .await
        .unwrap_err();

    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn resume_reruns_only_the_incomplete_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let paths = CoordPaths::new(dir.path());
    let session_id = SessionId::new("s-resume");

    let tasks = vec![
        task("A", &[]),
        task("B", &[]),
        task("C", &["A"]),
        task("D", &["B"]),
    ];

    PlanningSnapshot {
        session_id: session_id.clone(),
        instruction: "do four independent-ish things".to_string(),
        tasks: tasks.clone(),
    }
    .save(paths.planning_snapshot_path(&session_id))
    .unwrap();

    // Simulate a crash after A and B completed: journal has two task_done
    // records and a trailing session_abort, nothing for C or D.
    let journal = Journal::open(paths.journal_path(&session_id)).unwrap();
    journal
        .append(&Record::SessionStart {
            session_id: session_id.clone(),
            task: "do four independent-ish things".to_string(),
            timestamp: Utc::now(),
        })
        .unwrap();
    for id in ["A", "B"] {
        journal
            .append(&Record::TaskDone {
                session_id: session_id.clone(),
                task_id: TaskId::from(id),
                outputs: vec![],
                timestamp: Utc::now(),
            })
            .unwrap();
    }
    journal
        .append(&Record::SessionAbort {
            session_id: session_id.clone(),
            reason: "process killed".to_string(),
            timestamp: Utc::now(),
        })
        .unwrap();
    journal.sync().unwrap();

    let orch = orchestrator(
        &dir,
        ScriptedPlanner::new(vec![]),
        ScriptedInvoker::new(HashMap::new()),
    );

    let outcome = orch
        .resume_session(session_id, CancelHandle::new())
        .await
        .unwrap();

    assert_eq!(outcome.result.completed.len(), 4);
    assert!(outcome.result.failed.is_empty());
    assert!(outcome.result.blocked.is_empty());
}

#[tokio::test]
async fn resuming_a_non_aborted_session_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let paths = CoordPaths::new(dir.path());
    let session_id = SessionId::new("s-clean");

    let journal = Journal::open(paths.journal_path(&session_id)).unwrap();
    journal
        .append(&Record::SessionStart {
            session_id: session_id.clone(),
            task: "already finished".to_string(),
            timestamp: Utc::now(),
        })
        .unwrap();
    journal
        .append(&Record::SessionComplete {
            session_id: session_id.clone(),
            summary: "ok".to_string(),
            metrics: Default::default(),
            timestamp: Utc::now(),
        })
        .unwrap();
    journal.sync().unwrap();

    let orch = orchestrator(
        &dir,
        ScriptedPlanner::new(vec![]),
        ScriptedInvoker::new(HashMap::new()),
    );

    let err = orch.resume_session(session_id, CancelHandle::new()).await.unwrap_err();
    assert_eq!(err.exit_code(), 2);
}
