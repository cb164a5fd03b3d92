use std::collections::HashMap;

use graph::{Task, TaskId, TaskType};

use crate::{
    AgentInvoker, JudgeInvoker, NoFailuresJudge, PlannerInvoker, ScriptedInvoker, ScriptedPlanner,
    SessionSummary, WorkerOutcome,
};

fn task(id: &str) -> Task {
    Task::new(id, id, "", TaskType::Implementation)
}

#[tokio::test]
async fn scripted_invoker_replays_outcomes_in_order() {
    let mut scripts = HashMap::new();
    scripts.insert(
        TaskId::from("t1"),
        vec![
            WorkerOutcome::retryable_failure("boom"),
            WorkerOutcome::retryable_failure("boom again"),
            WorkerOutcome::success(Default::default(), "done"),
        ],
    );
    let invoker = ScriptedInvoker::new(scripts);
    let t = task("t1");

    assert!(matches!(
        invoker.invoke(&t, 1).await,
        WorkerOutcome::Failure { retryable: true, .. }
    ));
    assert!(matches!(
        invoker.invoke(&t, 2).await,
        WorkerOutcome::Failure { retryable: true, .. }
    ));
    assert!(matches!(invoker.invoke(&t, 3).await, WorkerOutcome::Success { .. }));
    assert_eq!(invoker.call_count(&TaskId::from("t1")), 3);
}

#[tokio::test]
async fn attempts_past_script_length_repeat_the_last_outcome() {
    let mut scripts = HashMap::new();
    scripts.insert(
        TaskId::from("t1"),
        vec![WorkerOutcome::success(Default::default(), "done")],
    );
    let invoker = ScriptedInvoker::new(scripts);
    let t = task("t1");

    assert!(matches!(invoker.invoke(&t, 1).await, WorkerOutcome::Success { .. }));
    assert!(matches!(invoker.invoke(&t, 5).await, WorkerOutcome::Success { .. }));
}

#[tokio::test]
async fn unscripted_task_defaults_to_success() {
    let invoker = ScriptedInvoker::new(HashMap::new());
    let t = task("unscripted");
    assert!(matches!(invoker.invoke(&t, 1).await, WorkerOutcome::Success { .. }));
}

#[tokio::test]
async fn scripted_planner_returns_fixed_tasks() {
    let planner = ScriptedPlanner::new(vec![task("t1"), task("t2")]);
    let tasks = planner.plan("do the thing").await.unwrap();
    assert_eq!(tasks.len(), 2);
}

#[tokio::test]
async fn scripted_planner_can_fail() {
    let planner = ScriptedPlanner::failing("no idea how to plan that");
    let err = planner.plan("do the thing").await.unwrap_err();
    assert!(err.0.contains("no idea"));
}

#[tokio::test]
async fn no_failures_judge_approves_clean_session() {
    let judge = NoFailuresJudge;
    let summary = SessionSummary {
        completed: vec![TaskId::from("t1"), TaskId::from("t2")],
        ..Default::default()
    };
    let verdict = judge.judge(&summary).await;
    assert!(verdict.approved);
}

#[tokio::test]
async fn no_failures_judge_rejects_session_with_failures() {
    let judge = NoFailuresJudge;
    let summary = SessionSummary {
        failed: vec![TaskId::from("t1")],
        ..Default::default()
    };
    let verdict = judge.judge(&summary).await;
    assert!(!verdict.approved);
}
