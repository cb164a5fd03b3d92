use chrono::Utc;
use graph::{SessionId, TaskId};
use tempfile::tempdir;

use crate::{iterate, Journal, Record, SessionPointer};

fn start_record(session_id: &SessionId) -> Record {
    Record::SessionStart {
        session_id: session_id.clone(),
        task: "refactor the widget".into(),
        timestamp: Utc::now(),
    }
}

#[test]
fn write_then_read_round_trips_a_record() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sessions").join("s1.jsonl");
    let session_id = SessionId::new("s1");

    let journal = Journal::open(&path).unwrap();
    let start = start_record(&session_id);
    journal.append(&start).unwrap();
    journal
        .append(&Record::TaskDone {
            session_id: session_id.clone(),
            task_id: TaskId::from("t1"),
            outputs: vec!["out.txt".into()],
            timestamp: Utc::now(),
        })
        .unwrap();
    journal.sync().unwrap();

    let records = iterate(&path).unwrap();
    assert_eq!(records.len(), 2);
    match &records[0] {
        Record::SessionStart { task, .. } => assert_eq!(task, "refactor the widget"),
        other => panic!("expected SessionStart, got {other:?}"),
    }
}

#[test]
fn malformed_lines_are_skipped_not_fatal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("s2.jsonl");
    std::fs::write(
        &path,
        "{not json}\n{\"type\":\"session_start\",\"sessionId\":\"s2\",\"task\":\"x\",\"timestamp\":\"2024-01-01T00:00:00Z\"}\n",
    )
    .unwrap();

    let records = iterate(&path).unwrap();
    assert_eq!(records.len(), 1);
}

#[test]
fn iterate_on_missing_file_returns_empty() {
    let dir = tempdir().unwrap();
    let records = iterate(dir.path().join("missing.jsonl")).unwrap();
    assert!(records.is_empty());
}

#[test]
fn session_pointer_set_is_atomic_and_reloadable() {
    let dir = tempdir().unwrap();
    let pointer_path = dir.path().join("pointer.json");

    let mut pointer = SessionPointer::load(&pointer_path).unwrap();
    pointer
        .set(&pointer_path, SessionId::new("s1"), "sessions/s1.jsonl")
        .unwrap();

    let reloaded = SessionPointer::load(&pointer_path).unwrap();
    assert_eq!(
        reloaded.get(&SessionId::new("s1")),
        Some(std::path::Path::new("sessions/s1.jsonl"))
    );
    assert_eq!(reloaded.get(&SessionId::new("missing")), None);
}
