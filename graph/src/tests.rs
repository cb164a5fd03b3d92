use std::collections::BTreeSet;

use crate::{DependencyGraph, Task, TaskId, TaskType};

fn task(id: &str, deps: &[&str]) -> Task {
    Task::new(id, id, "", TaskType::Implementation)
        .with_dependencies(deps.iter().map(|d| TaskId::from(*d)))
}

/// Diamond shape: A, B(deps A), C(deps A), D(deps B, C).
fn diamond() -> Vec<Task> {
    vec![
        task("A", &[]),
        task("B", &["A"]),
        task("C", &["A"]),
        task("D", &["B", "C"]),
    ]
}

#[test]
fn adjacency_and_reverse_adjacency_are_transposes() {
    let graph = DependencyGraph::build(&diamond()).unwrap();
    for (id, deps) in graph.adjacency() {
        for dep in deps {
            assert!(
                graph.reverse_adjacency()[dep].contains(id),
                "{id} -> {dep} missing from reverse adjacency"
            );
        }
    }
    for (id, dependents) in graph.reverse_adjacency() {
        for dependent in dependents {
            assert!(graph.adjacency()[dependent].contains(id));
        }
    }
}

#[test]
fn diamond_levels_match_expected_shape() {
    let graph = DependencyGraph::build(&diamond()).unwrap();
    let levels = graph.compute_levels();
    assert!(levels.unschedulable.is_empty());
    assert_eq!(levels.levels.len(), 3);
    assert_eq!(levels.levels[0], vec![TaskId::from("A")]);
    assert_eq!(
        levels.levels[1],
        vec![TaskId::from("B"), TaskId::from("C")]
    );
    assert_eq!(levels.levels[2], vec![TaskId::from("D")]);
}

#[test]
fn levels_concatenated_form_a_topological_order() {
    // Every dependency must appear in an earlier (or equal-but-impossible, since
    // deps can't be mutual and acyclic) level than its dependent.
    let graph = DependencyGraph::build(&diamond()).unwrap();
    let levels = graph.compute_levels();
    let mut position = std::collections::HashMap::new();
    for (level_idx, level) in levels.levels.iter().enumerate() {
        for id in level {
            position.insert(id.clone(), level_idx);
        }
    }
    for (id, deps) in graph.adjacency() {
        for dep in deps {
            assert!(position[dep] < position[id], "{dep} should precede {id}");
        }
    }
}

#[test]
fn unknown_dependency_is_a_validation_error() {
    let tasks = vec![task("A", &["ghost"])];
    let err = DependencyGraph::build(&tasks).unwrap_err();
    match err {
        crate::GraphError::UnknownDependency { from, to } => {
            assert_eq!(from, TaskId::from("A"));
            assert_eq!(to, TaskId::from("ghost"));
        }
        other => panic!("expected UnknownDependency, got {other:?}"),
    }
}

/// A -> B -> A.
#[test]
fn simple_cycle_marks_both_nodes_cyclic_and_unschedulable() {
    let tasks = vec![task("A", &["B"]), task("B", &["A"])];
    let graph = DependencyGraph::build(&tasks).unwrap();
    let expected: BTreeSet<TaskId> = [TaskId::from("A"), TaskId::from("B")].into_iter().collect();
    let actual: BTreeSet<TaskId> = graph.cyclic_ids().iter().cloned().collect();
    assert_eq!(actual, expected);

    let levels = graph.compute_levels();
    assert!(levels.levels.is_empty());
    let mut unschedulable = levels.unschedulable.clone();
    unschedulable.sort();
    assert_eq!(
        unschedulable,
        vec![TaskId::from("A"), TaskId::from("B")]
    );
}

#[test]
fn nodes_outside_any_cycle_are_not_marked_cyclic() {
    // A -> B -> A, with C depending on A (transitively reaches the cycle) and D
    // entirely independent. Only A and B form the cycle itself.
    let tasks = vec![
        task("A", &["B"]),
        task("B", &["A"]),
        task("C", &["A"]),
        task("D", &[]),
    ];
    let graph = DependencyGraph::build(&tasks).unwrap();
    assert!(graph.cyclic_ids().contains(&TaskId::from("A")));
    assert!(graph.cyclic_ids().contains(&TaskId::from("B")));
    assert!(!graph.cyclic_ids().contains(&TaskId::from("C")));
    assert!(!graph.cyclic_ids().contains(&TaskId::from("D")));

    let levels = graph.compute_levels();
    // D has no dependency on the cycle, so it is schedulable on its own.
    assert!(levels
        .levels
        .iter()
        .any(|level| level.contains(&TaskId::from("D"))));
    // C transitively depends on the cyclic A, so it can never be placed in a level.
    assert!(levels.unschedulable.contains(&TaskId::from("C")));
    assert!(!levels
        .levels
        .iter()
        .any(|level| level.contains(&TaskId::from("C"))));
}

#[test]
fn self_loop_is_a_cycle_of_one() {
    let tasks = vec![task("A", &["A"])];
    let graph = DependencyGraph::build(&tasks).unwrap();
    assert!(graph.cyclic_ids().contains(&TaskId::from("A")));
}

#[test]
fn diamond_levels_are_deterministic_across_runs() {
    let tasks = diamond();
    let levels_a = DependencyGraph::build(&tasks).unwrap().compute_levels();
    let levels_b = DependencyGraph::build(&tasks).unwrap().compute_levels();
    assert_eq!(levels_a.levels, levels_b.levels);
}
