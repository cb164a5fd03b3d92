use fnv::{FnvHashMap as HashMap, FnvHashSet as HashSet};
use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::GraphError;
use crate::task::{Task, TaskId};

type PGraph = DiGraph<TaskId, (), u32>;

/// A DAG (by construction validated, cycles detected rather than rejected) over
/// [`TaskId`]s.
///
/// `adjacency[a]` holds the ids `a` depends on; `reverse_adjacency[a]` holds the ids
/// that depend on `a`. The two maps are exact transposes of one another.
#[derive(Debug)]
pub struct DependencyGraph {
    adjacency: HashMap<TaskId, Vec<TaskId>>,
    reverse_adjacency: HashMap<TaskId, Vec<TaskId>>,
    all_ids: HashSet<TaskId>,
    cyclic_ids: HashSet<TaskId>,
    pg: PGraph,
    #[allow(dead_code)]
    index: HashMap<TaskId, NodeIndex<u32>>,
}

impl DependencyGraph {
    /// Builds adjacency and reverse adjacency from a task list, then runs cycle
    /// detection. An unknown dependency id is a hard validation error surfaced before
    /// scheduling.
    pub fn build(tasks: &[Task]) -> Result<DependencyGraph, GraphError> {
        let mut all_ids = HashSet::default();
        let mut pg = PGraph::new();
        let mut index = HashMap::default();

        for task in tasks {
            if all_ids.contains(&task.id) {
                return Err(GraphError::DuplicateTaskId(task.id.clone()));
            }
            all_ids.insert(task.id.clone());
            let idx = pg.add_node(task.id.clone());
            index.insert(task.id.clone(), idx);
        }

        let mut adjacency: HashMap<TaskId, Vec<TaskId>> =
            all_ids.iter().map(|id| (id.clone(), Vec::new())).collect();
        let mut reverse_adjacency: HashMap<TaskId, Vec<TaskId>> =
            all_ids.iter().map(|id| (id.clone(), Vec::new())).collect();

        for task in tasks {
            for dep_id in &task.dependencies {
                if !all_ids.contains(dep_id) {
                    return Err(GraphError::UnknownDependency {
                        from: task.id.clone(),
                        to: dep_id.clone(),
                    });
                }
                // An edge task -> dep means "task depends on dep".
                let src = index[&task.id];
                let dst = index[dep_id];
                pg.add_edge(src, dst, ());
                adjacency.get_mut(&task.id).unwrap().push(dep_id.clone());
                reverse_adjacency
                    .get_mut(dep_id)
                    .unwrap()
                    .push(task.id.clone());
            }
        }

        for ids in adjacency.values_mut() {
            ids.sort();
            ids.dedup();
        }
        for ids in reverse_adjacency.values_mut() {
            ids.sort();
            ids.dedup();
        }

        let cyclic_ids = detect_cycles(&pg);

        Ok(DependencyGraph {
            adjacency,
            reverse_adjacency,
            all_ids,
            cyclic_ids,
            pg,
            index,
        })
    }

    pub fn adjacency(&self) -> &HashMap<TaskId, Vec<TaskId>> {
        &self.adjacency
    }

    pub fn reverse_adjacency(&self) -> &HashMap<TaskId, Vec<TaskId>> {
        &self.reverse_adjacency
    }

    pub fn all_ids(&self) -> &HashSet<TaskId> {
        &self.all_ids
    }

    pub fn cyclic_ids(&self) -> &HashSet<TaskId> {
        &self.cyclic_ids
    }

    pub fn dependencies_of(&self, id: &TaskId) -> &[TaskId] {
        self.adjacency.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn dependents_of(&self, id: &TaskId) -> &[TaskId] {
        self.reverse_adjacency
            .get(id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Kahn's-algorithm level computation, excluding nodes in `cyclic_ids`. Ties
    /// within a level are broken by ascending `TaskId` so that ordering is stable
    /// across runs given identical input.
    pub fn compute_levels(&self) -> ExecutionLevels {
        let mut in_degree: HashMap<TaskId, usize> = HashMap::default();
        for id in &self.all_ids {
            if self.cyclic_ids.contains(id) {
                continue;
            }
            let count = self
                .dependencies_of(id)
                .iter()
                .filter(|dep| !self.cyclic_ids.contains(*dep))
                .count();
            in_degree.insert(id.clone(), count);
        }

        let mut levels: Vec<Vec<TaskId>> = Vec::new();
        let mut remaining: HashSet<TaskId> = in_degree.keys().cloned().collect();
        let mut frontier: Vec<TaskId> = in_degree
            .iter()
            .filter(|(_, &deg)| deg == 0)
            .map(|(id, _)| id.clone())
            .collect();
        frontier.sort();

        while !frontier.is_empty() {
            for id in &frontier {
                remaining.remove(id);
            }
            let mut next_frontier: HashSet<TaskId> = HashSet::default();
            for id in &frontier {
                for dependent in self.dependents_of(id) {
                    if !remaining.contains(dependent) {
                        continue;
                    }
                    let deg = in_degree.get_mut(dependent).unwrap();
                    *deg -= 1;
                    if *deg == 0 {
                        next_frontier.insert(dependent.clone());
                    }
                }
            }
            levels.push(frontier);
            let mut next: Vec<TaskId> = next_frontier.into_iter().collect();
            next.sort();
            frontier = next;
        }

        let mut unschedulable: Vec<TaskId> = self.cyclic_ids.iter().cloned().collect();
        for id in &remaining {
            if !self.cyclic_ids.contains(id) {
                unschedulable.push(id.clone());
            }
        }
        unschedulable.sort();
        unschedulable.dedup();

        ExecutionLevels {
            levels,
            unschedulable,
        }
    }
}

/// Marks every member of any strongly-connected component of size > 1, plus any
/// single node with a self-loop, as cyclic. This is a deliberate improvement over
/// marking only "some ancestors along the discovered back-edge path" (see
/// DESIGN.md).
fn detect_cycles(pg: &PGraph) -> HashSet<TaskId> {
    let mut cyclic = HashSet::default();
    for scc in petgraph::algo::tarjan_scc(pg) {
        if scc.len() > 1 {
            cyclic.extend(scc.into_iter().map(|idx| pg[idx].clone()));
        } else {
            let idx = scc[0];
            if pg.contains_edge(idx, idx) {
                cyclic.insert(pg[idx].clone());
            }
        }
    }
    cyclic
}

/// `levels[k]` contains all ids whose longest dependency chain to a root has length
/// `k`; all tasks in `levels[k]` are mutually independent. `unschedulable` is a
/// superset of `cyclic_ids`, plus any node that failed to be placed in a level (must
/// be empty if no cycles).
#[derive(Debug, Eq, PartialEq)]
pub struct ExecutionLevels {
    pub levels: Vec<Vec<TaskId>>,
    pub unschedulable: Vec<TaskId>,
}
