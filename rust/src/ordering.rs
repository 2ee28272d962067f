//! Deterministic topological ordering (Kahn's algorithm).

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::graph::{TaskGraph, TaskIdx};

/// Linear order of every task in the graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopologicalOrder {
    /// All task indices: the valid prefix followed by the cyclic tail.
    pub order: Vec<TaskIdx>,
    /// Tasks appended after the main pass stalled, in input order.
    /// Empty for an acyclic graph.
    pub cyclic: Vec<TaskIdx>,
}

impl TopologicalOrder {
    pub fn is_acyclic(&self) -> bool {
        self.cyclic.is_empty()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// position[idx] = where task idx sits in the order.
    pub fn positions(&self) -> Vec<usize> {
        let mut positions = vec![0; self.order.len()];
        for (pos, &idx) in self.order.iter().enumerate() {
            positions[idx] = pos;
        }
        positions
    }
}

/// Order tasks so that each appears after all of its predecessors.
///
/// When several tasks are ready at once the earliest in input order
/// goes first, so identical input always gives identical output. Tasks
/// caught in a cycle never become ready; once the pass stalls they are
/// appended in input order. This keeps the function total, but the tail
/// is not a valid topological order.
pub fn topological_order(graph: &TaskGraph<'_>) -> TopologicalOrder {
    let n = graph.len();
    let mut in_degree: Vec<usize> = (0..n).map(|idx| graph.predecessors(idx).len()).collect();

    let mut ready: BinaryHeap<Reverse<TaskIdx>> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, &degree)| degree == 0)
        .map(|(idx, _)| Reverse(idx))
        .collect();

    let mut order: Vec<TaskIdx> = Vec::with_capacity(n);
    let mut placed = vec![false; n];

    while let Some(Reverse(idx)) = ready.pop() {
        order.push(idx);
        placed[idx] = true;

        for &(succ, _) in graph.successors(idx) {
            in_degree[succ] -= 1;
            if in_degree[succ] == 0 {
                ready.push(Reverse(succ));
            }
        }
    }

    let cyclic: Vec<TaskIdx> = (0..n).filter(|&idx| !placed[idx]).collect();
    order.extend_from_slice(&cyclic);

    TopologicalOrder { order, cyclic }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Task, Trade};

    fn make_task(id: &str, deps: &[&str]) -> Task {
        Task::planned(id, Trade::Carpentry, 1, deps)
    }

    fn ids(graph: &TaskGraph<'_>, order: &[TaskIdx]) -> Vec<String> {
        order.iter().map(|&i| graph.task(i).id.clone()).collect()
    }

    #[test]
    fn test_chain_order() {
        let tasks = vec![
            make_task("c", &["b"]),
            make_task("b", &["a"]),
            make_task("a", &[]),
        ];
        let graph = TaskGraph::build(&tasks, &[]).unwrap();
        let topo = topological_order(&graph);

        assert_eq!(ids(&graph, &topo.order), vec!["a", "b", "c"]);
        assert!(topo.is_acyclic());
    }

    #[test]
    fn test_ready_ties_break_by_input_order() {
        // root unlocks late, early_a, early_b at once; input order wins
        let tasks = vec![
            make_task("root", &[]),
            make_task("late", &["root"]),
            make_task("early_a", &["root"]),
            make_task("free", &[]),
            make_task("early_b", &["root"]),
        ];
        let graph = TaskGraph::build(&tasks, &[]).unwrap();
        let topo = topological_order(&graph);

        assert_eq!(
            ids(&graph, &topo.order),
            vec!["root", "late", "early_a", "free", "early_b"]
        );
    }

    #[test]
    fn test_cycle_appended_in_input_order() {
        // x <-> y form a cycle; z depends on y
        let tasks = vec![
            make_task("start", &[]),
            make_task("y", &["x"]),
            make_task("x", &["start", "y"]),
            make_task("z", &["y"]),
        ];
        let graph = TaskGraph::build(&tasks, &[]).unwrap();
        let topo = topological_order(&graph);

        assert!(!topo.is_acyclic());
        assert_eq!(ids(&graph, &topo.order), vec!["start", "y", "x", "z"]);
        assert_eq!(ids(&graph, &topo.cyclic), vec!["y", "x", "z"]);
    }

    #[test]
    fn test_empty_graph() {
        let tasks: Vec<Task> = vec![];
        let graph = TaskGraph::build(&tasks, &[]).unwrap();
        let topo = topological_order(&graph);
        assert!(topo.is_empty());
        assert!(topo.is_acyclic());
    }

    #[test]
    fn test_positions_invert_order() {
        let tasks = vec![make_task("b", &["a"]), make_task("a", &[])];
        let graph = TaskGraph::build(&tasks, &[]).unwrap();
        let topo = topological_order(&graph);
        assert_eq!(topo.positions(), vec![1, 0]);
    }
}
