//! Dependency graph module.
//!
//! Named formulas (stats, speciality skills, combat skills) reference each
//! other by code. This module turns a list of [`DependencyRecord`]s into a
//! directed graph and finds the cycles in it, or an evaluation order when
//! there are none.
//!
//! Ids are expected to be unique across all records. The graph does not
//! enforce that; the rule-set validator reports duplicate codes separately.

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// One named formula and the variables it references.
///
/// # Examples
///
/// ```rust
/// use zzformula::graph::DependencyRecord;
/// use zzformula::{parse, Code};
///
/// let record = DependencyRecord::new(Code::new("HP"), parse("CON * 10").unwrap().variables());
/// assert_eq!(record.referenced_variables, vec![Code::new("CON")]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRecord<Id> {
    pub id: Id,
    pub referenced_variables: Vec<Id>,
}

impl<Id> DependencyRecord<Id> {
    pub fn new(id: Id, referenced_variables: Vec<Id>) -> Self {
        Self {
            id,
            referenced_variables,
        }
    }
}

/// Directed graph of formula dependencies.
///
/// An edge `A -> B` means formula `A` reads formula `B`. References to
/// ids that have no record of their own (plain skills) are not edges.
pub struct DependencyGraph<Id> {
    graph: DiGraph<Id, ()>,
    node_map: HashMap<Id, NodeIndex>,
}

impl<Id: Clone + Eq + Hash> DependencyGraph<Id> {
    /// Build the graph from a list of records.
    pub fn from_records(records: &[DependencyRecord<Id>]) -> Self {
        let mut graph = DiGraph::new();
        let mut node_map = HashMap::new();

        for record in records {
            node_map
                .entry(record.id.clone())
                .or_insert_with(|| graph.add_node(record.id.clone()));
        }

        for record in records {
            let from = node_map[&record.id];
            let mut linked = HashSet::new();
            for reference in &record.referenced_variables {
                if let Some(&to) = node_map.get(reference) {
                    if linked.insert(to) {
                        graph.add_edge(from, to, ());
                    }
                }
            }
        }

        Self { graph, node_map }
    }

    /// Whether `id` is a formula in this graph.
    pub fn contains(&self, id: &Id) -> bool {
        self.node_map.contains_key(id)
    }

    /// Formula ids that `id` reads directly, in reference order.
    pub fn dependencies_of(&self, id: &Id) -> Vec<Id> {
        match self.node_map.get(id) {
            Some(&node) => self
                .successors(node)
                .into_iter()
                .map(|idx| self.graph[idx].clone())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Find every cycle reachable by one depth-first traversal.
    ///
    /// Each cycle is the path from the first repeated id back to itself,
    /// so `A` reading `A` yields `[A, A]`. The search keeps going after a
    /// cycle is found, which lets independent cycles all be reported.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use zzformula::graph::{DependencyGraph, DependencyRecord};
    ///
    /// let records = vec![
    ///     DependencyRecord::new("A", vec!["B"]),
    ///     DependencyRecord::new("B", vec!["C"]),
    ///     DependencyRecord::new("C", vec!["A"]),
    /// ];
    /// let cycles = DependencyGraph::from_records(&records).detect_cycles();
    /// assert_eq!(cycles, vec![vec!["A", "B", "C", "A"]]);
    /// ```
    pub fn detect_cycles(&self) -> Vec<Vec<Id>> {
        let mut visited = HashSet::new();
        let mut on_stack = HashSet::new();
        let mut path = Vec::new();
        let mut cycles = Vec::new();

        for node in self.graph.node_indices() {
            if !visited.contains(&node) {
                self.dfs_cycles(node, &mut visited, &mut on_stack, &mut path, &mut cycles);
            }
        }

        cycles
    }

    fn dfs_cycles(
        &self,
        node: NodeIndex,
        visited: &mut HashSet<NodeIndex>,
        on_stack: &mut HashSet<NodeIndex>,
        path: &mut Vec<NodeIndex>,
        cycles: &mut Vec<Vec<Id>>,
    ) {
        visited.insert(node);
        on_stack.insert(node);
        path.push(node);

        for neighbor in self.successors(node) {
            if on_stack.contains(&neighbor) {
                if let Some(start) = path.iter().position(|&n| n == neighbor) {
                    let mut cycle: Vec<Id> =
                        path[start..].iter().map(|&n| self.graph[n].clone()).collect();
                    cycle.push(self.graph[neighbor].clone());
                    cycles.push(cycle);
                }
            } else if !visited.contains(&neighbor) {
                self.dfs_cycles(neighbor, visited, on_stack, path, cycles);
            }
        }

        on_stack.remove(&node);
        path.pop();
    }

    /// Order in which the formulas can be evaluated, dependencies first.
    ///
    /// Returns one cycle as the error when no such order exists.
    pub fn evaluation_order(&self) -> Result<Vec<Id>, Vec<Id>> {
        match toposort(&self.graph, None) {
            Ok(indices) => Ok(indices
                .into_iter()
                .rev()
                .map(|idx| self.graph[idx].clone())
                .collect()),
            Err(cycle) => Err(self
                .detect_cycles()
                .into_iter()
                .next()
                .unwrap_or_else(|| vec![self.graph[cycle.node_id()].clone()])),
        }
    }

    // Sorted by edge index, so iteration follows the reference order the
    // record listed.
    fn successors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut edges: Vec<_> = self
            .graph
            .edges(node)
            .map(|edge| (edge.id(), edge.target()))
            .collect();
        edges.sort_by_key(|(id, _)| *id);
        edges.into_iter().map(|(_, target)| target).collect()
    }
}

/// Find all dependency cycles among `records`.
///
/// Shorthand for building a [`DependencyGraph`] and calling
/// [`detect_cycles`](DependencyGraph::detect_cycles) on it.
pub fn detect_cycles<Id: Clone + Eq + Hash>(records: &[DependencyRecord<Id>]) -> Vec<Vec<Id>> {
    DependencyGraph::from_records(records).detect_cycles()
}

/// Evaluation order of `records`, dependencies first.
pub fn evaluation_order<Id: Clone + Eq + Hash>(
    records: &[DependencyRecord<Id>],
) -> Result<Vec<Id>, Vec<Id>> {
    DependencyGraph::from_records(records).evaluation_order()
}
