//! Shortest kinship path search.
//!
//! Relationships are loaded into an undirected petgraph `StableGraph` whose
//! node weights are person slots and edge weights are relationship types.
//! Edge endpoints keep the `(person1, person2)` order they were inserted
//! with, which is how traversal direction over lineage edges is recovered.

use std::collections::VecDeque;

use petgraph::Undirected;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, NodeIndexable};

use super::label::Step;
use crate::graph::{FamilyGraph, RelationClass, RelationshipType};

/// One hop of a resolved path: the slot reached and how it was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathHop {
    pub slot: usize,
    pub step: Step,
}

/// Undirected relationship graph used for kinship search.
#[derive(Debug, Clone)]
pub struct KinshipGraph {
    graph: StableGraph<usize, RelationshipType, Undirected>,
}

impl KinshipGraph {
    /// Build from every accepted relationship of the family graph.
    pub fn build(family: &FamilyGraph) -> Self {
        let mut graph = StableGraph::with_capacity(family.len(), family.edges().len());
        for slot in 0..family.len() {
            graph.add_node(slot);
        }
        for edge in family.edges() {
            graph.add_edge(
                NodeIndex::new(edge.person1),
                NodeIndex::new(edge.person2),
                edge.kind,
            );
        }
        Self { graph }
    }

    /// Number of relationship edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Breadth-first shortest path from `from` to `to`.
    ///
    /// Returns the hops after `from` (empty when `from == to`), or `None`
    /// when the two are not connected. Among equal-length paths the first
    /// one discovered wins.
    pub fn shortest_path(&self, from: usize, to: usize) -> Option<Vec<PathHop>> {
        if from == to {
            return Some(Vec::new());
        }

        let bound = self.graph.node_bound();
        if from >= bound || to >= bound {
            return None;
        }

        let mut came_from: Vec<Option<(usize, Step)>> = vec![None; bound];
        let mut visited = vec![false; bound];
        let mut queue = VecDeque::new();
        visited[from] = true;
        queue.push_back(from);

        'search: while let Some(current) = queue.pop_front() {
            for edge in self.graph.edges(NodeIndex::new(current)) {
                let next = if edge.source().index() == current {
                    edge.target().index()
                } else {
                    edge.source().index()
                };
                if visited[next] {
                    continue;
                }
                let Some((person1, _)) = self.graph.edge_endpoints(edge.id()) else {
                    continue;
                };

                visited[next] = true;
                came_from[next] = Some((current, step_for(*edge.weight(), current, person1.index())));
                if next == to {
                    break 'search;
                }
                queue.push_back(next);
            }
        }

        if !visited[to] {
            return None;
        }

        let mut hops = Vec::new();
        let mut cursor = to;
        while cursor != from {
            let (prev, step) = came_from[cursor]?;
            hops.push(PathHop { slot: cursor, step });
            cursor = prev;
        }
        hops.reverse();
        Some(hops)
    }
}

/// Step taken when leaving `from` over an edge of `kind` whose person1 is `person1`.
fn step_for(kind: RelationshipType, from: usize, person1: usize) -> Step {
    match kind.class() {
        RelationClass::Lineage if from == person1 => Step::Child,
        RelationClass::Lineage => Step::Parent,
        RelationClass::Spousal => Step::Spouse,
        RelationClass::Sibling => Step::Sibling,
    }
}
