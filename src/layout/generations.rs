//! Generation inference.
//!
//! Assigns every person an integer generation (0 at the discovered roots)
//! using breadth-first waves:
//!
//! - Roots are persons with no parents whose spouses and siblings (if any)
//!   also have no parents. A person who married into a lineage, or who is
//!   only recorded as the sibling of someone with parents, is therefore not
//!   a root.
//! - A wave propagates `g + 1` to children and `g` to spouses and siblings.
//!   The first assignment a person receives wins.
//! - After a wave settles, unassigned persons with an assigned spouse or
//!   sibling are seeded from them and another wave runs. This repeats for a
//!   bounded number of passes.
//! - Anything still unassigned (disconnected fragments, rootless cycles)
//!   defaults to generation 0.
//!
//! This is a heuristic fixed point. It does not reconcile persons reachable
//! at two different depths (e.g. cousin marriages); the first depth found is
//! kept.

use std::collections::VecDeque;

use tracing::{debug, instrument};

use crate::graph::FamilyGraph;

/// Default number of spouse re-seed passes.
pub const DEFAULT_MAX_PASSES: u32 = 5;

/// Generation per person slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generations {
    levels: Vec<u32>,
    /// Slots that received no assignment and fell back to 0.
    defaulted: Vec<usize>,
}

impl Generations {
    /// Infer generations for every person in the graph.
    #[instrument(skip_all, fields(persons = graph.len(), max_passes = max_passes))]
    pub fn assign(graph: &FamilyGraph, max_passes: u32) -> Self {
        let n = graph.len();
        let mut assigned: Vec<Option<u32>> = vec![None; n];

        let mut siblings: Vec<Vec<usize>> = vec![Vec::new(); n];
        for &(a, b) in graph.sibling_edges() {
            siblings[a].push(b);
            siblings[b].push(a);
        }

        let mut queue: VecDeque<usize> = VecDeque::new();
        for slot in 0..n {
            let is_root = graph.parents(slot).is_empty()
                && graph
                    .spouses(slot)
                    .iter()
                    .chain(&siblings[slot])
                    .all(|&s| graph.parents(s).is_empty());
            if is_root {
                assigned[slot] = Some(0);
                queue.push_back(slot);
            }
        }
        Self::wave(graph, &siblings, &mut assigned, &mut queue);

        for pass in 0..max_passes {
            for slot in 0..n {
                if assigned[slot].is_some() {
                    continue;
                }
                let seed = graph
                    .spouses(slot)
                    .iter()
                    .chain(&siblings[slot])
                    .find_map(|&s| assigned[s]);
                if let Some(level) = seed {
                    assigned[slot] = Some(level);
                    queue.push_back(slot);
                }
            }
            if queue.is_empty() {
                break;
            }
            debug!(pass, seeded = queue.len(), "re-seeding generations from spouses and siblings");
            Self::wave(graph, &siblings, &mut assigned, &mut queue);
        }

        let defaulted: Vec<usize> = (0..n).filter(|&s| assigned[s].is_none()).collect();
        if !defaulted.is_empty() {
            debug!(count = defaulted.len(), "unresolved persons default to generation 0");
        }

        Self {
            levels: assigned.into_iter().map(|g| g.unwrap_or(0)).collect(),
            defaulted,
        }
    }

    /// Run one breadth-first wave until the queue drains.
    fn wave(
        graph: &FamilyGraph,
        siblings: &[Vec<usize>],
        assigned: &mut [Option<u32>],
        queue: &mut VecDeque<usize>,
    ) {
        while let Some(slot) = queue.pop_front() {
            let Some(level) = assigned[slot] else {
                continue;
            };

            for &child in graph.children(slot) {
                if assigned[child].is_none() {
                    assigned[child] = Some(level + 1);
                    queue.push_back(child);
                }
            }
            for &peer in graph.spouses(slot).iter().chain(&siblings[slot]) {
                if assigned[peer].is_none() {
                    assigned[peer] = Some(level);
                    queue.push_back(peer);
                }
            }
        }
    }

    /// Generation of a slot.
    #[inline]
    pub fn get(&self, slot: usize) -> u32 {
        self.levels[slot]
    }

    /// All generations in slot order.
    pub fn as_slice(&self) -> &[u32] {
        &self.levels
    }

    /// Deepest generation present (0 for an empty graph).
    pub fn max_generation(&self) -> u32 {
        self.levels.iter().copied().max().unwrap_or(0)
    }

    /// Slots that were never reached and defaulted to 0.
    pub fn defaulted(&self) -> &[usize] {
        &self.defaulted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Gender, Person, Relationship, RelationshipType};

    use RelationshipType::{HalfSibling, ParentChild, Spouse};

    fn graph(ids: &[&str], rels: &[(&str, &str, RelationshipType)]) -> FamilyGraph {
        let people: Vec<Person> = ids.iter().map(|id| Person::new(*id, Gender::Unknown)).collect();
        let rels: Vec<Relationship> = rels
            .iter()
            .enumerate()
            .map(|(i, (a, b, kind))| Relationship::new(format!("r{i}"), *a, *b, *kind))
            .collect();
        FamilyGraph::from_snapshot(people, &rels)
    }

    #[test]
    fn test_chain_generations() {
        let g = graph(
            &["a", "b", "c"],
            &[("a", "b", ParentChild), ("b", "c", ParentChild)],
        );
        let gens = Generations::assign(&g, DEFAULT_MAX_PASSES);

        assert_eq!(gens.as_slice(), &[0, 1, 2]);
        assert_eq!(gens.max_generation(), 2);
        assert!(gens.defaulted().is_empty());
    }

    #[test]
    fn test_married_in_spouse_shares_generation() {
        // r's parents are e and i; m married in with no recorded parents.
        let g = graph(
            &["e", "i", "r", "m", "d"],
            &[
                ("e", "i", Spouse),
                ("e", "r", ParentChild),
                ("i", "r", ParentChild),
                ("r", "m", Spouse),
                ("r", "d", ParentChild),
                ("m", "d", ParentChild),
            ],
        );
        let gens = Generations::assign(&g, DEFAULT_MAX_PASSES);

        assert_eq!(gens.get(0), 0);
        assert_eq!(gens.get(1), 0);
        assert_eq!(gens.get(2), 1);
        assert_eq!(gens.get(3), 1, "married-in spouse must not be a root");
        assert_eq!(gens.get(4), 2);
    }

    #[test]
    fn test_siblings_share_generation() {
        let g = graph(
            &["p", "a", "b"],
            &[("p", "a", ParentChild), ("a", "b", HalfSibling)],
        );
        let gens = Generations::assign(&g, DEFAULT_MAX_PASSES);

        assert_eq!(gens.get(1), 1);
        assert_eq!(gens.get(2), 1);
    }

    #[test]
    fn test_parentless_sibling_follows_sibling_with_parents() {
        // s is recorded only as a's sibling; a has parents p and q.
        let g = graph(
            &["s", "p", "q", "a"],
            &[
                ("p", "q", Spouse),
                ("p", "a", ParentChild),
                ("q", "a", ParentChild),
                ("s", "a", RelationshipType::Sibling),
            ],
        );
        let gens = Generations::assign(&g, DEFAULT_MAX_PASSES);

        assert_eq!(gens.get(3), 1);
        assert_eq!(gens.get(0), 1, "sibling must not be a root");
        assert!(gens.defaulted().is_empty());
    }

    #[test]
    fn test_parentless_siblings_are_both_roots() {
        let g = graph(&["a", "b"], &[("a", "b", HalfSibling)]);
        let gens = Generations::assign(&g, DEFAULT_MAX_PASSES);
        assert_eq!(gens.as_slice(), &[0, 0]);
    }

    #[test]
    fn test_cycle_defaults_to_zero() {
        let g = graph(&["a", "b"], &[("a", "b", ParentChild), ("b", "a", ParentChild)]);
        let gens = Generations::assign(&g, DEFAULT_MAX_PASSES);

        assert_eq!(gens.as_slice(), &[0, 0]);
        assert_eq!(gens.defaulted(), &[0, 1]);
    }

    #[test]
    fn test_cycle_reached_through_marriage() {
        // x and y claim each other as parents; y married into w's line.
        let g = graph(
            &["w", "c", "x", "y"],
            &[
                ("w", "c", ParentChild),
                ("c", "y", Spouse),
                ("x", "y", ParentChild),
                ("y", "x", ParentChild),
            ],
        );
        let gens = Generations::assign(&g, DEFAULT_MAX_PASSES);

        assert_eq!(gens.get(0), 0);
        assert_eq!(gens.get(1), 1);
        assert_eq!(gens.get(3), 1, "spouse takes the partner's generation");
        assert_eq!(gens.get(2), 2);
        assert!(gens.defaulted().is_empty());
    }

    #[test]
    fn test_isolated_person() {
        let g = graph(&["solo"], &[]);
        let gens = Generations::assign(&g, DEFAULT_MAX_PASSES);
        assert_eq!(gens.get(0), 0);
        assert!(gens.defaulted().is_empty());
    }
}
