//! Family unit grouping.
//!
//! A family unit is one or two parents plus the children drawn beneath them,
//! and is the grain the layout engine works in.
//!
//! # Grouping Rules
//!
//! 1. Every spouse-class pair becomes one couple unit (unordered pairs are
//!    deduplicated, slot order decides which parent sits left).
//! 2. A couple's children are the intersection of both parents' children.
//!    Couples whose intersection turns out empty fall back to the union of
//!    both parents' still-unclaimed children.
//! 3. Children taken by a couple are claimed. Any parent who still has
//!    unclaimed children gets them as a single-parent unit, or, if that
//!    parent already sits in a couple unit, appended to their first couple.
//!
//! Couples are always processed before singles so that no child is ever
//! attributed to two units.
//!
//! # Groups
//!
//! A person with several spouse-class partners sits in several couple units.
//! Units that share a parent are collected into one [`UnitGroup`], which the
//! layout measures and places as a single row of cards. The row follows the
//! chain of marriages (B–A–C for A married to B and C) so that every couple
//! whose spouse graph is a simple chain sits side by side. Member units are
//! ordered left to right by where their parents sit in that row.

use tracing::{debug, instrument};

use crate::graph::FamilyGraph;

/// One parental grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyUnit {
    /// One or two parent slots.
    pub parents: Vec<usize>,
    /// Children in left-to-right order.
    pub children: Vec<usize>,
}

impl FamilyUnit {
    /// Whether the unit has two parents.
    #[inline]
    pub fn is_couple(&self) -> bool {
        self.parents.len() == 2
    }
}

/// Units joined through shared parents, placed as one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitGroup {
    /// Member units, left to right.
    pub units: Vec<usize>,
    /// Parent slots in row order.
    pub row: Vec<usize>,
}

/// All family units of a graph plus lookup tables.
#[derive(Debug, Clone, Default)]
pub struct FamilyUnits {
    units: Vec<FamilyUnit>,
    /// Units in which each slot appears as a parent, in creation order.
    parent_units: Vec<Vec<usize>>,
    groups: Vec<UnitGroup>,
    /// Group index per unit.
    group_of: Vec<usize>,
}

impl FamilyUnits {
    /// Group the graph into family units.
    #[instrument(skip_all, fields(persons = graph.len()))]
    pub fn build(graph: &FamilyGraph) -> Self {
        let n = graph.len();
        let mut units: Vec<FamilyUnit> = Vec::new();
        let mut parent_units: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut child_unit: Vec<Option<usize>> = vec![None; n];

        // Canonical couples in encounter order.
        for a in 0..n {
            for &b in graph.spouses(a) {
                if a < b {
                    let idx = units.len();
                    units.push(FamilyUnit {
                        parents: vec![a, b],
                        children: Vec::new(),
                    });
                    parent_units[a].push(idx);
                    parent_units[b].push(idx);
                }
            }
        }
        let couple_count = units.len();

        // Pass 1: shared children.
        for idx in 0..couple_count {
            let (a, b) = (units[idx].parents[0], units[idx].parents[1]);
            let shared: Vec<usize> = graph
                .children(a)
                .iter()
                .copied()
                .filter(|c| graph.children(b).contains(c))
                .collect();
            for child in shared {
                if child_unit[child].is_none() {
                    child_unit[child] = Some(idx);
                    units[idx].children.push(child);
                }
            }
        }

        // Pass 2: union fallback for couples that share nothing.
        for idx in 0..couple_count {
            if !units[idx].children.is_empty() {
                continue;
            }
            let (a, b) = (units[idx].parents[0], units[idx].parents[1]);
            for &child in graph.children(a).iter().chain(graph.children(b)) {
                if child_unit[child].is_none() {
                    child_unit[child] = Some(idx);
                    units[idx].children.push(child);
                }
            }
        }

        // Pass 3: leftover children go to their parent's couple or a single unit.
        for parent in 0..n {
            let leftover: Vec<usize> = graph
                .children(parent)
                .iter()
                .copied()
                .filter(|&c| child_unit[c].is_none())
                .collect();
            if leftover.is_empty() {
                continue;
            }

            let idx = match parent_units[parent].first() {
                Some(&existing) => existing,
                None => {
                    let idx = units.len();
                    units.push(FamilyUnit {
                        parents: vec![parent],
                        children: Vec::new(),
                    });
                    parent_units[parent].push(idx);
                    idx
                }
            };
            for child in leftover {
                child_unit[child] = Some(idx);
                units[idx].children.push(child);
            }
        }

        let (groups, group_of) = group_units(&units, &parent_units);

        let couples = units.iter().filter(|unit| unit.is_couple()).count();
        debug!(
            couples,
            singles = units.len() - couples,
            groups = groups.len(),
            "family units built"
        );

        Self {
            units,
            parent_units,
            groups,
            group_of,
        }
    }

    /// All units, couples first.
    pub fn units(&self) -> &[FamilyUnit] {
        &self.units
    }

    /// Unit at an index.
    pub fn unit(&self, idx: usize) -> &FamilyUnit {
        &self.units[idx]
    }

    /// Number of units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether there are no units.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// First unit in which the slot is a parent.
    pub fn primary_unit_of(&self, slot: usize) -> Option<usize> {
        self.parent_units[slot].first().copied()
    }

    /// All groups, in order of their first unit.
    pub fn groups(&self) -> &[UnitGroup] {
        &self.groups
    }

    /// Group at an index.
    pub fn group(&self, idx: usize) -> &UnitGroup {
        &self.groups[idx]
    }

    /// Group of a unit.
    pub fn group_of_unit(&self, unit: usize) -> usize {
        self.group_of[unit]
    }

    /// Group in which the slot is a parent.
    pub fn group_of_parent(&self, slot: usize) -> Option<usize> {
        self.primary_unit_of(slot).map(|u| self.group_of_unit(u))
    }
}

/// Collect units that share a parent and order each group's row.
fn group_units(
    units: &[FamilyUnit],
    parent_units: &[Vec<usize>],
) -> (Vec<UnitGroup>, Vec<usize>) {
    let mut groups: Vec<UnitGroup> = Vec::new();
    let mut group_of: Vec<Option<usize>> = vec![None; units.len()];

    for first in 0..units.len() {
        if group_of[first].is_some() {
            continue;
        }
        let idx = groups.len();
        group_of[first] = Some(idx);

        // Flood through shared parents; members keep discovery order.
        let mut members = vec![first];
        let mut persons: Vec<usize> = Vec::new();
        let mut cursor = 0;
        while cursor < members.len() {
            let u = members[cursor];
            cursor += 1;
            for &parent in &units[u].parents {
                if !persons.contains(&parent) {
                    persons.push(parent);
                }
                for &other in &parent_units[parent] {
                    if group_of[other].is_none() {
                        group_of[other] = Some(idx);
                        members.push(other);
                    }
                }
            }
        }

        let row = row_order(units, &members, &persons);
        members.sort_by_key(|&u| {
            let mut at: Vec<usize> = units[u]
                .parents
                .iter()
                .filter_map(|p| row.iter().position(|r| r == p))
                .collect();
            at.sort_unstable();
            at
        });

        groups.push(UnitGroup {
            units: members,
            row,
        });
    }

    let group_of = group_of.into_iter().map(|g| g.unwrap_or(0)).collect();
    (groups, group_of)
}

/// Depth-first walk of the spouse links between a group's parents, starting
/// at an end of the chain. A chain comes out in order; branching marriages
/// keep every person but cannot keep every couple adjacent.
fn row_order(units: &[FamilyUnit], members: &[usize], persons: &[usize]) -> Vec<usize> {
    let neighbours = |person: usize| -> Vec<usize> {
        members
            .iter()
            .filter_map(|&u| match units[u].parents.as_slice() {
                &[a, b] if a == person => Some(b),
                &[a, b] if b == person => Some(a),
                _ => None,
            })
            .collect()
    };

    let start = persons
        .iter()
        .copied()
        .find(|&p| neighbours(p).len() <= 1)
        .or_else(|| persons.first().copied());

    let mut row: Vec<usize> = Vec::with_capacity(persons.len());
    let mut stack: Vec<usize> = start.into_iter().collect();
    while let Some(person) = stack.pop() {
        if row.contains(&person) {
            continue;
        }
        row.push(person);
        for next in neighbours(person).into_iter().rev() {
            if !row.contains(&next) {
                stack.push(next);
            }
        }
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Gender, Person, Relationship, RelationshipType};

    fn graph(ids: &[&str], rels: &[(&str, &str, RelationshipType)]) -> FamilyGraph {
        let people: Vec<Person> = ids.iter().map(|id| Person::new(*id, Gender::Unknown)).collect();
        let rels: Vec<Relationship> = rels
            .iter()
            .enumerate()
            .map(|(i, (a, b, kind))| Relationship::new(format!("r{i}"), *a, *b, *kind))
            .collect();
        FamilyGraph::from_snapshot(people, &rels)
    }

    use RelationshipType::{ParentChild, Spouse};

    #[test]
    fn test_couple_with_shared_children() {
        let g = graph(
            &["a", "b", "c", "d"],
            &[
                ("a", "b", Spouse),
                ("a", "c", ParentChild),
                ("b", "c", ParentChild),
                ("a", "d", ParentChild),
                ("b", "d", ParentChild),
            ],
        );
        let units = FamilyUnits::build(&g);

        assert_eq!(units.len(), 1);
        assert_eq!(units.unit(0).parents, vec![0, 1]);
        assert_eq!(units.unit(0).children, vec![2, 3]);
        assert_eq!(units.primary_unit_of(1), Some(0));
        assert_eq!(units.groups().len(), 1);
        assert_eq!(units.group(0).row, vec![0, 1]);
    }

    #[test]
    fn test_union_fallback_when_nothing_shared() {
        // Each spouse recorded a different child.
        let g = graph(
            &["a", "b", "c", "d"],
            &[("a", "b", Spouse), ("a", "c", ParentChild), ("b", "d", ParentChild)],
        );
        let units = FamilyUnits::build(&g);

        assert_eq!(units.len(), 1);
        assert_eq!(units.unit(0).children, vec![2, 3]);
    }

    #[test]
    fn test_single_parent_unit() {
        let g = graph(&["a", "c", "d"], &[("a", "c", ParentChild), ("a", "d", ParentChild)]);
        let units = FamilyUnits::build(&g);

        assert_eq!(units.len(), 1);
        assert!(!units.unit(0).is_couple());
        assert_eq!(units.unit(0).parents, vec![0]);
        assert_eq!(units.unit(0).children, vec![1, 2]);
    }

    #[test]
    fn test_childless_couple_still_forms_unit() {
        let g = graph(&["a", "b"], &[("a", "b", Spouse)]);
        let units = FamilyUnits::build(&g);

        assert_eq!(units.len(), 1);
        assert!(units.unit(0).is_couple());
        assert!(units.unit(0).children.is_empty());
    }

    #[test]
    fn test_child_never_in_two_units() {
        // a is married to b and c; the child is shared with c only.
        let g = graph(
            &["a", "b", "c", "k"],
            &[
                ("a", "b", Spouse),
                ("a", "c", Spouse),
                ("a", "k", ParentChild),
                ("c", "k", ParentChild),
            ],
        );
        let units = FamilyUnits::build(&g);

        let holders: Vec<usize> = (0..units.len())
            .filter(|&u| units.unit(u).children.contains(&3))
            .collect();
        assert_eq!(holders.len(), 1, "child claimed by {holders:?}");
        assert_eq!(units.unit(holders[0]).parents, vec![0, 2]);
        assert_eq!(units.group_of_unit(0), units.group_of_unit(1));
    }

    #[test]
    fn test_leftover_children_join_existing_couple() {
        // a and b share c; a also has d from an unrecorded partner.
        let g = graph(
            &["a", "b", "c", "d"],
            &[
                ("a", "b", Spouse),
                ("a", "c", ParentChild),
                ("b", "c", ParentChild),
                ("a", "d", ParentChild),
            ],
        );
        let units = FamilyUnits::build(&g);

        assert_eq!(units.len(), 1);
        assert_eq!(units.unit(0).children, vec![2, 3]);
    }

    #[test]
    fn test_unmarried_co_parents() {
        let g = graph(&["x", "y", "c"], &[("x", "c", ParentChild), ("y", "c", ParentChild)]);
        let units = FamilyUnits::build(&g);

        assert_eq!(units.len(), 1);
        assert_eq!(units.unit(0).parents, vec![0]);
        assert_eq!(units.unit(0).children, vec![2]);
        assert_eq!(units.primary_unit_of(1), None);
        assert_eq!(units.group_of_parent(1), None);
    }

    #[test]
    fn test_remarriage_groups_couples_around_shared_parent() {
        // a was married to b (child k1) and is now married to c (child k2).
        let g = graph(
            &["a", "b", "c", "k1", "k2"],
            &[
                ("a", "b", RelationshipType::ExSpouse),
                ("a", "c", Spouse),
                ("a", "k1", ParentChild),
                ("b", "k1", ParentChild),
                ("a", "k2", ParentChild),
                ("c", "k2", ParentChild),
            ],
        );
        let units = FamilyUnits::build(&g);

        assert_eq!(units.len(), 2);
        assert_eq!(units.groups().len(), 1);
        let group = units.group(0);
        assert_eq!(group.row, vec![1, 0, 2], "shared parent sits in the middle");
        assert_eq!(group.units, vec![0, 1]);
        assert_eq!(units.unit(group.units[0]).children, vec![3]);
        assert_eq!(units.unit(group.units[1]).children, vec![4]);
        assert_eq!(units.group_of_parent(2), Some(0));
    }

    #[test]
    fn test_chain_of_marriages_keeps_row_order() {
        // d-a, a-b, b-c: each remarriage extends the chain.
        let g = graph(
            &["a", "b", "c", "d"],
            &[("d", "a", Spouse), ("a", "b", Spouse), ("b", "c", Spouse)],
        );
        let units = FamilyUnits::build(&g);

        assert_eq!(units.groups().len(), 1);
        let row = &units.group(0).row;
        for (x, y) in [(0, 3), (0, 1), (1, 2)] {
            let (px, py) = (
                row.iter().position(|&s| s == x).unwrap(),
                row.iter().position(|&s| s == y).unwrap(),
            );
            assert_eq!(px.abs_diff(py), 1, "{x} and {y} must be neighbours in {row:?}");
        }
    }
}
