//! Property tests over generated family snapshots.

use family_chart_wasm::graph::{
    FamilyGraph, Gender, Person, PersonId, RelationClass, Relationship, RelationshipType,
};
use family_chart_wasm::kinship::{Kinship, KinshipResolver};
use family_chart_wasm::layout::{FamilyLayoutResult, FamilyTreeLayout};
use proptest::prelude::*;

use RelationshipType::{ExSpouse, HalfSibling, ParentChild, Partner, Sibling, Spouse};

const MAX_PERSONS: usize = 60;

// How an expanded person marries; any other value marries in a spouse
// with no recorded parents.
const SINGLE: u8 = 0;
const REMARRIED: u8 = 2;
const ACROSS_LINEAGES: u8 = 3;

/// One expansion decision: children per marriage, marriage kind, and whether
/// to record sibling links among (and beside) the children.
type Decision = (usize, u8, bool);

#[derive(Default)]
struct Builder {
    people: Vec<Person>,
    rels: Vec<Relationship>,
    depth: Vec<u32>,
    lineage: Vec<usize>,
    has_parents: Vec<bool>,
    spouses: Vec<usize>,
    children: Vec<usize>,
}

impl Builder {
    fn person(&mut self, depth: u32, lineage: usize) -> usize {
        let slot = self.people.len();
        let gender = if slot % 2 == 0 { Gender::Male } else { Gender::Female };
        self.people.push(Person::new(format!("p{slot}"), gender));
        self.depth.push(depth);
        self.lineage.push(lineage);
        self.has_parents.push(false);
        self.spouses.push(0);
        self.children.push(0);
        slot
    }

    fn relate(&mut self, a: usize, b: usize, kind: RelationshipType) {
        let id = format!("r{}", self.rels.len());
        self.rels.push(Relationship::new(id, format!("p{a}"), format!("p{b}"), kind));
        match kind.class() {
            RelationClass::Spousal => {
                self.spouses[a] += 1;
                self.spouses[b] += 1;
            }
            RelationClass::Lineage => {
                self.children[a] += 1;
                self.has_parents[b] = true;
            }
            RelationClass::Sibling => {}
        }
    }

    /// Add children of the given parents one generation below the first.
    fn children_of(&mut self, parents: &[usize], count: usize, lineage: usize) -> Vec<usize> {
        let depth = self.depth[parents[0]] + 1;
        (0..count)
            .map(|_| {
                let child = self.person(depth, lineage);
                for &parent in parents {
                    self.relate(parent, child, ParentChild);
                }
                child
            })
            .collect()
    }

    /// Unmarried, childless person with parents from another lineage at the
    /// same depth.
    fn partner_across(&self, person: usize) -> Option<usize> {
        (0..self.people.len()).find(|&other| {
            other != person
                && self.lineage[other] != self.lineage[person]
                && self.depth[other] == self.depth[person]
                && self.has_parents[other]
                && self.spouses[other] == 0
                && self.children[other] == 0
        })
    }
}

/// Grow well-formed lineages. Each expanded person may stay single, marry a
/// spouse with no recorded parents, remarry (two spouses, children with
/// each), or marry someone with parents from another lineage at the same
/// depth. Sibling decisions add `sibling` rows between children and a
/// parentless `half_sibling` linked only to the first child. `isolated`
/// persons have no edges.
fn build_family(lineages: &[Vec<Decision>], isolated: usize) -> (Vec<Person>, Vec<Relationship>) {
    let mut b = Builder::default();

    for (lineage, decisions) in lineages.iter().enumerate() {
        let root = b.person(0, lineage);
        let mut queue = std::collections::VecDeque::from([root]);

        for &(count, marriage, siblings) in decisions {
            let Some(person) = queue.pop_front() else { break };
            if b.people.len() + 2 * count + 3 > MAX_PERSONS {
                break;
            }
            let depth = b.depth[person];

            let across = if marriage == ACROSS_LINEAGES {
                b.partner_across(person)
            } else {
                None
            };

            let mut families: Vec<Vec<usize>> = Vec::new();
            match (marriage, across) {
                (SINGLE, _) => families.push(vec![person]),
                (REMARRIED, _) => {
                    let first = b.person(depth, lineage);
                    b.relate(person, first, ExSpouse);
                    let second = b.person(depth, lineage);
                    b.relate(person, second, Partner);
                    families.push(vec![person, first]);
                    families.push(vec![person, second]);
                }
                (_, Some(other)) => {
                    b.relate(other, person, Spouse);
                    families.push(vec![person, other]);
                }
                _ => {
                    let spouse = b.person(depth, lineage);
                    b.relate(person, spouse, Spouse);
                    families.push(vec![person, spouse]);
                }
            }

            for parents in families {
                let kids = b.children_of(&parents, count, lineage);
                if siblings {
                    if let &[first, second, ..] = kids.as_slice() {
                        b.relate(first, second, Sibling);
                    }
                    if let Some(&first) = kids.first() {
                        let loose = b.person(depth + 1, lineage);
                        b.relate(loose, first, HalfSibling);
                    }
                }
                queue.extend(kids);
            }
        }
    }

    for _ in 0..isolated {
        b.person(0, usize::MAX);
    }

    (b.people, b.rels)
}

fn family_strategy() -> impl Strategy<Value = (Vec<Vec<Decision>>, usize)> {
    (
        prop::collection::vec(
            prop::collection::vec((0usize..4, 0u8..4, any::<bool>()), 0..12),
            1..4,
        ),
        0usize..3,
    )
}

fn compute(people: Vec<Person>, rels: &[Relationship]) -> (FamilyGraph, FamilyLayoutResult) {
    let graph = FamilyGraph::from_snapshot(people, rels);
    let result = FamilyTreeLayout::with_defaults().compute(&graph);
    (graph, result)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_every_person_placed_once((lineages, isolated) in family_strategy()) {
        let (people, rels) = build_family(&lineages, isolated);
        let count = people.len();
        let (_, result) = compute(people, &rels);

        prop_assert_eq!(result.positions.len(), count);
        for pos in &result.positions {
            prop_assert!(pos.x.is_finite() && pos.y.is_finite());
            prop_assert!(pos.x >= 0.0 && pos.y >= 0.0);
        }
    }

    #[test]
    fn prop_no_overlapping_cards((lineages, isolated) in family_strategy()) {
        let (people, rels) = build_family(&lineages, isolated);
        let (_, result) = compute(people, &rels);
        let (w, h) = (result.config.card_width, result.config.card_height);

        for i in 0..result.positions.len() {
            for j in (i + 1)..result.positions.len() {
                let (a, b) = (result.positions[i], result.positions[j]);
                let overlap = a.x < b.x + w && b.x < a.x + w && a.y < b.y + h && b.y < a.y + h;
                prop_assert!(!overlap, "cards {} and {} overlap: {:?} {:?}", i, j, a, b);
            }
        }
    }

    #[test]
    fn prop_spouses_adjacent((lineages, isolated) in family_strategy()) {
        let (people, rels) = build_family(&lineages, isolated);
        let (graph, result) = compute(people, &rels);
        let gap = result.config.card_width + result.config.couple_gap;

        for rel in rels.iter().filter(|r| r.kind.class() == RelationClass::Spousal) {
            let a = result.position(graph.slot_of(&rel.person1_id).unwrap());
            let b = result.position(graph.slot_of(&rel.person2_id).unwrap());
            prop_assert_eq!(a.y, b.y);
            prop_assert!(
                ((a.x - b.x).abs() - gap).abs() < 0.01,
                "{} and {} are {} apart",
                rel.person1_id,
                rel.person2_id,
                (a.x - b.x).abs()
            );
        }
    }

    #[test]
    fn prop_siblings_share_row((lineages, isolated) in family_strategy()) {
        let (people, rels) = build_family(&lineages, isolated);
        let (graph, result) = compute(people, &rels);

        for rel in rels.iter().filter(|r| r.kind.class() == RelationClass::Sibling) {
            let a = graph.slot_of(&rel.person1_id).unwrap();
            let b = graph.slot_of(&rel.person2_id).unwrap();
            prop_assert_eq!(result.generations.get(a), result.generations.get(b));
            prop_assert_eq!(result.position(a).y, result.position(b).y);
        }
    }

    #[test]
    fn prop_child_one_generation_below_parent((lineages, isolated) in family_strategy()) {
        let (people, rels) = build_family(&lineages, isolated);
        let (graph, result) = compute(people, &rels);

        for rel in rels.iter().filter(|r| r.kind == ParentChild) {
            let parent = graph.slot_of(&rel.person1_id).unwrap();
            let child = graph.slot_of(&rel.person2_id).unwrap();
            prop_assert_eq!(result.generations.get(child), result.generations.get(parent) + 1);
            prop_assert!(result.position(child).y > result.position(parent).y);
        }
    }

    #[test]
    fn prop_kinship_reflexive((lineages, isolated) in family_strategy()) {
        let (people, rels) = build_family(&lineages, isolated);
        let graph = FamilyGraph::from_snapshot(people, &rels);
        let resolver = KinshipResolver::new(&graph);

        for person in graph.persons() {
            let result = resolver.resolve(&person.id, &person.id).unwrap();
            prop_assert_eq!(result.kinship, Kinship::SamePerson);
            prop_assert_eq!(result.label.as_str(), "Same person");
        }
    }

    #[test]
    fn prop_kinship_never_fails_for_known_persons((lineages, isolated) in family_strategy()) {
        let (people, rels) = build_family(&lineages, isolated);
        let graph = FamilyGraph::from_snapshot(people, &rels);
        let resolver = KinshipResolver::new(&graph);
        let first = &graph.persons()[0].id;

        for person in graph.persons() {
            let result = resolver.resolve(first, &person.id).unwrap();
            prop_assert!(!result.label.is_empty());
        }
    }

    #[test]
    fn prop_cross_tree_is_sentinel(a_male in any::<bool>(), married in any::<bool>()) {
        let gender = if a_male { Gender::Male } else { Gender::Female };
        let people = vec![
            Person::new("a", gender).in_tree("one"),
            Person::new("b", Gender::Unknown).in_tree("two"),
        ];
        let rels = if married {
            vec![Relationship::new("r", "a", "b", Spouse)]
        } else {
            Vec::new()
        };
        let graph = FamilyGraph::from_snapshot(people, &rels);
        let result = KinshipResolver::new(&graph)
            .resolve(&PersonId::from("a"), &PersonId::from("b"))
            .unwrap();
        prop_assert_eq!(result.label.as_str(), "No relation found");
    }

    #[test]
    fn prop_arbitrary_edges_terminate(
        n in 1usize..12,
        edges in prop::collection::vec((0usize..12, 0usize..12, 0usize..3), 0..40),
    ) {
        let people: Vec<Person> = (0..n).map(|i| Person::new(format!("p{i}"), Gender::Unknown)).collect();
        let rels: Vec<Relationship> = edges
            .iter()
            .enumerate()
            .map(|(i, &(a, b, kind))| {
                let kind = match kind {
                    0 => ParentChild,
                    1 => Spouse,
                    _ => RelationshipType::Sibling,
                };
                Relationship::new(format!("r{i}"), format!("p{a}"), format!("p{b}"), kind)
            })
            .collect();

        let (graph, result) = compute(people, &rels);
        prop_assert_eq!(result.positions.len(), n);

        let resolver = KinshipResolver::new(&graph);
        for person in graph.persons() {
            prop_assert!(resolver.resolve(&graph.persons()[0].id, &person.id).is_ok());
        }
    }
}
