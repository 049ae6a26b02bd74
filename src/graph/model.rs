//! FamilyGraph - the adjacency index shared by layout and kinship.
//!
//! The graph is an index arena: persons live in a `Vec` and are addressed by
//! their slot (position in that `Vec`). Adjacency is kept as slot lists, never
//! as references between person records, so the whole structure is a plain
//! owned value with no aliasing.
//!
//! Construction is O(V + E). Duplicate relationship rows collapse to a single
//! edge, relationships naming unknown persons are skipped, and self-loops are
//! dropped. Sibling edges are kept only as an edge list for generation
//! inference; they do not get a per-person adjacency set.

use std::collections::{HashMap, HashSet};

use tracing::{instrument, warn};

use super::person::{Person, PersonId};
use super::relationship::{RelationClass, Relationship, RelationshipType};

/// Per-person adjacency sets (insertion ordered, duplicate free).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Adjacency {
    spouses: Vec<usize>,
    children: Vec<usize>,
    parents: Vec<usize>,
}

/// A relationship resolved to person slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedEdge {
    /// Slot of person1 (the parent, for lineage types).
    pub person1: usize,
    /// Slot of person2.
    pub person2: usize,
    pub kind: RelationshipType,
}

/// The family graph built from one snapshot.
#[derive(Debug, Clone, Default)]
pub struct FamilyGraph {
    /// Person records in slot order.
    persons: Vec<Person>,

    /// Map from stable PersonId to slot.
    id_to_slot: HashMap<PersonId, usize>,

    /// Adjacency per slot.
    adjacency: Vec<Adjacency>,

    /// Deduplicated sibling-class edges as normalized (low, high) slot pairs.
    sibling_edges: Vec<(usize, usize)>,

    /// Every accepted relationship, deduplicated, in input order.
    edges: Vec<ResolvedEdge>,

    /// Number of relationship rows dropped during construction.
    skipped: usize,
}

impl FamilyGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from a snapshot of persons and relationships.
    ///
    /// Persons with an id already seen are skipped (first record wins).
    #[instrument(skip_all, fields(relationships = relationships.len()))]
    pub fn from_snapshot(
        people: impl IntoIterator<Item = Person>,
        relationships: &[Relationship],
    ) -> Self {
        let mut graph = Self::new();

        for person in people {
            if graph.id_to_slot.contains_key(&person.id) {
                warn!(person = %person.id, "duplicate person record skipped");
                continue;
            }
            let slot = graph.persons.len();
            graph.id_to_slot.insert(person.id.clone(), slot);
            graph.persons.push(person);
            graph.adjacency.push(Adjacency::default());
        }

        let mut seen: HashSet<ResolvedEdge> = HashSet::with_capacity(relationships.len());
        let mut seen_pairs: HashSet<(RelationClass, usize, usize)> =
            HashSet::with_capacity(relationships.len());

        for rel in relationships {
            if rel.is_self_loop() {
                graph.skipped += 1;
                continue;
            }
            let (Some(&a), Some(&b)) = (
                graph.id_to_slot.get(&rel.person1_id),
                graph.id_to_slot.get(&rel.person2_id),
            ) else {
                graph.skipped += 1;
                continue;
            };

            // Symmetric types are stored with normalized endpoints.
            let edge = if rel.kind.is_symmetric() {
                ResolvedEdge {
                    person1: a.min(b),
                    person2: a.max(b),
                    kind: rel.kind,
                }
            } else {
                ResolvedEdge {
                    person1: a,
                    person2: b,
                    kind: rel.kind,
                }
            };
            if !seen.insert(edge) {
                continue;
            }
            graph.edges.push(edge);

            let class = rel.kind.class();
            if !seen_pairs.insert((class, edge.person1, edge.person2)) {
                // Same endpoints already connected by another type of this class.
                continue;
            }

            match class {
                RelationClass::Spousal => {
                    graph.adjacency[a].spouses.push(b);
                    graph.adjacency[b].spouses.push(a);
                }
                RelationClass::Lineage => {
                    graph.adjacency[a].children.push(b);
                    graph.adjacency[b].parents.push(a);
                }
                RelationClass::Sibling => {
                    graph.sibling_edges.push((edge.person1, edge.person2));
                }
            }
        }

        if graph.skipped > 0 {
            warn!(
                skipped = graph.skipped,
                "relationships referencing unknown or identical persons were skipped"
            );
        }

        graph
    }

    // =========================================================================
    // Person Access
    // =========================================================================

    /// Number of persons.
    pub fn len(&self) -> usize {
        self.persons.len()
    }

    /// Whether the graph holds no persons.
    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    /// Look up the slot of a person id.
    pub fn slot_of(&self, id: &PersonId) -> Option<usize> {
        self.id_to_slot.get(id).copied()
    }

    /// Person record at a slot.
    pub fn person(&self, slot: usize) -> &Person {
        &self.persons[slot]
    }

    /// All person records in slot order.
    pub fn persons(&self) -> &[Person] {
        &self.persons
    }

    // =========================================================================
    // Adjacency
    // =========================================================================

    /// Spouse-class neighbours of a slot.
    pub fn spouses(&self, slot: usize) -> &[usize] {
        &self.adjacency[slot].spouses
    }

    /// Lineage children of a slot.
    pub fn children(&self, slot: usize) -> &[usize] {
        &self.adjacency[slot].children
    }

    /// Lineage parents of a slot.
    pub fn parents(&self, slot: usize) -> &[usize] {
        &self.adjacency[slot].parents
    }

    /// Sibling-class edges as normalized slot pairs.
    pub fn sibling_edges(&self) -> &[(usize, usize)] {
        &self.sibling_edges
    }

    /// Every accepted relationship edge.
    pub fn edges(&self) -> &[ResolvedEdge] {
        &self.edges
    }

    /// Number of relationship rows that were dropped.
    pub fn skipped_relationships(&self) -> usize {
        self.skipped
    }
}
