//! Graph data structures for the family chart.
//!
//! Uses an index arena keyed by person slot, built once per snapshot.

pub mod model;
pub mod person;
pub mod relationship;

pub use model::{FamilyGraph, ResolvedEdge};
pub use person::{Gender, Person, PersonId};
pub use relationship::{RelationClass, Relationship, RelationshipId, RelationshipType};
