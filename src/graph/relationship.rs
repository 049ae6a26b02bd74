//! Relationship records.
//!
//! Relationships are the typed edges between persons. Each relationship has:
//! - A stable identifier
//! - The two endpoint person ids (for lineage types, person1 is the parent)
//! - A type from a closed set, grouped into three classes

use std::fmt;

use serde::{Deserialize, Serialize};

use super::person::PersonId;

/// Stable relationship identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationshipId(pub String);

impl fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Relationship({})", self.0)
    }
}

impl From<&str> for RelationshipId {
    #[inline]
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// The closed set of relationship types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    ParentChild,
    Spouse,
    ExSpouse,
    Partner,
    Sibling,
    HalfSibling,
    StepParentChild,
    AdoptiveParentChild,
    Guardian,
}

/// How a relationship type participates in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationClass {
    /// Directed: person1 is the parent, person2 the child.
    Lineage,
    /// Symmetric couple relation.
    Spousal,
    /// Symmetric sibling relation.
    Sibling,
}

impl RelationshipType {
    /// Classify the type.
    pub fn class(self) -> RelationClass {
        match self {
            Self::ParentChild
            | Self::StepParentChild
            | Self::AdoptiveParentChild
            | Self::Guardian => RelationClass::Lineage,
            Self::Spouse | Self::ExSpouse | Self::Partner => RelationClass::Spousal,
            Self::Sibling | Self::HalfSibling => RelationClass::Sibling,
        }
    }

    /// Whether the type is symmetric between its endpoints.
    #[inline]
    pub fn is_symmetric(self) -> bool {
        self.class() != RelationClass::Lineage
    }
}

/// A relationship record from the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: RelationshipId,
    pub person1_id: PersonId,
    pub person2_id: PersonId,
    #[serde(rename = "type")]
    pub kind: RelationshipType,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl Relationship {
    /// Create a relationship without dates.
    pub fn new(
        id: impl Into<String>,
        person1: impl Into<PersonId>,
        person2: impl Into<PersonId>,
        kind: RelationshipType,
    ) -> Self {
        Self {
            id: RelationshipId(id.into()),
            person1_id: person1.into(),
            person2_id: person2.into(),
            kind,
            start_date: None,
            end_date: None,
        }
    }

    /// Whether both endpoints name the same person.
    #[inline]
    pub fn is_self_loop(&self) -> bool {
        self.person1_id == self.person2_id
    }
}
