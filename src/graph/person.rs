//! Person records and identifiers.
//!
//! Persons are the vertices of the family graph. Each person has:
//! - A stable opaque identifier supplied by the persistence layer
//! - An optional tree identifier (which family tree the record belongs to)
//! - Gender, used to pick gendered kinship labels
//! - Display fields (names, dates, living flag) carried through untouched

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable person identifier.
///
/// Opaque to the core; whatever string the persistence layer uses
/// (usually a UUID) is kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub String);

impl PersonId {
    /// Create a new PersonId from anything string-like.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Person({})", self.0)
    }
}

impl From<&str> for PersonId {
    #[inline]
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PersonId {
    #[inline]
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Recorded gender of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
    #[default]
    Unknown,
}

/// A person record from the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: PersonId,
    /// Family tree this record belongs to, if the store tracks it.
    #[serde(default)]
    pub tree_id: Option<String>,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub death_date: Option<String>,
    #[serde(default = "default_living")]
    pub is_living: bool,
}

fn default_living() -> bool {
    true
}

impl Person {
    /// Create a person with only an id and gender set.
    pub fn new(id: impl Into<PersonId>, gender: Gender) -> Self {
        Self {
            id: id.into(),
            tree_id: None,
            gender,
            first_name: None,
            last_name: None,
            birth_date: None,
            death_date: None,
            is_living: true,
        }
    }

    /// Builder-style setter for the first name.
    pub fn named(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    /// Builder-style setter for the tree id.
    pub fn in_tree(mut self, tree_id: impl Into<String>) -> Self {
        self.tree_id = Some(tree_id.into());
        self
    }

    /// Full display name, falling back to the id when no name is recorded.
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.id.0.clone(),
        }
    }

    /// Whether two persons can be related at all.
    ///
    /// Records without a tree id are assumed to live in the snapshot's tree.
    pub fn shares_tree_with(&self, other: &Person) -> bool {
        match (&self.tree_id, &other.tree_id) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }
}
