//! Step-sequence to kinship-label classification.
//!
//! A kinship path is reduced to a sequence of [`Step`]s. Paths of up to three
//! steps are matched against a closed table of [`KinTerm`]s; longer paths are
//! classified as cousins by counting parent and child steps.

use std::fmt;

use serde::Serialize;

use crate::graph::Gender;

/// One hop along a kinship path, seen from the person walking it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Step {
    /// Up to a parent.
    Parent,
    /// Down to a child.
    Child,
    /// Across a spousal edge.
    Spouse,
    /// Across a sibling edge.
    Sibling,
}

/// Named relation for short paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum KinTerm {
    Parent,
    Child,
    Spouse,
    Sibling,
    Grandparent,
    Grandchild,
    ParentSibling,
    SiblingChild,
    SiblingInLaw,
    ParentInLaw,
    ChildInLaw,
    StepParent,
    StepChild,
    GreatGrandparent,
    GreatGrandchild,
    GreatParentSibling,
    ParentSiblingByMarriage,
    GrandSiblingChild,
}

impl KinTerm {
    /// Label for a target of the given gender.
    pub fn label(self, gender: Gender) -> &'static str {
        let (male, female, neutral) = match self {
            Self::Parent => ("Father", "Mother", "Parent"),
            Self::Child => ("Son", "Daughter", "Child"),
            Self::Spouse => ("Husband", "Wife", "Spouse"),
            Self::Sibling => ("Brother", "Sister", "Sibling"),
            Self::Grandparent => ("Grandfather", "Grandmother", "Grandparent"),
            Self::Grandchild => ("Grandson", "Granddaughter", "Grandchild"),
            Self::ParentSibling => ("Uncle", "Aunt", "Aunt/Uncle"),
            Self::SiblingChild => ("Nephew", "Niece", "Niece/Nephew"),
            Self::SiblingInLaw => ("Brother-in-law", "Sister-in-law", "Sibling-in-law"),
            Self::ParentInLaw => ("Father-in-law", "Mother-in-law", "Parent-in-law"),
            Self::ChildInLaw => ("Son-in-law", "Daughter-in-law", "Child-in-law"),
            Self::StepParent => ("Stepfather", "Stepmother", "Stepparent"),
            Self::StepChild => ("Stepson", "Stepdaughter", "Stepchild"),
            Self::GreatGrandparent => (
                "Great-Grandfather",
                "Great-Grandmother",
                "Great-Grandparent",
            ),
            Self::GreatGrandchild => (
                "Great-Grandson",
                "Great-Granddaughter",
                "Great-Grandchild",
            ),
            Self::GreatParentSibling => ("Great-Uncle", "Great-Aunt", "Great-Aunt/Uncle"),
            Self::ParentSiblingByMarriage => (
                "Uncle by marriage",
                "Aunt by marriage",
                "Aunt/Uncle by marriage",
            ),
            Self::GrandSiblingChild => ("Grandnephew", "Grandniece", "Grandniece/Grandnephew"),
        };
        match gender {
            Gender::Male => male,
            Gender::Female => female,
            Gender::Other | Gender::Unknown => neutral,
        }
    }
}

/// Classified relation between two persons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Kinship {
    SamePerson,
    /// Different trees, or no path between the two.
    NoRelation,
    Distant,
    Relative { term: KinTerm, gender: Gender },
    Cousin { degree: u32, removed: u32 },
}

impl fmt::Display for Kinship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SamePerson => f.write_str("Same person"),
            Self::NoRelation => f.write_str("No relation found"),
            Self::Distant => f.write_str("Distant relative"),
            Self::Relative { term, gender } => f.write_str(term.label(*gender)),
            Self::Cousin { degree, removed: 0 } => write!(f, "{} Cousin", ordinal(*degree)),
            Self::Cousin { degree, removed } => {
                write!(f, "{} Cousin {removed}x removed", ordinal(*degree))
            }
        }
    }
}

/// Classify a step sequence; `gender` is the target person's.
pub fn classify(steps: &[Step], gender: Gender) -> Kinship {
    use Step::{Child as C, Parent as P, Sibling as Sib, Spouse as Sp};

    let term = match steps {
        [] => return Kinship::SamePerson,

        [P] => KinTerm::Parent,
        [C] => KinTerm::Child,
        [Sp] => KinTerm::Spouse,
        [Sib] => KinTerm::Sibling,

        [P, P] => KinTerm::Grandparent,
        [C, C] => KinTerm::Grandchild,
        [P, Sib] => KinTerm::ParentSibling,
        [P, C] | [Sib, Sib] => KinTerm::Sibling,
        [Sib, C] => KinTerm::SiblingChild,
        [Sib, Sp] | [Sp, Sib] => KinTerm::SiblingInLaw,
        [Sp, P] => KinTerm::ParentInLaw,
        [C, Sp] => KinTerm::ChildInLaw,
        [P, Sp] => KinTerm::StepParent,
        [Sp, C] => KinTerm::StepChild,

        [P, P, P] => KinTerm::GreatGrandparent,
        [C, C, C] => KinTerm::GreatGrandchild,
        [P, P, Sib] => KinTerm::GreatParentSibling,
        [P, P, C] => KinTerm::ParentSibling,
        [P, Sib, Sp] => KinTerm::ParentSiblingByMarriage,
        [P, C, C] => KinTerm::SiblingChild,
        [Sib, C, C] => KinTerm::GrandSiblingChild,
        [P, Sib, C] => return Kinship::Cousin { degree: 1, removed: 0 },

        short if short.len() <= 3 => return Kinship::Distant,
        long => return cousin(long),
    };

    Kinship::Relative { term, gender }
}

/// Cousin degree and removal for paths longer than three steps.
///
/// A degree of zero (a single parent step, as in a sibling's grandchild) is
/// reported as a distant relative rather than a "0th Cousin".
fn cousin(steps: &[Step]) -> Kinship {
    let ups = steps.iter().filter(|&&s| s == Step::Parent).count() as u32;
    let downs = steps.iter().filter(|&&s| s == Step::Child).count() as u32;
    if ups == 0 || downs == 0 {
        return Kinship::Distant;
    }

    let degree = ups.min(downs) - 1;
    if degree == 0 {
        return Kinship::Distant;
    }
    Kinship::Cousin {
        degree,
        removed: ups.abs_diff(downs),
    }
}

/// English ordinal: 1st, 2nd, 3rd, 4th, 11th, 12th, 13th, 21st...
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
