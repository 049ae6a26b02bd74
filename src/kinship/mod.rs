//! Kinship resolution.
//!
//! Given two persons, finds the shortest relationship path between them and
//! turns it into a human kinship label such as "Grandmother" or
//! "2nd Cousin 1x removed". Cross-tree queries and unconnected persons are
//! answered with a sentinel, not an error.

pub mod label;
pub mod path;

use serde::Serialize;
use tracing::{debug, instrument};

pub use label::{KinTerm, Kinship, Step, classify, ordinal};
pub use path::{KinshipGraph, PathHop};

use crate::error::{ChartError, Result};
use crate::graph::{FamilyGraph, PersonId};

/// Kinship plus the path it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KinshipResult {
    /// Display label (same as `kinship.to_string()`).
    pub label: String,
    pub kinship: Kinship,
    /// Person ids from the first person to the second, inclusive.
    pub path: Vec<PersonId>,
    /// One step per hop along `path`.
    pub steps: Vec<Step>,
}

impl KinshipResult {
    fn sentinel(kinship: Kinship, path: Vec<PersonId>) -> Self {
        Self {
            label: kinship.to_string(),
            kinship,
            path,
            steps: Vec::new(),
        }
    }
}

/// Answers kinship queries against one family graph.
#[derive(Debug, Clone)]
pub struct KinshipResolver<'g> {
    family: &'g FamilyGraph,
    search: KinshipGraph,
}

impl<'g> KinshipResolver<'g> {
    /// Index the graph's relationships for path search.
    pub fn new(family: &'g FamilyGraph) -> Self {
        Self {
            family,
            search: KinshipGraph::build(family),
        }
    }

    /// How `to` is related to `from`, phrased from `from`'s point of view.
    #[instrument(skip_all, fields(from = %from, to = %to))]
    pub fn resolve(&self, from: &PersonId, to: &PersonId) -> Result<KinshipResult> {
        let a = self.slot(from)?;
        let b = self.slot(to)?;

        if a == b {
            return Ok(KinshipResult::sentinel(Kinship::SamePerson, vec![from.clone()]));
        }

        let (pa, pb) = (self.family.person(a), self.family.person(b));
        if !pa.shares_tree_with(pb) {
            debug!("persons belong to different trees");
            return Ok(KinshipResult::sentinel(Kinship::NoRelation, Vec::new()));
        }

        let Some(hops) = self.search.shortest_path(a, b) else {
            debug!("no kinship path");
            return Ok(KinshipResult::sentinel(Kinship::NoRelation, Vec::new()));
        };

        let steps: Vec<Step> = hops.iter().map(|hop| hop.step).collect();
        let kinship = classify(&steps, pb.gender);
        debug!(hops = steps.len(), %kinship, "kinship resolved");

        let mut path = Vec::with_capacity(hops.len() + 1);
        path.push(from.clone());
        path.extend(hops.iter().map(|hop| self.family.person(hop.slot).id.clone()));

        Ok(KinshipResult {
            label: kinship.to_string(),
            kinship,
            path,
            steps,
        })
    }

    /// Label only.
    pub fn label(&self, from: &PersonId, to: &PersonId) -> Result<String> {
        self.resolve(from, to).map(|result| result.label)
    }

    fn slot(&self, id: &PersonId) -> Result<usize> {
        self.family
            .slot_of(id)
            .ok_or_else(|| ChartError::UnknownPerson(id.0.clone()))
    }
}
