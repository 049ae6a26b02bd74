//! Family tree layout.
//!
//! Places every person card on a grid of generation rows so that couples sit
//! side by side, children are centered beneath their parents, and no two
//! cards overlap (for acyclic input).
//!
//! # Algorithm Overview
//!
//! 1. **Group:** build family units (couples first, then single parents) and
//!    join units that share a parent into one group per row of spouses.
//! 2. **Rank:** infer a generation per person.
//! 3. **Measure (bottom-up, memoized):** a group is as wide as the wider of
//!    its row of parents and the sum of its children's subtree widths plus
//!    gaps. A child that is itself a parent contributes its own group's width.
//!    A group met again while still being measured (cyclic data) contributes
//!    a single card width instead of recursing.
//! 4. **Place (top-down):** root groups (whose parents have no recorded
//!    parents) are laid out left to right. Each group centers its parents in
//!    its span and spreads its children beneath, recursing into child groups.
//!    Groups and persons not reached from a root are appended afterwards.
//! 5. **Normalize:** shift everything so the minimum x and y are zero.
//!
//! Every person is placed exactly once; later attempts to place an already
//! placed person leave its reserved span empty.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::connectors::Connector;
use super::family_units::FamilyUnits;
use super::generations::{DEFAULT_MAX_PASSES, Generations};
use crate::graph::{FamilyGraph, Gender};

/// Configuration for the family tree layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Width of a person card.
    pub card_width: f32,
    /// Height of a person card.
    pub card_height: f32,
    /// Horizontal space between sibling subtrees.
    pub horizontal_gap: f32,
    /// Vertical space between generation rows.
    pub vertical_gap: f32,
    /// Horizontal space between the two cards of a couple.
    pub couple_gap: f32,
    /// Bound on spouse re-seed passes during generation inference.
    pub max_generation_passes: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            card_width: 180.0,
            card_height: 80.0,
            horizontal_gap: 40.0,
            vertical_gap: 80.0,
            couple_gap: 20.0,
            max_generation_passes: DEFAULT_MAX_PASSES,
        }
    }
}

impl LayoutConfig {
    /// Distance between the tops of two consecutive generation rows.
    #[inline]
    pub fn row_height(&self) -> f32 {
        self.card_height + self.vertical_gap
    }

    /// Width of two cards joined as a couple.
    #[inline]
    pub fn couple_width(&self) -> f32 {
        2.0 * self.card_width + self.couple_gap
    }
}

/// Top-left corner of a person card.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutPosition {
    pub x: f32,
    pub y: f32,
}

/// Result of the family tree layout computation.
#[derive(Debug, Clone)]
pub struct FamilyLayoutResult {
    /// Card position per person slot.
    pub positions: Vec<LayoutPosition>,
    /// Generation per person slot.
    pub generations: Generations,
    /// Family units the layout was built from.
    pub units: FamilyUnits,
    /// Total content width after normalization.
    pub width: f32,
    /// Total content height after normalization.
    pub height: f32,
    /// Number of times the cycle guard substituted a fallback width.
    pub fallback_widths: usize,
    /// Configuration used.
    pub config: LayoutConfig,
}

/// One node of the serialized layout handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNodeView {
    pub id: String,
    pub name: String,
    pub gender: Gender,
    pub is_living: bool,
    pub x: f32,
    pub y: f32,
    pub generation: u32,
}

/// Serialized layout: nodes, connectors and content size.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSnapshot {
    pub width: f32,
    pub height: f32,
    pub card_width: f32,
    pub card_height: f32,
    pub nodes: Vec<LayoutNodeView>,
    pub connectors: Vec<Connector>,
}

impl FamilyLayoutResult {
    /// Position of a slot.
    #[inline]
    pub fn position(&self, slot: usize) -> LayoutPosition {
        self.positions[slot]
    }

    /// Positions as a flat `[x0, y0, x1, y1, ...]` buffer in slot order.
    pub fn interleaved_positions(&self) -> Vec<f32> {
        let mut buffer = Vec::with_capacity(self.positions.len() * 2);
        for pos in &self.positions {
            buffer.push(pos.x);
            buffer.push(pos.y);
        }
        buffer
    }

    /// Bundle positions, person display data and connectors for rendering.
    pub fn to_snapshot(&self, graph: &FamilyGraph) -> LayoutSnapshot {
        let nodes = self
            .positions
            .iter()
            .enumerate()
            .map(|(slot, pos)| {
                let person = graph.person(slot);
                LayoutNodeView {
                    id: person.id.0.clone(),
                    name: person.display_name(),
                    gender: person.gender,
                    is_living: person.is_living,
                    x: pos.x,
                    y: pos.y,
                    generation: self.generations.get(slot),
                }
            })
            .collect();

        LayoutSnapshot {
            width: self.width,
            height: self.height,
            card_width: self.config.card_width,
            card_height: self.config.card_height,
            nodes,
            connectors: self.connectors(),
        }
    }
}

/// The family tree layout engine.
pub struct FamilyTreeLayout {
    config: LayoutConfig,
}

impl FamilyTreeLayout {
    /// Create a new layout with the given configuration.
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Create a layout with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(LayoutConfig::default())
    }

    /// The configuration in use.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Compute positions for every person in the graph.
    #[instrument(skip_all, fields(persons = graph.len()))]
    pub fn compute(&self, graph: &FamilyGraph) -> FamilyLayoutResult {
        let units = FamilyUnits::build(graph);
        let generations = Generations::assign(graph, self.config.max_generation_passes);

        let mut placer = Placer::new(graph, &units, &generations, &self.config);
        placer.run();

        let fallback_widths = placer.fallback_widths;
        let mut positions: Vec<LayoutPosition> = placer
            .positions
            .into_iter()
            .map(|pos| pos.unwrap_or_default())
            .collect();

        let (width, height) = normalize(&mut positions, &self.config);

        debug!(
            width,
            height,
            rows = generations.max_generation() + 1,
            fallback_widths,
            "family tree layout computed"
        );

        FamilyLayoutResult {
            positions,
            generations,
            units,
            width,
            height,
            fallback_widths,
            config: self.config.clone(),
        }
    }
}

/// Translate positions so the minimum x and y are zero; return content size.
fn normalize(positions: &mut [LayoutPosition], config: &LayoutConfig) -> (f32, f32) {
    if positions.is_empty() {
        return (0.0, 0.0);
    }

    let min_x = positions.iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
    let min_y = positions.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);

    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for pos in positions.iter_mut() {
        pos.x -= min_x;
        pos.y -= min_y;
        max_x = max_x.max(pos.x);
        max_y = max_y.max(pos.y);
    }

    (max_x + config.card_width, max_y + config.card_height)
}

/// Working state for one layout computation.
///
/// Widths and placement are tracked per unit group, so a person with several
/// marriages is measured and placed once with all of their couples.
struct Placer<'a> {
    graph: &'a FamilyGraph,
    units: &'a FamilyUnits,
    generations: &'a Generations,
    config: &'a LayoutConfig,
    /// Memoized group widths.
    widths: Vec<Option<f32>>,
    /// Groups whose width is currently being measured.
    measuring: Vec<bool>,
    /// Groups already placed.
    placed_groups: Vec<bool>,
    /// Card position per slot, once placed.
    positions: Vec<Option<LayoutPosition>>,
    fallback_widths: usize,
}

impl<'a> Placer<'a> {
    fn new(
        graph: &'a FamilyGraph,
        units: &'a FamilyUnits,
        generations: &'a Generations,
        config: &'a LayoutConfig,
    ) -> Self {
        let groups = units.groups().len();
        Self {
            graph,
            units,
            generations,
            config,
            widths: vec![None; groups],
            measuring: vec![false; groups],
            placed_groups: vec![false; groups],
            positions: vec![None; graph.len()],
            fallback_widths: 0,
        }
    }

    fn run(&mut self) {
        let row = self.config.row_height();
        let spacing = 2.0 * self.config.horizontal_gap;
        let group_count = self.units.groups().len();
        let mut cursor = 0.0f32;

        // Independent roots: every parent lacks recorded parents.
        for g in 0..group_count {
            let is_root = self
                .units
                .group(g)
                .row
                .iter()
                .all(|&p| self.graph.parents(p).is_empty());
            if is_root && !self.placed_groups[g] {
                let y = self.group_row(g) as f32 * row;
                let width = self.group_width(g);
                self.place_group(g, cursor, y);
                cursor += width + spacing;
            }
        }

        // Groups not reached from a root (cycles, fragments).
        for g in 0..group_count {
            if !self.placed_groups[g] {
                let y = self.group_row(g) as f32 * row;
                let width = self.group_width(g);
                self.place_group(g, cursor, y);
                cursor += width + spacing;
            }
        }

        // Persons in no unit at all.
        for slot in 0..self.graph.len() {
            if self.positions[slot].is_none() {
                let y = self.generations.get(slot) as f32 * row;
                let width = self.leaf_width(slot);
                self.place_leaf(slot, cursor, y);
                cursor += width + spacing;
            }
        }
    }

    /// Generation row of a group's first parent.
    fn group_row(&self, g: usize) -> u32 {
        self.units
            .group(g)
            .row
            .first()
            .map(|&p| self.generations.get(p))
            .unwrap_or(0)
    }

    fn is_placed(&self, slot: usize) -> bool {
        self.positions[slot].is_some()
    }

    /// Width of a group's row of parent cards.
    fn parents_width(&self, g: usize) -> f32 {
        let cards = self.units.group(g).row.len().max(1) as f32;
        cards * self.config.card_width + (cards - 1.0) * self.config.couple_gap
    }

    /// Card width, or a couple's width if the person has an unplaced spouse.
    fn leaf_width(&self, slot: usize) -> f32 {
        let has_free_spouse = self
            .graph
            .spouses(slot)
            .iter()
            .any(|&s| !self.is_placed(s));
        if has_free_spouse {
            self.config.couple_width()
        } else {
            self.config.card_width
        }
    }

    /// Span a child occupies beneath its parents.
    fn child_width(&mut self, child: usize) -> f32 {
        match self.units.group_of_parent(child) {
            Some(g) => self.group_width(g),
            None => self.leaf_width(child),
        }
    }

    /// Subtree width of a group (memoized, cycle guarded).
    fn group_width(&mut self, g: usize) -> f32 {
        if let Some(width) = self.widths[g] {
            return width;
        }
        if self.measuring[g] {
            self.fallback_widths += 1;
            debug!(group = g, "cycle while measuring family group; using fallback width");
            return self.config.card_width;
        }
        self.measuring[g] = true;

        let width = self.parents_width(g).max(self.children_span(g));

        self.measuring[g] = false;
        self.widths[g] = Some(width);
        width
    }

    /// Sum of child widths across the group's units plus gaps between them.
    fn children_span(&mut self, g: usize) -> f32 {
        let units = self.units;
        let mut total = 0.0f32;
        let mut count = 0usize;
        for &u in &units.group(g).units {
            for &child in &units.unit(u).children {
                total += self.child_width(child);
                count += 1;
            }
        }
        if count == 0 {
            return 0.0;
        }
        total + (count - 1) as f32 * self.config.horizontal_gap
    }

    /// Place a group with its span starting at `x` and parents on row `y`.
    ///
    /// Parents are centered in the span in row order. Children follow unit
    /// order, so each couple's children sit beneath that couple.
    fn place_group(&mut self, g: usize, x: f32, y: f32) {
        if self.placed_groups[g] {
            return;
        }
        self.placed_groups[g] = true;

        let width = self.group_width(g);
        let units = self.units;
        let group = units.group(g);

        let mut px = x + (width - self.parents_width(g)) / 2.0;
        for &parent in &group.row {
            if !self.is_placed(parent) {
                self.positions[parent] = Some(LayoutPosition { x: px, y });
            }
            px += self.config.card_width + self.config.couple_gap;
        }

        let child_y = y + self.config.row_height();
        let span = self.children_span(g);
        let mut cx = x + (width - span) / 2.0;
        for &u in &group.units {
            for &child in &units.unit(u).children {
                let child_width = self.child_width(child);
                if !self.is_placed(child) {
                    match units.group_of_parent(child) {
                        Some(child_group) if !self.placed_groups[child_group] => {
                            self.place_group(child_group, cx, child_y);
                        }
                        _ => self.place_leaf(child, cx, child_y),
                    }
                }
                cx += child_width + self.config.horizontal_gap;
            }
        }
    }

    /// Place a single person, and an unplaced spouse beside them if any.
    fn place_leaf(&mut self, slot: usize, x: f32, y: f32) {
        if self.is_placed(slot) {
            return;
        }
        self.positions[slot] = Some(LayoutPosition { x, y });

        let free_spouse = self
            .graph
            .spouses(slot)
            .iter()
            .copied()
            .find(|&s| !self.is_placed(s));
        if let Some(spouse) = free_spouse {
            self.positions[spouse] = Some(LayoutPosition {
                x: x + self.config.card_width + self.config.couple_gap,
                y,
            });
        }
    }
}
