//! R-tree of laid-out person cards using the rstar crate.
//!
//! Provides O(log n) queries for:
//! - Card under a world point (hit testing)
//! - Cards intersecting a world rectangle (visible set)

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::layout::FamilyLayoutResult;

/// One person card: slot plus its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardRect {
    pub slot: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CardRect {
    fn max_x(&self) -> f32 {
        self.x + self.width
    }

    fn max_y(&self) -> f32 {
        self.y + self.height
    }
}

impl RTreeObject for CardRect {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.x, self.y], [self.max_x(), self.max_y()])
    }
}

impl PointDistance for CardRect {
    /// Squared distance to the card's edge; zero inside.
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = (self.x - point[0]).max(0.0).max(point[0] - self.max_x());
        let dy = (self.y - point[1]).max(0.0).max(point[1] - self.max_y());
        dx * dx + dy * dy
    }

    fn contains_point(&self, point: &[f32; 2]) -> bool {
        point[0] >= self.x
            && point[0] <= self.max_x()
            && point[1] >= self.y
            && point[1] <= self.max_y()
    }
}

/// Spatial index over the cards of one layout.
#[derive(Debug, Default)]
pub struct SpatialIndex {
    tree: RTree<CardRect>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk load every card of a computed layout.
    pub fn from_layout(layout: &FamilyLayoutResult) -> Self {
        let (width, height) = (layout.config.card_width, layout.config.card_height);
        let cards = layout
            .positions
            .iter()
            .enumerate()
            .map(|(slot, pos)| CardRect {
                slot,
                x: pos.x,
                y: pos.y,
                width,
                height,
            })
            .collect();
        Self::from_cards(cards)
    }

    /// Bulk load a set of cards.
    pub fn from_cards(cards: Vec<CardRect>) -> Self {
        Self {
            tree: RTree::bulk_load(cards),
        }
    }

    /// Slot of the card containing the world point.
    ///
    /// Cards never overlap for well-formed input; if they do (cyclic data),
    /// the lowest slot wins so the answer is stable.
    pub fn card_at(&self, x: f32, y: f32) -> Option<usize> {
        self.tree
            .locate_all_at_point(&[x, y])
            .map(|card| card.slot)
            .min()
    }

    /// Slots of all cards intersecting the rectangle.
    pub fn in_rect(&self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Vec<usize> {
        let envelope = AABB::from_corners([min_x, min_y], [max_x, max_y]);
        let mut slots: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|card| card.slot)
            .collect();
        slots.sort_unstable();
        slots
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(slot: usize, x: f32, y: f32) -> CardRect {
        CardRect {
            slot,
            x,
            y,
            width: 100.0,
            height: 50.0,
        }
    }

    fn index(cards: &[CardRect]) -> SpatialIndex {
        SpatialIndex::from_cards(cards.to_vec())
    }

    #[test]
    fn test_card_at() {
        let index = index(&[card(0, 0.0, 0.0), card(1, 200.0, 0.0)]);

        assert_eq!(index.card_at(50.0, 25.0), Some(0));
        assert_eq!(index.card_at(250.0, 10.0), Some(1));
        assert_eq!(index.card_at(150.0, 25.0), None, "gap between cards");
        assert_eq!(index.card_at(50.0, 80.0), None, "below the row");
    }

    #[test]
    fn test_in_rect_intersects_partially_covered_cards() {
        let index = index(&[card(0, 0.0, 0.0), card(1, 200.0, 0.0), card(2, 0.0, 200.0)]);

        assert_eq!(index.in_rect(90.0, 10.0, 210.0, 20.0), vec![0, 1]);
        assert_eq!(index.in_rect(-10.0, -10.0, 400.0, 400.0), vec![0, 1, 2]);
        assert!(index.in_rect(500.0, 500.0, 600.0, 600.0).is_empty());
    }

    #[test]
    fn test_card_edges_are_inclusive() {
        let index = index(&[card(0, 0.0, 0.0), card(1, 200.0, 0.0)]);

        assert_eq!(index.card_at(100.0, 50.0), Some(0));
        assert_eq!(index.card_at(200.0, 0.0), Some(1));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_empty() {
        let index = SpatialIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.card_at(0.0, 0.0), None);
    }
}
