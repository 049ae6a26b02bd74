//! Connector geometry for rendering lines between cards.
//!
//! - **Couple connector:** a horizontal segment between the facing edges of
//!   the two cards, at mid-card height.
//! - **Family connector:** a stem dropping from below the parent(s) to a
//!   horizontal bus halfway between the parent row and the child row, then
//!   one vertical drop from the bus to each child's top-center.

use serde::Serialize;

use super::family_tree::{FamilyLayoutResult, LayoutPosition};

/// A straight line segment in layout space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Segment {
    #[inline]
    fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

/// Drop line from the bus to one child.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChildDrop {
    pub child: usize,
    pub segment: Segment,
}

/// A renderable connector.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Connector {
    Couple {
        left: usize,
        right: usize,
        segment: Segment,
    },
    Family {
        unit: usize,
        stem: Segment,
        bus: Segment,
        drops: Vec<ChildDrop>,
    },
}

impl FamilyLayoutResult {
    /// Derive couple and parent-to-children connectors from the layout.
    pub fn connectors(&self) -> Vec<Connector> {
        let card_w = self.config.card_width;
        let card_h = self.config.card_height;
        let mut connectors = Vec::new();

        for (u, unit) in self.units.units().iter().enumerate() {
            let anchor = match unit.parents.as_slice() {
                &[a, b] => {
                    let (left, right) = ordered(a, b, &self.positions);
                    let (lp, rp) = (self.positions[left], self.positions[right]);
                    if lp.y == rp.y && rp.x > lp.x + card_w {
                        let mid_y = lp.y + card_h / 2.0;
                        connectors.push(Connector::Couple {
                            left,
                            right,
                            segment: Segment::new(lp.x + card_w, mid_y, rp.x, mid_y),
                        });
                        ((lp.x + card_w + rp.x) / 2.0, lp.y + card_h)
                    } else {
                        // Not adjacent (branching marriages or cyclic data): hang from the first parent.
                        (lp.x + card_w / 2.0, lp.y + card_h)
                    }
                }
                &[p] => {
                    let pos = self.positions[p];
                    (pos.x + card_w / 2.0, pos.y + card_h)
                }
                _ => continue,
            };

            if unit.children.is_empty() {
                continue;
            }

            let (anchor_x, parent_bottom) = anchor;
            let child_top = unit
                .children
                .iter()
                .map(|&c| self.positions[c].y)
                .fold(f32::INFINITY, f32::min);
            let bus_y = (parent_bottom + child_top) / 2.0;

            let mut bus_min = anchor_x;
            let mut bus_max = anchor_x;
            let drops: Vec<ChildDrop> = unit
                .children
                .iter()
                .map(|&child| {
                    let pos = self.positions[child];
                    let cx = pos.x + card_w / 2.0;
                    bus_min = bus_min.min(cx);
                    bus_max = bus_max.max(cx);
                    ChildDrop {
                        child,
                        segment: Segment::new(cx, bus_y, cx, pos.y),
                    }
                })
                .collect();

            connectors.push(Connector::Family {
                unit: u,
                stem: Segment::new(anchor_x, parent_bottom, anchor_x, bus_y),
                bus: Segment::new(bus_min, bus_y, bus_max, bus_y),
                drops,
            });
        }

        connectors
    }
}

/// Order two slots left to right by x.
fn ordered(a: usize, b: usize, positions: &[LayoutPosition]) -> (usize, usize) {
    if positions[a].x <= positions[b].x {
        (a, b)
    } else {
        (b, a)
    }
}
