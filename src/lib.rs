//! Family Chart - WASM Module
//!
//! This module provides the genealogy graph model, family tree layout and
//! kinship resolution for the Family Chart viewer. It is compiled to
//! WebAssembly and exposes a JavaScript-friendly API via wasm-bindgen.
//!
//! # Architecture
//!
//! - `graph`: Person/relationship records and the index-arena family graph
//! - `layout`: Family units, generation inference, card placement, connectors
//! - `kinship`: Shortest relationship path and kinship labels
//! - `viewport`: Pan/zoom/fit math and the click-vs-drag pointer adapter
//! - `spatial`: R-tree spatial indexing of cards for O(log n) hit testing
//!
//! All computation is synchronous and pure over the loaded snapshot.

use js_sys::Float32Array;
use wasm_bindgen::prelude::*;

pub mod error;
pub mod graph;
pub mod kinship;
pub mod layout;
pub mod spatial;
pub mod viewport;

use error::ChartError;
use graph::{FamilyGraph, Person, PersonId, Relationship};
use kinship::{KinshipResolver, KinshipResult};
use layout::generations::Generations;
use layout::{FamilyLayoutResult, FamilyTreeLayout, LayoutConfig};
use spatial::SpatialIndex;
use viewport::{PointerGesture, PointerRelease, ViewportConfig, ViewportTransform};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
        web_sys::console::log_1(&"family-chart-wasm initialized".into());
    }
}

/// Main entry point for the family chart.
///
/// Holds one loaded snapshot, its most recent layout and the viewport state.
/// The plain Rust methods are the core API; the `#[wasm_bindgen]` methods
/// convert to and from JavaScript values around them.
#[wasm_bindgen]
pub struct FamilyChartWasm {
    graph: FamilyGraph,
    layout: Option<FamilyLayoutResult>,
    spatial: SpatialIndex,
    viewport: ViewportTransform,
    viewport_config: ViewportConfig,
    gesture: PointerGesture,
}

impl FamilyChartWasm {
    /// Replace the snapshot; drops any previous layout.
    pub fn load(&mut self, people: Vec<Person>, relationships: &[Relationship]) {
        self.graph = FamilyGraph::from_snapshot(people, relationships);
        self.layout = None;
        self.spatial = SpatialIndex::new();
    }

    pub fn graph(&self) -> &FamilyGraph {
        &self.graph
    }

    /// Lay out the loaded snapshot and index the cards for hit testing.
    pub fn layout_with(&mut self, config: LayoutConfig) -> &FamilyLayoutResult {
        let result = FamilyTreeLayout::new(config).compute(&self.graph);
        self.spatial = SpatialIndex::from_layout(&result);
        self.layout.insert(result)
    }

    pub fn layout(&self) -> error::Result<&FamilyLayoutResult> {
        self.layout.as_ref().ok_or(ChartError::NoLayout)
    }

    pub fn kinship_of(&self, from: &str, to: &str) -> error::Result<KinshipResult> {
        KinshipResolver::new(&self.graph).resolve(&PersonId::from(from), &PersonId::from(to))
    }

    /// Generation of a person, from the current layout or inferred on demand.
    pub fn generation_of(&self, id: &str) -> error::Result<u32> {
        let slot = self.slot(id)?;
        match &self.layout {
            Some(layout) => Ok(layout.generations.get(slot)),
            None => Ok(Generations::assign(
                &self.graph,
                LayoutConfig::default().max_generation_passes,
            )
            .get(slot)),
        }
    }

    pub fn fit(&mut self, viewport_w: f32, viewport_h: f32) -> error::Result<()> {
        let (width, height) = {
            let layout = self.layout()?;
            (layout.width, layout.height)
        };
        self.viewport
            .fit_to_view(viewport_w, viewport_h, width, height, &self.viewport_config);
        Ok(())
    }

    /// Center the viewport on a person's card.
    pub fn center_on_person(
        &mut self,
        id: &str,
        viewport_w: f32,
        viewport_h: f32,
    ) -> error::Result<()> {
        let slot = self.slot(id)?;
        let layout = self.layout()?;
        let pos = layout.position(slot);
        let cx = pos.x + layout.config.card_width / 2.0;
        let cy = pos.y + layout.config.card_height / 2.0;
        self.viewport.center_on(cx, cy, viewport_w, viewport_h);
        Ok(())
    }

    /// Person whose card is under a screen point.
    pub fn person_at_screen(
        &self,
        screen_x: f32,
        screen_y: f32,
    ) -> error::Result<Option<&PersonId>> {
        self.layout()?;
        let (x, y) = self.viewport.screen_to_world(screen_x, screen_y);
        Ok(self
            .spatial
            .card_at(x, y)
            .map(|slot| &self.graph.person(slot).id))
    }

    /// Persons whose cards intersect the visible viewport.
    pub fn visible_persons(
        &self,
        viewport_w: f32,
        viewport_h: f32,
    ) -> error::Result<Vec<&PersonId>> {
        self.layout()?;
        let rect = self.viewport.visible_world_rect(viewport_w, viewport_h);
        Ok(self
            .spatial
            .in_rect(rect.min_x, rect.min_y, rect.max_x, rect.max_y)
            .into_iter()
            .map(|slot| &self.graph.person(slot).id)
            .collect())
    }

    /// Feed a pointer release; a click resolves to the person under it.
    pub fn release_pointer(&mut self, x: f32, y: f32) -> Option<&PersonId> {
        match self.gesture.pointer_up(x, y) {
            PointerRelease::Click { x, y } => self.person_at_screen(x, y).ok().flatten(),
            PointerRelease::DragEnd | PointerRelease::Ignored => None,
        }
    }

    pub fn viewport(&self) -> &ViewportTransform {
        &self.viewport
    }

    fn slot(&self, id: &str) -> error::Result<usize> {
        self.graph
            .slot_of(&PersonId::from(id))
            .ok_or_else(|| ChartError::UnknownPerson(id.to_string()))
    }
}

fn js_error(err: impl std::fmt::Display) -> JsError {
    JsError::new(&err.to_string())
}

#[wasm_bindgen]
impl FamilyChartWasm {
    /// Create an empty chart with default viewport settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let viewport_config = ViewportConfig::default();
        Self {
            graph: FamilyGraph::new(),
            layout: None,
            spatial: SpatialIndex::new(),
            viewport: ViewportTransform::new(),
            gesture: PointerGesture::new(viewport_config.drag_threshold),
            viewport_config,
        }
    }

    /// Replace the viewport limits. Missing fields keep their defaults.
    #[wasm_bindgen(js_name = setViewportConfig)]
    pub fn set_viewport_config(&mut self, config: JsValue) -> Result<(), JsError> {
        let config: ViewportConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| js_error(ChartError::InvalidSnapshot(e.to_string())))?;
        self.gesture = PointerGesture::new(config.drag_threshold);
        self.viewport_config = config;
        Ok(())
    }

    // =========================================================================
    // Snapshot & Layout
    // =========================================================================

    /// Load people and relationships (arrays of plain objects).
    #[wasm_bindgen(js_name = loadSnapshot)]
    pub fn load_snapshot(
        &mut self,
        people: JsValue,
        relationships: JsValue,
    ) -> Result<(), JsError> {
        let people: Vec<Person> = serde_wasm_bindgen::from_value(people)
            .map_err(|e| js_error(ChartError::InvalidSnapshot(e.to_string())))?;
        let relationships: Vec<Relationship> = serde_wasm_bindgen::from_value(relationships)
            .map_err(|e| js_error(ChartError::InvalidSnapshot(e.to_string())))?;
        self.load(people, &relationships);
        Ok(())
    }

    /// Number of persons in the loaded snapshot.
    #[wasm_bindgen(js_name = personCount)]
    pub fn person_count(&self) -> usize {
        self.graph.len()
    }

    /// Person ids in slot order (the order of `positionsBuffer`).
    #[wasm_bindgen(js_name = personIds)]
    pub fn person_ids(&self) -> Vec<String> {
        self.graph.persons().iter().map(|p| p.id.0.clone()).collect()
    }

    /// Compute the layout. `config` may be undefined for defaults.
    ///
    /// Returns `{ width, height, cardWidth, cardHeight, nodes, connectors }`.
    #[wasm_bindgen(js_name = computeLayout)]
    pub fn compute_layout(&mut self, config: JsValue) -> Result<JsValue, JsError> {
        let config: LayoutConfig = if config.is_undefined() || config.is_null() {
            LayoutConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| js_error(ChartError::InvalidSnapshot(e.to_string())))?
        };
        self.layout_with(config);
        let snapshot = self.layout().map_err(js_error)?.to_snapshot(&self.graph);
        serde_wasm_bindgen::to_value(&snapshot).map_err(js_error)
    }

    /// Card positions as [x0, y0, x1, y1, ...] in slot order.
    #[wasm_bindgen(js_name = positionsBuffer)]
    pub fn positions_buffer(&self) -> Result<Float32Array, JsError> {
        let positions = self.layout().map_err(js_error)?.interleaved_positions();
        Ok(Float32Array::from(&positions[..]))
    }

    /// Generation row of a person.
    #[wasm_bindgen(js_name = generation)]
    pub fn generation(&self, id: &str) -> Result<u32, JsError> {
        self.generation_of(id).map_err(js_error)
    }

    // =========================================================================
    // Kinship
    // =========================================================================

    /// Kinship label of `to` as seen from `from`.
    #[wasm_bindgen(js_name = kinship)]
    pub fn kinship(&self, from: &str, to: &str) -> Result<String, JsError> {
        self.kinship_of(from, to)
            .map(|result| result.label)
            .map_err(js_error)
    }

    /// Kinship with the path and steps it was derived from.
    #[wasm_bindgen(js_name = kinshipDetails)]
    pub fn kinship_details(&self, from: &str, to: &str) -> Result<JsValue, JsError> {
        let result = self.kinship_of(from, to).map_err(js_error)?;
        serde_wasm_bindgen::to_value(&result).map_err(js_error)
    }

    // =========================================================================
    // Viewport
    // =========================================================================

    #[wasm_bindgen(js_name = fitToView)]
    pub fn fit_to_view(
        &mut self,
        viewport_w: f32,
        viewport_h: f32,
    ) -> Result<(), JsError> {
        self.fit(viewport_w, viewport_h).map_err(js_error)
    }

    #[wasm_bindgen(js_name = zoomAt)]
    pub fn zoom_at(&mut self, cursor_x: f32, cursor_y: f32, factor: f32) {
        self.viewport
            .zoom_at(cursor_x, cursor_y, factor, &self.viewport_config);
    }

    #[wasm_bindgen(js_name = panBy)]
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.viewport.pan_by(dx, dy);
    }

    #[wasm_bindgen(js_name = centerOn)]
    pub fn center_on(
        &mut self,
        id: &str,
        viewport_w: f32,
        viewport_h: f32,
    ) -> Result<(), JsError> {
        self.center_on_person(id, viewport_w, viewport_h)
            .map_err(js_error)
    }

    #[wasm_bindgen(js_name = resetView)]
    pub fn reset_view(&mut self) {
        self.viewport.reset();
    }

    /// Current `{ translateX, translateY, scale }`.
    #[wasm_bindgen(js_name = transform)]
    pub fn transform(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.viewport).map_err(js_error)
    }

    // =========================================================================
    // Pointer & Hit Testing
    // =========================================================================

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.gesture.pointer_down(x, y);
    }

    /// Returns true when the move panned the view.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        match self.gesture.pointer_move(x, y) {
            Some((dx, dy)) => {
                self.viewport.pan_by(dx, dy);
                true
            }
            None => false,
        }
    }

    /// Returns the clicked person's id, or undefined after a drag.
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, x: f32, y: f32) -> Option<String> {
        self.release_pointer(x, y).map(|id| id.0.clone())
    }

    #[wasm_bindgen(js_name = pointerCancel)]
    pub fn pointer_cancel(&mut self) {
        self.gesture.cancel();
    }

    /// Person under a screen point.
    #[wasm_bindgen(js_name = personAt)]
    pub fn person_at(
        &self,
        screen_x: f32,
        screen_y: f32,
    ) -> Result<Option<String>, JsError> {
        self.person_at_screen(screen_x, screen_y)
            .map(|id| id.map(|id| id.0.clone()))
            .map_err(js_error)
    }

    /// Ids of persons visible in a viewport of the given size.
    #[wasm_bindgen(js_name = visiblePersons)]
    pub fn visible_persons_js(
        &self,
        viewport_w: f32,
        viewport_h: f32,
    ) -> Result<Vec<String>, JsError> {
        self.visible_persons(viewport_w, viewport_h)
            .map(|ids| ids.into_iter().map(|id| id.0.clone()).collect())
            .map_err(js_error)
    }
}

impl Default for FamilyChartWasm {
    fn default() -> Self {
        Self::new()
    }
}
