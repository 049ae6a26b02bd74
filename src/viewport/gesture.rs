//! Pointer adapter: tells a click from a drag.
//!
//! A press only turns into a drag once the pointer has travelled further
//! than the configured threshold from where it went down. Until then moves
//! produce no pan, and releasing yields a click. The move that starts a drag
//! pans by the whole travel from the press point, so the content stays under
//! the pointer.

use serde::Serialize;

/// Outcome of releasing the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PointerRelease {
    /// Released without exceeding the drag threshold.
    Click { x: f32, y: f32 },
    /// Released at the end of a drag.
    DragEnd,
    /// Release with no matching press.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Idle,
    Pressed { start_x: f32, start_y: f32 },
    Dragging { last_x: f32, last_y: f32 },
}

/// Click-versus-drag tracker for a single pointer.
#[derive(Debug, Clone)]
pub struct PointerGesture {
    threshold: f32,
    state: State,
}

impl PointerGesture {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            state: State::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, State::Dragging { .. })
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.state = State::Pressed {
            start_x: x,
            start_y: y,
        };
    }

    /// Returns the screen-space pan delta once dragging.
    pub fn pointer_move(&mut self, x: f32, y: f32) -> Option<(f32, f32)> {
        match self.state {
            State::Idle => None,
            State::Pressed { start_x, start_y } => {
                let (dx, dy) = (x - start_x, y - start_y);
                if dx.hypot(dy) <= self.threshold {
                    return None;
                }
                self.state = State::Dragging { last_x: x, last_y: y };
                Some((dx, dy))
            }
            State::Dragging { last_x, last_y } => {
                self.state = State::Dragging { last_x: x, last_y: y };
                Some((x - last_x, y - last_y))
            }
        }
    }

    pub fn pointer_up(&mut self, x: f32, y: f32) -> PointerRelease {
        let release = match self.state {
            State::Idle => PointerRelease::Ignored,
            State::Pressed { .. } => PointerRelease::Click { x, y },
            State::Dragging { .. } => PointerRelease::DragEnd,
        };
        self.state = State::Idle;
        release
    }

    /// Drop any press in progress (pointer left or was cancelled).
    pub fn cancel(&mut self) {
        self.state = State::Idle;
    }
}
