//! Pointer gesture state machine for the crop box.
//!
//! A gesture starts on pointer-down over a corner handle (resize) or the crop
//! body (drag) and ends on pointer-up or when the pointer leaves the editing
//! surface. Only one gesture is active at a time; switching between drag and
//! resize always passes through `Idle`.
//!
//! Moves are computed from the pointer position and crop box captured at
//! gesture start, never from the previous move.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::{Corner, CropRect, CropTransformEngine, Point, PointerDelta};

/// What the pointer is currently doing to the crop box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InteractionMode {
    #[default]
    Idle,
    Dragging,
    ResizingFromCorner(Corner),
}

/// Part of the crop box under a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Handle(Corner),
    Body,
}

/// Find what a pointer-down at `point` would grab.
///
/// Handles win over the body, and the nearest handle wins when the crop is
/// small enough for hit areas to overlap.
pub fn hit_test(crop: &CropRect, point: Point, handle_radius: f64) -> Option<HitTarget> {
    let nearest = Corner::ALL
        .into_iter()
        .map(|corner| (corner, crop.corner(corner).distance_to(point)))
        .filter(|&(_, distance)| distance <= handle_radius)
        .min_by(|a, b| a.1.total_cmp(&b.1));

    match nearest {
        Some((corner, _)) => Some(HitTarget::Handle(corner)),
        None if crop.contains(point) => Some(HitTarget::Body),
        None => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct GestureStart {
    pointer: Point,
    crop: CropRect,
}

/// Tracks the active gesture.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    mode: InteractionMode,
    start: Option<GestureStart>,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.mode != InteractionMode::Idle
    }

    /// Begin a gesture if the pointer lands on the crop box.
    ///
    /// Ignored while another gesture is active.
    pub fn pointer_down(&mut self, engine: &CropTransformEngine, point: Point) -> InteractionMode {
        if self.is_active() {
            return self.mode;
        }

        let crop = engine.crop();
        let mode = match hit_test(&crop, point, engine.config().handle_hit_radius) {
            Some(HitTarget::Handle(corner)) => InteractionMode::ResizingFromCorner(corner),
            Some(HitTarget::Body) => InteractionMode::Dragging,
            None => return self.mode,
        };

        debug!(?mode, x = point.x, y = point.y, "gesture started");
        self.mode = mode;
        self.start = Some(GestureStart {
            pointer: point,
            crop,
        });
        mode
    }

    /// Apply the active gesture for the pointer now at `point`.
    ///
    /// Returns `None` when no gesture is active.
    pub fn pointer_move(
        &self,
        engine: &CropTransformEngine,
        point: Point,
    ) -> Option<CropTransformEngine> {
        let start = self.start?;
        let delta = PointerDelta::between(start.pointer, point);

        match self.mode {
            InteractionMode::Idle => None,
            InteractionMode::Dragging => Some(engine.drag(start.crop, delta)),
            InteractionMode::ResizingFromCorner(corner) => {
                Some(engine.resize(corner, start.crop, delta))
            }
        }
    }

    pub fn pointer_up(&mut self) {
        self.end("pointer up");
    }

    pub fn pointer_leave(&mut self) {
        self.end("pointer left surface");
    }

    /// Drop any gesture, e.g. after the engine was rebuilt underneath it.
    pub fn reset(&mut self) {
        self.mode = InteractionMode::Idle;
        self.start = None;
    }

    fn end(&mut self, reason: &str) {
        if self.is_active() {
            debug!(mode = ?self.mode, reason, "gesture ended");
        }
        self.reset();
    }
}
