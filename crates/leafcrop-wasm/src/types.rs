//! WASM-compatible wrapper types for editor geometry.
//!
//! The crop box and display transform are copied out of the engine as small
//! value objects, so the JS side can redraw the overlay without holding a
//! reference into WASM memory.

use leafcrop_core::geometry::{Corner, CropRect, DisplayTransform};
use leafcrop_core::interaction::InteractionMode;
use wasm_bindgen::prelude::*;

/// The crop box in container coordinates.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsCropRect {
    x: f64,
    y: f64,
    size: f64,
}

#[wasm_bindgen]
impl JsCropRect {
    #[wasm_bindgen(getter)]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Side length of the square box
    #[wasm_bindgen(getter)]
    pub fn size(&self) -> f64 {
        self.size
    }
}

impl From<CropRect> for JsCropRect {
    fn from(rect: CropRect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            size: rect.size,
        }
    }
}

/// Where the scaled photo sits in the container.
///
/// Draw the photo at `(offsetX, offsetY)` with size
/// `imageWidth * scale` by `imageHeight * scale`.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsDisplayTransform {
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

#[wasm_bindgen]
impl JsDisplayTransform {
    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[wasm_bindgen(getter, js_name = offsetX)]
    pub fn offset_x(&self) -> f64 {
        self.offset_x
    }

    #[wasm_bindgen(getter, js_name = offsetY)]
    pub fn offset_y(&self) -> f64 {
        self.offset_y
    }
}

impl From<DisplayTransform> for JsDisplayTransform {
    fn from(transform: DisplayTransform) -> Self {
        Self {
            scale: transform.scale,
            offset_x: transform.offset_x,
            offset_y: transform.offset_y,
        }
    }
}

/// Name of the gesture in progress, as reported to JS.
pub(crate) fn mode_name(mode: InteractionMode) -> &'static str {
    match mode {
        InteractionMode::Idle => "idle",
        InteractionMode::Dragging => "dragging",
        InteractionMode::ResizingFromCorner(Corner::TopLeft) => "resize-top-left",
        InteractionMode::ResizingFromCorner(Corner::TopRight) => "resize-top-right",
        InteractionMode::ResizingFromCorner(Corner::BottomLeft) => "resize-bottom-left",
        InteractionMode::ResizingFromCorner(Corner::BottomRight) => "resize-bottom-right",
    }
}
