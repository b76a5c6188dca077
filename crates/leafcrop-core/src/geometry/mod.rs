//! Crop geometry: photo placement, the square crop box, drag/resize/zoom.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner of the editing container
//! - Lengths are display pixels; the source photo is drawn at
//!   `scale` display pixels per source pixel
//! - The crop box is always square and always inside the displayed photo

mod engine;
mod types;

pub use engine::CropTransformEngine;
pub use types::{
    Bounds, Corner, CropRect, DisplayTransform, ImageMetrics, Point, PointerDelta, SourceRegion,
    Viewport,
};
