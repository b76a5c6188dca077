//! Leafcrop Core - crop editor engine for leaf photo uploads
//!
//! Users frame the diseased part of a leaf in a square crop box before the
//! photo goes to the severity analyzer. This crate holds everything behind
//! that editor that is not rendering: fitting the photo into the editing
//! surface, the drag/resize/zoom geometry of the crop box, pointer gesture
//! handling, and producing the fixed-size encoded crop.
//!
//! # Module Structure
//!
//! - `geometry` - `CropTransformEngine` and its value types
//! - `interaction` - pointer gesture state machine
//! - `decode` - source photo decoding with EXIF orientation
//! - `raster` - mapping the crop back to source pixels and resampling
//! - `encode` - JPEG/PNG output and `data:` URL previews
//! - `session` - one editing session from accepted file to commit/cancel
//! - `config` - editor options

pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod raster;
pub mod session;

pub use config::{ConfigError, CropConfig};
pub use error::{CropError, Result};
pub use geometry::{
    Corner, CropRect, CropTransformEngine, DisplayTransform, ImageMetrics, Point, PointerDelta,
    SourceRegion, Viewport,
};
pub use interaction::{HitTarget, Interaction, InteractionMode};
pub use session::{CropHost, CropOutput, CropSession, SessionState};
