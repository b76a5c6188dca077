//! The crop transform engine.
//!
//! Three coordinate spaces are involved:
//!
//! - **source**: native pixels of the decoded photo
//! - **display**: source scaled by `DisplayTransform::scale`
//! - **viewport**: display shifted by the transform offset so the photo is
//!   centered in the editing surface; the crop box lives here
//!
//! The engine is a plain value. Every operation returns a new engine and the
//! host keeps whichever one it wants to render. After every operation the
//! crop box is square, at least `min_crop_size`, at most the shorter side of
//! the displayed photo, and fully inside the displayed photo.
//!
//! # Example
//!
//! ```ignore
//! let engine = CropTransformEngine::new(
//!     ImageMetrics::new(1000, 800),
//!     Viewport::new(500.0, 500.0),
//!     &CropConfig::default(),
//! )?;
//! assert_eq!(engine.crop(), CropRect::new(194.0, 194.0, 112.0));
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{
    clamp_span, Bounds, Corner, CropRect, DisplayTransform, ImageMetrics, PointerDelta,
    SourceRegion, Viewport,
};
use crate::config::CropConfig;
use crate::error::{CropError, Result};

/// Slack allowed when checking invariants, in display pixels.
const INVARIANT_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropTransformEngine {
    image: ImageMetrics,
    viewport: Viewport,
    transform: DisplayTransform,
    crop: CropRect,
    min_scale: f64,
    max_scale: f64,
    config: CropConfig,
}

impl CropTransformEngine {
    /// Fit the photo into the viewport and center a default crop on it.
    ///
    /// The photo is shown at `min(containerW / imageW, containerH / imageH, 1)`
    /// so it is never upscaled on load, unless that would drop below the
    /// minimum scale. The initial crop covers `target_size` source pixels.
    pub fn new(image: ImageMetrics, viewport: Viewport, config: &CropConfig) -> Result<Self> {
        if image.is_empty() || !viewport.is_usable() {
            return Err(CropError::InvalidDimensions {
                image_width: image.width,
                image_height: image.height,
                container_width: viewport.width,
                container_height: viewport.height,
            });
        }

        let target = config.target_size as f64;
        let min_scale = (target / image.min_side()).max(config.min_scale_floor);
        let max_scale = config.max_scale.max(min_scale);

        let fit_scale = (viewport.width / image.width as f64)
            .min(viewport.height / image.height as f64)
            .min(1.0);
        let scale = clamp_span(fit_scale, min_scale, max_scale);

        let transform = DisplayTransform::centered(image, viewport, scale);
        let bounds = transform.image_bounds(image);

        let size = clamp_span(target * scale, config.min_crop_size, bounds.min_side());
        let crop = CropRect::new(
            bounds.left + (bounds.width() - size) / 2.0,
            bounds.top + (bounds.height() - size) / 2.0,
            size,
        );

        debug!(
            image_width = image.width,
            image_height = image.height,
            scale,
            min_scale,
            crop_size = size,
            "initialized crop engine"
        );

        let engine = Self {
            image,
            viewport,
            transform,
            crop,
            min_scale,
            max_scale,
            config: *config,
        };
        debug_assert!(engine.check_invariants().is_ok(), "{:?}", engine.check_invariants());
        Ok(engine)
    }

    pub fn image(&self) -> ImageMetrics {
        self.image
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn transform(&self) -> DisplayTransform {
        self.transform
    }

    pub fn crop(&self) -> CropRect {
        self.crop
    }

    pub fn scale(&self) -> f64 {
        self.transform.scale
    }

    pub fn min_scale(&self) -> f64 {
        self.min_scale
    }

    pub fn max_scale(&self) -> f64 {
        self.max_scale
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    /// Rectangle of the displayed photo in viewport coordinates.
    pub fn image_bounds(&self) -> Bounds {
        self.transform.image_bounds(self.image)
    }

    pub fn can_zoom_in(&self) -> bool {
        self.transform.scale < self.max_scale
    }

    pub fn can_zoom_out(&self) -> bool {
        self.transform.scale > self.min_scale
    }

    /// Re-initialize for a new container size.
    ///
    /// The crop is recentered, not carried over.
    pub fn resize_viewport(&self, viewport: Viewport) -> Result<Self> {
        Self::new(self.image, viewport, &self.config)
    }

    /// Translate the crop box from its gesture-start position.
    ///
    /// `delta` is the cumulative pointer movement since `start` was captured,
    /// so repeated moves never accumulate clamping error.
    #[must_use]
    pub fn drag(&self, start: CropRect, delta: PointerDelta) -> Self {
        self.with_crop(start.x + delta.dx, start.y + delta.dy, start.size)
    }

    /// Resize the crop box by dragging `corner`, pinning the opposite corner.
    ///
    /// The candidate box is squared to its shorter side and clamped to
    /// `[min_crop_size, shorter side of the displayed photo]`. If the pinned
    /// corner would then push the box off the photo, the box is shifted back
    /// inside and keeps its size; squareness and size win over the pin.
    #[must_use]
    pub fn resize(&self, corner: Corner, start: CropRect, delta: PointerDelta) -> Self {
        let width = if corner.moves_left_edge() {
            start.size - delta.dx
        } else {
            start.size + delta.dx
        };
        let height = if corner.moves_top_edge() {
            start.size - delta.dy
        } else {
            start.size + delta.dy
        };

        let size = self.clamp_size(width.min(height));
        if size == start.size {
            return self.with_crop(start.x, start.y, size);
        }

        let pinned = start.corner(corner.opposite());
        let x = if corner.moves_left_edge() {
            pinned.x - size
        } else {
            pinned.x
        };
        let y = if corner.moves_top_edge() {
            pinned.y - size
        } else {
            pinned.y
        };

        self.with_crop(x, y, size)
    }

    /// Zoom to `requested` scale, keeping the crop over the same part of the photo.
    ///
    /// The scale is clamped to `[min_scale, max_scale]`. The photo stays
    /// centered in the viewport; the crop keeps its display size and its
    /// center keeps the same relative position within the photo, so at a
    /// higher scale it covers fewer source pixels.
    #[must_use]
    pub fn zoom(&self, requested: f64) -> Self {
        if !requested.is_finite() {
            return *self;
        }
        let scale = clamp_span(requested, self.min_scale, self.max_scale);

        let old_bounds = self.image_bounds();
        let center = self.crop.center();
        let rel_x = (center.x - old_bounds.left) / old_bounds.width();
        let rel_y = (center.y - old_bounds.top) / old_bounds.height();

        let transform = DisplayTransform::centered(self.image, self.viewport, scale);
        let bounds = transform.image_bounds(self.image);
        let size = clamp_span(self.crop.size, self.config.min_crop_size, bounds.min_side());
        let center_x = bounds.left + rel_x * bounds.width();
        let center_y = bounds.top + rel_y * bounds.height();

        debug!(from = self.transform.scale, to = scale, "zoom");

        let zoomed = Self {
            transform,
            ..*self
        };
        zoomed.with_crop(center_x - size / 2.0, center_y - size / 2.0, size)
    }

    /// Zoom by `delta` relative to the current scale.
    #[must_use]
    pub fn zoom_by(&self, delta: f64) -> Self {
        self.zoom(self.transform.scale + delta)
    }

    #[must_use]
    pub fn zoom_in(&self) -> Self {
        self.zoom_by(self.config.zoom_step)
    }

    #[must_use]
    pub fn zoom_out(&self) -> Self {
        self.zoom_by(-self.config.zoom_step)
    }

    /// The crop box in native source pixels.
    pub fn source_region(&self) -> SourceRegion {
        let t = self.transform;
        SourceRegion {
            x: (self.crop.x - t.offset_x) / t.scale,
            y: (self.crop.y - t.offset_y) / t.scale,
            size: self.crop.size / t.scale,
        }
    }

    /// Verify the crop box invariants, naming the first one that fails.
    pub fn check_invariants(&self) -> Result<()> {
        let crop = self.crop;
        let bounds = self.image_bounds();
        let eps = INVARIANT_EPSILON;

        let violation = if !(crop.x.is_finite() && crop.y.is_finite() && crop.size.is_finite()) {
            Some(format!("non-finite crop {crop:?}"))
        } else if crop.size < self.config.min_crop_size - eps {
            Some(format!(
                "size {} below minimum {}",
                crop.size, self.config.min_crop_size
            ))
        } else if crop.size > bounds.min_side() + eps {
            Some(format!(
                "size {} exceeds displayed photo side {}",
                crop.size,
                bounds.min_side()
            ))
        } else if crop.x < bounds.left - eps || crop.right() > bounds.right + eps {
            Some(format!(
                "x span {}..{} outside {}..{}",
                crop.x,
                crop.right(),
                bounds.left,
                bounds.right
            ))
        } else if crop.y < bounds.top - eps || crop.bottom() > bounds.bottom + eps {
            Some(format!(
                "y span {}..{} outside {}..{}",
                crop.y,
                crop.bottom(),
                bounds.top,
                bounds.bottom
            ))
        } else if self.transform.scale < self.min_scale - eps
            || self.transform.scale > self.max_scale + eps
        {
            Some(format!(
                "scale {} outside {}..{}",
                self.transform.scale, self.min_scale, self.max_scale
            ))
        } else {
            None
        };

        match violation {
            Some(message) => Err(CropError::InvariantViolation(message)),
            None => Ok(()),
        }
    }

    fn clamp_size(&self, size: f64) -> f64 {
        clamp_span(size, self.config.min_crop_size, self.image_bounds().min_side())
    }

    /// Place a crop box, clamping size first and then position.
    fn with_crop(&self, x: f64, y: f64, size: f64) -> Self {
        let size = self.clamp_size(size);
        let (x, y) = self.image_bounds().clamp_square_origin(x, y, size);
        let next = Self {
            crop: CropRect::new(x, y, size),
            ..*self
        };
        debug_assert!(next.check_invariants().is_ok(), "{:?}", next.check_invariants());
        next
    }
}
