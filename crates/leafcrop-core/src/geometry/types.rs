//! Value types shared by the crop engine and the pointer state machine.
//!
//! All lengths are `f64` display pixels unless a type says otherwise.

use serde::{Deserialize, Serialize};

/// A pointer position in container coordinates.
///
/// Mouse and touch events are both reduced to this before reaching the engine.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Pointer movement since the start of a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerDelta {
    pub dx: f64,
    pub dy: f64,
}

impl PointerDelta {
    pub const ZERO: PointerDelta = PointerDelta { dx: 0.0, dy: 0.0 };

    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Delta from `origin` to `current`.
    pub fn between(origin: Point, current: Point) -> Self {
        Self {
            dx: current.x - origin.x,
            dy: current.y - origin.y,
        }
    }
}

/// Intrinsic pixel dimensions of the source photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetrics {
    pub width: u32,
    pub height: u32,
}

impl ImageMetrics {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn min_side(&self) -> f64 {
        self.width.min(self.height) as f64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Size of the editing surface in display pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Placement of the scaled photo inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayTransform {
    /// Display pixels per source pixel.
    pub scale: f64,
    /// Left edge of the scaled photo in the viewport.
    pub offset_x: f64,
    /// Top edge of the scaled photo in the viewport.
    pub offset_y: f64,
}

impl DisplayTransform {
    /// Transform that centers `image` at `scale` inside `viewport`.
    pub fn centered(image: ImageMetrics, viewport: Viewport, scale: f64) -> Self {
        Self {
            scale,
            offset_x: (viewport.width - image.width as f64 * scale) / 2.0,
            offset_y: (viewport.height - image.height as f64 * scale) / 2.0,
        }
    }

    /// Rectangle covered by the scaled photo, in viewport coordinates.
    pub fn image_bounds(&self, image: ImageMetrics) -> Bounds {
        Bounds {
            left: self.offset_x,
            top: self.offset_y,
            right: self.offset_x + image.width as f64 * self.scale,
            bottom: self.offset_y + image.height as f64 * self.scale,
        }
    }
}

/// Axis-aligned rectangle given by its edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Largest square side that fits.
    pub fn min_side(&self) -> f64 {
        self.width().min(self.height())
    }

    /// Clamp the top-left of a `size` square so the square stays inside.
    pub fn clamp_square_origin(&self, x: f64, y: f64, size: f64) -> (f64, f64) {
        (
            clamp_span(x, self.left, self.right - size),
            clamp_span(y, self.top, self.bottom - size),
        )
    }
}

/// The square crop box in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    /// Side length; the crop is always square.
    pub size: f64,
}

impl CropRect {
    pub fn new(x: f64, y: f64, size: f64) -> Self {
        Self { x, y, size }
    }

    pub fn right(&self) -> f64 {
        self.x + self.size
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.size
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.size / 2.0, self.y + self.size / 2.0)
    }

    pub fn corner(&self, corner: Corner) -> Point {
        let x = if corner.moves_left_edge() { self.x } else { self.right() };
        let y = if corner.moves_top_edge() { self.y } else { self.bottom() };
        Point::new(x, y)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }
}

/// A crop box corner that carries a resize handle.
///
/// Each corner moves exactly one vertical and one horizontal edge; the
/// opposite corner stays pinned while it is dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// True when this corner drags the left edge (otherwise the right edge).
    pub fn moves_left_edge(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::BottomLeft)
    }

    /// True when this corner drags the top edge (otherwise the bottom edge).
    pub fn moves_top_edge(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }

    /// The corner that stays fixed while this one is dragged.
    pub fn opposite(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }
}

/// The crop mapped back to native source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceRegion {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

/// `value.max(lo).min(hi)`: unlike `f64::clamp` this never panics when
/// rounding leaves `lo` a hair above `hi`; `hi` wins.
#[inline]
pub(crate) fn clamp_span(value: f64, lo: f64, hi: f64) -> f64 {
    value.max(lo).min(hi)
}
