//! Pixel-exact rectangle extraction.

use serde::{Deserialize, Serialize};

use crate::decode::DecodedImage;
use crate::geometry::SourceRegion;

/// A rectangle on the source pixel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Snap a fractional square region to whole pixels inside a
    /// `width x height` image.
    ///
    /// The result stays square; if rounding pushed it past the right or
    /// bottom edge both sides shrink together. Minimum size is 1x1.
    pub fn snap_square(region: SourceRegion, width: u32, height: u32) -> Self {
        let max_x = width.saturating_sub(1) as f64;
        let max_y = height.saturating_sub(1) as f64;

        let x = region.x.round().clamp(0.0, max_x) as u32;
        let y = region.y.round().clamp(0.0, max_y) as u32;
        let side = (region.size.round().max(1.0) as u32)
            .min(width - x)
            .min(height - y)
            .max(1);

        Self {
            x,
            y,
            width: side,
            height: side,
        }
    }
}

/// Copy the pixels inside `rect`, clamped to the image. Minimum output is 1x1.
pub fn crop_pixels(image: &DecodedImage, rect: PixelRect) -> DecodedImage {
    if rect.x == 0 && rect.y == 0 && rect.width >= image.width && rect.height >= image.height {
        return image.clone();
    }

    let left = rect.x.min(image.width.saturating_sub(1));
    let top = rect.y.min(image.height.saturating_sub(1));
    let out_width = rect.width.min(image.width - left).max(1);
    let out_height = rect.height.min(image.height - top).max(1);

    let row_bytes = out_width as usize * 3;
    let mut output = Vec::with_capacity(row_bytes * out_height as usize);

    for y in top..top + out_height {
        let start = ((y as usize) * (image.width as usize) + left as usize) * 3;
        output.extend_from_slice(&image.pixels[start..start + row_bytes]);
    }

    DecodedImage::new(out_width, out_height, output)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Snapped squares are square, non-empty and inside the image.
        #[test]
        fn prop_snap_square_inside(
            (width, height) in (1u32..=500, 1u32..=500),
            (x, y, size) in (-50.0f64..600.0, -50.0f64..600.0, 0.0f64..700.0),
        ) {
            let rect = PixelRect::snap_square(SourceRegion { x, y, size }, width, height);

            prop_assert_eq!(rect.width, rect.height);
            prop_assert!(rect.width >= 1);
            prop_assert!(rect.x + rect.width <= width);
            prop_assert!(rect.y + rect.height <= height);
        }

        /// Property: Pixel data length matches output dimensions.
        #[test]
        fn prop_crop_pixels_buffer_len(
            (width, height) in (1u32..=60, 1u32..=60),
            (x, y, w, h) in (0u32..70, 0u32..70, 0u32..70, 0u32..70),
        ) {
            let img = DecodedImage::filled(width, height, [1, 2, 3]);
            let result = crop_pixels(&img, PixelRect { x, y, width: w, height: h });

            prop_assert!(result.width >= 1 && result.width <= width);
            prop_assert!(result.height >= 1 && result.height <= height);
            prop_assert_eq!(result.pixels.len(), (result.width * result.height * 3) as usize);
        }
    }
}
