//! Resampling the selected square to the analyzer's input size.

use tracing::debug;

use super::crop::{crop_pixels, PixelRect};
use crate::decode::{DecodedImage, FilterType};
use crate::encode::{validate_rgb, EncodeError};
use crate::geometry::SourceRegion;

/// Resize an image to exact dimensions with the given filter.
///
/// # Errors
///
/// Returns `EncodeError::InvalidDimensions` for a zero target size.
pub fn resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgb_image = image.to_rgb_image().ok_or_else(|| {
        EncodeError::EncodingFailed("pixel buffer does not match dimensions".to_string())
    })?;

    let resized = image::imageops::resize(&rgb_image, width, height, filter.to_image_filter());
    Ok(DecodedImage::from_rgb_image(resized))
}

/// Cut `region` out of the source photo and resample it to `target x target`.
///
/// The region is snapped to whole source pixels before resampling. The
/// `image` crate widens its filter support when downscaling, so large crops
/// are area-averaged instead of aliased.
pub fn rasterize(
    image: &DecodedImage,
    region: SourceRegion,
    target: u32,
    filter: FilterType,
) -> Result<DecodedImage, EncodeError> {
    if target == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: target,
            height: target,
        });
    }
    validate_rgb(&image.pixels, image.width, image.height)?;
    if !(region.x.is_finite() && region.y.is_finite() && region.size.is_finite()) {
        return Err(EncodeError::EncodingFailed(format!(
            "non-finite crop region {region:?}"
        )));
    }

    let rect = PixelRect::snap_square(region, image.width, image.height);
    debug!(?rect, target, ?filter, "rasterizing crop");

    let square = crop_pixels(image, rect);
    resize(&square, target, target, filter)
}
