//! Rasterizing the crop box into the output bitmap.
//!
//! The crop box is mapped back through the display transform to source
//! pixels, cut out of the decoded photo and resampled to a fixed square.
//! The output is always exactly `target x target`.

mod crop;
mod resample;

pub use crop::{crop_pixels, PixelRect};
pub use resample::{rasterize, resize};
