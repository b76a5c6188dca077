//! Output encoding for the rasterized crop.
//!
//! The analyzer backend accepts a fixed-size square JPEG by default. PNG is
//! available for hosts that want a lossless crop. A `data:` URL of the
//! encoded bytes doubles as the preview shown next to the upload form.

mod jpeg;
mod png;
mod types;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::decode::DecodedImage;

pub use jpeg::encode_jpeg;
pub use png::encode_png;
pub use types::{EncodeError, OutputFormat};

pub(crate) use types::validate_rgb;

/// Encode a decoded image in the requested format.
///
/// `quality` only applies to JPEG.
pub fn encode_image(
    image: &DecodedImage,
    format: OutputFormat,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    match format {
        OutputFormat::Jpeg => encode_jpeg(&image.pixels, image.width, image.height, quality),
        OutputFormat::Png => encode_png(&image.pixels, image.width, image.height),
    }
}

/// Build a `data:<mime>;base64,<payload>` URL for previews.
pub fn to_data_url(bytes: &[u8], format: OutputFormat) -> String {
    format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_image_dispatches_on_format() {
        let img = DecodedImage::filled(8, 8, [90, 160, 70]);

        let jpeg = encode_image(&img, OutputFormat::Jpeg, 90).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);

        let png = encode_image(&img, OutputFormat::Png, 90).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn test_data_url_prefix_and_payload() {
        let url = to_data_url(&[0xFF, 0xD8, 0xFF], OutputFormat::Jpeg);
        assert_eq!(url, "data:image/jpeg;base64,/9j/");
    }

    #[test]
    fn test_data_url_png() {
        let url = to_data_url(b"png", OutputFormat::Png);
        assert!(url.starts_with("data:image/png;base64,"));
    }
}
