//! Source image decoding.
//!
//! The crop editor receives the user's photo as encoded bytes. It is decoded
//! once when a session opens, upright according to its EXIF orientation, and
//! kept as RGB8 until the session commits or is cancelled.

mod source;
mod types;

pub use source::{decode_image, guess_mime_type};
pub use types::{DecodeError, DecodedImage, FilterType, Orientation};
