use thiserror::Error;

use crate::config::ConfigError;
use crate::decode::DecodeError;
use crate::encode::EncodeError;

/// Errors surfaced by a crop session.
///
/// `Decode` is fatal to the session and the user must pick another photo.
/// `Encode` leaves the session open so the host can retry the commit.
/// `InvariantViolation` is a geometry bug, never an expected runtime state.
#[derive(Error, Debug)]
pub enum CropError {
    #[error("Invalid editor options: {0}")]
    Config(#[from] ConfigError),

    #[error("Could not decode the source photo: {0}")]
    Decode(#[from] DecodeError),

    #[error("Could not encode the cropped image: {0}")]
    Encode(#[from] EncodeError),

    #[error("Invalid dimensions: image {image_width}x{image_height}, container {container_width}x{container_height}")]
    InvalidDimensions {
        image_width: u32,
        image_height: u32,
        container_width: f64,
        container_height: f64,
    },

    #[error("Crop invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Crop session is already closed")]
    SessionClosed,
}

impl CropError {
    /// Whether re-invoking the failed operation can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CropError::Encode(_))
    }
}

pub type Result<T> = std::result::Result<T, CropError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_encode_errors_are_retryable() {
        let encode = CropError::from(EncodeError::EncodingFailed("disk".into()));
        assert!(encode.is_retryable());

        let decode = CropError::from(DecodeError::InvalidFormat);
        assert!(!decode.is_retryable());
        assert!(!CropError::SessionClosed.is_retryable());
    }

    #[test]
    fn test_decode_error_message_is_wrapped() {
        let err = CropError::from(DecodeError::InvalidFormat);
        assert_eq!(
            err.to_string(),
            "Could not decode the source photo: Invalid or unsupported image format"
        );
    }
}
