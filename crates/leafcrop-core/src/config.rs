//! Crop editor options.
//!
//! Hosts pass these as a plain object; every key is optional and uses
//! camelCase on the wire (`targetSize`, `minCropSize`, ...).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::FilterType;
use crate::encode::OutputFormat;

/// Output resolution expected by the leaf analyzer.
pub const DEFAULT_TARGET_SIZE: u32 = 224;
/// Smallest crop box the user can resize to, in display pixels.
pub const DEFAULT_MIN_CROP_SIZE: f64 = 50.0;
pub const DEFAULT_MAX_SCALE: f64 = 3.0;
pub const DEFAULT_MIN_SCALE_FLOOR: f64 = 0.1;
/// Additive scale increment for the zoom buttons.
pub const DEFAULT_ZOOM_STEP: f64 = 0.1;
pub const DEFAULT_HANDLE_HIT_RADIUS: f64 = 12.0;
pub const DEFAULT_OUTPUT_QUALITY: f32 = 0.9;

/// Invalid crop editor options.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("targetSize must be at least 1 pixel")]
    ZeroTargetSize,

    #[error("minCropSize must be a positive number, got {0}")]
    InvalidMinCropSize(f64),

    #[error("minCropSize ({min_crop_size}) must not exceed targetSize ({target_size})")]
    MinCropExceedsTarget { min_crop_size: f64, target_size: u32 },

    #[error("{name} must be a positive number, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("outputQuality must be in (0, 1], got {0}")]
    InvalidQuality(f32),
}

/// Recognized crop editor options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CropConfig {
    /// Side length of the square output bitmap in pixels.
    pub target_size: u32,
    /// Minimum crop box side in display pixels.
    pub min_crop_size: f64,
    /// Maximum zoom scale (display pixels per source pixel).
    pub max_scale: f64,
    /// Lower bound for the computed minimum scale.
    pub min_scale_floor: f64,
    pub zoom_step: f64,
    /// Distance from a corner, in display pixels, that still grabs its handle.
    pub handle_hit_radius: f64,
    /// JPEG quality in (0, 1].
    pub output_quality: f32,
    pub output_format: OutputFormat,
    pub filter: FilterType,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            min_crop_size: DEFAULT_MIN_CROP_SIZE,
            max_scale: DEFAULT_MAX_SCALE,
            min_scale_floor: DEFAULT_MIN_SCALE_FLOOR,
            zoom_step: DEFAULT_ZOOM_STEP,
            handle_hit_radius: DEFAULT_HANDLE_HIT_RADIUS,
            output_quality: DEFAULT_OUTPUT_QUALITY,
            output_format: OutputFormat::default(),
            filter: FilterType::default(),
        }
    }
}

impl CropConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that the options describe a usable editor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_size == 0 {
            return Err(ConfigError::ZeroTargetSize);
        }
        if !(self.min_crop_size.is_finite() && self.min_crop_size > 0.0) {
            return Err(ConfigError::InvalidMinCropSize(self.min_crop_size));
        }
        if self.min_crop_size > self.target_size as f64 {
            return Err(ConfigError::MinCropExceedsTarget {
                min_crop_size: self.min_crop_size,
                target_size: self.target_size,
            });
        }
        for (name, value) in [
            ("maxScale", self.max_scale),
            ("minScaleFloor", self.min_scale_floor),
            ("zoomStep", self.zoom_step),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if !(self.handle_hit_radius.is_finite() && self.handle_hit_radius >= 0.0) {
            return Err(ConfigError::NonPositive {
                name: "handleHitRadius",
                value: self.handle_hit_radius,
            });
        }
        if !(self.output_quality > 0.0 && self.output_quality <= 1.0) {
            return Err(ConfigError::InvalidQuality(self.output_quality));
        }
        Ok(())
    }

    /// JPEG quality on the encoder's 1-100 scale.
    pub fn jpeg_quality(&self) -> u8 {
        (self.output_quality * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = CropConfig::new();
        assert_eq!(config.target_size, 224);
        assert_eq!(config.min_crop_size, 50.0);
        assert_eq!(config.max_scale, 3.0);
        assert_eq!(config.output_format, OutputFormat::Jpeg);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_jpeg_quality_conversion() {
        let mut config = CropConfig::new();
        assert_eq!(config.jpeg_quality(), 90);

        config.output_quality = 0.001;
        assert_eq!(config.jpeg_quality(), 1);

        config.output_quality = 1.0;
        assert_eq!(config.jpeg_quality(), 100);
    }

    #[test]
    fn test_rejects_zero_target() {
        let mut config = CropConfig::new();
        config.target_size = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTargetSize));
    }

    #[test]
    fn test_rejects_min_crop_above_target() {
        let mut config = CropConfig::new();
        config.target_size = 32;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MinCropExceedsTarget { .. })
        ));
    }

    #[test]
    fn test_rejects_non_positive_scales() {
        let mut config = CropConfig::new();
        config.max_scale = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { name: "maxScale", .. })
        ));

        let mut config = CropConfig::new();
        config.zoom_step = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { name: "zoomStep", .. })
        ));
    }

    #[test]
    fn test_rejects_quality_out_of_range() {
        let mut config = CropConfig::new();
        config.output_quality = 1.5;
        assert_eq!(config.validate(), Err(ConfigError::InvalidQuality(1.5)));

        config.output_quality = 0.0;
        assert!(config.validate().is_err());
    }
}
