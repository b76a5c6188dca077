//! One crop editing session, from accepted file to committed crop.
//!
//! A session owns the decoded photo, the engine and the gesture tracker.
//! It ends exactly once, either by a successful [`CropSession::commit`]
//! or by [`CropSession::cancel`]; the decoded photo is released at that point.

use tracing::{debug, info, warn};

use crate::config::CropConfig;
use crate::decode::{decode_image, DecodeError, DecodedImage};
use crate::encode::{encode_image, to_data_url, OutputFormat};
use crate::error::{CropError, Result};
use crate::geometry::{CropTransformEngine, ImageMetrics, Point, Viewport};
use crate::interaction::{Interaction, InteractionMode};
use crate::raster::rasterize;

/// Receives the outcome of a session.
///
/// At most one of the two methods is called, at most once.
pub trait CropHost {
    fn crop_complete(&mut self, output: CropOutput);
    fn cancelled(&mut self);
}

/// The encoded crop handed to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct CropOutput {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    /// `data:` URL of `bytes`, for the preview thumbnail.
    pub preview_data_url: String,
}

impl CropOutput {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// How a session ended, if it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Committed,
    Cancelled,
}

pub struct CropSession<H: CropHost> {
    host: H,
    source: Option<DecodedImage>,
    engine: CropTransformEngine,
    interaction: Interaction,
    state: SessionState,
}

impl<H: CropHost> CropSession<H> {
    /// Decode `bytes` and lay the photo out in `viewport`.
    ///
    /// # Errors
    ///
    /// `CropError::Config` for invalid options, `CropError::Decode` when the
    /// bytes are not a usable photo. The host is not called in either case.
    pub fn open(bytes: &[u8], viewport: Viewport, config: CropConfig, host: H) -> Result<Self> {
        config.validate()?;
        let source = decode_image(bytes)?;
        Self::from_decoded(source, viewport, config, host)
    }

    /// Start a session on an already decoded photo.
    pub fn from_decoded(
        source: DecodedImage,
        viewport: Viewport,
        config: CropConfig,
        host: H,
    ) -> Result<Self> {
        config.validate()?;
        if source.pixels.len() != source.expected_len() {
            return Err(DecodeError::CorruptedFile(format!(
                "pixel buffer holds {} bytes, expected {}",
                source.pixels.len(),
                source.expected_len()
            ))
            .into());
        }
        let engine = CropTransformEngine::new(
            ImageMetrics::new(source.width, source.height),
            viewport,
            &config,
        )?;

        info!(
            width = source.width,
            height = source.height,
            target = config.target_size,
            "crop session opened"
        );

        Ok(Self {
            host,
            source: Some(source),
            engine,
            interaction: Interaction::new(),
            state: SessionState::Open,
        })
    }

    pub fn engine(&self) -> &CropTransformEngine {
        &self.engine
    }

    pub fn mode(&self) -> InteractionMode {
        self.interaction.mode()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn pointer_down(&mut self, point: Point) -> InteractionMode {
        if !self.is_open() {
            return InteractionMode::Idle;
        }
        self.interaction.pointer_down(&self.engine, point)
    }

    /// Returns true when the crop box changed.
    pub fn pointer_move(&mut self, point: Point) -> bool {
        match self.interaction.pointer_move(&self.engine, point) {
            Some(next) if next != self.engine => {
                self.engine = next;
                true
            }
            _ => false,
        }
    }

    pub fn pointer_up(&mut self) {
        self.interaction.pointer_up();
    }

    pub fn pointer_leave(&mut self) {
        self.interaction.pointer_leave();
    }

    /// Re-layout for a new container size. Any gesture in progress is dropped.
    pub fn resize_viewport(&mut self, viewport: Viewport) -> Result<()> {
        if !self.is_open() {
            return Err(CropError::SessionClosed);
        }
        self.engine = self.engine.resize_viewport(viewport)?;
        self.interaction.reset();
        debug!(width = viewport.width, height = viewport.height, "viewport resized");
        Ok(())
    }

    pub fn zoom_to(&mut self, scale: f64) {
        self.set_engine(self.engine.zoom(scale));
    }

    pub fn zoom_in(&mut self) {
        self.set_engine(self.engine.zoom_in());
    }

    pub fn zoom_out(&mut self) {
        self.set_engine(self.engine.zoom_out());
    }

    /// Rasterize and encode the crop without ending the session.
    pub fn render(&self) -> Result<CropOutput> {
        let source = self.source.as_ref().ok_or(CropError::SessionClosed)?;
        let config = self.engine.config();

        let bitmap = rasterize(
            source,
            self.engine.source_region(),
            config.target_size,
            config.filter,
        )?;
        let bytes = encode_image(&bitmap, config.output_format, config.jpeg_quality())?;
        let preview_data_url = to_data_url(&bytes, config.output_format);

        Ok(CropOutput {
            bytes,
            format: config.output_format,
            width: bitmap.width,
            height: bitmap.height,
            preview_data_url,
        })
    }

    /// Produce the crop and hand it to the host, ending the session.
    ///
    /// On an encode failure the session stays open with its crop untouched
    /// and `commit` may be called again.
    pub fn commit(&mut self) -> Result<()> {
        if !self.is_open() {
            return Err(CropError::SessionClosed);
        }

        let output = match self.render() {
            Ok(output) => output,
            Err(err) => {
                warn!(error = %err, retryable = err.is_retryable(), "crop commit failed");
                return Err(err);
            }
        };

        info!(
            bytes = output.bytes.len(),
            mime = output.mime_type(),
            "crop committed"
        );
        self.close(SessionState::Committed);
        self.host.crop_complete(output);
        Ok(())
    }

    /// Abandon the session. Does nothing if it already ended.
    pub fn cancel(&mut self) {
        if !self.is_open() {
            return;
        }
        info!("crop session cancelled");
        self.close(SessionState::Cancelled);
        self.host.cancelled();
    }

    fn set_engine(&mut self, next: CropTransformEngine) {
        if self.is_open() {
            self.engine = next;
            self.interaction.reset();
        }
    }

    fn close(&mut self, state: SessionState) {
        self.state = state;
        self.source = None;
        self.interaction.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{encode_png, EncodeError};
    use crate::geometry::CropRect;

    #[derive(Default)]
    struct RecordingHost {
        completed: Vec<CropOutput>,
        cancels: usize,
    }

    impl CropHost for RecordingHost {
        fn crop_complete(&mut self, output: CropOutput) {
            self.completed.push(output);
        }

        fn cancelled(&mut self) {
            self.cancels += 1;
        }
    }

    fn session_with(config: CropConfig) -> CropSession<RecordingHost> {
        let img = DecodedImage::filled(1000, 800, [60, 150, 70]);
        let png = encode_png(&img.pixels, img.width, img.height).unwrap();
        CropSession::open(&png, Viewport::new(500.0, 500.0), config, RecordingHost::default())
            .unwrap()
    }

    fn session() -> CropSession<RecordingHost> {
        session_with(CropConfig::default())
    }

    #[test]
    fn test_open_lays_out_photo() {
        let s = session();
        assert_eq!(s.engine().crop(), CropRect::new(194.0, 194.0, 112.0));
        assert_eq!(s.state(), SessionState::Open);
        assert_eq!(s.mode(), InteractionMode::Idle);
    }

    #[test]
    fn test_open_rejects_undecodable_bytes() {
        let result = CropSession::open(
            b"not a photo",
            Viewport::new(500.0, 500.0),
            CropConfig::default(),
            RecordingHost::default(),
        );
        assert!(matches!(result, Err(CropError::Decode(DecodeError::InvalidFormat))));
    }

    #[test]
    fn test_open_rejects_invalid_config() {
        let mut config = CropConfig::default();
        config.output_quality = 2.0;
        let result = CropSession::from_decoded(
            DecodedImage::filled(10, 10, [0, 0, 0]),
            Viewport::new(100.0, 100.0),
            config,
            RecordingHost::default(),
        );
        assert!(matches!(result, Err(CropError::Config(_))));
    }

    #[test]
    fn test_pointer_gesture_updates_crop() {
        let mut s = session();

        assert_eq!(s.pointer_down(Point::new(250.0, 250.0)), InteractionMode::Dragging);
        assert!(s.pointer_move(Point::new(1250.0, 1250.0)));
        s.pointer_up();

        assert_eq!(s.engine().crop(), CropRect::new(388.0, 338.0, 112.0));
        assert!(!s.pointer_move(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_zoom_cancels_gesture() {
        let mut s = session();
        s.pointer_down(Point::new(250.0, 250.0));
        s.zoom_in();

        assert_eq!(s.mode(), InteractionMode::Idle);
        assert!((s.engine().scale() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_commit_delivers_once() {
        let mut s = session();
        s.commit().unwrap();

        let host = s.host();
        assert_eq!(host.completed.len(), 1);
        let output = &host.completed[0];
        assert_eq!((output.width, output.height), (224, 224));
        assert_eq!(output.mime_type(), "image/jpeg");
        assert_eq!(&output.bytes[0..2], &[0xFF, 0xD8]);
        assert!(output.preview_data_url.starts_with("data:image/jpeg;base64,"));

        assert!(matches!(s.commit(), Err(CropError::SessionClosed)));
        s.cancel();
        assert_eq!(s.host().completed.len(), 1);
        assert_eq!(s.host().cancels, 0);
        assert_eq!(s.state(), SessionState::Committed);
    }

    #[test]
    fn test_commit_png_output() {
        let mut config = CropConfig::default();
        config.output_format = OutputFormat::Png;
        config.target_size = 64;
        let mut s = session_with(config);
        s.commit().unwrap();

        let output = &s.host().completed[0];
        let decoded = decode_image(&output.bytes).unwrap();
        assert_eq!((decoded.width, decoded.height), (64, 64));
        assert_eq!(decoded.pixel(32, 32), Some([60, 150, 70]));
    }

    #[test]
    fn test_cancel_at_most_once() {
        let mut s = session();
        s.cancel();
        s.cancel();

        assert_eq!(s.host().cancels, 1);
        assert!(s.host().completed.is_empty());
        assert!(matches!(s.commit(), Err(CropError::SessionClosed)));
        assert!(matches!(s.render(), Err(CropError::SessionClosed)));
        assert_eq!(s.pointer_down(Point::new(250.0, 250.0)), InteractionMode::Idle);
    }

    #[test]
    fn test_from_decoded_rejects_short_pixel_buffer() {
        let photo = DecodedImage {
            width: 1000,
            height: 800,
            pixels: vec![0; 30],
        };
        let result = CropSession::from_decoded(
            photo,
            Viewport::new(500.0, 500.0),
            CropConfig::default(),
            RecordingHost::default(),
        );
        assert!(matches!(
            result,
            Err(CropError::Decode(DecodeError::CorruptedFile(_)))
        ));
    }

    #[test]
    fn test_commit_retries_after_encode_failure() {
        let mut s = session();
        s.pointer_down(Point::new(250.0, 250.0));
        s.pointer_move(Point::new(300.0, 280.0));
        s.pointer_up();
        let crop = s.engine().crop();

        // Swap in a buffer that no longer matches its dimensions.
        let photo = s.source.take().unwrap();
        s.source = Some(DecodedImage {
            width: photo.width,
            height: photo.height,
            pixels: vec![0; 30],
        });

        let err = s.commit().unwrap_err();
        assert!(matches!(err, CropError::Encode(EncodeError::InvalidPixelData { .. })));
        assert!(err.is_retryable());
        assert_eq!(s.state(), SessionState::Open);
        assert!(s.host().completed.is_empty());
        assert_eq!(s.host().cancels, 0);
        assert_eq!(s.engine().crop(), crop);

        s.source = Some(photo);
        s.commit().unwrap();

        assert_eq!(s.state(), SessionState::Committed);
        assert_eq!(s.host().completed.len(), 1);
        assert_eq!(s.engine().crop(), crop);
    }

    #[test]
    fn test_resize_viewport_after_close() {
        let mut s = session();
        s.cancel();
        assert!(matches!(
            s.resize_viewport(Viewport::new(800.0, 600.0)),
            Err(CropError::SessionClosed)
        ));
    }

    #[test]
    fn test_resize_viewport_resets_layout() {
        let mut s = session();
        s.zoom_to(2.0);
        s.resize_viewport(Viewport::new(1000.0, 1000.0)).unwrap();
        assert_eq!(s.engine().scale(), 1.0);

        assert!(matches!(
            s.resize_viewport(Viewport::new(0.0, 10.0)),
            Err(CropError::InvalidDimensions { .. })
        ));
    }
}
