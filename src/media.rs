//! Media Encoder
//!
//! Turns user-supplied files and captured video frames into transport-safe
//! payloads. Still images keep their declared type; a captured frame is
//! always re-serialized as fixed-quality JPEG, whatever the container was.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use tracing::info;

use crate::error::AnalysisError;
use crate::models::MediaPayload;

/// Content type of every captured frame, regardless of source container.
pub const FRAME_CONTENT_TYPE: &str = "image/jpeg";

const FRAME_JPEG_QUALITY: u8 = 92;

/// Encode a still image's full byte content as a base64 payload, keeping
/// the file's declared content type.
pub fn encode(bytes: &[u8], content_type: &str) -> crate::Result<MediaPayload> {
    if bytes.is_empty() {
        return Err(AnalysisError::Encoding(
            "selected file has no content".to_string(),
        ));
    }

    Ok(MediaPayload {
        data: BASE64.encode(bytes),
        content_type: content_type.to_string(),
    })
}

/// A paused-frame provider over a playing video.
///
/// The real implementation sits in the presentation layer over a player
/// handle; tests inject a fixed source because "the currently displayed
/// frame" is inherently non-deterministic under real playback.
#[async_trait]
pub trait FrameSource: Send {
    /// Halt playback so the displayed frame stops changing.
    fn pause(&mut self);

    /// Whether the current frame is already decodable.
    fn frame_ready(&self) -> bool;

    /// Suspend until a decodable frame is available (the data-loaded
    /// signal). Resolves immediately when [`frame_ready`] is already true.
    ///
    /// [`frame_ready`]: FrameSource::frame_ready
    async fn wait_until_ready(&mut self) -> crate::Result<()>;

    /// The currently displayed frame at the video's native pixel
    /// dimensions, or `None` when nothing is decodable.
    fn current_frame(&self) -> Option<RgbImage>;
}

/// Capture the currently displayed frame and encode it as a JPEG payload.
///
/// Fails with an `Encoding` error when no frame can be rasterized; callers
/// treat that as a non-retryable input problem, never as an empty payload.
pub async fn capture_frame(source: &mut dyn FrameSource) -> crate::Result<MediaPayload> {
    source.pause();

    if !source.frame_ready() {
        source.wait_until_ready().await?;
    }

    let frame = source.current_frame().ok_or_else(|| {
        AnalysisError::Encoding("no decodable frame available".to_string())
    })?;

    if frame.width() == 0 || frame.height() == 0 {
        return Err(AnalysisError::Encoding(
            "captured frame has zero dimensions".to_string(),
        ));
    }

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, FRAME_JPEG_QUALITY)
        .encode_image(&frame)
        .map_err(|e| AnalysisError::Encoding(format!("frame serialization failed: {}", e)))?;

    info!(
        width = frame.width(),
        height = frame.height(),
        bytes = jpeg.len(),
        "Captured video frame"
    );

    Ok(MediaPayload {
        data: BASE64.encode(&jpeg),
        content_type: FRAME_CONTENT_TYPE.to_string(),
    })
}
