//! Image decoding and QR code detection.

use crate::error::{ExtractionError, ExtractionResult};
use image::RgbImage;

/// Decode uploaded bytes (PNG, JPEG, GIF, …) into an 8-bit RGB pixel buffer.
pub fn decode_image(bytes: &[u8]) -> ExtractionResult<RgbImage> {
    if bytes.is_empty() {
        return Err(ExtractionError::ImageDecode("upload is empty".to_string()));
    }

    let image = image::load_from_memory(bytes)
        .map_err(|e| ExtractionError::ImageDecode(e.to_string()))?;
    Ok(image.to_rgb8())
}

/// Finds QR codes in an image and returns the text of each one decoded.
///
/// Implementations are stateless from the caller's side and are shared
/// across requests.
pub trait QrDetector: Send + Sync {
    /// Decoded payloads in detection order; empty when nothing decodes.
    fn detect_and_decode(&self, image: &RgbImage) -> Vec<String>;
}

/// QR detection backed by `rqrr`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RqrrDetector;

impl RqrrDetector {
    pub fn new() -> Self {
        Self
    }
}

impl QrDetector for RqrrDetector {
    fn detect_and_decode(&self, image: &RgbImage) -> Vec<String> {
        let gray = image::imageops::grayscale(image);
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            gray.width() as usize,
            gray.height() as usize,
            |x, y| gray.get_pixel(x as u32, y as u32)[0],
        );

        let grids = prepared.detect_grids();
        tracing::debug!("Detected {} QR grid(s)", grids.len());

        grids
            .into_iter()
            .filter_map(|grid| match grid.decode() {
                Ok((_meta, content)) => Some(content),
                Err(e) => {
                    tracing::debug!("Skipping undecodable QR grid: {}", e);
                    None
                }
            })
            .collect()
    }
}
