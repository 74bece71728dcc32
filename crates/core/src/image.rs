//! Generated image metadata.
//!
//! Only the header is inspected; pixel data is never decoded.

use std::io::Cursor;

use image::ImageFormat;

use crate::error::CoreError;

/// Content type of every stored artifact.
pub const PNG_CONTENT_TYPE: &str = "image/png";

/// File extension matching [`PNG_CONTENT_TYPE`].
pub const PNG_EXTENSION: &str = "png";

/// Format and dimensions read from an image header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    pub fn is_png(&self) -> bool {
        self.format == ImageFormat::Png
    }
}

/// Read the format and dimensions of an encoded image.
///
/// Fails if the bytes are not a recognizable PNG, JPEG or WebP image.
pub fn probe_image(bytes: &[u8]) -> Result<ImageInfo, CoreError> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CoreError::Validation(format!("Unreadable image payload: {e}")))?;

    let format = reader
        .format()
        .ok_or_else(|| CoreError::Validation("Unrecognized image format".into()))?;

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| CoreError::Validation(format!("Invalid image header: {e}")))?;

    Ok(ImageInfo {
        format,
        width,
        height,
    })
}
