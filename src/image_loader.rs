//! Image loading for source portraits
//!
//! Decodes a file or an in-memory buffer into the RGBA buffer every
//! analysis stage works on.
//!
//! ## Supported Formats
//!
//! Decoded through the `image` crate:
//! - JPEG, PNG, GIF (first frame), WebP, TIFF, BMP
//!
//! Orientation metadata is not applied; portraits are expected upright.

use crate::error::{AnalysisError, Result};
use image::{ImageReader, RgbaImage};
use log::debug;
use std::io::Cursor;
use std::path::Path;

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    /// First frame only
    Gif,
    WebP,
    Tiff,
    Bmp,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<ImageFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::WebP),
            "tiff" | "tif" => Some(ImageFormat::Tiff),
            "bmp" => Some(ImageFormat::Bmp),
            _ => None,
        }
    }
}

impl From<ImageFormat> for image::ImageFormat {
    fn from(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Gif => image::ImageFormat::Gif,
            ImageFormat::WebP => image::ImageFormat::WebP,
            ImageFormat::Tiff => image::ImageFormat::Tiff,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
        }
    }
}

/// Load an image from disk as RGBA
///
/// # Arguments
///
/// * `path` - Path to the image file
///
/// # Errors
///
/// Returns `AnalysisError::ImageLoadError` if:
/// - The extension is not a supported format
/// - The file cannot be opened
/// - Decoding fails
///
/// # Example
///
/// ```rust,no_run
/// use drape_scan::image_loader::load_image;
/// use std::path::Path;
///
/// let image = load_image(Path::new("portrait.jpg"))?;
/// println!("Loaded image: {}x{}", image.width(), image.height());
/// # Ok::<(), drape_scan::AnalysisError>(())
/// ```
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let format = ImageFormat::from_extension(path).ok_or_else(|| AnalysisError::ImageLoadError {
        message: format!("Unknown image format for file: {}", path.display()),
        source: None,
    })?;

    let mut reader = ImageReader::open(path).map_err(|e| {
        AnalysisError::image_load(format!("Failed to open image file: {}", path.display()), e)
    })?;
    reader.set_format(format.into());

    let decoded = reader.decode().map_err(|e| {
        AnalysisError::image_load(format!("Failed to decode image: {}", path.display()), e)
    })?;

    let image = decoded.to_rgba8();
    debug!("loaded {} ({}x{})", path.display(), image.width(), image.height());
    Ok(image)
}

/// Decode an in-memory image, guessing the format from its header
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| AnalysisError::image_load("Failed to read image header", e))?;

    let decoded = reader
        .decode()
        .map_err(|e| AnalysisError::image_load("Failed to decode image buffer", e))?;
    Ok(decoded.to_rgba8())
}

/// Get list of all supported file extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &["jpg", "jpeg", "png", "gif", "webp", "tiff", "tif", "bmp"]
}

/// Check if a file extension is supported
pub fn is_supported_extension(ext: &str) -> bool {
    let ext_lower = ext.to_lowercase();
    supported_extensions().contains(&ext_lower.as_str())
}
