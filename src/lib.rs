//! # Drape Scan
//!
//! A Rust crate for previewing garment colors against a portrait and
//! reading skin condition from the same photo.
//!
//! This library provides:
//! - Face mask rasterization from a landmark contour
//! - Single-color drape previews with simulated metal reflectance
//! - Palette ranking by complexion uniformity, with progress and cancellation
//! - Pigment decomposition into melanin, hemoglobin and sebum maps
//! - Simulated light-mode heatmaps
//! - Synergy rules that bias the ranking from skin metrics
//!
//! ## Example
//!
//! ```rust,no_run
//! use drape_scan::{
//!     best_colors, build_face_mask, rank_palette, CancellationToken, LandmarkProvider,
//!     MetalType, OvalLandmarkProvider, PaletteSize,
//! };
//! use drape_scan::image_loader::load_image;
//! use std::path::Path;
//!
//! let image = load_image(Path::new("portrait.jpg"))?;
//! let landmarks = OvalLandmarkProvider::default().detect(&image)?;
//! let mask = build_face_mask(&landmarks, image.width(), image.height())?;
//!
//! let palette = drape_scan::drape::generate_palette(PaletteSize::Standard);
//! let results = rank_palette(&image, &mask, &palette, MetalType::Gold, |_, _| {}, &CancellationToken::new())?;
//! for result in best_colors(&results.results, 5) {
//!     println!("#{} {} {:.1}", result.rank, result.color, result.uniformity_score);
//! }
//! # Ok::<(), drape_scan::AnalysisError>(())
//! ```

use image::RgbaImage;

pub mod error;
pub mod constants;
pub mod config;
pub mod image_loader;
pub mod color;
pub mod face;
pub mod drape;
pub mod pigment;
pub mod synergy;
pub mod session;

pub use error::{AnalysisError, Result};
pub use config::EngineConfig;
pub use color::{ColorCharacter, Swatch};
pub use face::{
    ContourMaskBuilder, DeviceCapability, EllipseMaskBuilder, FaceMask, LandmarkProvider,
    LandmarkSet, MaskBuilder, OvalLandmarkProvider, PerformanceTier, Point,
};
pub use drape::{
    CancellationToken, DrapeCompositor, DrapeResult, MetalType, PaletteRanker, PaletteSize,
    RankingOutcome, RankingStatus,
};
pub use pigment::{
    Decomposition, HeatmapRenderer, LightMode, PigmentDecomposer, PigmentMaps, PigmentSummary,
};
pub use synergy::{
    ColorAdjustment, ReasonCode, SkinMetrics, SynergyAdjustment, SynergyEngine, SynergyInsight,
};
pub use session::AnalysisSession;

/// Rasterize a landmark contour into a face mask
///
/// # Errors
///
/// Returns `InvalidParameter` for a zero-sized grid
pub fn build_face_mask(landmarks: &LandmarkSet, width: u32, height: u32) -> Result<FaceMask> {
    ContourMaskBuilder::new().build(landmarks, width, height)
}

/// Render one drape color below the face
///
/// # Arguments
///
/// * `image` - Source portrait, left untouched
/// * `color` - Fabric color of the drape
/// * `mask` - Face mask on the same pixel grid as `image`
/// * `metal` - Jewelry highlight to simulate near the chin
///
/// # Returns
///
/// A new RGBA frame holding the drape preview
///
/// # Errors
///
/// - `DimensionMismatch` if image and mask sizes differ
/// - `NoFaceRegion` if the mask is empty
pub fn render_drape(
    image: &RgbaImage,
    color: Swatch,
    mask: &FaceMask,
    metal: MetalType,
) -> Result<RgbaImage> {
    DrapeCompositor::new().render(image, color, mask, metal)
}

/// Rank a palette best-first
///
/// A cancelled scan is not an error: the outcome carries the colors scored
/// before cancellation and `RankingStatus::Cancelled`.
///
/// # Arguments
///
/// * `image` - Source portrait
/// * `mask` - Face mask on the same pixel grid as `image`
/// * `palette` - Candidate colors, in palette order
/// * `metal` - Jewelry highlight applied to every preview
/// * `on_progress` - Called with `(completed, total)` after each color
/// * `cancel` - Checked before each color
///
/// # Returns
///
/// Results sorted by descending uniformity score; ties keep palette order
///
/// # Errors
///
/// - `DimensionMismatch` if image and mask sizes differ
/// - `NoFaceRegion` if the mask is empty
pub fn rank_palette<F>(
    image: &RgbaImage,
    mask: &FaceMask,
    palette: &[Swatch],
    metal: MetalType,
    on_progress: F,
    cancel: &CancellationToken,
) -> Result<RankingOutcome>
where
    F: FnMut(usize, usize),
{
    PaletteRanker::new().rank(image, mask, palette, metal, on_progress, cancel)
}

/// First `k` entries of a sorted ranking
pub fn best_colors(results: &[DrapeResult], k: usize) -> Vec<DrapeResult> {
    drape::best_colors(results, k)
}

/// Palette of 16, 64 or 128 colors
///
/// # Errors
///
/// Returns `InvalidParameter` for any other size
pub fn generate_palette(size: usize) -> Result<Vec<Swatch>> {
    Ok(drape::generate_palette(PaletteSize::try_from(size)?))
}

/// Pigment maps and their masked means
///
/// # Arguments
///
/// * `image` - Source portrait
/// * `mask` - Face mask on the same pixel grid as `image`
///
/// # Returns
///
/// Per-pixel melanin, hemoglobin and sebum intensities in [0, 1] plus their
/// coverage-weighted means
///
/// # Errors
///
/// - `DimensionMismatch` if image and mask sizes differ
/// - `NoFaceRegion` if the mask is empty
pub fn decompose_pigments(image: &RgbaImage, mask: &FaceMask) -> Result<Decomposition> {
    PigmentDecomposer::new().decompose(image, mask)
}

/// Build the face mask from `landmarks`, then decompose
pub fn decompose_pigments_from_landmarks(
    image: &RgbaImage,
    landmarks: &LandmarkSet,
) -> Result<Decomposition> {
    let mask = build_face_mask(landmarks, image.width(), image.height())?;
    decompose_pigments(image, &mask)
}

/// Light-mode overlay of a pigment map
///
/// # Arguments
///
/// * `image` - Source portrait
/// * `mask` - Face mask; pixels outside it are copied unchanged
/// * `maps` - Pigment maps from [`decompose_pigments`]
/// * `mode` - Light mode selecting the pigment and color ramp
/// * `opacity` - Overlay strength in [0, 1]
///
/// # Returns
///
/// A new RGBA frame; a copy of `image` for `LightMode::Normal` or zero opacity
///
/// # Errors
///
/// - `InvalidParameter` if `opacity` is outside [0, 1]
/// - `DimensionMismatch` if image, mask and maps sizes differ
pub fn render_heatmap(
    image: &RgbaImage,
    mask: &FaceMask,
    maps: &PigmentMaps,
    mode: LightMode,
    opacity: f32,
) -> Result<RgbaImage> {
    HeatmapRenderer::new().render(image, mask, maps, mode, opacity)
}

/// Color direction from a pigment summary or external skin metrics
///
/// # Arguments
///
/// * `metrics` - `SkinMetrics` on a 0-100 scale, or a `PigmentSummary`
///
/// # Returns
///
/// The recommended adjustment with its reason and confidence
///
/// # Errors
///
/// Returns `InvalidParameter` if a metric is outside 0-100
pub fn synergy_insight(metrics: impl Into<SkinMetrics>) -> Result<SynergyInsight> {
    SynergyEngine::new().insight(&metrics.into())
}

/// Re-rank drape results toward the insight's direction
pub fn apply_insight(results: &[DrapeResult], insight: &SynergyInsight) -> SynergyAdjustment {
    SynergyEngine::new().apply_insight(results, insight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn square() -> LandmarkSet {
        LandmarkSet::new(vec![
            Point::new(4.0, 4.0),
            Point::new(28.0, 4.0),
            Point::new(28.0, 20.0),
            Point::new(4.0, 20.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_generate_palette_sizes() {
        assert_eq!(generate_palette(16).unwrap().len(), 16);
        assert_eq!(generate_palette(128).unwrap().len(), 128);
        assert!(matches!(
            generate_palette(100),
            Err(AnalysisError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_decompose_from_landmarks() {
        let image = RgbaImage::from_pixel(32, 32, Rgba([210, 150, 130, 255]));
        let decomposition = decompose_pigments_from_landmarks(&image, &square()).unwrap();
        assert!(decomposition.summary.melanin > 0.0);
        assert_eq!(decomposition.maps.melanin.get_pixel(0, 0)[0], 0.0);
    }

    #[test]
    fn test_result_serialization() {
        let result = DrapeResult {
            color: Swatch::new(0x41, 0x69, 0xE1),
            uniformity_score: 87.5,
            rank: 1,
        };

        let json = serde_json::to_string(&result).unwrap();
        let deserialized: DrapeResult = serde_json::from_str(&json).unwrap();

        assert_eq!(result, deserialized);
    }

    #[test]
    fn test_insight_from_summary() {
        let insight = synergy_insight(PigmentSummary::new(0.2, 0.1, 0.9)).unwrap();
        assert_eq!(insight.reason_code, ReasonCode::HighOiliness);
    }
}
