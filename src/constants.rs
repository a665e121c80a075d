//! Tuning constants for face-region analysis
//!
//! This module contains compile-time defaults for every stage of the
//! pipeline. `EngineConfig::default()` is built from these values.

/// Face mask rasterization
pub mod mask {
    /// Minimum number of distinct landmark points forming a contour
    pub const MIN_LANDMARK_POINTS: usize = 3;

    /// Minimum enclosed contour area in square pixels
    pub const MIN_CONTOUR_AREA: f64 = 1.0;

    /// Sub-scanlines sampled per pixel row for edge anti-aliasing
    pub const SUBSAMPLES_PER_ROW: u32 = 4;

    /// Full membership value for pixels strictly inside the contour
    pub const FULL_COVERAGE: u8 = 255;
}

/// Drape compositing and metal reflectance
pub mod drape {
    /// Gap between chin line and drape top, as a fraction of face height
    pub const NECK_GAP_RATIO: f32 = 0.08;

    /// Rows over which the drape fades in at its top edge
    pub const EDGE_SOFTNESS_ROWS: u32 = 6;

    /// Opacity of the flat fabric color
    pub const DRAPE_OPACITY: f32 = 0.95;

    /// Strength of the drape color reflected onto the lower face
    pub const BOUNCE_STRENGTH: f32 = 0.18;

    /// Portion of the face height (measured up from the chin) reached by the bounce
    pub const BOUNCE_REACH_RATIO: f32 = 0.45;

    /// Metal highlight radius as a fraction of face width
    pub const HIGHLIGHT_RADIUS_RATIO: f32 = 0.35;

    /// Gold highlight: warm additive tint
    pub const GOLD_TINT: [u8; 3] = [255, 200, 90];
    pub const GOLD_INTENSITY: f32 = 0.30;

    /// Rose-gold highlight: pink-copper additive tint
    pub const ROSE_GOLD_TINT: [u8; 3] = [240, 170, 150];
    pub const ROSE_GOLD_INTENSITY: f32 = 0.25;

    /// Silver highlight: cool specular lift toward this color
    pub const SILVER_TINT: [u8; 3] = [225, 232, 245];
    pub const SILVER_INTENSITY: f32 = 0.22;
}

/// Palette ranking
pub mod ranking {
    /// Variance (in squared luma units) at which the uniformity score halves
    pub const UNIFORMITY_VARIANCE_SCALE: f64 = 64.0;

    /// Upper bound of the uniformity score
    pub const MAX_UNIFORMITY_SCORE: f64 = 100.0;

    /// Default number of colors returned by best-color queries
    pub const DEFAULT_BEST_COUNT: usize = 5;
}

/// Palette generation
pub mod palette {
    /// Number of seasonal base colors
    pub const BASE_COLOR_COUNT: usize = 16;

    /// Brightness factor range for generated variants
    pub const MIN_BRIGHTNESS_FACTOR: f32 = 0.6;
    pub const MAX_BRIGHTNESS_FACTOR: f32 = 1.4;
}

/// Pigment decomposition
pub mod pigment {
    /// Red optical density mapped to full melanin intensity
    pub const MELANIN_DENSITY_SCALE: f32 = 0.7;

    /// Green-minus-red optical density mapped to full hemoglobin intensity
    pub const ERYTHEMA_DENSITY_SCALE: f32 = 0.5;

    /// Brightness (HSV value) above which specular oil shine begins
    pub const SEBUM_BRIGHTNESS_THRESHOLD: f32 = 0.72;

    /// Floor applied to channel reflectance before taking logarithms
    pub const MIN_REFLECTANCE: f32 = 1.0 / 255.0;
}

/// Skin-condition thresholds on a 0-100 scale
pub mod synergy {
    /// Redness or sensitivity at or above this value favors muted colors
    pub const HIGH_REDNESS_THRESHOLD: f32 = 70.0;

    /// Hydration at or below this value favors bright colors
    pub const LOW_HYDRATION_THRESHOLD: f32 = 35.0;

    /// Oiliness at or above this value favors bright, deeper colors
    pub const HIGH_OILINESS_THRESHOLD: f32 = 65.0;

    /// Score boost for drape results matching the recommended direction
    pub const MATCH_BOOST: f32 = 10.0;

    /// LCh chroma at or below which a swatch reads as muted
    pub const MUTED_MAX_CHROMA: f32 = 30.0;

    /// LCh chroma at or above which a swatch reads as bright
    pub const BRIGHT_MIN_CHROMA: f32 = 45.0;
}
