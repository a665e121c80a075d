//! Complexion uniformity analysis
//!
//! Measures how even the masked face region looks in a rendered frame:
//! - Rec.601 luma per pixel
//! - Mask-coverage weighted mean and variance
//! - Variance mapped onto a bounded 0-100 fitness score
//!
//! Algorithm tag: `algo-uniformity-score`

use image::RgbaImage;

use crate::color::ColorConverter;
use crate::constants::ranking::{MAX_UNIFORMITY_SCORE, UNIFORMITY_VARIANCE_SCALE};
use crate::face::FaceMask;
use crate::{AnalysisError, Result};

/// Intensity statistics over the masked face region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformityStats {
    /// Weighted mean luma (0-255)
    pub mean: f64,
    /// Weighted luma variance
    pub variance: f64,
    /// Sum of coverage weights (fully covered pixel = 1.0)
    pub weight: f64,
    /// Uniformity score in [0, 100]
    pub score: f64,
}

/// Scores complexion evenness of a rendered frame
#[derive(Debug, Clone)]
pub struct UniformityScorer {
    converter: ColorConverter,
    variance_scale: f64,
}

impl Default for UniformityScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl UniformityScorer {
    pub fn new() -> Self {
        Self {
            converter: ColorConverter::new(),
            variance_scale: UNIFORMITY_VARIANCE_SCALE,
        }
    }

    /// `variance_scale` is the luma variance at which the score halves
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` unless the scale is finite and positive
    pub fn with_variance_scale(variance_scale: f64) -> Result<Self> {
        if !(variance_scale.is_finite() && variance_scale > 0.0) {
            return Err(AnalysisError::invalid_parameter(
                "variance_scale",
                variance_scale,
            ));
        }
        Ok(Self {
            variance_scale,
            ..Self::new()
        })
    }

    /// Compute intensity statistics of `frame` over the face mask
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if frame and mask sizes differ
    /// - `NoFaceRegion` if the mask covers no pixels
    pub fn measure(&self, frame: &RgbaImage, mask: &FaceMask) -> Result<UniformityStats> {
        if frame.dimensions() != mask.dimensions() {
            return Err(AnalysisError::dimension_mismatch(
                mask.dimensions(),
                frame.dimensions(),
            ));
        }

        // Weighted Welford update keeps the variance stable for large masks
        let mut weight = 0.0_f64;
        let mut mean = 0.0_f64;
        let mut m2 = 0.0_f64;

        for (x, y, coverage) in mask.covered_pixels() {
            let w = coverage as f64 / 255.0;
            let px = frame.get_pixel(x, y);
            let luma = self.converter.luma(px[0], px[1], px[2]) as f64;

            weight += w;
            let delta = luma - mean;
            mean += delta * w / weight;
            m2 += w * delta * (luma - mean);
        }

        if weight <= 0.0 {
            return Err(AnalysisError::no_face_region(
                "face mask covers no pixels to score",
            ));
        }

        let variance = (m2 / weight).max(0.0);
        Ok(UniformityStats {
            mean,
            variance,
            weight,
            score: self.score_from_variance(variance),
        })
    }

    /// Uniformity score of `frame` restricted to the mask, in [0, 100]
    pub fn score(&self, frame: &RgbaImage, mask: &FaceMask) -> Result<f64> {
        Ok(self.measure(frame, mask)?.score)
    }

    /// Map a variance onto (0, 100]; zero variance scores 100
    pub fn score_from_variance(&self, variance: f64) -> f64 {
        let score = MAX_UNIFORMITY_SCORE / (1.0 + variance.max(0.0) / self.variance_scale);
        score.clamp(0.0, MAX_UNIFORMITY_SCORE)
    }
}
