//! Configuration structures for the drape_scan analysis engine.
//!
//! This module defines all tunable parameters, organized into one
//! section per pipeline stage.
//!
//! # Configuration Loading
//!
//! Configuration can be loaded from JSON files or constructed programmatically:
//!
//! ```no_run
//! use drape_scan::EngineConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = EngineConfig::from_json_file(Path::new("engine.json"))?;
//!
//! // Or use defaults
//! let config = EngineConfig::default();
//! # Ok::<(), drape_scan::AnalysisError>(())
//! ```
//!
//! # Configuration Sections
//!
//! - [`MaskConfig`]: landmark validation and rasterization
//! - [`DrapeConfig`]: fabric placement and metal highlight
//! - [`RankingConfig`]: uniformity scoring
//! - [`PigmentConfig`]: chromophore density scales
//! - [`HeatmapConfig`]: default overlay opacity
//! - [`SynergyConfig`]: skin-condition thresholds

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants;
use crate::error::{AnalysisError, Result};

/// Complete engine configuration.
///
/// Can be serialized to/from JSON for reproducible experiments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub mask: MaskConfig,

    #[serde(default)]
    pub drape: DrapeConfig,

    #[serde(default)]
    pub ranking: RankingConfig,

    #[serde(default)]
    pub pigment: PigmentConfig,

    #[serde(default)]
    pub heatmap: HeatmapConfig,

    #[serde(default)]
    pub synergy: SynergyConfig,
}

/// Face mask parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskConfig {
    /// Minimum number of distinct landmark points
    pub min_points: usize,

    /// Minimum enclosed area in square pixels
    pub min_area: f64,

    /// Sub-scanlines per pixel row (1 disables edge feathering)
    pub subsamples: u32,
}

/// Drape compositing parameters.
///
/// Ratios are relative to the face bounds derived from the mask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrapeConfig {
    /// Gap between chin and drape top as a fraction of face height
    pub neck_gap_ratio: f32,

    /// Rows over which the drape top edge fades in
    pub edge_softness_rows: u32,

    /// Opacity of the flat fabric color (0.0-1.0)
    pub opacity: f32,

    /// Strength of the drape color reflected onto the lower face (0.0-1.0)
    pub bounce_strength: f32,

    /// Fraction of face height, measured up from the chin, reached by the bounce
    pub bounce_reach_ratio: f32,

    /// Metal highlight radius as a fraction of face width
    pub highlight_radius_ratio: f32,
}

/// Palette ranking parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Luma variance at which the uniformity score halves
    pub variance_scale: f64,
}

/// Pigment decomposition parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PigmentConfig {
    /// Red optical density mapped to full melanin intensity
    pub melanin_density_scale: f32,

    /// Green-minus-red optical density mapped to full hemoglobin intensity
    pub erythema_density_scale: f32,

    /// HSV value above which oil shine is detected (0.0-1.0)
    pub sebum_brightness_threshold: f32,
}

/// Heatmap overlay parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapConfig {
    /// Opacity used when the caller does not choose one (0.0-1.0)
    pub default_opacity: f32,
}

/// Synergy rule thresholds on a 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynergyConfig {
    pub high_redness: f32,
    pub low_hydration: f32,
    pub high_oiliness: f32,

    /// Score boost applied to drape results matching the recommendation
    pub match_boost: f32,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            min_points: constants::mask::MIN_LANDMARK_POINTS,
            min_area: constants::mask::MIN_CONTOUR_AREA,
            subsamples: constants::mask::SUBSAMPLES_PER_ROW,
        }
    }
}

impl Default for DrapeConfig {
    fn default() -> Self {
        Self {
            neck_gap_ratio: constants::drape::NECK_GAP_RATIO,
            edge_softness_rows: constants::drape::EDGE_SOFTNESS_ROWS,
            opacity: constants::drape::DRAPE_OPACITY,
            bounce_strength: constants::drape::BOUNCE_STRENGTH,
            bounce_reach_ratio: constants::drape::BOUNCE_REACH_RATIO,
            highlight_radius_ratio: constants::drape::HIGHLIGHT_RADIUS_RATIO,
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            variance_scale: constants::ranking::UNIFORMITY_VARIANCE_SCALE,
        }
    }
}

impl Default for PigmentConfig {
    fn default() -> Self {
        Self {
            melanin_density_scale: constants::pigment::MELANIN_DENSITY_SCALE,
            erythema_density_scale: constants::pigment::ERYTHEMA_DENSITY_SCALE,
            sebum_brightness_threshold: constants::pigment::SEBUM_BRIGHTNESS_THRESHOLD,
        }
    }
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            default_opacity: 0.6,
        }
    }
}

impl Default for SynergyConfig {
    fn default() -> Self {
        Self {
            high_redness: constants::synergy::HIGH_REDNESS_THRESHOLD,
            low_hydration: constants::synergy::LOW_HYDRATION_THRESHOLD,
            high_oiliness: constants::synergy::HIGH_OILINESS_THRESHOLD,
            match_boost: constants::synergy::MATCH_BOOST,
        }
    }
}

impl EngineConfig {
    /// Parse configuration from a JSON string and validate it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| AnalysisError::config("Invalid configuration JSON", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::config(format!("Failed to read {}", path.display()), e)
        })?;
        Self::from_json_str(&content)
    }

    /// Save configuration to JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AnalysisError::config("Failed to serialize configuration", e))?;
        std::fs::write(path, json).map_err(|e| {
            AnalysisError::config(format!("Failed to write {}", path.display()), e)
        })?;
        Ok(())
    }

    /// Reject values outside their meaningful ranges
    pub fn validate(&self) -> Result<()> {
        if self.mask.min_points < constants::mask::MIN_LANDMARK_POINTS {
            return Err(AnalysisError::invalid_parameter(
                "mask.min_points",
                self.mask.min_points,
            ));
        }
        if !(self.mask.min_area.is_finite() && self.mask.min_area >= 0.0) {
            return Err(AnalysisError::invalid_parameter("mask.min_area", self.mask.min_area));
        }
        if self.mask.subsamples == 0 {
            return Err(AnalysisError::invalid_parameter("mask.subsamples", 0));
        }

        check_unit("drape.opacity", self.drape.opacity)?;
        check_unit("drape.bounce_strength", self.drape.bounce_strength)?;
        check_unit("drape.bounce_reach_ratio", self.drape.bounce_reach_ratio)?;
        check_non_negative("drape.neck_gap_ratio", self.drape.neck_gap_ratio)?;
        check_non_negative("drape.highlight_radius_ratio", self.drape.highlight_radius_ratio)?;

        if !(self.ranking.variance_scale.is_finite() && self.ranking.variance_scale > 0.0) {
            return Err(AnalysisError::invalid_parameter(
                "ranking.variance_scale",
                self.ranking.variance_scale,
            ));
        }

        for (name, value) in [
            ("pigment.melanin_density_scale", self.pigment.melanin_density_scale),
            ("pigment.erythema_density_scale", self.pigment.erythema_density_scale),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(AnalysisError::invalid_parameter(name, value));
            }
        }
        // A threshold of exactly 1.0 would leave no range for oil shine
        if !(0.0..1.0).contains(&self.pigment.sebum_brightness_threshold) {
            return Err(AnalysisError::invalid_parameter(
                "pigment.sebum_brightness_threshold",
                self.pigment.sebum_brightness_threshold,
            ));
        }

        check_unit("heatmap.default_opacity", self.heatmap.default_opacity)?;

        for (name, value) in [
            ("synergy.high_redness", self.synergy.high_redness),
            ("synergy.low_hydration", self.synergy.low_hydration),
            ("synergy.high_oiliness", self.synergy.high_oiliness),
            ("synergy.match_boost", self.synergy.match_boost),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(AnalysisError::invalid_parameter(name, value));
            }
        }

        Ok(())
    }
}

fn check_unit(name: &str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(AnalysisError::invalid_parameter(name, value))
    }
}

fn check_non_negative(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AnalysisError::invalid_parameter(name, value))
    }
}
