//! Skin-condition synergy rules
//!
//! Maps skin metrics (measured externally or derived from a pigment
//! summary) to a color direction, then re-weights a drape ranking toward
//! colors of that character. Rules are evaluated in order and the first
//! match wins:
//!
//! | Condition                         | Direction | Reason          |
//! |-----------------------------------|-----------|-----------------|
//! | redness or sensitivity >= 70      | muted     | `high_redness`  |
//! | hydration <= 35                   | bright    | `low_hydration` |
//! | oiliness >= 65                    | bright    | `high_oiliness` |
//! | otherwise                         | neutral   | `normal`        |
//!
//! Algorithm tag: `algo-threshold-rules`

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::color::ColorCharacter;
use crate::config::SynergyConfig;
use crate::constants::ranking::MAX_UNIFORMITY_SCORE;
use crate::drape::{sort_results, DrapeResult};
use crate::pigment::PigmentSummary;
use crate::{AnalysisError, Result};

const METRIC_SCALE: f32 = 100.0;

/// Recommended shift of the drape palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorAdjustment {
    Muted,
    Bright,
    Neutral,
}

impl ColorAdjustment {
    /// Whether a swatch of this character follows the recommendation
    pub fn favors(&self, character: ColorCharacter) -> bool {
        matches!(
            (self, character),
            (ColorAdjustment::Muted, ColorCharacter::Muted)
                | (ColorAdjustment::Bright, ColorCharacter::Bright)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    HighRedness,
    LowHydration,
    HighOiliness,
    Normal,
}

impl ReasonCode {
    pub fn message(&self) -> &'static str {
        match self {
            ReasonCode::HighRedness => {
                "Redness is elevated. Softer, muted colors will calm the complexion."
            }
            ReasonCode::LowHydration => {
                "Skin looks dehydrated. Brighter colors will bring back some radiance."
            }
            ReasonCode::HighOiliness => {
                "Oil shine is high. Bright, deeper tones will balance the glow."
            }
            ReasonCode::Normal => "Skin condition is balanced. Your color ranking stands as is.",
        }
    }

    pub fn color_adjustment(&self) -> ColorAdjustment {
        match self {
            ReasonCode::HighRedness => ColorAdjustment::Muted,
            ReasonCode::LowHydration | ReasonCode::HighOiliness => ColorAdjustment::Bright,
            ReasonCode::Normal => ColorAdjustment::Neutral,
        }
    }
}

/// Skin-analysis scores on a 0-100 scale; `None` means not measured
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SkinMetrics {
    #[serde(default)]
    pub hydration: Option<f32>,
    #[serde(default)]
    pub oiliness: Option<f32>,
    #[serde(default)]
    pub redness: Option<f32>,
    #[serde(default)]
    pub sensitivity: Option<f32>,
}

impl SkinMetrics {
    fn validate(&self) -> Result<()> {
        let fields = [
            ("hydration", self.hydration),
            ("oiliness", self.oiliness),
            ("redness", self.redness),
            ("sensitivity", self.sensitivity),
        ];
        for (name, value) in fields {
            if let Some(v) = value {
                if !v.is_finite() || !(0.0..=METRIC_SCALE).contains(&v) {
                    return Err(AnalysisError::invalid_parameter(name, v));
                }
            }
        }
        Ok(())
    }
}

/// Hemoglobin stands in for redness and sebum for oiliness; hydration and
/// sensitivity cannot be read from pigments.
impl From<PigmentSummary> for SkinMetrics {
    fn from(summary: PigmentSummary) -> Self {
        Self {
            hydration: None,
            oiliness: Some(summary.sebum.clamp(0.0, 1.0) * METRIC_SCALE),
            redness: Some(summary.hemoglobin.clamp(0.0, 1.0) * METRIC_SCALE),
            sensitivity: None,
        }
    }
}

impl From<&PigmentSummary> for SkinMetrics {
    fn from(summary: &PigmentSummary) -> Self {
        Self::from(*summary)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynergyInsight {
    pub color_adjustment: ColorAdjustment,
    pub message: String,
    pub reason_code: ReasonCode,
    /// How far past its threshold the triggering metric lies, 0.5-1.0
    pub confidence: Option<f32>,
}

impl SynergyInsight {
    fn from_reason(reason_code: ReasonCode, confidence: Option<f32>) -> Self {
        Self {
            color_adjustment: reason_code.color_adjustment(),
            message: reason_code.message().to_string(),
            reason_code,
            confidence,
        }
    }
}

/// A ranking re-weighted by an insight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynergyAdjustment {
    pub adjusted_best_colors: Vec<DrapeResult>,
}

/// Deterministic rule engine over skin metrics
#[derive(Debug, Clone, Default)]
pub struct SynergyEngine {
    config: SynergyConfig,
}

impl SynergyEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SynergyConfig) -> Self {
        Self { config }
    }

    /// Derive an insight from skin metrics
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if a metric is outside [0, 100]
    pub fn insight(&self, metrics: &SkinMetrics) -> Result<SynergyInsight> {
        metrics.validate()?;
        let cfg = &self.config;

        let irritation = match (metrics.redness, metrics.sensitivity) {
            (Some(r), Some(s)) => Some(r.max(s)),
            (r, s) => r.or(s),
        };

        let insight = if let Some(v) = irritation.filter(|v| *v >= cfg.high_redness) {
            let confidence = rising_confidence(v, cfg.high_redness);
            SynergyInsight::from_reason(ReasonCode::HighRedness, Some(confidence))
        } else if let Some(v) = metrics.hydration.filter(|v| *v <= cfg.low_hydration) {
            let confidence = falling_confidence(v, cfg.low_hydration);
            SynergyInsight::from_reason(ReasonCode::LowHydration, Some(confidence))
        } else if let Some(v) = metrics.oiliness.filter(|v| *v >= cfg.high_oiliness) {
            let confidence = rising_confidence(v, cfg.high_oiliness);
            SynergyInsight::from_reason(ReasonCode::HighOiliness, Some(confidence))
        } else {
            SynergyInsight::from_reason(ReasonCode::Normal, None)
        };

        info!(
            "synergy insight: {:?} ({:?})",
            insight.color_adjustment, insight.reason_code
        );
        Ok(insight)
    }

    /// Derive an insight from a pigment summary
    pub fn insight_from_summary(&self, summary: &PigmentSummary) -> Result<SynergyInsight> {
        self.insight(&SkinMetrics::from(summary))
    }

    /// Boost results whose color follows the insight, then re-rank
    ///
    /// Matching colors gain the configured boost, capped at 100. A neutral
    /// insight returns the ranking unchanged.
    pub fn apply_insight(&self, results: &[DrapeResult], insight: &SynergyInsight) -> SynergyAdjustment {
        let mut adjusted = results.to_vec();
        if insight.color_adjustment == ColorAdjustment::Neutral {
            return SynergyAdjustment {
                adjusted_best_colors: adjusted,
            };
        }

        let mut boosted = 0;
        for result in adjusted.iter_mut() {
            if insight.color_adjustment.favors(result.color.character()) {
                result.uniformity_score = (result.uniformity_score + self.config.match_boost as f64)
                    .min(MAX_UNIFORMITY_SCORE);
                boosted += 1;
            }
        }
        sort_results(&mut adjusted);
        debug!("boosted {} of {} colors toward {:?}", boosted, adjusted.len(), insight.color_adjustment);

        SynergyAdjustment {
            adjusted_best_colors: adjusted,
        }
    }
}

fn rising_confidence(value: f32, threshold: f32) -> f32 {
    let range = METRIC_SCALE - threshold;
    if range <= 0.0 {
        return 1.0;
    }
    (0.5 + 0.5 * (value - threshold) / range).clamp(0.5, 1.0)
}

fn falling_confidence(value: f32, threshold: f32) -> f32 {
    if threshold <= 0.0 {
        return 1.0;
    }
    (0.5 + 0.5 * (threshold - value) / threshold).clamp(0.5, 1.0)
}
