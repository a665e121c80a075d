//! Pigment heatmap overlays
//!
//! Simulated light modes: each mode picks one pigment map, maps it through
//! a 256-entry color ramp and alpha-blends the result over the face region.
//! Pixels outside the mask are copied through unchanged.
//!
//! Algorithm tag: `algo-gradient-lut-overlay`

use image::{Rgba, RgbaImage};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::HeatmapConfig;
use crate::face::FaceMask;
use crate::pigment::decomposer::{Pigment, PigmentMaps};
use crate::{AnalysisError, Result};

const RAMP_SIZE: usize = 256;

/// Simulated lighting used to inspect the skin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LightMode {
    /// Source image, no overlay
    #[default]
    Normal,
    /// Cross-polarized look: vascular redness
    Polarized,
    /// UV look: pigmentation
    Uv,
    /// Oil shine
    Sebum,
}

impl LightMode {
    pub const ALL: [LightMode; 4] = [
        LightMode::Normal,
        LightMode::Polarized,
        LightMode::Uv,
        LightMode::Sebum,
    ];

    /// Pigment visualized by this mode
    pub fn pigment(&self) -> Option<Pigment> {
        match self {
            LightMode::Normal => None,
            LightMode::Polarized => Some(Pigment::Hemoglobin),
            LightMode::Uv => Some(Pigment::Melanin),
            LightMode::Sebum => Some(Pigment::Sebum),
        }
    }
}

/// Lookup table from intensity to color, built from sorted color stops
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    lut: Vec<[u8; 3]>,
}

impl ColorRamp {
    /// Build from `(offset, color)` stops with offsets in [0, 1]
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if there are fewer than two stops or the
    /// offsets are not ascending within [0, 1]
    pub fn from_stops(stops: &[(f32, [u8; 3])]) -> Result<Self> {
        if stops.len() < 2 {
            return Err(AnalysisError::invalid_parameter("ramp_stops", stops.len()));
        }
        let ascending = stops.windows(2).all(|w| w[0].0 <= w[1].0);
        let in_range = stops.iter().all(|(offset, _)| (0.0..=1.0).contains(offset));
        if !ascending || !in_range {
            return Err(AnalysisError::invalid_parameter(
                "ramp_stops",
                "offsets must ascend within [0, 1]",
            ));
        }

        Ok(Self {
            lut: build_lut(stops),
        })
    }

    fn interpolate(stops: &[(f32, [u8; 3])], t: f32) -> [u8; 3] {
        let first = stops[0];
        let last = stops[stops.len() - 1];
        if t <= first.0 {
            return first.1;
        }
        if t >= last.0 {
            return last.1;
        }

        for pair in stops.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            if t <= end.0 {
                let span = end.0 - start.0;
                let k = if span > 0.0 { (t - start.0) / span } else { 1.0 };
                let mut color = [0u8; 3];
                for c in 0..3 {
                    let a = start.1[c] as f32;
                    let b = end.1[c] as f32;
                    color[c] = (a + (b - a) * k).round().clamp(0.0, 255.0) as u8;
                }
                return color;
            }
        }
        last.1
    }

    /// Color for an intensity in [0, 1]; values outside are clamped
    #[inline]
    pub fn color_at(&self, intensity: f32) -> [u8; 3] {
        let t = if intensity.is_finite() { intensity.clamp(0.0, 1.0) } else { 0.0 };
        self.lut[(t * (RAMP_SIZE - 1) as f32).round() as usize]
    }

    pub fn len(&self) -> usize {
        self.lut.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lut.is_empty()
    }

    /// Pale pink to crimson
    pub fn hemoglobin() -> Self {
        Self {
            lut: build_lut(&[(0.0, [255, 228, 232]), (0.5, [236, 112, 130]), (1.0, [150, 0, 24])]),
        }
    }

    /// Violet to amber
    pub fn melanin() -> Self {
        Self {
            lut: build_lut(&[(0.0, [88, 40, 160]), (0.5, [176, 96, 120]), (1.0, [255, 176, 0])]),
        }
    }

    /// Navy to cyan to yellow-green
    pub fn sebum() -> Self {
        Self {
            lut: build_lut(&[(0.0, [16, 24, 96]), (0.5, [0, 200, 220]), (1.0, [190, 230, 40])]),
        }
    }
}

fn build_lut(stops: &[(f32, [u8; 3])]) -> Vec<[u8; 3]> {
    (0..RAMP_SIZE)
        .map(|i| ColorRamp::interpolate(stops, i as f32 / (RAMP_SIZE - 1) as f32))
        .collect()
}

/// Renders light-mode overlays
#[derive(Debug, Clone)]
pub struct HeatmapRenderer {
    hemoglobin: ColorRamp,
    melanin: ColorRamp,
    sebum: ColorRamp,
    default_opacity: f32,
}

impl Default for HeatmapRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HeatmapRenderer {
    pub fn new() -> Self {
        Self::with_config(&HeatmapConfig::default())
    }

    pub fn with_config(config: &HeatmapConfig) -> Self {
        Self {
            hemoglobin: ColorRamp::hemoglobin(),
            melanin: ColorRamp::melanin(),
            sebum: ColorRamp::sebum(),
            default_opacity: config.default_opacity,
        }
    }

    /// Replace the ramp used for one pigment
    pub fn with_ramp(mut self, pigment: Pigment, ramp: ColorRamp) -> Self {
        match pigment {
            Pigment::Hemoglobin => self.hemoglobin = ramp,
            Pigment::Melanin => self.melanin = ramp,
            Pigment::Sebum => self.sebum = ramp,
        }
        self
    }

    pub fn default_opacity(&self) -> f32 {
        self.default_opacity
    }

    pub fn ramp(&self, pigment: Pigment) -> &ColorRamp {
        match pigment {
            Pigment::Hemoglobin => &self.hemoglobin,
            Pigment::Melanin => &self.melanin,
            Pigment::Sebum => &self.sebum,
        }
    }

    /// Blend the pigment map selected by `mode` over the face region
    ///
    /// `Normal` mode and zero opacity return an exact copy of `image`.
    ///
    /// # Arguments
    ///
    /// * `image` - Source portrait
    /// * `mask` - Face mask; its coverage scales the blend per pixel
    /// * `maps` - Pigment maps on the same grid as `image`
    /// * `mode` - Light mode selecting the pigment and ramp
    /// * `opacity` - Overlay strength in [0, 1]
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` if `opacity` is not within [0, 1]
    /// - `DimensionMismatch` if image, mask and maps differ in size
    pub fn render(
        &self,
        image: &RgbaImage,
        mask: &FaceMask,
        maps: &PigmentMaps,
        mode: LightMode,
        opacity: f32,
    ) -> Result<RgbaImage> {
        if !opacity.is_finite() || !(0.0..=1.0).contains(&opacity) {
            return Err(AnalysisError::invalid_parameter("opacity", opacity));
        }
        if mask.dimensions() != image.dimensions() {
            return Err(AnalysisError::dimension_mismatch(
                image.dimensions(),
                mask.dimensions(),
            ));
        }
        if maps.dimensions() != image.dimensions() {
            return Err(AnalysisError::dimension_mismatch(
                image.dimensions(),
                maps.dimensions(),
            ));
        }

        let mut output = image.clone();
        let pigment = match mode.pigment() {
            Some(pigment) if opacity > 0.0 => pigment,
            _ => return Ok(output),
        };

        let map = maps.get(pigment);
        let ramp = self.ramp(pigment);
        debug!("rendering {:?} heatmap at opacity {:.2}", mode, opacity);

        for (x, y, coverage) in mask.covered_pixels() {
            let weight = opacity * coverage as f32 / 255.0;
            let heat = ramp.color_at(map.get_pixel(x, y)[0]);
            let src = image.get_pixel(x, y).0;

            let mut blended = [0u8; 4];
            for c in 0..3 {
                let s = src[c] as f32;
                blended[c] = (s + (heat[c] as f32 - s) * weight).round().clamp(0.0, 255.0) as u8;
            }
            blended[3] = src[3];
            output.put_pixel(x, y, Rgba(blended));
        }

        Ok(output)
    }

    /// Render at the configured default opacity
    pub fn render_default(
        &self,
        image: &RgbaImage,
        mask: &FaceMask,
        maps: &PigmentMaps,
        mode: LightMode,
    ) -> Result<RgbaImage> {
        self.render(image, mask, maps, mode, self.default_opacity)
    }
}
