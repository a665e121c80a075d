//! Pigment decomposition
//!
//! Approximates three skin chromophores from a single RGB exposure:
//! - Melanin from red-channel optical density
//! - Hemoglobin from the green-over-red density excess (erythema)
//! - Sebum from bright, desaturated specular shine
//!
//! The per-pixel model is a replaceable strategy (`PigmentModel`). Maps are
//! zero outside the face mask and the summary means are coverage-weighted.
//!
//! Algorithm tag: `algo-optical-density-decomposition`

use image::{ImageBuffer, Luma, RgbaImage};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::PigmentConfig;
use crate::constants::pigment::MIN_REFLECTANCE;
use crate::face::FaceMask;
use crate::{AnalysisError, Result};

/// Per-pixel intensity buffer with values in [0, 1]
pub type IntensityMap = ImageBuffer<Luma<f32>, Vec<f32>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pigment {
    Melanin,
    Hemoglobin,
    Sebum,
}

/// Chromophore intensities of one pixel
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PigmentSample {
    pub melanin: f32,
    pub hemoglobin: f32,
    pub sebum: f32,
}

/// Strategy converting an RGB pixel into chromophore intensities
pub trait PigmentModel: std::fmt::Debug + Send + Sync {
    /// Intensities for one pixel, each in [0, 1]
    fn sample(&self, r: u8, g: u8, b: u8) -> PigmentSample;

    fn name(&self) -> &'static str;
}

/// Log-reflectance model over sRGB channels
#[derive(Debug, Clone, PartialEq)]
pub struct OpticalDensityModel {
    melanin_density_scale: f32,
    erythema_density_scale: f32,
    sebum_brightness_threshold: f32,
}

impl Default for OpticalDensityModel {
    fn default() -> Self {
        Self::new()
    }
}

impl OpticalDensityModel {
    pub fn new() -> Self {
        Self::with_config(&PigmentConfig::default())
    }

    pub fn with_config(config: &PigmentConfig) -> Self {
        Self {
            melanin_density_scale: config.melanin_density_scale,
            erythema_density_scale: config.erythema_density_scale,
            sebum_brightness_threshold: config.sebum_brightness_threshold,
        }
    }

    fn optical_density(channel: u8) -> f32 {
        let reflectance = (channel as f32 / 255.0).max(MIN_REFLECTANCE);
        -reflectance.log10()
    }
}

impl PigmentModel for OpticalDensityModel {
    fn sample(&self, r: u8, g: u8, b: u8) -> PigmentSample {
        let od_red = Self::optical_density(r);
        let od_green = Self::optical_density(g);

        let melanin = od_red / self.melanin_density_scale;
        let hemoglobin = (od_green - od_red) / self.erythema_density_scale;

        let max = r.max(g).max(b) as f32;
        let min = r.min(g).min(b) as f32;
        let value = max / 255.0;
        let saturation = if max > 0.0 { (max - min) / max } else { 0.0 };
        let shine = (value - self.sebum_brightness_threshold) / (1.0 - self.sebum_brightness_threshold);
        let sebum = shine.clamp(0.0, 1.0) * (1.0 - saturation);

        PigmentSample {
            melanin: melanin.clamp(0.0, 1.0),
            hemoglobin: hemoglobin.clamp(0.0, 1.0),
            sebum: sebum.clamp(0.0, 1.0),
        }
    }

    fn name(&self) -> &'static str {
        "optical_density"
    }
}

/// The three intensity maps, sized like the source image
#[derive(Debug, Clone, PartialEq)]
pub struct PigmentMaps {
    pub melanin: IntensityMap,
    pub hemoglobin: IntensityMap,
    pub sebum: IntensityMap,
}

impl PigmentMaps {
    /// Zero-filled maps
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            melanin: IntensityMap::new(width, height),
            hemoglobin: IntensityMap::new(width, height),
            sebum: IntensityMap::new(width, height),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.melanin.dimensions()
    }

    pub fn get(&self, pigment: Pigment) -> &IntensityMap {
        match pigment {
            Pigment::Melanin => &self.melanin,
            Pigment::Hemoglobin => &self.hemoglobin,
            Pigment::Sebum => &self.sebum,
        }
    }

    /// Sample at one pixel; zero outside the grid
    pub fn sample(&self, x: u32, y: u32) -> PigmentSample {
        let (width, height) = self.dimensions();
        if x >= width || y >= height {
            return PigmentSample::default();
        }
        PigmentSample {
            melanin: self.melanin.get_pixel(x, y)[0],
            hemoglobin: self.hemoglobin.get_pixel(x, y)[0],
            sebum: self.sebum.get_pixel(x, y)[0],
        }
    }
}

/// Coverage-weighted means over the face region
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PigmentSummary {
    pub melanin: f32,
    pub hemoglobin: f32,
    pub sebum: f32,
}

impl PigmentSummary {
    pub fn new(melanin: f32, hemoglobin: f32, sebum: f32) -> Self {
        Self {
            melanin,
            hemoglobin,
            sebum,
        }
    }

    pub fn get(&self, pigment: Pigment) -> f32 {
        match pigment {
            Pigment::Melanin => self.melanin,
            Pigment::Hemoglobin => self.hemoglobin,
            Pigment::Sebum => self.sebum,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    pub maps: PigmentMaps,
    pub summary: PigmentSummary,
}

/// Decomposes the masked face region into pigment maps
#[derive(Debug)]
pub struct PigmentDecomposer {
    model: Box<dyn PigmentModel>,
}

impl Default for PigmentDecomposer {
    fn default() -> Self {
        Self::new()
    }
}

impl PigmentDecomposer {
    pub fn new() -> Self {
        Self::with_config(&PigmentConfig::default())
    }

    pub fn with_config(config: &PigmentConfig) -> Self {
        Self::with_model(Box::new(OpticalDensityModel::with_config(config)))
    }

    pub fn with_model(model: Box<dyn PigmentModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &'static str {
        self.model.name()
    }

    /// Build the three maps and their masked means
    ///
    /// # Arguments
    ///
    /// * `image` - Source portrait; alpha is ignored
    /// * `mask` - Face mask; pixels outside it stay at zero intensity
    ///
    /// # Returns
    ///
    /// Per-pixel maps in [0, 1] and a summary weighted by mask coverage
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if image and mask sizes differ
    /// - `NoFaceRegion` if the mask covers no pixels
    pub fn decompose(&self, image: &RgbaImage, mask: &FaceMask) -> Result<Decomposition> {
        if image.dimensions() != mask.dimensions() {
            return Err(AnalysisError::dimension_mismatch(
                image.dimensions(),
                mask.dimensions(),
            ));
        }
        mask.require_coverage()?;

        let (width, height) = image.dimensions();
        let mut maps = PigmentMaps::new(width, height);
        let mut totals = [0.0f64; 3];
        let mut weight_sum = 0.0f64;

        for (x, y, coverage) in mask.covered_pixels() {
            let [r, g, b, _] = image.get_pixel(x, y).0;
            let sample = self.model.sample(r, g, b);

            maps.melanin.put_pixel(x, y, Luma([sample.melanin]));
            maps.hemoglobin.put_pixel(x, y, Luma([sample.hemoglobin]));
            maps.sebum.put_pixel(x, y, Luma([sample.sebum]));

            let weight = coverage as f64 / 255.0;
            totals[0] += weight * sample.melanin as f64;
            totals[1] += weight * sample.hemoglobin as f64;
            totals[2] += weight * sample.sebum as f64;
            weight_sum += weight;
        }

        if weight_sum <= 0.0 {
            return Err(AnalysisError::no_face_region("face mask has zero total coverage"));
        }

        let mean = |total: f64| ((total / weight_sum) as f32).clamp(0.0, 1.0);
        let summary = PigmentSummary::new(mean(totals[0]), mean(totals[1]), mean(totals[2]));

        debug!("decomposed {} face pixels with {}", mask.covered_count(), self.model.name());
        info!(
            "pigment summary: melanin {:.3}, hemoglobin {:.3}, sebum {:.3}",
            summary.melanin, summary.hemoglobin, summary.sebum
        );

        Ok(Decomposition { maps, summary })
    }
}
