//! Analysis session
//!
//! Owns the source portrait and its face mask for one analysis and wires
//! every stage with a shared configuration. Dropping the session releases
//! the image, the mask and everything derived from them.

use image::RgbaImage;
use log::info;

use crate::color::Swatch;
use crate::config::EngineConfig;
use crate::drape::{
    generate_palette, CancellationToken, DrapeCompositor, DrapeResult, MetalType, PaletteRanker,
    RankingOutcome,
};
use crate::face::{DeviceCapability, FaceMask, LandmarkProvider, LandmarkSet};
use crate::pigment::{Decomposition, HeatmapRenderer, LightMode, PigmentDecomposer, PigmentMaps};
use crate::synergy::{SkinMetrics, SynergyAdjustment, SynergyEngine, SynergyInsight};
use crate::{AnalysisError, Result};

/// One portrait, one face mask, all analysis stages
#[derive(Debug)]
pub struct AnalysisSession {
    image: RgbaImage,
    mask: FaceMask,
    capability: DeviceCapability,
    compositor: DrapeCompositor,
    ranker: PaletteRanker,
    decomposer: PigmentDecomposer,
    heatmap: HeatmapRenderer,
    synergy: SynergyEngine,
}

impl AnalysisSession {
    /// Build the face mask from `landmarks` with the builder suited to the device
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` if the configuration is out of range
    /// - `InvalidLandmarks` if the contour fails the configured limits
    /// - `NoFaceRegion` if the landmarks cover no pixel of the image
    pub fn new(
        image: RgbaImage,
        landmarks: &LandmarkSet,
        capability: DeviceCapability,
        config: EngineConfig,
    ) -> Result<Self> {
        config.validate()?;
        let landmarks = LandmarkSet::with_limits(
            landmarks.points().to_vec(),
            config.mask.min_points,
            config.mask.min_area,
        )?;
        let builder = capability.mask_builder(&config.mask);
        let mask = builder.build(&landmarks, image.width(), image.height())?;
        info!(
            "session mask built with {} builder: {:.1}% coverage",
            builder.name(),
            mask.coverage_ratio() * 100.0
        );
        Self::with_mask(image, mask, capability, config)
    }

    /// Detect landmarks with `provider`, then build the session
    pub fn from_provider(
        image: RgbaImage,
        provider: &dyn LandmarkProvider,
        capability: DeviceCapability,
        config: EngineConfig,
    ) -> Result<Self> {
        let landmarks = provider.detect(&image)?;
        Self::new(image, &landmarks, capability, config)
    }

    /// Use an already built mask
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` if the configuration is out of range
    /// - `DimensionMismatch` if mask and image sizes differ
    /// - `NoFaceRegion` if the mask is empty
    pub fn with_mask(
        image: RgbaImage,
        mask: FaceMask,
        capability: DeviceCapability,
        config: EngineConfig,
    ) -> Result<Self> {
        config.validate()?;
        if mask.dimensions() != image.dimensions() {
            return Err(AnalysisError::dimension_mismatch(
                image.dimensions(),
                mask.dimensions(),
            ));
        }
        mask.require_coverage()?;

        Ok(Self {
            image,
            mask,
            capability,
            compositor: DrapeCompositor::with_config(config.drape.clone()),
            ranker: PaletteRanker::with_config(config.drape.clone(), &config.ranking)?,
            decomposer: PigmentDecomposer::with_config(&config.pigment),
            heatmap: HeatmapRenderer::with_config(&config.heatmap),
            synergy: SynergyEngine::with_config(config.synergy),
        })
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn mask(&self) -> &FaceMask {
        &self.mask
    }

    pub fn capability(&self) -> &DeviceCapability {
        &self.capability
    }

    /// Palette sized for this device
    pub fn palette(&self) -> Vec<Swatch> {
        generate_palette(self.capability.palette_size())
    }

    /// Single-color drape preview
    pub fn preview(&self, color: Swatch, metal: MetalType) -> Result<RgbaImage> {
        self.compositor.render(&self.image, color, &self.mask, metal)
    }

    /// Rank the device-sized palette
    pub fn rank<F>(&self, metal: MetalType, on_progress: F, cancel: &CancellationToken) -> Result<RankingOutcome>
    where
        F: FnMut(usize, usize),
    {
        let palette = self.palette();
        self.rank_palette(&palette, metal, on_progress, cancel)
    }

    /// Rank a caller-supplied palette
    pub fn rank_palette<F>(
        &self,
        palette: &[Swatch],
        metal: MetalType,
        on_progress: F,
        cancel: &CancellationToken,
    ) -> Result<RankingOutcome>
    where
        F: FnMut(usize, usize),
    {
        self.ranker
            .rank(&self.image, &self.mask, palette, metal, on_progress, cancel)
    }

    pub fn decompose(&self) -> Result<Decomposition> {
        self.decomposer.decompose(&self.image, &self.mask)
    }

    /// Light-mode overlay; `None` uses the configured default opacity
    pub fn heatmap(&self, maps: &PigmentMaps, mode: LightMode, opacity: Option<f32>) -> Result<RgbaImage> {
        match opacity {
            Some(opacity) => self.heatmap.render(&self.image, &self.mask, maps, mode, opacity),
            None => self.heatmap.render_default(&self.image, &self.mask, maps, mode),
        }
    }

    pub fn insight(&self, metrics: impl Into<SkinMetrics>) -> Result<SynergyInsight> {
        self.synergy.insight(&metrics.into())
    }

    pub fn apply_insight(&self, results: &[DrapeResult], insight: &SynergyInsight) -> SynergyAdjustment {
        self.synergy.apply_insight(results, insight)
    }

    /// Release the session, returning the image and mask
    pub fn into_parts(self) -> (RgbaImage, FaceMask) {
        (self.image, self.mask)
    }
}
