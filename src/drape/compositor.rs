//! Single-color drape compositing
//!
//! Renders one candidate color as fabric draped below the face:
//! - Flat fabric color below the chin line, never over face pixels
//! - Soft fade-in along the drape's top edge
//! - Faint reflection of the fabric color onto the lower face
//! - Radial metal highlight around the chin (gold, silver, rose-gold)
//!
//! The source image is never modified; output goes to a separate surface.
//!
//! Algorithm tag: `algo-drape-composite`

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::color::Swatch;
use crate::config::DrapeConfig;
use crate::constants::drape::{
    GOLD_INTENSITY, GOLD_TINT, ROSE_GOLD_INTENSITY, ROSE_GOLD_TINT, SILVER_INTENSITY, SILVER_TINT,
};
use crate::face::{FaceMask, MaskBounds};
use crate::{AnalysisError, Result};

/// Jewelry metal whose reflectance is simulated near the chin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MetalType {
    Gold,
    Silver,
    RoseGold,
    #[default]
    None,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum HighlightBlend {
    /// Warm metals add their tint on top of the skin
    Additive,
    /// Cool metals pull the pixel toward a bright neutral
    Lift,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct MetalHighlight {
    tint: [f32; 3],
    intensity: f32,
    blend: HighlightBlend,
}

impl MetalType {
    pub const ALL: [MetalType; 4] = [
        MetalType::Gold,
        MetalType::Silver,
        MetalType::RoseGold,
        MetalType::None,
    ];

    fn highlight(&self) -> Option<MetalHighlight> {
        let (tint, intensity, blend) = match self {
            MetalType::Gold => (GOLD_TINT, GOLD_INTENSITY, HighlightBlend::Additive),
            MetalType::RoseGold => (ROSE_GOLD_TINT, ROSE_GOLD_INTENSITY, HighlightBlend::Additive),
            MetalType::Silver => (SILVER_TINT, SILVER_INTENSITY, HighlightBlend::Lift),
            MetalType::None => return None,
        };
        Some(MetalHighlight {
            tint: tint.map(|c| c as f32),
            intensity,
            blend,
        })
    }
}

/// Placement of the drape relative to the face, derived once per mask
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrapeGeometry {
    pub face: MaskBounds,
    /// Bottom edge of the lowest covered mask row
    pub chin_y: f32,
    /// First row (in pixel-center coordinates) where fabric begins
    pub drape_top: f32,
    /// Height above which the fabric reflection no longer reaches
    pub bounce_top: f32,
    /// Center of the metal highlight
    pub anchor: (f32, f32),
    pub highlight_radius: f32,
}

impl DrapeGeometry {
    /// Derive drape placement from the face mask
    ///
    /// # Errors
    ///
    /// Returns `NoFaceRegion` if the mask covers no pixels
    pub fn from_mask(mask: &FaceMask, config: &DrapeConfig) -> Result<Self> {
        let face = mask.bounds().ok_or_else(|| {
            AnalysisError::no_face_region("cannot place a drape without a face region")
        })?;

        let face_height = face.height() as f32;
        let chin_y = face.max_y as f32 + 1.0;

        Ok(Self {
            face,
            chin_y,
            drape_top: chin_y + config.neck_gap_ratio * face_height,
            bounce_top: chin_y - config.bounce_reach_ratio * face_height,
            anchor: (face.center_x(), chin_y),
            highlight_radius: config.highlight_radius_ratio * face.width() as f32,
        })
    }
}

/// Renders single-color drape previews
///
/// Fabric never covers face pixels, but the face is not left byte-identical:
/// the lower face picks up a faint reflection of the fabric color
/// (`DrapeConfig::bounce_strength`) and the chin area picks up the metal
/// highlight. Set `bounce_strength` to 0 with `MetalType::None` to keep
/// every fully covered face pixel unchanged.
#[derive(Debug, Clone)]
pub struct DrapeCompositor {
    config: DrapeConfig,
}

impl Default for DrapeCompositor {
    fn default() -> Self {
        Self::new()
    }
}

impl DrapeCompositor {
    pub fn new() -> Self {
        Self::with_config(DrapeConfig::default())
    }

    pub fn with_config(config: DrapeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DrapeConfig {
        &self.config
    }

    pub fn geometry(&self, mask: &FaceMask) -> Result<DrapeGeometry> {
        DrapeGeometry::from_mask(mask, &self.config)
    }

    /// Render `color` draped below the face onto a new surface
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if image and mask sizes differ
    /// - `NoFaceRegion` if the mask is empty
    pub fn render(
        &self,
        image: &RgbaImage,
        color: Swatch,
        mask: &FaceMask,
        metal: MetalType,
    ) -> Result<RgbaImage> {
        let mut target = RgbaImage::new(image.width(), image.height());
        self.render_into(image, color, mask, metal, &mut target)?;
        Ok(target)
    }

    /// Render into a caller-owned surface of the same size as `image`
    pub fn render_into(
        &self,
        image: &RgbaImage,
        color: Swatch,
        mask: &FaceMask,
        metal: MetalType,
        target: &mut RgbaImage,
    ) -> Result<()> {
        let geometry = self.geometry(mask)?;
        self.render_with_geometry(image, color, mask, metal, &geometry, target)
    }

    /// Render with precomputed geometry; used by palette scans
    pub fn render_with_geometry(
        &self,
        image: &RgbaImage,
        color: Swatch,
        mask: &FaceMask,
        metal: MetalType,
        geometry: &DrapeGeometry,
        target: &mut RgbaImage,
    ) -> Result<()> {
        if mask.dimensions() != image.dimensions() {
            return Err(AnalysisError::dimension_mismatch(
                image.dimensions(),
                mask.dimensions(),
            ));
        }
        if target.dimensions() != image.dimensions() {
            return Err(AnalysisError::dimension_mismatch(
                image.dimensions(),
                target.dimensions(),
            ));
        }

        let fabric = color.rgb().map(|c| c as f32);
        let highlight = metal.highlight();
        let softness = self.config.edge_softness_rows as f32;
        let bounce_span = (geometry.chin_y - geometry.bounce_top).max(f32::EPSILON);

        for (x, y, out) in target.enumerate_pixels_mut() {
            let src = image.get_pixel(x, y);
            let mut rgb = [src[0] as f32, src[1] as f32, src[2] as f32];
            let mut alpha = src[3] as f32;

            let coverage = mask.coverage(x, y) as f32 / 255.0;
            let (cx, cy) = (x as f32 + 0.5, y as f32 + 0.5);

            if coverage > 0.0 && self.config.bounce_strength > 0.0 && cy > geometry.bounce_top {
                let t = ((cy - geometry.bounce_top) / bounce_span).clamp(0.0, 1.0);
                mix(&mut rgb, &fabric, self.config.bounce_strength * t * coverage);
            }

            if cy >= geometry.drape_top && coverage < 1.0 {
                let fade = if softness > 0.0 {
                    ((cy - geometry.drape_top) / softness + 0.5).min(1.0)
                } else {
                    1.0
                };
                let a = self.config.opacity * fade * (1.0 - coverage);
                mix(&mut rgb, &fabric, a);
                alpha += (255.0 - alpha) * a;
            }

            if let Some(h) = highlight {
                if geometry.highlight_radius > 0.0 {
                    let d = ((cx - geometry.anchor.0).powi(2) + (cy - geometry.anchor.1).powi(2)).sqrt();
                    if d < geometry.highlight_radius {
                        let falloff = 1.0 - d / geometry.highlight_radius;
                        let strength = h.intensity * falloff * falloff;
                        match h.blend {
                            HighlightBlend::Additive => {
                                for (c, t) in rgb.iter_mut().zip(h.tint.iter()) {
                                    *c += t * strength;
                                }
                            }
                            HighlightBlend::Lift => mix(&mut rgb, &h.tint, strength),
                        }
                    }
                }
            }

            *out = Rgba([
                to_channel(rgb[0]),
                to_channel(rgb[1]),
                to_channel(rgb[2]),
                to_channel(alpha),
            ]);
        }

        Ok(())
    }
}

#[inline]
fn mix(rgb: &mut [f32; 3], target: &[f32; 3], amount: f32) {
    for (c, t) in rgb.iter_mut().zip(target.iter()) {
        *c += (t - *c) * amount;
    }
}

#[inline]
fn to_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
