//! Device capability descriptor
//!
//! The host application reports a coarse performance tier. The engine only
//! uses it to size the drape palette and to pick a mask builder.

use serde::{Deserialize, Serialize};

use crate::config::MaskConfig;
use crate::drape::PaletteSize;
use crate::face::mask::{ContourMaskBuilder, EllipseMaskBuilder, MaskBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    Low,
    Mid,
    High,
}

/// Opaque capability descriptor supplied by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCapability {
    pub tier: PerformanceTier,
    /// Explicit palette size chosen by the host, overriding the tier default
    #[serde(default)]
    pub palette_size_hint: Option<PaletteSize>,
}

impl DeviceCapability {
    pub fn new(tier: PerformanceTier) -> Self {
        Self {
            tier,
            palette_size_hint: None,
        }
    }

    pub fn with_palette_size(mut self, size: PaletteSize) -> Self {
        self.palette_size_hint = Some(size);
        self
    }

    /// Palette size for a full scan on this device
    pub fn palette_size(&self) -> PaletteSize {
        self.palette_size_hint.unwrap_or(match self.tier {
            PerformanceTier::Low => PaletteSize::Compact,
            PerformanceTier::Mid => PaletteSize::Standard,
            PerformanceTier::High => PaletteSize::Extended,
        })
    }

    /// Mask builder suited to this device
    pub fn mask_builder(&self, config: &MaskConfig) -> Box<dyn MaskBuilder> {
        match self.tier {
            PerformanceTier::Low => Box::new(EllipseMaskBuilder::with_config(config)),
            PerformanceTier::Mid | PerformanceTier::High => {
                Box::new(ContourMaskBuilder::with_config(config))
            }
        }
    }
}

impl Default for DeviceCapability {
    fn default() -> Self {
        Self::new(PerformanceTier::Mid)
    }
}
