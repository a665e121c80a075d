//! Seasonal drape palettes
//!
//! The base set holds sixteen colors, four per season. Larger palettes
//! add brightness-scaled variants of every base color.

use serde::{Deserialize, Serialize};

use crate::color::Swatch;
use crate::constants::palette::{BASE_COLOR_COUNT, MAX_BRIGHTNESS_FACTOR, MIN_BRIGHTNESS_FACTOR};
use crate::{AnalysisError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

/// A base palette entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonalColor {
    pub name: &'static str,
    pub season: Season,
    pub swatch: Swatch,
}

const fn seasonal(name: &'static str, season: Season, r: u8, g: u8, b: u8) -> SeasonalColor {
    SeasonalColor {
        name,
        season,
        swatch: Swatch::new(r, g, b),
    }
}

/// The sixteen seasonal base colors, in palette order
pub const SEASONAL_BASE: [SeasonalColor; BASE_COLOR_COUNT] = [
    seasonal("coral", Season::Spring, 0xFF, 0x7F, 0x50),
    seasonal("golden yellow", Season::Spring, 0xFF, 0xC8, 0x45),
    seasonal("warm turquoise", Season::Spring, 0x40, 0xC9, 0xB5),
    seasonal("apple green", Season::Spring, 0x8D, 0xB6, 0x00),
    seasonal("powder blue", Season::Summer, 0x9B, 0xB7, 0xD4),
    seasonal("lavender", Season::Summer, 0xB4, 0xA7, 0xD6),
    seasonal("dusty rose", Season::Summer, 0xD4, 0xA5, 0xA5),
    seasonal("slate grey", Season::Summer, 0x70, 0x80, 0x90),
    seasonal("rust", Season::Autumn, 0xB7, 0x41, 0x0E),
    seasonal("olive", Season::Autumn, 0x70, 0x82, 0x38),
    seasonal("mustard", Season::Autumn, 0xD4, 0xA0, 0x17),
    seasonal("camel", Season::Autumn, 0xC1, 0x9A, 0x6B),
    seasonal("true red", Season::Winter, 0xC8, 0x10, 0x2E),
    seasonal("royal blue", Season::Winter, 0x41, 0x69, 0xE1),
    seasonal("emerald", Season::Winter, 0x00, 0x9B, 0x77),
    seasonal("deep fuchsia", Season::Winter, 0xC7, 0x15, 0x85),
];

/// Supported palette sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum PaletteSize {
    /// The base set only
    Compact,
    /// Four variants per base color
    Standard,
    /// Eight variants per base color
    Extended,
}

impl PaletteSize {
    pub fn count(&self) -> usize {
        match self {
            PaletteSize::Compact => 16,
            PaletteSize::Standard => 64,
            PaletteSize::Extended => 128,
        }
    }

    pub fn variants_per_base(&self) -> usize {
        self.count() / BASE_COLOR_COUNT
    }
}

impl TryFrom<usize> for PaletteSize {
    type Error = AnalysisError;

    fn try_from(size: usize) -> Result<Self> {
        match size {
            16 => Ok(PaletteSize::Compact),
            64 => Ok(PaletteSize::Standard),
            128 => Ok(PaletteSize::Extended),
            other => Err(AnalysisError::invalid_parameter("palette_size", other)),
        }
    }
}

impl From<PaletteSize> for usize {
    fn from(size: PaletteSize) -> Self {
        size.count()
    }
}

/// The base swatches in their original order
pub fn base_palette() -> Vec<Swatch> {
    SEASONAL_BASE.iter().map(|c| c.swatch).collect()
}

/// Build a palette of exactly `size.count()` swatches
///
/// `Compact` returns the base set unchanged. Larger sizes replace each base
/// color by `size / 16` brightness variants at evenly spaced factors, in
/// base-color order.
pub fn generate_palette(size: PaletteSize) -> Vec<Swatch> {
    let variants = size.variants_per_base();
    if variants <= 1 {
        return base_palette();
    }

    let step = (MAX_BRIGHTNESS_FACTOR - MIN_BRIGHTNESS_FACTOR) / (variants - 1) as f32;
    let mut palette: Vec<Swatch> = SEASONAL_BASE
        .iter()
        .flat_map(|base| {
            (0..variants).map(move |i| base.swatch.scaled(MIN_BRIGHTNESS_FACTOR + step * i as f32))
        })
        .collect();
    palette.truncate(size.count());
    palette
}

/// Name of a base color, if `swatch` is one
pub fn base_color_name(swatch: &Swatch) -> Option<&'static str> {
    SEASONAL_BASE.iter().find(|c| c.swatch == *swatch).map(|c| c.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_is_base_set_in_order() {
        let palette = generate_palette(PaletteSize::Compact);
        assert_eq!(palette, base_palette());
        assert_eq!(palette[0], Swatch::new(0xFF, 0x7F, 0x50));
        assert_eq!(palette[15], Swatch::new(0xC7, 0x15, 0x85));
    }

    #[test]
    fn test_exact_sizes() {
        assert_eq!(generate_palette(PaletteSize::Standard).len(), 64);
        assert_eq!(generate_palette(PaletteSize::Extended).len(), 128);
    }

    #[test]
    fn test_variants_are_base_major_and_brightening() {
        let palette = generate_palette(PaletteSize::Standard);
        let coral = SEASONAL_BASE[0].swatch;

        assert_eq!(palette[0], coral.scaled(0.6));
        assert_eq!(palette[3], coral.scaled(1.4));
        assert_eq!(palette[4], SEASONAL_BASE[1].swatch.scaled(0.6));

        let luma = |s: &Swatch| s.r as u32 + s.g as u32 + s.b as u32;
        for chunk in palette.chunks(4) {
            assert!(chunk.windows(2).all(|w| luma(&w[0]) <= luma(&w[1])));
        }
    }

    #[test]
    fn test_size_parsing() {
        assert_eq!(PaletteSize::try_from(64).unwrap(), PaletteSize::Standard);
        assert!(matches!(
            PaletteSize::try_from(32),
            Err(AnalysisError::InvalidParameter { .. })
        ));
        assert_eq!(usize::from(PaletteSize::Extended), 128);
    }

    #[test]
    fn test_base_color_names() {
        assert_eq!(base_color_name(&Swatch::new(0x41, 0x69, 0xE1)), Some("royal blue"));
        assert_eq!(base_color_name(&Swatch::new(1, 2, 3)), None);
    }

    #[test]
    fn test_one_base_color_per_season_block() {
        let seasons: Vec<Season> = SEASONAL_BASE.iter().map(|c| c.season).collect();
        assert!(seasons[0..4].iter().all(|s| *s == Season::Spring));
        assert!(seasons[12..16].iter().all(|s| *s == Season::Winter));
    }
}
