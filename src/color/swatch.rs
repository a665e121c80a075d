//! Color swatches and their perceptual character

use palette::{Lab, Lch};
use serde::{Deserialize, Serialize};

use crate::color::ColorConverter;
use crate::constants::synergy::{BRIGHT_MIN_CHROMA, MUTED_MAX_CHROMA};
use crate::Result;

/// A single drape candidate color (8-bit sRGB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Swatch {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Perceptual character of a swatch, used to match synergy directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorCharacter {
    /// Low chroma: dusty, soft, greyed tones
    Muted,
    /// High chroma or a deep, saturated tone
    Bright,
    Neutral,
}

impl Swatch {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a swatch from a hex string such as "#C0392B"
    pub fn from_hex(hex: &str) -> Result<Self> {
        let [r, g, b] = ColorConverter::new().hex_to_rgb(hex)?;
        Ok(Self::new(r, g, b))
    }

    pub fn rgb(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn hex(&self) -> String {
        ColorConverter::new().rgb_to_hex(self.rgb())
    }

    pub fn lab(&self) -> Lab {
        ColorConverter::new().rgb_to_lab(self.r, self.g, self.b)
    }

    pub fn lch(&self) -> Lch {
        ColorConverter::new().lab_to_lch(self.lab())
    }

    /// Scale brightness by `factor`, clamping each channel to 255
    pub fn scaled(&self, factor: f32) -> Self {
        let scale = |c: u8| (c as f32 * factor).round().clamp(0.0, 255.0) as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }

    /// Classify the swatch by LCh chroma
    ///
    /// Deep tones (L* below 35) with moderate chroma also count as bright:
    /// they carry the same high-contrast effect as vivid colors.
    pub fn character(&self) -> ColorCharacter {
        let lch = self.lch();
        if lch.chroma >= BRIGHT_MIN_CHROMA || (lch.l < 35.0 && lch.chroma > MUTED_MAX_CHROMA) {
            ColorCharacter::Bright
        } else if lch.chroma <= MUTED_MAX_CHROMA {
            ColorCharacter::Muted
        } else {
            ColorCharacter::Neutral
        }
    }
}

impl From<[u8; 3]> for Swatch {
    fn from(rgb: [u8; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }
}

impl From<Swatch> for image::Rgba<u8> {
    fn from(swatch: Swatch) -> Self {
        image::Rgba([swatch.r, swatch.g, swatch.b, 255])
    }
}

impl std::fmt::Display for Swatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.hex())
    }
}
