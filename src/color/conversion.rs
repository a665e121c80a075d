//! Color space conversion utilities
//!
//! Provides the conversions used when classifying drape colors:
//! - 8-bit RGB to Lab/LCh (D65)
//! - Hex color representation
//! - Perceptual difference and luma
//!
//! Algorithm tag: `algo-swatch-perception`

use palette::{FromColor, Lab, Lch, Srgb};

use crate::{AnalysisError, Result};

/// Rec.601 luma weights
const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Stateless color converter
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorConverter;

impl ColorConverter {
    pub fn new() -> Self {
        Self
    }

    /// Convert RGB (0-255) to Lab color space under D65
    pub fn rgb_to_lab(&self, r: u8, g: u8, b: u8) -> Lab {
        let srgb = Srgb::new(r, g, b).into_format::<f32>();
        Lab::from_color(srgb)
    }

    /// Convert Lab to LCh (cylindrical representation)
    pub fn lab_to_lch(&self, lab: Lab) -> Lch {
        Lch::from_color(lab)
    }

    /// Format RGB channels as a hexadecimal string (e.g. "#FF0000")
    pub fn rgb_to_hex(&self, rgb: [u8; 3]) -> String {
        format!("#{:02X}{:02X}{:02X}", rgb[0], rgb[1], rgb[2])
    }

    /// Parse a hexadecimal color string ("#FF0000" or "FF0000")
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the string is not six hex digits
    pub fn hex_to_rgb(&self, hex: &str) -> Result<[u8; 3]> {
        let digits = hex.trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(AnalysisError::invalid_parameter("hex_color", hex));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| AnalysisError::invalid_parameter("hex_color", hex))
        };

        Ok([channel(0..2)?, channel(2..4)?, channel(4..6)?])
    }

    /// Compute Delta E (ΔE76, Euclidean distance in Lab)
    pub fn delta_e(&self, lab1: Lab, lab2: Lab) -> f32 {
        let dl = lab1.l - lab2.l;
        let da = lab1.a - lab2.a;
        let db = lab1.b - lab2.b;
        (dl * dl + da * da + db * db).sqrt()
    }

    /// Rec.601 luma of an 8-bit RGB triple, in the 0-255 range
    #[inline]
    pub fn luma(&self, r: u8, g: u8, b: u8) -> f32 {
        LUMA_WEIGHTS[0] * r as f32 + LUMA_WEIGHTS[1] * g as f32 + LUMA_WEIGHTS[2] * b as f32
    }
}
