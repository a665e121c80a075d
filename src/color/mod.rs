//! Color analysis and conversion module
//!
//! This module handles color space conversions, drape swatches and their
//! perceptual character, and the uniformity statistics used to rank them.

pub mod conversion;
pub mod analysis;
pub mod swatch;

pub use conversion::ColorConverter;
pub use analysis::{UniformityScorer, UniformityStats};
pub use swatch::{ColorCharacter, Swatch};
