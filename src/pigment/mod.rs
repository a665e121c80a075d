//! Pigment analysis module
//!
//! Decomposes the face region into melanin, hemoglobin and sebum intensity
//! maps and renders them as simulated light-mode heatmaps.

pub mod decomposer;
pub mod heatmap;

pub use decomposer::{
    Decomposition, IntensityMap, OpticalDensityModel, Pigment, PigmentDecomposer, PigmentMaps,
    PigmentModel, PigmentSample, PigmentSummary,
};
pub use heatmap::{ColorRamp, HeatmapRenderer, LightMode};
