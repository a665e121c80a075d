//! Drape module
//!
//! Seasonal palettes, single-color drape compositing with metal highlights,
//! and palette ranking by complexion uniformity.

pub mod palette;
pub mod compositor;
pub mod ranking;

pub use palette::{base_color_name, base_palette, generate_palette, PaletteSize, Season, SeasonalColor, SEASONAL_BASE};
pub use compositor::{DrapeCompositor, DrapeGeometry, MetalType};
pub use ranking::{
    best_colors, sort_results, CancellationToken, DrapeResult, PaletteRanker, RankingOutcome,
    RankingStatus,
};
