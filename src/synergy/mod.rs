//! Synergy module
//!
//! Cross-references skin-condition metrics with the drape ranking.

pub mod insight;

pub use insight::{
    ColorAdjustment, ReasonCode, SkinMetrics, SynergyAdjustment, SynergyEngine, SynergyInsight,
};
