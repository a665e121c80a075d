//! Palette ranking by complexion uniformity
//!
//! Drives the drape compositor over a whole palette:
//! - One reusable render surface per scan
//! - Uniformity score per swatch over the face mask
//! - Progress report and cancellation check after every swatch
//! - Stable best-first ordering (ties keep palette order)
//!
//! Algorithm tag: `algo-palette-ranking`

use image::RgbaImage;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::color::{Swatch, UniformityScorer};
use crate::config::{DrapeConfig, RankingConfig};
use crate::drape::compositor::{DrapeCompositor, MetalType};
use crate::face::FaceMask;
use crate::{AnalysisError, Result};

/// Score of one palette color against the face
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrapeResult {
    pub color: Swatch,
    /// Complexion uniformity under this color, in [0, 100]
    pub uniformity_score: f64,
    /// 1-based position in the sorted ranking
    pub rank: usize,
}

/// Shared cancellation flag checked between swatches
///
/// Clones observe the same flag, so a view can hold one handle and cancel
/// a scan running elsewhere.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingStatus {
    Complete,
    /// Stopped early; results cover only the colors scored so far
    Cancelled,
}

/// Results of a palette scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingOutcome {
    /// Scored colors, best first
    pub results: Vec<DrapeResult>,
    pub completed: usize,
    pub total: usize,
    pub status: RankingStatus,
}

impl RankingOutcome {
    pub fn is_complete(&self) -> bool {
        self.status == RankingStatus::Complete
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == RankingStatus::Cancelled
    }

    /// The full ranking, or `CancelledAnalysis` if the scan was cut short
    pub fn into_complete(self) -> Result<Vec<DrapeResult>> {
        match self.status {
            RankingStatus::Complete => Ok(self.results),
            RankingStatus::Cancelled => Err(AnalysisError::CancelledAnalysis {
                completed: self.completed,
                total: self.total,
            }),
        }
    }

    pub fn best(&self, k: usize) -> Vec<DrapeResult> {
        best_colors(&self.results, k)
    }
}

/// Sort best-first (stable) and assign 1-based ranks
pub fn sort_results(results: &mut [DrapeResult]) {
    results.sort_by(|a, b| b.uniformity_score.total_cmp(&a.uniformity_score));
    for (i, result) in results.iter_mut().enumerate() {
        result.rank = i + 1;
    }
}

/// First `k` entries of an already sorted ranking
pub fn best_colors(results: &[DrapeResult], k: usize) -> Vec<DrapeResult> {
    results.iter().take(k).copied().collect()
}

/// Ranks palette colors by how evenly they light the face
#[derive(Debug, Clone, Default)]
pub struct PaletteRanker {
    compositor: DrapeCompositor,
    scorer: UniformityScorer,
}

impl PaletteRanker {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns `InvalidParameter` if `ranking.variance_scale` is not finite and positive
    pub fn with_config(drape: DrapeConfig, ranking: &RankingConfig) -> Result<Self> {
        Ok(Self {
            compositor: DrapeCompositor::with_config(drape),
            scorer: UniformityScorer::with_variance_scale(ranking.variance_scale)?,
        })
    }

    /// Score every swatch of `palette` and return them best-first
    ///
    /// `on_progress(completed, total)` runs after each swatch; the
    /// cancellation token is checked before each swatch. A cancelled scan
    /// returns the colors scored so far with `RankingStatus::Cancelled`.
    ///
    /// # Arguments
    ///
    /// * `image` - Source portrait, never modified
    /// * `mask` - Face mask on the same grid as `image`
    /// * `palette` - Candidate colors; equal scores keep this order
    /// * `metal` - Jewelry highlight applied to every preview
    /// * `on_progress` - Receives `(completed, total)`
    /// * `cancel` - Stops the scan before the next color
    ///
    /// # Returns
    ///
    /// The scored colors best-first with 1-based ranks
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if image and mask sizes differ
    /// - `NoFaceRegion` if the mask is empty
    pub fn rank<F>(
        &self,
        image: &RgbaImage,
        mask: &FaceMask,
        palette: &[Swatch],
        metal: MetalType,
        mut on_progress: F,
        cancel: &CancellationToken,
    ) -> Result<RankingOutcome>
    where
        F: FnMut(usize, usize),
    {
        if image.dimensions() != mask.dimensions() {
            return Err(AnalysisError::dimension_mismatch(
                image.dimensions(),
                mask.dimensions(),
            ));
        }
        let geometry = self.compositor.geometry(mask)?;

        let total = palette.len();
        info!("ranking {} colors with {:?} highlight", total, metal);

        let mut surface = RgbaImage::new(image.width(), image.height());
        let mut results = Vec::with_capacity(total);

        for (index, &color) in palette.iter().enumerate() {
            if cancel.is_cancelled() {
                break;
            }

            self.compositor
                .render_with_geometry(image, color, mask, metal, &geometry, &mut surface)?;
            let score = self.scorer.score(&surface, mask)?;
            debug!("{} scored {:.2}", color, score);

            results.push(DrapeResult {
                color,
                uniformity_score: score,
                rank: index + 1,
            });
            on_progress(results.len(), total);
        }

        let completed = results.len();
        sort_results(&mut results);

        let status = if completed < total {
            warn!("ranking cancelled after {} of {} colors", completed, total);
            RankingStatus::Cancelled
        } else {
            info!(
                "ranking complete, best {}",
                results.first().map(|r| r.color.to_string()).unwrap_or_default()
            );
            RankingStatus::Complete
        };

        Ok(RankingOutcome {
            results,
            completed,
            total,
            status,
        })
    }

    /// Score a single swatch without ranking
    pub fn score_swatch(
        &self,
        image: &RgbaImage,
        mask: &FaceMask,
        color: Swatch,
        metal: MetalType,
    ) -> Result<f64> {
        let frame = self.compositor.render(image, color, mask, metal)?;
        self.scorer.score(&frame, mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::face::{ContourMaskBuilder, LandmarkSet, MaskBuilder, Point};
    use image::Rgba;

    fn fixture() -> (RgbaImage, FaceMask) {
        let mut image = RgbaImage::from_pixel(32, 32, Rgba([196, 150, 128, 255]));
        // Slight shading so scores differ between colors
        for y in 0..32 {
            for x in 0..32 {
                let shade = (x + y) as u8;
                image.put_pixel(x, y, Rgba([196 - shade, 150 - shade / 2, 128, 255]));
            }
        }
        let landmarks = LandmarkSet::new(vec![
            Point::new(8.0, 4.0),
            Point::new(24.0, 4.0),
            Point::new(24.0, 18.0),
            Point::new(8.0, 18.0),
        ])
        .unwrap();
        let mask = ContourMaskBuilder::new().build(&landmarks, 32, 32).unwrap();
        (image, mask)
    }

    fn result(score: f64) -> DrapeResult {
        DrapeResult {
            color: Swatch::new(0, 0, 0),
            uniformity_score: score,
            rank: 0,
        }
    }

    #[test]
    fn test_rank_sorted_and_ranked() {
        let (image, mask) = fixture();
        let palette = vec![
            Swatch::new(255, 255, 255),
            Swatch::new(0, 0, 0),
            Swatch::new(190, 140, 120),
            Swatch::new(0, 90, 200),
        ];

        let outcome = PaletteRanker::new()
            .rank(&image, &mask, &palette, MetalType::None, |_, _| {}, &CancellationToken::new())
            .unwrap();

        assert!(outcome.is_complete());
        assert_eq!(outcome.results.len(), 4);
        assert!(outcome
            .results
            .windows(2)
            .all(|w| w[0].uniformity_score >= w[1].uniformity_score));
        let ranks: Vec<usize> = outcome.results.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_progress_reported_per_swatch() {
        let (image, mask) = fixture();
        let palette = vec![Swatch::new(10, 20, 30); 5];
        let mut calls = Vec::new();

        PaletteRanker::new()
            .rank(
                &image,
                &mask,
                &palette,
                MetalType::Silver,
                |done, total| calls.push((done, total)),
                &CancellationToken::new(),
            )
            .unwrap();

        assert_eq!(calls, vec![(1, 5), (2, 5), (3, 5), (4, 5), (5, 5)]);
    }

    fn flat_ranker() -> PaletteRanker {
        PaletteRanker::with_config(
            DrapeConfig {
                bounce_strength: 0.0,
                ..DrapeConfig::default()
            },
            &RankingConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_equal_scores_keep_palette_order() {
        // Without bounce or metal the face is untouched, so every color ties
        let (_, mask) = fixture();
        let image = RgbaImage::from_pixel(32, 32, Rgba([196, 150, 128, 255]));
        let palette = vec![Swatch::new(3, 0, 0), Swatch::new(2, 0, 0), Swatch::new(1, 0, 0)];

        let outcome = flat_ranker()
            .rank(&image, &mask, &palette, MetalType::None, |_, _| {}, &CancellationToken::new())
            .unwrap();

        let scores: Vec<f64> = outcome.results.iter().map(|r| r.uniformity_score).collect();
        assert_eq!(scores, vec![100.0, 100.0, 100.0]);
        let order: Vec<u8> = outcome.results.iter().map(|r| r.color.r).collect();
        assert_eq!(order, vec![3, 2, 1]);
        let ranks: Vec<usize> = outcome.results.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_zero_variance_scale_rejected() {
        let result = PaletteRanker::with_config(
            DrapeConfig::default(),
            &RankingConfig { variance_scale: 0.0 },
        );
        assert!(matches!(result, Err(AnalysisError::InvalidParameter { .. })));
    }

    #[test]
    fn test_flat_face_scores_within_bounds() {
        let (_, mask) = fixture();
        let image = RgbaImage::from_pixel(32, 32, Rgba([196, 150, 128, 255]));
        let ranker = PaletteRanker::with_config(
            DrapeConfig {
                bounce_strength: 0.0,
                ..DrapeConfig::default()
            },
            &RankingConfig { variance_scale: 1e-9 },
        )
        .unwrap();

        let outcome = ranker
            .rank(&image, &mask, &[Swatch::new(1, 2, 3)], MetalType::None, |_, _| {}, &CancellationToken::new())
            .unwrap();
        let score = outcome.results[0].uniformity_score;
        assert!((0.0..=100.0).contains(&score), "score {}", score);
    }

    #[test]
    fn test_sort_results_is_stable() {
        let mut results = vec![
            DrapeResult { color: Swatch::new(1, 0, 0), ..result(50.0) },
            DrapeResult { color: Swatch::new(2, 0, 0), ..result(70.0) },
            DrapeResult { color: Swatch::new(3, 0, 0), ..result(50.0) },
            DrapeResult { color: Swatch::new(4, 0, 0), ..result(50.0) },
        ];
        sort_results(&mut results);

        let order: Vec<u8> = results.iter().map(|r| r.color.r).collect();
        assert_eq!(order, vec![2, 1, 3, 4]);
        assert_eq!(results[3].rank, 4);
    }

    #[test]
    fn test_cancel_before_start() {
        let (image, mask) = fixture();
        let token = CancellationToken::new();
        token.cancel();

        let outcome = PaletteRanker::new()
            .rank(&image, &mask, &[Swatch::new(1, 2, 3)], MetalType::None, |_, _| {}, &token)
            .unwrap();
        assert!(outcome.is_cancelled());
        assert!(outcome.results.is_empty());
        assert!(matches!(
            outcome.into_complete(),
            Err(AnalysisError::CancelledAnalysis { completed: 0, total: 1 })
        ));
    }

    #[test]
    fn test_cancel_from_progress_callback() {
        let (image, mask) = fixture();
        let token = CancellationToken::new();
        let palette = vec![Swatch::new(200, 100, 50); 6];

        let handle = token.clone();
        let outcome = PaletteRanker::new()
            .rank(
                &image,
                &mask,
                &palette,
                MetalType::Gold,
                move |done, _| {
                    if done == 2 {
                        handle.cancel();
                    }
                },
                &token,
            )
            .unwrap();

        assert_eq!(outcome.completed, 2);
        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.status, RankingStatus::Cancelled);
    }

    #[test]
    fn test_best_colors_bounds() {
        let results: Vec<DrapeResult> = (0..4).map(|i| result(90.0 - i as f64)).collect();
        assert_eq!(best_colors(&results, 2).len(), 2);
        assert_eq!(best_colors(&results, 10).len(), 4);
        assert_eq!(best_colors(&results, 0).len(), 0);
        assert!(best_colors(&[], 5).is_empty());
        assert_eq!(best_colors(&results, 1)[0], results[0]);
    }

    #[test]
    fn test_score_swatch_matches_ranking() {
        let (image, mask) = fixture();
        let ranker = PaletteRanker::new();
        let color = Swatch::new(40, 120, 80);

        let direct = ranker.score_swatch(&image, &mask, color, MetalType::RoseGold).unwrap();
        let outcome = ranker
            .rank(&image, &mask, &[color], MetalType::RoseGold, |_, _| {}, &CancellationToken::new())
            .unwrap();
        assert_eq!(outcome.results[0].uniformity_score, direct);
    }

    #[test]
    fn test_empty_palette_completes() {
        let (image, mask) = fixture();
        let outcome = PaletteRanker::new()
            .rank(&image, &mask, &[], MetalType::None, |_, _| {}, &CancellationToken::new())
            .unwrap();
        assert!(outcome.is_complete());
        assert_eq!(outcome.total, 0);
    }
}
