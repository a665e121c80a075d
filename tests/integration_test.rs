//! Integration tests for the complete drape and pigment pipeline
//!
//! These tests validate the end-to-end workflow including:
//! - Landmark validation and face mask construction
//! - Drape previews and palette ranking with cancellation
//! - Pigment decomposition and heatmap overlays
//! - Synergy insights and re-ranking
//! - Error handling for degenerate input

use drape_scan::face::oval_contour;
use drape_scan::{
    apply_insight, best_colors, build_face_mask, decompose_pigments, generate_palette,
    rank_palette, render_drape, render_heatmap, synergy_insight, AnalysisError, AnalysisSession,
    CancellationToken, ColorAdjustment, DeviceCapability, EngineConfig, FaceMask, LandmarkSet,
    LightMode, MetalType, OvalLandmarkProvider, PerformanceTier, PigmentSummary, Point,
    RankingStatus, ReasonCode, Swatch,
};
use image::{Rgba, RgbaImage};

/// Skin-toned portrait with a soft vertical gradient and a flushed cheek
fn portrait(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let shade = (y * 30 / height) as u8;
        let cheek = if (x as i32 - width as i32 / 3).abs() < 6 && (y as i32 - height as i32 / 2).abs() < 6 {
            40
        } else {
            0
        };
        Rgba([215 - shade, 165 - shade - cheek, 145 - shade - cheek / 2, 255])
    })
}

fn face(width: u32, height: u32) -> (LandmarkSet, FaceMask) {
    let (w, h) = (width as f32, height as f32);
    let landmarks = LandmarkSet::new(oval_contour(
        Point::new(w * 0.5, h * 0.4),
        w * 0.3,
        h * 0.32,
        128,
    ))
    .unwrap();
    let mask = build_face_mask(&landmarks, width, height).unwrap();
    (landmarks, mask)
}

// ============================================================================
// Face Mask
// ============================================================================

#[test]
fn test_oval_contour_covers_face() {
    let landmarks = LandmarkSet::new(oval_contour(Point::new(200.0, 200.0), 150.0, 180.0, 128)).unwrap();
    let mask = build_face_mask(&landmarks, 400, 400).unwrap();

    let inside = mask.fully_inside_count() as f64 / (400.0 * 400.0);
    assert!(inside > 0.30, "only {:.1}% inside", inside * 100.0);
}

#[test]
fn test_degenerate_landmarks_rejected() {
    let collinear = vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0), Point::new(10.0, 10.0)];
    let err = LandmarkSet::new(collinear).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidLandmarks { .. }));
    assert!(err.is_recoverable());

    let bowtie = vec![
        Point::new(0.0, 0.0),
        Point::new(20.0, 20.0),
        Point::new(20.0, 0.0),
        Point::new(0.0, 20.0),
    ];
    assert!(matches!(
        LandmarkSet::new(bowtie),
        Err(AnalysisError::InvalidLandmarks { .. })
    ));
}

#[test]
fn test_contour_outside_image_yields_no_face() {
    let landmarks = LandmarkSet::new(oval_contour(Point::new(500.0, 500.0), 20.0, 20.0, 32)).unwrap();
    let mask = build_face_mask(&landmarks, 64, 64).unwrap();
    assert!(mask.is_empty());

    let err = decompose_pigments(&RgbaImage::new(64, 64), &mask).unwrap_err();
    assert!(matches!(err, AnalysisError::NoFaceRegion { .. }));
    assert!(!err.user_message().is_empty());
}

// ============================================================================
// Drape and Ranking
// ============================================================================

#[test]
fn test_drape_preview_leaves_source_untouched() {
    let image = portrait(80, 100);
    let (_, mask) = face(80, 100);
    let before = image.clone();

    let frame = render_drape(&image, Swatch::new(0x00, 0x9B, 0x77), &mask, MetalType::Silver).unwrap();

    assert_eq!(image, before);
    assert_eq!(frame.dimensions(), image.dimensions());
    // Bottom row is fabric
    let bottom = frame.get_pixel(40, 99);
    assert!(bottom[1] > bottom[0]);
}

#[test]
fn test_rank_full_palette() {
    let image = portrait(64, 80);
    let (_, mask) = face(64, 80);
    let palette = generate_palette(64).unwrap();
    let mut last_progress = (0, 0);

    let outcome = rank_palette(
        &image,
        &mask,
        &palette,
        MetalType::RoseGold,
        |done, total| last_progress = (done, total),
        &CancellationToken::new(),
    )
    .unwrap();

    assert_eq!(last_progress, (64, 64));
    assert_eq!(outcome.status, RankingStatus::Complete);
    assert!(outcome
        .results
        .iter()
        .all(|r| (0.0..=100.0).contains(&r.uniformity_score)));
    assert_eq!(best_colors(&outcome.results, 5).len(), 5);
}

#[test]
fn test_cancel_after_three_colors() {
    let image = portrait(64, 80);
    let (_, mask) = face(64, 80);
    let palette = generate_palette(16).unwrap();
    let token = CancellationToken::new();
    let trigger = token.clone();

    let outcome = rank_palette(
        &image,
        &mask,
        &palette,
        MetalType::None,
        move |done, _| {
            if done == 3 {
                trigger.cancel();
            }
        },
        &token,
    )
    .unwrap();

    assert_eq!(outcome.results.len(), 3);
    assert_eq!(outcome.completed, 3);
    assert_eq!(outcome.total, 16);
    assert!(outcome.is_cancelled());
    assert!(matches!(
        outcome.into_complete(),
        Err(AnalysisError::CancelledAnalysis { completed: 3, total: 16 })
    ));
}

#[test]
fn test_ranking_is_deterministic() {
    let image = portrait(48, 60);
    let (_, mask) = face(48, 60);
    let palette = generate_palette(16).unwrap();

    let run = || {
        rank_palette(&image, &mask, &palette, MetalType::Gold, |_, _| {}, &CancellationToken::new())
            .unwrap()
            .results
    };
    assert_eq!(run(), run());
}

// ============================================================================
// Pigments and Heatmaps
// ============================================================================

#[test]
fn test_pigments_and_heatmaps() {
    let image = portrait(64, 80);
    let (_, mask) = face(64, 80);
    let decomposition = decompose_pigments(&image, &mask).unwrap();

    let summary = decomposition.summary;
    for value in [summary.melanin, summary.hemoglobin, summary.sebum] {
        assert!((0.0..=1.0).contains(&value));
    }

    for mode in LightMode::ALL {
        let identity = render_heatmap(&image, &mask, &decomposition.maps, mode, 0.0).unwrap();
        assert_eq!(identity, image);
    }
    let overlay = render_heatmap(&image, &mask, &decomposition.maps, LightMode::Uv, 0.8).unwrap();
    assert_ne!(overlay, image);
    // Corner is outside the face
    assert_eq!(overlay.get_pixel(0, 0), image.get_pixel(0, 0));

    assert!(matches!(
        render_heatmap(&image, &mask, &decomposition.maps, LightMode::Sebum, 1.01),
        Err(AnalysisError::InvalidParameter { .. })
    ));
}

// ============================================================================
// Synergy
// ============================================================================

#[test]
fn test_high_hemoglobin_recommends_muted() {
    let insight = synergy_insight(PigmentSummary::new(0.35, 0.85, 0.1)).unwrap();
    assert_eq!(insight.color_adjustment, ColorAdjustment::Muted);
    assert_eq!(insight.reason_code, ReasonCode::HighRedness);
}

#[test]
fn test_apply_insight_reranks() {
    let image = portrait(64, 80);
    let (_, mask) = face(64, 80);
    let palette = generate_palette(16).unwrap();
    let ranking = rank_palette(&image, &mask, &palette, MetalType::None, |_, _| {}, &CancellationToken::new())
        .unwrap()
        .results;

    let insight = synergy_insight(PigmentSummary::new(0.2, 0.9, 0.0)).unwrap();
    let adjusted = apply_insight(&ranking, &insight).adjusted_best_colors;

    assert_eq!(adjusted.len(), ranking.len());
    assert!(adjusted
        .windows(2)
        .all(|w| w[0].uniformity_score >= w[1].uniformity_score));
    let ranks: Vec<usize> = adjusted.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, (1..=16).collect::<Vec<_>>());
}

// ============================================================================
// Session
// ============================================================================

#[test]
fn test_session_end_to_end() {
    let session = AnalysisSession::from_provider(
        portrait(120, 150),
        &OvalLandmarkProvider::default(),
        DeviceCapability::new(PerformanceTier::Low),
        EngineConfig::default(),
    )
    .unwrap();

    let mut calls = 0;
    let outcome = session
        .rank(MetalType::Gold, |_, _| calls += 1, &CancellationToken::new())
        .unwrap();
    assert_eq!(calls, 16);

    let best = outcome.best(3);
    let preview = session.preview(best[0].color, MetalType::Gold).unwrap();
    assert_eq!(preview.dimensions(), (120, 150));

    let decomposition = session.decompose().unwrap();
    let insight = session.insight(decomposition.summary).unwrap();
    let again = session.insight(decomposition.summary).unwrap();
    assert_eq!(insight, again);

    let adjusted = session.apply_insight(&outcome.results, &insight);
    assert_eq!(adjusted.adjusted_best_colors.len(), 16);
}

#[test]
fn test_session_rejects_empty_image() {
    let result = AnalysisSession::from_provider(
        RgbaImage::new(0, 0),
        &OvalLandmarkProvider::default(),
        DeviceCapability::default(),
        EngineConfig::default(),
    );
    assert!(matches!(result, Err(AnalysisError::NoFaceRegion { .. })));
}
