//! Face mask rasterization
//!
//! Turns a validated face contour into a per-pixel coverage mask:
//! - Non-zero winding fill of the closed contour
//! - Several sub-scanlines per pixel row for vertical anti-aliasing
//! - Exact horizontal span coverage at span ends
//!
//! A coverage of 255 means the pixel lies fully inside the contour.
//!
//! Algorithm tag: `algo-scanline-polygon-fill`

use image::{GrayImage, Luma};
use log::debug;

use crate::config::MaskConfig;
use crate::constants::mask::{FULL_COVERAGE, SUBSAMPLES_PER_ROW};
use crate::face::landmarks::{oval_contour, LandmarkSet, Point};
use crate::{AnalysisError, Result};

/// Inclusive pixel bounds of the covered region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskBounds {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl MaskBounds {
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    pub fn center_x(&self) -> f32 {
        (self.min_x + self.max_x) as f32 * 0.5 + 0.5
    }
}

/// Per-pixel face-skin membership, 0 (outside) to 255 (fully inside)
///
/// Immutable once built; components borrow it read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceMask {
    coverage: GrayImage,
    covered: usize,
    fully_inside: usize,
    bounds: Option<MaskBounds>,
}

impl FaceMask {
    /// Wrap an existing coverage buffer, computing its statistics
    pub fn from_coverage(coverage: GrayImage) -> Self {
        let mut covered = 0;
        let mut fully_inside = 0;
        let mut bounds: Option<MaskBounds> = None;

        for (x, y, px) in coverage.enumerate_pixels() {
            let value = px[0];
            if value == 0 {
                continue;
            }
            covered += 1;
            if value == FULL_COVERAGE {
                fully_inside += 1;
            }
            bounds = Some(match bounds {
                None => MaskBounds { min_x: x, min_y: y, max_x: x, max_y: y },
                Some(b) => MaskBounds {
                    min_x: b.min_x.min(x),
                    min_y: b.min_y.min(y),
                    max_x: b.max_x.max(x),
                    max_y: b.max_y.max(y),
                },
            });
        }

        Self {
            coverage,
            covered,
            fully_inside,
            bounds,
        }
    }

    pub fn width(&self) -> u32 {
        self.coverage.width()
    }

    pub fn height(&self) -> u32 {
        self.coverage.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.coverage.dimensions()
    }

    /// Coverage at `(x, y)`; zero outside the grid
    #[inline]
    pub fn coverage(&self, x: u32, y: u32) -> u8 {
        if x < self.width() && y < self.height() {
            self.coverage.get_pixel(x, y)[0]
        } else {
            0
        }
    }

    #[inline]
    pub fn is_fully_inside(&self, x: u32, y: u32) -> bool {
        self.coverage(x, y) == FULL_COVERAGE
    }

    /// Number of pixels with any coverage
    pub fn covered_count(&self) -> usize {
        self.covered
    }

    /// Number of pixels with full coverage
    pub fn fully_inside_count(&self) -> usize {
        self.fully_inside
    }

    pub fn is_empty(&self) -> bool {
        self.covered == 0
    }

    /// Fraction of the grid with any coverage
    pub fn coverage_ratio(&self) -> f64 {
        let total = self.width() as u64 * self.height() as u64;
        if total == 0 {
            0.0
        } else {
            self.covered as f64 / total as f64
        }
    }

    pub fn bounds(&self) -> Option<MaskBounds> {
        self.bounds
    }

    /// Iterate `(x, y, coverage)` over pixels with non-zero coverage
    pub fn covered_pixels(&self) -> impl Iterator<Item = (u32, u32, u8)> + '_ {
        let rows = self
            .bounds
            .map(|b| b.min_y..b.max_y + 1)
            .unwrap_or(0..0);
        let (min_x, max_x) = self.bounds.map(|b| (b.min_x, b.max_x)).unwrap_or((0, 0));

        rows.flat_map(move |y| (min_x..=max_x).map(move |x| (x, y)))
            .filter_map(move |(x, y)| {
                let value = self.coverage.get_pixel(x, y)[0];
                (value > 0).then_some((x, y, value))
            })
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.coverage
    }

    pub fn into_image(self) -> GrayImage {
        self.coverage
    }

    /// Fail with `NoFaceRegion` unless the mask covers at least one pixel
    pub fn require_coverage(&self) -> Result<()> {
        if self.is_empty() {
            Err(AnalysisError::no_face_region(format!(
                "mask of {}x{} covers no pixels",
                self.width(),
                self.height()
            )))
        } else {
            Ok(())
        }
    }
}

/// Builds a face mask from a landmark contour
pub trait MaskBuilder {
    /// Rasterize `landmarks` onto a `width` x `height` grid
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for an empty grid.
    fn build(&self, landmarks: &LandmarkSet, width: u32, height: u32) -> Result<FaceMask>;

    fn name(&self) -> &'static str;
}

/// Exact contour fill
#[derive(Debug, Clone)]
pub struct ContourMaskBuilder {
    subsamples: u32,
}

impl Default for ContourMaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContourMaskBuilder {
    pub fn new() -> Self {
        Self {
            subsamples: SUBSAMPLES_PER_ROW,
        }
    }

    pub fn with_config(config: &MaskConfig) -> Self {
        Self {
            subsamples: config.subsamples.max(1),
        }
    }
}

impl MaskBuilder for ContourMaskBuilder {
    fn build(&self, landmarks: &LandmarkSet, width: u32, height: u32) -> Result<FaceMask> {
        check_grid(width, height)?;
        let coverage = rasterize(landmarks.points(), width, height, self.subsamples);
        let mask = FaceMask::from_coverage(coverage);
        debug!(
            "contour mask {}x{}: {} covered, {} fully inside, bounds {:?}",
            width,
            height,
            mask.covered_count(),
            mask.fully_inside_count(),
            mask.bounds()
        );
        Ok(mask)
    }

    fn name(&self) -> &'static str {
        "contour"
    }
}

/// Approximate mask: the ellipse inscribed in the contour's bounding box
///
/// Cheaper contours for low-tier devices; ignores the exact jaw shape.
#[derive(Debug, Clone)]
pub struct EllipseMaskBuilder {
    subsamples: u32,
    segments: usize,
}

impl Default for EllipseMaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EllipseMaskBuilder {
    pub fn new() -> Self {
        Self {
            subsamples: SUBSAMPLES_PER_ROW,
            segments: 64,
        }
    }

    pub fn with_config(config: &MaskConfig) -> Self {
        Self {
            subsamples: config.subsamples.max(1),
            ..Self::new()
        }
    }
}

impl MaskBuilder for EllipseMaskBuilder {
    fn build(&self, landmarks: &LandmarkSet, width: u32, height: u32) -> Result<FaceMask> {
        check_grid(width, height)?;
        let bb = landmarks.bounding_box();
        let outline = oval_contour(
            bb.center(),
            bb.width() * 0.5,
            bb.height() * 0.5,
            self.segments,
        );
        let mask = FaceMask::from_coverage(rasterize(&outline, width, height, self.subsamples));
        debug!(
            "ellipse mask {}x{}: {} covered",
            width,
            height,
            mask.covered_count()
        );
        Ok(mask)
    }

    fn name(&self) -> &'static str {
        "ellipse"
    }
}

fn check_grid(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(AnalysisError::invalid_parameter(
            "mask_dimensions",
            format!("{}x{}", width, height),
        ));
    }
    Ok(())
}

/// Non-zero winding scanline fill of a closed polygon
fn rasterize(points: &[Point], width: u32, height: u32, subsamples: u32) -> GrayImage {
    let mut coverage = GrayImage::new(width, height);
    if points.len() < 3 {
        return coverage;
    }

    let n = points.len();
    let min_y = points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
    let max_y = points.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
    let first_row = min_y.floor().max(0.0) as u32;
    let last_row = (max_y.ceil().max(0.0) as u32).min(height);

    let weight = 1.0 / subsamples as f32;
    let mut accum = vec![0.0_f32; width as usize];
    let mut crossings: Vec<(f32, i32)> = Vec::with_capacity(n);

    for y in first_row..last_row {
        accum.fill(0.0);
        let mut touched = false;

        for s in 0..subsamples {
            let sy = y as f32 + (s as f32 + 0.5) * weight;
            crossings.clear();

            for i in 0..n {
                let (p0, p1) = (points[i], points[(i + 1) % n]);
                if (p0.y <= sy) != (p1.y <= sy) {
                    let t = (sy - p0.y) / (p1.y - p0.y);
                    let x = p0.x + t * (p1.x - p0.x);
                    let dir = if p1.y > p0.y { 1 } else { -1 };
                    crossings.push((x, dir));
                }
            }
            if crossings.is_empty() {
                continue;
            }
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut winding = 0;
            let mut span_start = 0.0_f32;
            for &(x, dir) in crossings.iter() {
                let was_inside = winding != 0;
                winding += dir;
                let is_inside = winding != 0;
                if !was_inside && is_inside {
                    span_start = x;
                } else if was_inside && !is_inside {
                    add_span(&mut accum, span_start, x, weight);
                    touched = true;
                }
            }
        }

        if !touched {
            continue;
        }
        for (x, value) in accum.iter().enumerate() {
            if *value > 0.0 {
                let cover = (value.min(1.0) * FULL_COVERAGE as f32).round() as u8;
                coverage.put_pixel(x as u32, y, Luma([cover]));
            }
        }
    }

    coverage
}

/// Accumulate horizontal coverage of the span `[x0, x1)` into a row
fn add_span(accum: &mut [f32], x0: f32, x1: f32, weight: f32) {
    let width = accum.len() as f32;
    let x0 = x0.clamp(0.0, width);
    let x1 = x1.clamp(0.0, width);
    if x1 <= x0 {
        return;
    }

    let first = x0.floor() as usize;
    let last = (x1.ceil() as usize).min(accum.len());
    for (px, cell) in accum.iter_mut().enumerate().take(last).skip(first) {
        let left = x0.max(px as f32);
        let right = x1.min(px as f32 + 1.0);
        if right > left {
            *cell += (right - left) * weight;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> LandmarkSet {
        LandmarkSet::new(vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ])
        .unwrap()
    }

    #[test]
    fn test_pixel_aligned_rectangle_is_exact() {
        let mask = ContourMaskBuilder::new().build(&rect(2.0, 3.0, 6.0, 5.0), 10, 10).unwrap();

        assert_eq!(mask.covered_count(), 8);
        assert_eq!(mask.fully_inside_count(), 8);
        assert_eq!(
            mask.bounds(),
            Some(MaskBounds { min_x: 2, min_y: 3, max_x: 5, max_y: 4 })
        );
        assert!(mask.is_fully_inside(2, 3));
        assert_eq!(mask.coverage(6, 3), 0);
        assert_eq!(mask.coverage(2, 5), 0);
    }

    #[test]
    fn test_half_pixel_edges_are_feathered() {
        let mask = ContourMaskBuilder::new().build(&rect(2.5, 2.0, 6.0, 4.0), 10, 10).unwrap();
        let edge = mask.coverage(2, 2);
        assert!(edge > 100 && edge < 155, "edge coverage {}", edge);
        assert!(mask.is_fully_inside(3, 2));
    }

    #[test]
    fn test_winding_order_does_not_matter() {
        let clockwise = rect(1.0, 1.0, 7.0, 7.0);
        let counter = LandmarkSet::new(clockwise.points().iter().rev().copied().collect()).unwrap();

        let a = ContourMaskBuilder::new().build(&clockwise, 8, 8).unwrap();
        let b = ContourMaskBuilder::new().build(&counter, 8, 8).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_contour_clipped_to_grid() {
        let mask = ContourMaskBuilder::new().build(&rect(-5.0, -5.0, 4.0, 4.0), 8, 8).unwrap();
        assert_eq!(mask.covered_count(), 16);
        assert_eq!(mask.bounds().map(|b| (b.min_x, b.min_y)), Some((0, 0)));
    }

    #[test]
    fn test_contour_outside_grid_yields_empty_mask() {
        let mask = ContourMaskBuilder::new().build(&rect(20.0, 20.0, 30.0, 30.0), 8, 8).unwrap();
        assert!(mask.is_empty());
        assert!(matches!(
            mask.require_coverage(),
            Err(AnalysisError::NoFaceRegion { .. })
        ));
    }

    #[test]
    fn test_zero_sized_grid_rejected() {
        let result = ContourMaskBuilder::new().build(&rect(0.0, 0.0, 4.0, 4.0), 0, 8);
        assert!(matches!(result, Err(AnalysisError::InvalidParameter { .. })));
    }

    #[test]
    fn test_ellipse_builder_inscribed_in_bounds() {
        let contour = rect(10.0, 10.0, 50.0, 70.0);
        let mask = EllipseMaskBuilder::new().build(&contour, 64, 80).unwrap();
        let bounds = mask.bounds().unwrap();

        assert!(bounds.min_x >= 10 && bounds.max_x < 50);
        assert!(bounds.min_y >= 10 && bounds.max_y < 70);
        // Ellipse area is pi/4 of its box
        let ratio = mask.covered_count() as f64 / (40.0 * 60.0);
        assert!(ratio > 0.72 && ratio < 0.9, "ratio {}", ratio);
    }

    #[test]
    fn test_covered_pixels_iterator_matches_count() {
        let mask = ContourMaskBuilder::new().build(&rect(1.5, 1.5, 6.5, 5.5), 8, 8).unwrap();
        assert_eq!(mask.covered_pixels().count(), mask.covered_count());
        assert!(mask.covered_pixels().all(|(_, _, c)| c > 0));
    }
}
