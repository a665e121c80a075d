//! Face contour landmarks
//!
//! A [`LandmarkSet`] is the closed face outline delivered by an external
//! landmark extractor. Construction validates the contour so that every
//! downstream stage can assume a simple polygon with non-zero area.

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use crate::constants::mask::{MIN_CONTOUR_AREA, MIN_LANDMARK_POINTS};
use crate::{AnalysisError, Result};

/// A pixel-space point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// Axis-aligned bounding box of a contour, in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl BoundingBox {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) * 0.5,
            (self.min_y + self.max_y) * 0.5,
        )
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

/// Validated, ordered face contour
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandmarkSet {
    points: Vec<Point>,
}

impl LandmarkSet {
    /// Validate a contour with the default thresholds
    ///
    /// # Errors
    ///
    /// Returns `InvalidLandmarks` if the contour has fewer than three
    /// distinct points, non-finite coordinates, zero area, or crossing edges.
    pub fn new(points: Vec<Point>) -> Result<Self> {
        Self::with_limits(points, MIN_LANDMARK_POINTS, MIN_CONTOUR_AREA)
    }

    /// Validate a contour against custom point-count and area thresholds
    pub fn with_limits(points: Vec<Point>, min_points: usize, min_area: f64) -> Result<Self> {
        if let Some(bad) = points.iter().find(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err(AnalysisError::invalid_landmarks(format!(
                "non-finite coordinate ({}, {})",
                bad.x, bad.y
            )));
        }

        let mut distinct: Vec<Point> = Vec::with_capacity(points.len());
        for p in points {
            if distinct.last() != Some(&p) {
                distinct.push(p);
            }
        }
        // Contours are sometimes delivered explicitly closed
        while distinct.len() > 1 && distinct.first() == distinct.last() {
            distinct.pop();
        }

        let required = min_points.max(MIN_LANDMARK_POINTS);
        if distinct.len() < required {
            return Err(AnalysisError::invalid_landmarks(format!(
                "{} distinct points, at least {} required",
                distinct.len(),
                required
            )));
        }

        let set = Self { points: distinct };

        let area = set.area();
        if area < min_area.max(f64::MIN_POSITIVE) {
            return Err(AnalysisError::invalid_landmarks(format!(
                "contour is degenerate (area {:.3} px²)",
                area
            )));
        }

        if let Some((i, j)) = set.first_self_intersection() {
            return Err(AnalysisError::invalid_landmarks(format!(
                "contour edges {} and {} intersect",
                i, j
            )));
        }

        Ok(set)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Closed-contour edges, including the edge from the last point back to the first
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Enclosed area (shoelace formula), in square pixels
    pub fn area(&self) -> f64 {
        let twice: f64 = self
            .edges()
            .map(|(a, b)| a.x as f64 * b.y as f64 - b.x as f64 * a.y as f64)
            .sum();
        (twice * 0.5).abs()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let mut bb = BoundingBox {
            min_x: f32::INFINITY,
            min_y: f32::INFINITY,
            max_x: f32::NEG_INFINITY,
            max_y: f32::NEG_INFINITY,
        };
        for p in &self.points {
            bb.min_x = bb.min_x.min(p.x);
            bb.min_y = bb.min_y.min(p.y);
            bb.max_x = bb.max_x.max(p.x);
            bb.max_y = bb.max_y.max(p.y);
        }
        bb
    }

    fn first_self_intersection(&self) -> Option<(usize, usize)> {
        let n = self.points.len();
        if n < 4 {
            return None;
        }
        let edges: Vec<(Point, Point)> = self.edges().collect();
        for i in 0..n {
            for j in (i + 2)..n {
                // First and last edges share a vertex
                if i == 0 && j == n - 1 {
                    continue;
                }
                if segments_intersect(edges[i], edges[j]) {
                    return Some((i, j));
                }
            }
        }
        None
    }
}

fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b.x as f64 - a.x as f64) * (c.y as f64 - a.y as f64)
        - (b.y as f64 - a.y as f64) * (c.x as f64 - a.x as f64)
}

fn on_segment(a: Point, b: Point, p: Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

fn segments_intersect((p1, p2): (Point, Point), (q1, q2): (Point, Point)) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}

/// Evenly spaced points on an axis-aligned ellipse, clockwise in image space
pub fn oval_contour(center: Point, radius_x: f32, radius_y: f32, count: usize) -> Vec<Point> {
    (0..count)
        .map(|i| {
            let theta = TAU * i as f32 / count as f32;
            Point::new(
                center.x + radius_x * theta.cos(),
                center.y + radius_y * theta.sin(),
            )
        })
        .collect()
}

/// Source of face contours for an image
///
/// The real implementation lives outside this crate (a landmark model);
/// [`OvalLandmarkProvider`] is the deterministic stand-in.
pub trait LandmarkProvider {
    /// Extract the face contour, or fail when no face is found
    fn detect(&self, image: &RgbaImage) -> Result<LandmarkSet>;
}

/// Deterministic landmark source producing a centered oval
///
/// Proportions approximate a head-and-shoulders portrait: the oval sits in
/// the upper part of the frame, leaving room below the chin for the drape.
#[derive(Debug, Clone, PartialEq)]
pub struct OvalLandmarkProvider {
    pub point_count: usize,
    /// Horizontal semi-axis as a fraction of image width
    pub radius_x_ratio: f32,
    /// Vertical semi-axis as a fraction of image height
    pub radius_y_ratio: f32,
    /// Oval center height as a fraction of image height
    pub center_y_ratio: f32,
}

impl Default for OvalLandmarkProvider {
    fn default() -> Self {
        Self {
            point_count: 128,
            radius_x_ratio: 0.30,
            radius_y_ratio: 0.36,
            center_y_ratio: 0.42,
        }
    }
}

impl LandmarkProvider for OvalLandmarkProvider {
    fn detect(&self, image: &RgbaImage) -> Result<LandmarkSet> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(AnalysisError::no_face_region("image is empty"));
        }

        let (w, h) = (width as f32, height as f32);
        let points = oval_contour(
            Point::new(w * 0.5, h * self.center_y_ratio),
            w * self.radius_x_ratio,
            h * self.radius_y_ratio,
            self.point_count,
        );
        LandmarkSet::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(10.0, 10.0),
            Point::new(30.0, 10.0),
            Point::new(30.0, 30.0),
            Point::new(10.0, 30.0),
        ]
    }

    #[test]
    fn test_valid_square() {
        let set = LandmarkSet::new(square()).unwrap();
        assert_eq!(set.len(), 4);
        assert!((set.area() - 400.0).abs() < 1e-6);

        let bb = set.bounding_box();
        assert_eq!((bb.min_x, bb.min_y, bb.max_x, bb.max_y), (10.0, 10.0, 30.0, 30.0));
        assert_eq!(bb.center(), Point::new(20.0, 20.0));
    }

    #[test]
    fn test_empty_and_too_few_points() {
        assert!(matches!(
            LandmarkSet::new(vec![]),
            Err(AnalysisError::InvalidLandmarks { .. })
        ));
        assert!(LandmarkSet::new(vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)]).is_err());
    }

    #[test]
    fn test_duplicates_do_not_count() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 0.0),
        ];
        assert!(LandmarkSet::new(points).is_err());
    }

    #[test]
    fn test_explicitly_closed_contour_accepted() {
        let mut points = square();
        points.push(points[0]);
        let set = LandmarkSet::new(points).unwrap();
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_collinear_rejected() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(5.0, 5.0),
            Point::new(10.0, 10.0),
            Point::new(20.0, 20.0),
        ];
        assert!(matches!(
            LandmarkSet::new(points),
            Err(AnalysisError::InvalidLandmarks { .. })
        ));
    }

    #[test]
    fn test_bow_tie_rejected() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(20.0, 20.0),
            Point::new(20.0, 0.0),
            Point::new(0.0, 20.0),
        ];
        let err = LandmarkSet::new(points).unwrap_err();
        assert!(err.to_string().contains("intersect"));
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut points = square();
        points[2].x = f32::NAN;
        assert!(LandmarkSet::new(points).is_err());
    }

    #[test]
    fn test_oval_contour_is_valid() {
        let points = oval_contour(Point::new(200.0, 200.0), 120.0, 160.0, 128);
        assert_eq!(points.len(), 128);
        let set = LandmarkSet::new(points).unwrap();

        let expected = std::f64::consts::PI * 120.0 * 160.0;
        assert!((set.area() - expected).abs() / expected < 0.01);
    }

    #[test]
    fn test_oval_provider() {
        let image = RgbaImage::new(400, 300);
        let set = OvalLandmarkProvider::default().detect(&image).unwrap();
        let bb = set.bounding_box();

        assert!(bb.min_x >= 0.0 && bb.max_x <= 400.0);
        assert!(bb.min_y >= 0.0 && bb.max_y <= 300.0);
        assert!((bb.center().x - 200.0).abs() < 1.0);

        assert!(OvalLandmarkProvider::default().detect(&RgbaImage::new(0, 0)).is_err());
    }
}
