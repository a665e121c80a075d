//! Face region module
//!
//! This module handles face contour landmarks, their rasterization into a
//! coverage mask, and the device capability descriptor that selects how the
//! mask is built.

pub mod landmarks;
pub mod mask;
pub mod capability;

pub use landmarks::{oval_contour, BoundingBox, LandmarkProvider, LandmarkSet, OvalLandmarkProvider, Point};
pub use mask::{ContourMaskBuilder, EllipseMaskBuilder, FaceMask, MaskBounds, MaskBuilder};
pub use capability::{DeviceCapability, PerformanceTier};
