//! Error types for the drape_scan library

use thiserror::Error;

/// Result type alias for drape_scan operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Error types for face-region analysis operations
///
/// Every failure here is an input-validation failure. The engine is
/// deterministic, so nothing is retried internally.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Landmark set is too small, degenerate or self-intersecting
    #[error("Invalid landmarks: {reason}")]
    InvalidLandmarks { reason: String },

    /// Face mask covers no pixels
    #[error("No face region: {reason}")]
    NoFaceRegion { reason: String },

    /// Palette ranking stopped early through its cancellation token
    #[error("Analysis cancelled after {completed} of {total} colors")]
    CancelledAnalysis { completed: usize, total: usize },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Buffers that must share a pixel grid do not
    #[error("Dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Image file could not be loaded or decoded
    #[error("Failed to load image: {message}")]
    ImageLoadError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration could not be read, written or validated
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl AnalysisError {
    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoadError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Create a dimension mismatch error from two `(width, height)` pairs
    pub fn dimension_mismatch(expected: (u32, u32), actual: (u32, u32)) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    pub fn invalid_landmarks(reason: impl Into<String>) -> Self {
        Self::InvalidLandmarks {
            reason: reason.into(),
        }
    }

    pub fn no_face_region(reason: impl Into<String>) -> Self {
        Self::NoFaceRegion {
            reason: reason.into(),
        }
    }

    /// Check if this error can be resolved by supplying new input
    ///
    /// Recoverable errors are the ones where the caller should re-request
    /// landmarks or re-run the scan rather than give up on the photo.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AnalysisError::InvalidLandmarks { .. }
                | AnalysisError::NoFaceRegion { .. }
                | AnalysisError::CancelledAnalysis { .. }
        )
    }

    /// Get user-friendly error description for application display
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::ImageLoadError { .. } => {
                "Could not load the image. Please check the file format and try again.".to_string()
            }
            AnalysisError::InvalidLandmarks { .. } => {
                "Could not find the outline of your face. Please retake the photo facing the camera.".to_string()
            }
            AnalysisError::NoFaceRegion { .. } => {
                "Couldn't analyze this photo. Please make sure your face is fully visible.".to_string()
            }
            AnalysisError::CancelledAnalysis { completed, total } => {
                format!(
                    "Color scan stopped after {} of {} colors. Results are partial.",
                    completed, total
                )
            }
            _ => "Couldn't analyze this photo. Please try with a different image.".to_string(),
        }
    }
}
