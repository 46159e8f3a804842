use crate::error::FaceCropError;
use crate::region::BoundingBox;

/// A face found by a detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectedFace {
    /// Bounding box in source image coordinates. May extend past the image edges.
    pub bounds: BoundingBox,
    /// Detection confidence score. The scale is backend-specific.
    pub confidence: f64,
}

impl DetectedFace {
    /// A detection with no meaningful score, for detectors that don't report one.
    pub fn new(bounds: BoundingBox) -> Self {
        Self {
            bounds,
            confidence: 0.0,
        }
    }
}

impl From<BoundingBox> for DetectedFace {
    fn from(bounds: BoundingBox) -> Self {
        Self::new(bounds)
    }
}

/// Pluggable face detection backend.
///
/// Implement this trait to plug in any detection engine (ONNX, dlib, a
/// platform SDK) and pass it to [`crate::FaceProcessor::new`].
pub trait FaceDetector: Send + Sync {
    /// Detect faces in a row-major grayscale buffer of `width` × `height` bytes.
    fn detect(&self, gray: &[u8], width: u32, height: u32)
        -> Result<Vec<DetectedFace>, FaceCropError>;
}
