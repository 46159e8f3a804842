//! Face crop post-processing: clamp detector boxes to the image, crop each
//! face, and score its average brightness.
//!
//! # Example
//!
//! ```no_run
//! use facecrop::{BoundingBox, DetectedFace, FaceCropError, FaceDetector, FaceProcessor};
//!
//! struct MyDetector;
//! impl FaceDetector for MyDetector {
//!     fn detect(&self, _gray: &[u8], _w: u32, _h: u32) -> Result<Vec<DetectedFace>, FaceCropError> {
//!         Ok(vec![BoundingBox::new(10, 10, 60, 70).into()])
//!     }
//! }
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let faces = FaceProcessor::new(Box::new(MyDetector)).detect(&bytes).unwrap();
//! for face in &faces {
//!     println!("{:?}: {:.3}", face.bounds, face.brightness);
//! }
//! ```
#![warn(missing_docs)]

mod brightness;
mod error;
/// Face detection trait and detection type.
pub mod face_detector;
mod processor;
/// Bounding boxes, clamping, and cropping.
pub mod region;
#[cfg(feature = "rustface")]
/// Built-in SeetaFace-based face detector backend.
pub mod rustface_backend;
mod source;

use image::RgbaImage;
use tokio_util::sync::CancellationToken;

/// Average brightness of an image in `[0.0, 1.0]`.
pub use brightness::measure_brightness;
/// Error type returned by facecrop operations.
pub use error::FaceCropError;
/// Face detection trait and detected-face type.
pub use face_detector::{DetectedFace, FaceDetector};
/// Bounding box type and the clamp/crop operations.
pub use region::{clamp_box, crop, BoundingBox};
#[cfg(feature = "rustface")]
/// Built-in detector backed by a SeetaFace model.
pub use rustface_backend::{DetectorOptions, PerformanceMode, RustfaceDetector};
/// Image decoding capability.
pub use source::ImageSource;

/// One processed face.
#[derive(Debug, Clone)]
pub struct FaceResult {
    /// The box as reported by the detector (or passed by the caller).
    pub detected: BoundingBox,

    /// The box after clamping to the image bounds. `crop` covers exactly this region.
    pub bounds: BoundingBox,

    /// Detector confidence. `0.0` when the box came without a score.
    pub confidence: f64,

    /// Pixels inside `bounds`. Empty when the face lay outside the image.
    pub crop: RgbaImage,

    /// Average brightness of `crop` in `[0.0, 1.0]`.
    pub brightness: f64,
}

/// Clamp, crop, and measure each box against `image`.
///
/// Faces are processed concurrently. The result has one entry per box, in
/// the order of `boxes`.
pub fn process(
    image: &RgbaImage,
    boxes: &[BoundingBox],
) -> Result<Vec<FaceResult>, FaceCropError> {
    processor::process_faces(image, &processor::as_detections(boxes), None)
}

/// Builder for running detection and face post-processing on an image.
pub struct FaceProcessor {
    detector: Box<dyn FaceDetector>,
    /// Detections scoring below this are dropped before cropping.
    min_confidence: Option<f64>,
    cancel: Option<CancellationToken>,
}

impl FaceProcessor {
    /// Create a processor around a face detection backend.
    pub fn new(detector: Box<dyn FaceDetector>) -> Self {
        Self {
            detector,
            min_confidence: None,
            cancel: None,
        }
    }

    /// Drop detections whose confidence is below `threshold` (default: keep all).
    pub fn min_confidence(mut self, threshold: f64) -> Self {
        self.min_confidence = Some(threshold);
        self
    }

    /// Stop starting new per-face work once `token` is cancelled.
    ///
    /// A cancelled run returns [`FaceCropError::Cancelled`]. Faces already
    /// being processed finish, but their results are discarded.
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Decode `source`, detect faces, and process every detection.
    pub fn detect<S>(&self, source: &S) -> Result<Vec<FaceResult>, FaceCropError>
    where
        S: ImageSource + ?Sized,
    {
        self.check_cancelled()?;
        processor::detect_pipeline(
            source,
            self.detector.as_ref(),
            self.min_confidence,
            self.cancel.as_ref(),
        )
    }

    /// Process caller-supplied boxes, honouring this processor's cancellation token.
    pub fn process(
        &self,
        image: &RgbaImage,
        boxes: &[BoundingBox],
    ) -> Result<Vec<FaceResult>, FaceCropError> {
        self.check_cancelled()?;
        processor::process_faces(image, &processor::as_detections(boxes), self.cancel.as_ref())
    }

    fn check_cancelled(&self) -> Result<(), FaceCropError> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(FaceCropError::Cancelled),
            _ => Ok(()),
        }
    }
}
