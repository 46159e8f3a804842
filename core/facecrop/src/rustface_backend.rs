use std::io::Read;
use std::path::Path;

use crate::error::FaceCropError;
use crate::face_detector::{DetectedFace, FaceDetector};
use crate::region::BoundingBox;

/// Speed/accuracy trade-off for the SeetaFace detector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PerformanceMode {
    /// Coarser pyramid and sliding window. Misses small faces.
    Fast,

    /// Finer pyramid and sliding window.
    #[default]
    Accurate,
}

/// Tuning knobs passed to the SeetaFace detector on every run.
///
/// Start from a [`PerformanceMode`] and override fields as needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorOptions {
    /// Smallest face edge, in pixels, the detector searches for.
    pub min_face_size: u32,
    /// Minimum classifier score for a window to count as a face.
    pub score_thresh: f64,
    /// Downscale factor between pyramid levels (0.0–1.0).
    pub pyramid_scale_factor: f32,
    /// Horizontal and vertical sliding window step, in pixels.
    pub slide_window_step: (u32, u32),
}

impl From<PerformanceMode> for DetectorOptions {
    fn from(mode: PerformanceMode) -> Self {
        match mode {
            PerformanceMode::Fast => Self {
                min_face_size: 40,
                score_thresh: 2.0,
                pyramid_scale_factor: 0.6,
                slide_window_step: (8, 8),
            },
            PerformanceMode::Accurate => Self {
                min_face_size: 20,
                score_thresh: 2.0,
                pyramid_scale_factor: 0.8,
                slide_window_step: (4, 4),
            },
        }
    }
}

impl Default for DetectorOptions {
    fn default() -> Self {
        PerformanceMode::default().into()
    }
}

/// Face detector backed by the `rustface` crate (SeetaFace engine).
///
/// The model is loaded once; each [`FaceDetector::detect`] call builds a
/// fresh detector from it, so one `RustfaceDetector` can serve several
/// threads.
pub struct RustfaceDetector {
    model: rustface::Model,
    options: DetectorOptions,
}

impl RustfaceDetector {
    /// Load a SeetaFace model file (e.g. `seeta_fd_frontal_v1.0.bin`).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FaceCropError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            FaceCropError::DetectionError(format!("failed to open model {}: {e}", path.display()))
        })?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Load a SeetaFace model from an in-memory copy.
    pub fn from_bytes(model_data: &[u8]) -> Result<Self, FaceCropError> {
        Self::from_reader(std::io::Cursor::new(model_data))
    }

    /// Load a SeetaFace model from any reader.
    pub fn from_reader(reader: impl Read) -> Result<Self, FaceCropError> {
        let model = rustface::read_model(reader)
            .map_err(|e| FaceCropError::DetectionError(format!("failed to load model: {e}")))?;
        Ok(Self {
            model,
            options: DetectorOptions::default(),
        })
    }

    /// Apply a performance preset, replacing all current options.
    pub fn performance_mode(self, mode: PerformanceMode) -> Self {
        self.options(mode.into())
    }

    /// Replace the detector options.
    pub fn options(mut self, options: DetectorOptions) -> Self {
        self.options = options;
        self
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(
        &self,
        gray: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<DetectedFace>, FaceCropError> {
        let expected = u64::from(width) * u64::from(height);
        if gray.len() as u64 != expected {
            return Err(FaceCropError::DetectionError(format!(
                "grayscale buffer has {} bytes, expected {expected} for {width}x{height}",
                gray.len()
            )));
        }

        let DetectorOptions {
            min_face_size,
            score_thresh,
            pyramid_scale_factor,
            slide_window_step: (step_x, step_y),
        } = self.options;

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(min_face_size);
        detector.set_score_thresh(score_thresh);
        detector.set_pyramid_scale_factor(pyramid_scale_factor);
        detector.set_slide_window_step(step_x, step_y);

        let faces = detector.detect(&rustface::ImageData::new(gray, width, height));

        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                DetectedFace {
                    bounds: BoundingBox::from_xywh(bbox.x(), bbox.y(), bbox.width(), bbox.height()),
                    confidence: face.score(),
                }
            })
            .collect())
    }
}
