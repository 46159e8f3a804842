use image::RgbaImage;
use rayon::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::brightness::measure_brightness;
use crate::error::FaceCropError;
use crate::face_detector::{DetectedFace, FaceDetector};
use crate::region::{clamp_box, crop, BoundingBox};
use crate::source::ImageSource;
use crate::FaceResult;

/// Clamp, crop, and measure every face concurrently.
///
/// One result per face, in input order. The first failure (or an observed
/// cancellation) aborts the whole call.
pub(crate) fn process_faces(
    image: &RgbaImage,
    faces: &[DetectedFace],
    cancel: Option<&CancellationToken>,
) -> Result<Vec<FaceResult>, FaceCropError> {
    let results = faces
        .par_iter()
        .map(|face| {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                return Err(FaceCropError::Cancelled);
            }
            process_face(image, face)
        })
        .collect::<Result<Vec<_>, _>>();

    if let Err(FaceCropError::Cancelled) = &results {
        warn!(faces = faces.len(), "face processing cancelled");
    }
    results
}

fn process_face(image: &RgbaImage, face: &DetectedFace) -> Result<FaceResult, FaceCropError> {
    let bounds = clamp_box(face.bounds, image.width(), image.height());
    let cropped = crop(image, bounds)?;
    let brightness = measure_brightness(&cropped);

    Ok(FaceResult {
        detected: face.bounds,
        bounds,
        confidence: face.confidence,
        crop: cropped,
        brightness,
    })
}

/// Full pipeline: decode → grayscale → detect → filter → process.
pub(crate) fn detect_pipeline(
    source: &(impl ImageSource + ?Sized),
    detector: &dyn FaceDetector,
    min_confidence: Option<f64>,
    cancel: Option<&CancellationToken>,
) -> Result<Vec<FaceResult>, FaceCropError> {
    let decoded = source.decode()?;

    let gray = image::imageops::grayscale(&decoded);
    let detected = detector.detect(gray.as_raw(), gray.width(), gray.height())?;
    debug!(
        faces = detected.len(),
        width = decoded.width(),
        height = decoded.height(),
        "detector returned faces"
    );

    let faces: Vec<DetectedFace> = match min_confidence {
        Some(threshold) => detected
            .into_iter()
            .filter(|face| face.confidence >= threshold)
            .collect(),
        None => detected,
    };

    process_faces(&decoded, &faces, cancel)
}

/// Wrap bare boxes as detections with no score.
pub(crate) fn as_detections(boxes: &[BoundingBox]) -> Vec<DetectedFace> {
    boxes.iter().copied().map(DetectedFace::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageEncoder;

    fn halves(width: u32, height: u32) -> RgbaImage {
        // Left half black, right half white.
        RgbaImage::from_fn(width, height, |x, _| {
            let v = if x < width / 2 { 0 } else { 255 };
            image::Rgba([v, v, v, 255])
        })
    }

    struct FixedDetector(Vec<DetectedFace>);

    impl FaceDetector for FixedDetector {
        fn detect(
            &self,
            _gray: &[u8],
            _width: u32,
            _height: u32,
        ) -> Result<Vec<DetectedFace>, FaceCropError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn results_follow_input_order() {
        let image = halves(20, 10);
        let boxes: Vec<BoundingBox> = (0..64)
            .map(|i| {
                if i % 2 == 0 {
                    BoundingBox::new(0, 0, 10, 10)
                } else {
                    BoundingBox::new(10, 0, 20, 10)
                }
            })
            .collect();

        let results = process_faces(&image, &as_detections(&boxes), None).unwrap();
        assert_eq!(results.len(), boxes.len());
        for (i, (result, input)) in results.iter().zip(&boxes).enumerate() {
            assert_eq!(result.detected, *input);
            let expected = if i % 2 == 0 { 0.0 } else { 1.0 };
            assert!((result.brightness - expected).abs() < 1e-12, "face {i}");
        }
    }

    #[test]
    fn no_faces_yields_no_results() {
        let image = halves(4, 4);
        assert!(process_faces(&image, &[], None).unwrap().is_empty());
    }

    #[test]
    fn outside_face_yields_empty_crop() {
        let image = halves(10, 10);
        let faces = as_detections(&[BoundingBox::new(20, 20, 30, 30)]);
        let results = process_faces(&image, &faces, None).unwrap();
        assert_eq!(results[0].bounds, BoundingBox::new(10, 10, 10, 10));
        assert_eq!(results[0].crop.dimensions(), (0, 0));
        assert_eq!(results[0].brightness, 0.0);
    }

    #[test]
    fn cancelled_token_stops_processing() {
        let image = halves(10, 10);
        let token = CancellationToken::new();
        token.cancel();
        let faces = as_detections(&[BoundingBox::new(0, 0, 5, 5)]);
        let err = process_faces(&image, &faces, Some(&token)).unwrap_err();
        assert!(matches!(err, FaceCropError::Cancelled));
    }

    #[test]
    fn pipeline_filters_low_confidence() {
        let png = {
            let mut buffer = Vec::new();
            image::codecs::png::PngEncoder::new(&mut buffer)
                .write_image(
                    halves(10, 10).as_raw(),
                    10,
                    10,
                    image::ExtendedColorType::Rgba8,
                )
                .unwrap();
            buffer
        };
        let detector = FixedDetector(vec![
            DetectedFace {
                bounds: BoundingBox::new(0, 0, 5, 5),
                confidence: 0.2,
            },
            DetectedFace {
                bounds: BoundingBox::new(5, 0, 10, 5),
                confidence: 0.9,
            },
        ]);

        let all = detect_pipeline(&png, &detector, None, None).unwrap();
        assert_eq!(all.len(), 2);

        let confident = detect_pipeline(&png, &detector, Some(0.5), None).unwrap();
        assert_eq!(confident.len(), 1);
        assert_eq!(confident[0].bounds, BoundingBox::new(5, 0, 10, 5));
        assert!((confident[0].confidence - 0.9).abs() < f64::EPSILON);
    }
}
