use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::error::FaceCropError;

/// Something that can be decoded into an RGBA pixel grid.
///
/// Implemented for encoded image bytes (JPEG, PNG, or WebP) and for file
/// paths. Implement it for other inputs, such as a content URI on a mobile
/// platform, to feed them to [`crate::FaceProcessor::detect`].
pub trait ImageSource {
    /// Decode into RGBA pixels. Fails with [`FaceCropError::DecodeError`].
    fn decode(&self) -> Result<RgbaImage, FaceCropError>;
}

impl ImageSource for [u8] {
    fn decode(&self) -> Result<RgbaImage, FaceCropError> {
        if self.is_empty() {
            return Err(FaceCropError::DecodeError("no image data".to_string()));
        }
        let decoded =
            image::load_from_memory(self).map_err(|e| FaceCropError::DecodeError(e.to_string()))?;
        non_empty(decoded.to_rgba8())
    }
}

impl ImageSource for Vec<u8> {
    fn decode(&self) -> Result<RgbaImage, FaceCropError> {
        self.as_slice().decode()
    }
}

impl ImageSource for Path {
    fn decode(&self) -> Result<RgbaImage, FaceCropError> {
        let decoded = image::open(self)
            .map_err(|e| FaceCropError::DecodeError(format!("{}: {e}", self.display())))?;
        non_empty(decoded.to_rgba8())
    }
}

impl ImageSource for PathBuf {
    fn decode(&self) -> Result<RgbaImage, FaceCropError> {
        self.as_path().decode()
    }
}

impl ImageSource for RgbaImage {
    fn decode(&self) -> Result<RgbaImage, FaceCropError> {
        non_empty(self.clone())
    }
}

fn non_empty(image: RgbaImage) -> Result<RgbaImage, FaceCropError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(FaceCropError::DecodeError(
            "image dimensions are zero".to_string(),
        ));
    }
    Ok(image)
}
