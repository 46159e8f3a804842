use thiserror::Error;

#[derive(Debug, Error)]
pub enum FaceCropError {
    #[error("failed to decode image: {0}")]
    DecodeError(String),

    #[error("face detection failed: {0}")]
    DetectionError(String),

    #[error("invalid crop region: {width}x{height}")]
    InvalidRegion { width: i64, height: i64 },

    #[error("face processing was cancelled")]
    Cancelled,
}
