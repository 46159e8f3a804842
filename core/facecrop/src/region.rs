use image::RgbaImage;

use crate::error::FaceCropError;

/// Axis-aligned face rectangle in image pixel coordinates.
///
/// Detectors may report boxes that extend past the image edges, so every
/// coordinate is signed. Run a box through [`clamp_box`] before cropping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BoundingBox {
    /// X coordinate of the left edge (inclusive).
    pub left: i32,
    /// Y coordinate of the top edge (inclusive).
    pub top: i32,
    /// X coordinate of the right edge (exclusive).
    pub right: i32,
    /// Y coordinate of the bottom edge (exclusive).
    pub bottom: i32,
}

impl BoundingBox {
    /// Build a box from its four edges.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Build a box from its top-left corner and size.
    pub fn from_xywh(x: i32, y: i32, width: u32, height: u32) -> Self {
        let width = i32::try_from(width).unwrap_or(i32::MAX);
        let height = i32::try_from(height).unwrap_or(i32::MAX);
        Self {
            left: x,
            top: y,
            right: x.saturating_add(width),
            bottom: y.saturating_add(height),
        }
    }

    /// Horizontal extent. Negative for a malformed box.
    pub fn width(&self) -> i64 {
        i64::from(self.right) - i64::from(self.left)
    }

    /// Vertical extent. Negative for a malformed box.
    pub fn height(&self) -> i64 {
        i64::from(self.bottom) - i64::from(self.top)
    }

    /// True when the box covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }
}

/// Clamp a detector box to the bounds of a `image_width` × `image_height` image.
///
/// The result always satisfies `0 <= left <= right <= image_width` and
/// `0 <= top <= bottom <= image_height`. A box lying entirely outside the
/// image collapses to a zero-area box on the nearest edge.
pub fn clamp_box(bounds: BoundingBox, image_width: u32, image_height: u32) -> BoundingBox {
    let max_x = i32::try_from(image_width).unwrap_or(i32::MAX);
    let max_y = i32::try_from(image_height).unwrap_or(i32::MAX);

    let left = bounds.left.clamp(0, max_x);
    let top = bounds.top.clamp(0, max_y);

    BoundingBox {
        left,
        top,
        right: bounds.right.clamp(left, max_x),
        bottom: bounds.bottom.clamp(top, max_y),
    }
}

/// Copy the pixels inside `bounds` into a new image.
///
/// `bounds` must already lie within the image (see [`clamp_box`]). A
/// zero-area box yields an empty image.
pub fn crop(image: &RgbaImage, bounds: BoundingBox) -> Result<RgbaImage, FaceCropError> {
    let (width, height) = (bounds.width(), bounds.height());
    if width < 0 || height < 0 {
        return Err(invalid_region(bounds));
    }

    let x = u32::try_from(bounds.left).map_err(|_| invalid_region(bounds))?;
    let y = u32::try_from(bounds.top).map_err(|_| invalid_region(bounds))?;
    let (width, height) = (width as u32, height as u32);

    if u64::from(x) + u64::from(width) > u64::from(image.width())
        || u64::from(y) + u64::from(height) > u64::from(image.height())
    {
        return Err(invalid_region(bounds));
    }

    Ok(image::imageops::crop_imm(image, x, y, width, height).to_image())
}

fn invalid_region(bounds: BoundingBox) -> FaceCropError {
    FaceCropError::InvalidRegion {
        width: bounds.width(),
        height: bounds.height(),
    }
}
