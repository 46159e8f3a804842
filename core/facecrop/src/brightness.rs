use image::RgbaImage;
use tracing::debug;

/// Average brightness of an image in `[0.0, 1.0]`.
///
/// Each pixel contributes `(r + g + b) / 3 / 255`; alpha is ignored. An
/// empty image has brightness `0.0`.
pub fn measure_brightness(image: &RgbaImage) -> f64 {
    let pixel_count = u64::from(image.width()) * u64::from(image.height());
    if pixel_count == 0 {
        return 0.0;
    }

    let total: f64 = image
        .pixels()
        .map(|pixel| {
            let [r, g, b, _] = pixel.0;
            (f64::from(r) + f64::from(g) + f64::from(b)) / 3.0 / 255.0
        })
        .sum();

    debug!(total, pixel_count, "measured crop brightness");

    total / pixel_count as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, image::Rgba(rgba))
    }

    #[test]
    fn black_is_zero() {
        assert_eq!(measure_brightness(&solid(4, 3, [0, 0, 0, 255])), 0.0);
    }

    #[test]
    fn white_is_one() {
        let brightness = measure_brightness(&solid(4, 3, [255, 255, 255, 255]));
        assert!((brightness - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_image_is_zero() {
        assert_eq!(measure_brightness(&RgbaImage::new(0, 0)), 0.0);
        assert_eq!(measure_brightness(&RgbaImage::new(5, 0)), 0.0);
    }

    #[test]
    fn checkerboard_is_half() {
        let mut image = RgbaImage::new(2, 2);
        image.put_pixel(0, 0, image::Rgba([255, 255, 255, 255]));
        image.put_pixel(1, 0, image::Rgba([0, 0, 0, 255]));
        image.put_pixel(0, 1, image::Rgba([255, 255, 255, 255]));
        image.put_pixel(1, 1, image::Rgba([0, 0, 0, 255]));
        assert!((measure_brightness(&image) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn alpha_is_ignored() {
        let opaque = measure_brightness(&solid(2, 2, [90, 120, 150, 255]));
        let transparent = measure_brightness(&solid(2, 2, [90, 120, 150, 0]));
        assert_eq!(opaque, transparent);
    }

    #[test]
    fn channel_order_is_irrelevant() {
        let a = measure_brightness(&solid(1, 1, [200, 10, 60, 255]));
        let b = measure_brightness(&solid(1, 1, [60, 200, 10, 255]));
        assert!((a - b).abs() < 1e-12);
        // (200 + 10 + 60) / 3 / 255
        assert!((a - 90.0 / 255.0).abs() < 1e-12);
    }

    #[test]
    fn lighter_images_score_higher() {
        let mut previous = -1.0;
        for level in (0..=255u8).step_by(15) {
            let brightness = measure_brightness(&solid(3, 3, [level, level, level, 255]));
            assert!(brightness > previous, "level {level}: {brightness}");
            assert!((0.0..=1.0).contains(&brightness));
            previous = brightness;
        }
    }
}
