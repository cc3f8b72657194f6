use image::imageops::{self, FilterType};
use image::RgbaImage;
use ndarray::Array4;

use super::error::ClassifierError;

/// A decoded image: a grid of RGBA8 pixels.
pub type Bitmap = RgbaImage;

/// Model input laid out as `(batch = 1, height, width, channels = 3)`.
pub type Tensor = Array4<f32>;

/// Converts a bitmap into the normalized tensor the model consumes, using
/// bilinear interpolation.
///
/// The bitmap is scaled to exactly `target_size × target_size` without keeping
/// its aspect ratio, then every pixel's red, green and blue channels are divided
/// by 255. Alpha is dropped.
///
/// # Errors
/// - `ValidationError` if `target_size` is zero
/// - `ValidationError` if the bitmap has a zero width or height
///
/// # Example
/// ```
/// use pca200::{preprocess, Bitmap};
///
/// let bitmap = Bitmap::from_pixel(640, 480, image::Rgba([255, 0, 0, 255]));
/// let tensor = preprocess(&bitmap, 224).unwrap();
/// assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
/// ```
pub fn preprocess(bitmap: &Bitmap, target_size: u32) -> Result<Tensor, ClassifierError> {
    preprocess_with_filter(bitmap, target_size, FilterType::Triangle)
}

/// Same as [`preprocess`] with an explicit interpolation filter.
pub fn preprocess_with_filter(
    bitmap: &Bitmap,
    target_size: u32,
    filter: FilterType,
) -> Result<Tensor, ClassifierError> {
    if target_size == 0 {
        return Err(ClassifierError::ValidationError("Target size must be positive".into()));
    }
    let (width, height) = bitmap.dimensions();
    if width == 0 || height == 0 {
        return Err(ClassifierError::ValidationError(
            format!("Bitmap must have positive dimensions, got {}x{}", width, height)
        ));
    }

    if (width, height) == (target_size, target_size) {
        Ok(normalize(bitmap))
    } else {
        let resized = imageops::resize(bitmap, target_size, target_size, filter);
        Ok(normalize(&resized))
    }
}

// Iterates y outer, x inner so the tensor matches the bitmap's row-major layout.
fn normalize(bitmap: &Bitmap) -> Tensor {
    let (width, height) = bitmap.dimensions();
    let mut tensor = Array4::<f32>::zeros((1, height as usize, width as usize, 3));

    for y in 0..height {
        for x in 0..width {
            let pixel = bitmap.get_pixel(x, y);
            let (row, col) = (y as usize, x as usize);
            tensor[[0, row, col, 0]] = f32::from(pixel[0]) / 255.0;
            tensor[[0, row, col, 1]] = f32::from(pixel[1]) / 255.0;
            tensor[[0, row, col, 2]] = f32::from(pixel[2]) / 255.0;
        }
    }

    tensor
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_tensor_shape() {
        let bitmap = Bitmap::new(100, 37);
        let tensor = preprocess(&bitmap, 224).unwrap();
        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
    }

    #[test]
    fn test_values_in_unit_range() {
        let bitmap = Bitmap::from_fn(31, 17, |x, y| {
            Rgba([(x * 8) as u8, (y * 15) as u8, ((x + y) * 5) as u8, 7])
        });
        let tensor = preprocess(&bitmap, 12).unwrap();
        assert!(tensor.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_solid_red() {
        let bitmap = Bitmap::from_pixel(50, 30, Rgba([255, 0, 0, 128]));
        let tensor = preprocess(&bitmap, 8).unwrap();

        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(tensor[[0, y, x, 0]], 1.0);
                assert_eq!(tensor[[0, y, x, 1]], 0.0);
                assert_eq!(tensor[[0, y, x, 2]], 0.0);
            }
        }
    }

    #[test]
    fn test_channel_order_without_scaling() {
        let mut bitmap = Bitmap::new(2, 2);
        bitmap.put_pixel(0, 0, Rgba([10, 20, 30, 255]));
        bitmap.put_pixel(1, 0, Rgba([40, 50, 60, 255]));
        bitmap.put_pixel(0, 1, Rgba([70, 80, 90, 255]));
        bitmap.put_pixel(1, 1, Rgba([100, 110, 120, 0]));

        let tensor = preprocess(&bitmap, 2).unwrap();
        let expected: Vec<f32> = [10, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120]
            .iter()
            .map(|&v| v as f32 / 255.0)
            .collect();

        assert_eq!(tensor.iter().copied().collect::<Vec<_>>(), expected);
        // (y = 0, x = 1) is the top-right pixel
        assert_eq!(tensor[[0, 0, 1, 0]], 40.0 / 255.0);
        assert_eq!(tensor[[0, 1, 0, 2]], 90.0 / 255.0);
    }

    #[test]
    fn test_zero_target_size() {
        let bitmap = Bitmap::new(4, 4);
        assert!(matches!(
            preprocess(&bitmap, 0),
            Err(ClassifierError::ValidationError(_))
        ));
    }

    #[test]
    fn test_empty_bitmap() {
        let bitmap = Bitmap::new(0, 10);
        assert!(matches!(
            preprocess(&bitmap, 4),
            Err(ClassifierError::ValidationError(_))
        ));
    }

    #[test]
    fn test_nearest_filter_upscale() {
        let bitmap = Bitmap::from_pixel(1, 1, Rgba([0, 255, 51, 255]));
        let tensor = preprocess_with_filter(&bitmap, 3, FilterType::Nearest).unwrap();
        assert!(tensor.slice(ndarray::s![0, .., .., 1]).iter().all(|&v| v == 1.0));
        assert!(tensor.slice(ndarray::s![0, .., .., 2]).iter().all(|&v| v == 0.2));
    }
}
