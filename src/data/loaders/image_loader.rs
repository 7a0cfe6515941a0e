//! Loader for the companion RGB image (PNG, JPEG, BMP, TIFF, WebP).
//!
//! Decodes at the file's own bit depth and returns an (H × W × 3) array.

use image::DynamicImage;
use ndarray::{Array3, Axis};

use crate::config::{ChannelOrder, ImageNormalization};
use crate::constants::{IMAGE_CHANNELS, MAX_8BIT, MAX_16BIT};
use crate::data::loader::LoaderError;

/// Loader for standard image formats.
///
/// Only 3-channel images are accepted, at 8 or 16 bits per sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageLoader {
    /// Sample scaling
    pub normalization: ImageNormalization,
    /// Order of the returned channels
    pub channel_order: ChannelOrder,
}

impl ImageLoader {
    /// Create a loader with the given scaling and channel order.
    pub fn new(normalization: ImageNormalization, channel_order: ChannelOrder) -> Self {
        Self {
            normalization,
            channel_order,
        }
    }

    /// Decode an image into an (H × W × 3) array scaled per `normalization`.
    pub fn load(&self, data: &[u8]) -> Result<Array3<f64>, LoaderError> {
        let img = image::load_from_memory(data)
            .map_err(|e| LoaderError::new(format!("Failed to decode image: {}", e)))?;

        let (width, height, samples, depth_max) = match img {
            DynamicImage::ImageRgb8(buf) => {
                let (w, h) = buf.dimensions();
                let samples: Vec<f64> = buf.into_raw().into_iter().map(f64::from).collect();
                (w, h, samples, MAX_8BIT)
            }
            DynamicImage::ImageRgb16(buf) => {
                let (w, h) = buf.dimensions();
                let samples: Vec<f64> = buf.into_raw().into_iter().map(f64::from).collect();
                (w, h, samples, MAX_16BIT)
            }
            other => {
                return Err(LoaderError::new(format!(
                    "Expected an 8- or 16-bit RGB image, got {:?}",
                    other.color()
                ))
                .with_loader("image"));
            }
        };

        let scale = match self.normalization {
            ImageNormalization::Fixed8Bit => MAX_8BIT,
            ImageNormalization::BitDepth => depth_max,
        };

        let mut array =
            Array3::from_shape_vec((height as usize, width as usize, IMAGE_CHANNELS), samples)
                .map_err(|e| LoaderError::new(format!("Image buffer size mismatch: {}", e)))?;
        array.mapv_inplace(|v| v / scale);

        if self.channel_order == ChannelOrder::Bgr {
            array.invert_axis(Axis(2));
        }

        log::trace!(
            "ImageLoader: decoded {}x{} image, scale {}",
            width,
            height,
            scale
        );

        Ok(array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::fixtures::{png_bytes_rgb8, png_bytes_rgb16};

    #[test]
    fn test_rgb_order_and_fixed_scale() {
        let bytes = png_bytes_rgb8(2, 1, |x, _| [255, 51, x as u8]);
        let loader = ImageLoader::new(ImageNormalization::Fixed8Bit, ChannelOrder::Rgb);

        let array = loader.load(&bytes).unwrap();
        assert_eq!(array.dim(), (1, 2, 3));
        assert_eq!(array[[0, 0, 0]], 1.0);
        assert!((array[[0, 0, 1]] - 0.2).abs() < 1e-12);
        assert_eq!(array[[0, 1, 2]], 1.0 / 255.0);
    }

    #[test]
    fn test_bgr_reverses_channels() {
        let bytes = png_bytes_rgb8(1, 1, |_, _| [10, 20, 30]);
        let loader = ImageLoader::new(ImageNormalization::Fixed8Bit, ChannelOrder::Bgr);

        let array = loader.load(&bytes).unwrap();
        assert_eq!(array[[0, 0, 0]], 30.0 / 255.0);
        assert_eq!(array[[0, 0, 1]], 20.0 / 255.0);
        assert_eq!(array[[0, 0, 2]], 10.0 / 255.0);
    }

    #[test]
    fn test_sixteen_bit_normalization_modes() {
        let bytes = png_bytes_rgb16(1, 1, |_, _| [65535, 0, 255]);

        let by_depth = ImageLoader::new(ImageNormalization::BitDepth, ChannelOrder::Rgb)
            .load(&bytes)
            .unwrap();
        assert_eq!(by_depth[[0, 0, 0]], 1.0);
        assert_eq!(by_depth[[0, 0, 2]], 255.0 / 65535.0);

        let fixed = ImageLoader::new(ImageNormalization::Fixed8Bit, ChannelOrder::Rgb)
            .load(&bytes)
            .unwrap();
        assert_eq!(fixed[[0, 0, 0]], 65535.0 / 255.0);
        assert_eq!(fixed[[0, 0, 2]], 1.0);
    }

    #[test]
    fn test_grayscale_rejected() {
        let gray = image::GrayImage::from_pixel(2, 2, image::Luma([7]));
        let mut bytes = Vec::new();
        gray.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let err = ImageLoader::default().load(&bytes).unwrap_err();
        assert!(err.message.contains("RGB"), "got: {}", err);
    }
}
