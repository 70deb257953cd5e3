use std::path::Path;

use ndarray::ArrayView3;

/// A decoded photo: contiguous RGB bytes in row-major order.
///
/// Decoding happens once at the file boundary; everything downstream
/// (locating, cropping, embedding) works on the raw pixel buffer.
#[derive(Clone, Debug)]
pub struct FaceImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl FaceImage {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * 3,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
        }
    }

    /// Decode an image file of any format the `image` crate understands.
    pub fn open(path: &Path) -> Result<Self, image::ImageError> {
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        Ok(Self::new(rgb.into_raw(), width, height))
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(
            (self.height as usize, self.width as usize, 3),
            &self.data,
        )
        .expect("FaceImage data length must match dimensions")
    }

    /// Copy out the `[x1, y1, x2, y2]` box, clamped to the image bounds.
    ///
    /// The result is never smaller than 1x1 for a non-empty image.
    pub fn crop(&self, bbox: &[f64; 4]) -> FaceImage {
        if self.width == 0 || self.height == 0 {
            return self.clone();
        }
        let left = (bbox[0].floor().max(0.0) as u32).min(self.width - 1);
        let top = (bbox[1].floor().max(0.0) as u32).min(self.height - 1);
        let right = (bbox[2].ceil().max(0.0) as u32)
            .min(self.width)
            .max(left + 1);
        let bottom = (bbox[3].ceil().max(0.0) as u32)
            .min(self.height)
            .max(top + 1);

        let w = self.width as usize;
        let mut pixels = Vec::with_capacity(((right - left) * (bottom - top) * 3) as usize);
        for row in top as usize..bottom as usize {
            let start = (row * w + left as usize) * 3;
            let end = (row * w + right as usize) * 3;
            pixels.extend_from_slice(&self.data[start..end]);
        }
        FaceImage::new(pixels, right - left, bottom - top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> FaceImage {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[x as u8, y as u8, 0]);
            }
        }
        FaceImage::new(data, width, height)
    }

    #[test]
    fn test_construction_and_accessors() {
        let image = FaceImage::new(vec![0u8; 12], 2, 2);
        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 2);
        assert_eq!(image.data().len(), 12);
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * 3")]
    fn test_mismatched_data_length_panics_in_debug() {
        FaceImage::new(vec![0u8; 10], 2, 2);
    }

    #[test]
    fn test_as_ndarray_pixel_access() {
        let image = gradient(4, 3);
        let arr = image.as_ndarray();
        assert_eq!(arr.shape(), &[3, 4, 3]);
        assert_eq!(arr[[2, 1, 0]], 1);
        assert_eq!(arr[[2, 1, 1]], 2);
    }

    #[test]
    fn test_crop_inside_bounds() {
        let image = gradient(10, 10);
        let crop = image.crop(&[2.0, 3.0, 6.0, 5.0]);
        assert_eq!(crop.width(), 4);
        assert_eq!(crop.height(), 2);
        // First pixel of the crop is (x=2, y=3) of the source
        assert_eq!(&crop.data()[..3], &[2, 3, 0]);
    }

    #[test]
    fn test_crop_clamps_to_bounds() {
        let image = gradient(10, 8);
        let crop = image.crop(&[-5.0, -5.0, 50.0, 50.0]);
        assert_eq!(crop.width(), 10);
        assert_eq!(crop.height(), 8);
    }

    #[test]
    fn test_crop_degenerate_box_is_one_pixel() {
        let image = gradient(10, 10);
        let crop = image.crop(&[4.0, 4.0, 4.0, 4.0]);
        assert_eq!(crop.width(), 1);
        assert_eq!(crop.height(), 1);
        assert_eq!(crop.data(), &[4, 4, 0]);
    }

    #[test]
    fn test_open_decodes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("face.png");
        let mut img = image::RgbImage::new(6, 4);
        for pixel in img.pixels_mut() {
            *pixel = image::Rgb([50, 100, 200]);
        }
        img.save(&path).unwrap();

        let image = FaceImage::open(&path).unwrap();
        assert_eq!(image.width(), 6);
        assert_eq!(image.height(), 4);
        assert_eq!(&image.data()[..3], &[50, 100, 200]);
    }

    #[test]
    fn test_open_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"not an image").unwrap();
        assert!(FaceImage::open(&path).is_err());
    }

    #[test]
    fn test_open_nonexistent_errors() {
        assert!(FaceImage::open(Path::new("/nonexistent/face.png")).is_err());
    }
}
