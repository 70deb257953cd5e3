use crate::shared::face_image::FaceImage;
use crate::verification::domain::face_locator::{FaceBox, FaceLocator};

/// Treats the whole photo as the face.
///
/// For report photos that are already tight face crops, or when no
/// detection model is available.
pub struct FullImageLocator;

impl FaceLocator for FullImageLocator {
    fn locate(
        &mut self,
        image: &FaceImage,
    ) -> Result<Option<FaceBox>, Box<dyn std::error::Error>> {
        if image.width() == 0 || image.height() == 0 {
            return Ok(None);
        }
        Ok(Some(FaceBox {
            x1: 0.0,
            y1: 0.0,
            x2: image.width() as f64,
            y2: image.height() as f64,
            confidence: 1.0,
        }))
    }
}
