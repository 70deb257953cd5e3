use crate::shared::face_image::FaceImage;

/// Axis-aligned face box in image pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub confidence: f64,
}

impl FaceBox {
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Grow the box by `ratio` of its size on every side.
    pub fn expanded(&self, ratio: f64) -> FaceBox {
        let dx = self.width() * ratio;
        let dy = self.height() * ratio;
        FaceBox {
            x1: self.x1 - dx,
            y1: self.y1 - dy,
            x2: self.x2 + dx,
            y2: self.y2 + dy,
            confidence: self.confidence,
        }
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }
}

/// Domain interface for finding the face to compare in a photo.
///
/// Returns the single most confident face, or `None` if there is none.
pub trait FaceLocator: Send {
    fn locate(&mut self, image: &FaceImage)
        -> Result<Option<FaceBox>, Box<dyn std::error::Error>>;
}
