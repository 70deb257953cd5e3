/// YOLO face locator using ONNX Runtime via `ort`.
///
/// Letterboxes the photo, runs the face model and keeps the single most
/// confident box above the threshold. Keypoints in the output rows are
/// ignored; only the box is needed for cropping.
use std::path::Path;

use crate::shared::face_image::FaceImage;
use crate::verification::domain::face_locator::{FaceBox, FaceLocator};

use super::execution_provider::load_session;

/// Fallback YOLO model input resolution when the model doesn't specify dimensions.
const DEFAULT_INPUT_SIZE: u32 = 640;

/// YOLO face locator backed by an ONNX Runtime session.
pub struct OnnxYoloFaceLocator {
    session: ort::session::Session,
    confidence: f64,
    input_size: u32,
}

impl OnnxYoloFaceLocator {
    /// Load a YOLO ONNX model.
    ///
    /// The input resolution is read from the model's input shape (expecting NCHW).
    /// Falls back to 640 if the shape is dynamic or unreadable.
    pub fn new(model_path: &Path, confidence: f64) -> Result<Self, Box<dyn std::error::Error>> {
        let session = load_session(model_path)?;

        let input_size = session
            .inputs()
            .first()
            .and_then(|input| {
                if let ort::value::ValueType::Tensor { ref shape, .. } = input.dtype() {
                    if shape.len() >= 4 && shape[2] > 0 {
                        Some(shape[2] as u32)
                    } else {
                        None
                    }
                } else {
                    None
                }
            })
            .unwrap_or(DEFAULT_INPUT_SIZE);

        Ok(Self {
            session,
            confidence,
            input_size,
        })
    }
}

impl FaceLocator for OnnxYoloFaceLocator {
    fn locate(
        &mut self,
        image: &FaceImage,
    ) -> Result<Option<FaceBox>, Box<dyn std::error::Error>> {
        if image.width() == 0 || image.height() == 0 {
            return Ok(None);
        }

        let (input_tensor, mapping) = letterbox(image, self.input_size);

        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("YOLO model produced no outputs".into());
        }
        let tensor = outputs[0].try_extract_array::<f32>()?;
        let shape = tensor.shape().to_vec();
        let data = tensor.as_slice().ok_or("Cannot get tensor slice")?;

        let best = best_detection(data, &shape, self.confidence)?;
        Ok(best.map(|raw| mapping.map_box(raw, image.width(), image.height())))
    }
}

// ---------------------------------------------------------------------------
// Preprocessing
// ---------------------------------------------------------------------------

/// Mapping from letterboxed model coordinates back to the source image.
#[derive(Clone, Copy, Debug)]
struct Letterbox {
    scale: f64,
    pad_x: u32,
    pad_y: u32,
}

impl Letterbox {
    fn map_box(&self, raw: FaceBox, width: u32, height: u32) -> FaceBox {
        let map_x = |v: f64| ((v - self.pad_x as f64) / self.scale).clamp(0.0, width as f64);
        let map_y = |v: f64| ((v - self.pad_y as f64) / self.scale).clamp(0.0, height as f64);
        FaceBox {
            x1: map_x(raw.x1),
            y1: map_y(raw.y1),
            x2: map_x(raw.x2),
            y2: map_y(raw.y2),
            confidence: raw.confidence,
        }
    }
}

/// Letterbox-resize an image to `target_size` × `target_size`.
fn letterbox(image: &FaceImage, target_size: u32) -> (ndarray::Array4<f32>, Letterbox) {
    let fw = image.width() as f64;
    let fh = image.height() as f64;
    let target = target_size as f64;

    let scale = (target / fw).min(target / fh);
    let new_w = ((fw * scale).round() as u32).min(target_size);
    let new_h = ((fh * scale).round() as u32).min(target_size);
    let pad_x = (target_size - new_w) / 2;
    let pad_y = (target_size - new_h) / 2;

    // Padding uses 114/255 gray, the YOLO convention
    let gray = 114.0f32 / 255.0;
    let mut tensor =
        ndarray::Array4::<f32>::from_elem((1, 3, target_size as usize, target_size as usize), gray);

    let src = image.as_ndarray();
    let src_h = image.height() as usize;
    let src_w = image.width() as usize;

    for y in 0..new_h as usize {
        let src_y = ((y as f64 / scale) as usize).min(src_h - 1);
        for x in 0..new_w as usize {
            let src_x = ((x as f64 / scale) as usize).min(src_w - 1);
            let ty = pad_y as usize + y;
            let tx = pad_x as usize + x;
            for c in 0..3 {
                tensor[[0, c, ty, tx]] = src[[src_y, src_x, c]] as f32 / 255.0;
            }
        }
    }

    (
        tensor,
        Letterbox {
            scale,
            pad_x,
            pad_y,
        },
    )
}

// ---------------------------------------------------------------------------
// Postprocessing
// ---------------------------------------------------------------------------

/// Pick the most confident detection in letterbox coordinates.
///
/// YOLO output is `[1, features, detections]` or `[1, detections, features]`;
/// each detection starts with `[cx, cy, w, h, conf, ...]`.
fn best_detection(
    data: &[f32],
    shape: &[usize],
    confidence: f64,
) -> Result<Option<FaceBox>, Box<dyn std::error::Error>> {
    if shape.len() != 3 {
        return Err(format!("Unexpected YOLO output shape: {shape:?}").into());
    }
    let transposed = shape[1] < shape[2];
    let (num_dets, num_feats) = if transposed {
        (shape[2], shape[1])
    } else {
        (shape[1], shape[2])
    };
    if num_feats < 5 || data.len() < num_dets * num_feats {
        return Err(format!("Unexpected YOLO output shape: {shape:?}").into());
    }

    let feature = |det: usize, f: usize| -> f64 {
        if transposed {
            data[f * num_dets + det] as f64
        } else {
            data[det * num_feats + f] as f64
        }
    };

    let mut best: Option<FaceBox> = None;
    for i in 0..num_dets {
        let conf = feature(i, 4);
        if conf < confidence || best.is_some_and(|b| b.confidence >= conf) {
            continue;
        }
        let (cx, cy, w, h) = (feature(i, 0), feature(i, 1), feature(i, 2), feature(i, 3));
        best = Some(FaceBox {
            x1: cx - w / 2.0,
            y1: cy - h / 2.0,
            x2: cx + w / 2.0,
            y2: cy + h / 2.0,
            confidence: conf,
        });
    }
    Ok(best)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn image(w: u32, h: u32, value: u8) -> FaceImage {
        FaceImage::new(vec![value; (w * h * 3) as usize], w, h)
    }

    #[test]
    fn test_letterbox_preserves_aspect_ratio() {
        // Scale = min(640/200, 640/100) = 3.2 → 640x320, pad_y = 160
        let (tensor, lb) = letterbox(&image(200, 100, 128), 640);
        assert_eq!(tensor.shape(), &[1, 3, 640, 640]);
        assert!((lb.scale - 3.2).abs() < 0.01);
        assert_eq!(lb.pad_x, 0);
        assert_eq!(lb.pad_y, 160);
    }

    #[test]
    fn test_letterbox_values_normalized() {
        let (tensor, lb) = letterbox(&image(100, 50, 255), 640);
        let y = lb.pad_y as usize + 1;
        let x = lb.pad_x as usize + 1;
        assert!((tensor[[0, 0, y, x]] - 1.0).abs() < 0.01);
        assert!((tensor[[0, 0, 0, 0]] - 114.0 / 255.0).abs() < 0.01);
    }

    #[test]
    fn test_map_box_reverses_letterbox() {
        let lb = Letterbox {
            scale: 2.0,
            pad_x: 0,
            pad_y: 100,
        };
        let raw = FaceBox {
            x1: 20.0,
            y1: 120.0,
            x2: 60.0,
            y2: 180.0,
            confidence: 0.8,
        };
        let mapped = lb.map_box(raw, 320, 220);
        assert_relative_eq!(mapped.x1, 10.0);
        assert_relative_eq!(mapped.y1, 10.0);
        assert_relative_eq!(mapped.x2, 30.0);
        assert_relative_eq!(mapped.y2, 40.0);
    }

    #[test]
    fn test_map_box_clamps_to_image() {
        let lb = Letterbox {
            scale: 1.0,
            pad_x: 0,
            pad_y: 0,
        };
        let raw = FaceBox {
            x1: -10.0,
            y1: -10.0,
            x2: 500.0,
            y2: 500.0,
            confidence: 0.8,
        };
        let mapped = lb.map_box(raw, 100, 80);
        assert_eq!(mapped.as_array(), [0.0, 0.0, 100.0, 80.0]);
    }

    #[test]
    fn test_best_detection_row_major() {
        // [1, detections=6, features=5]; more detections than features
        let mut data = vec![0.0f32; 6 * 5];
        data[..5].copy_from_slice(&[50.0, 50.0, 20.0, 20.0, 0.6]);
        data[10..15].copy_from_slice(&[100.0, 100.0, 40.0, 40.0, 0.9]);
        let best = best_detection(&data, &[1, 6, 5], 0.5).unwrap().unwrap();
        assert_relative_eq!(best.confidence, 0.9, epsilon = 1e-6);
        assert_relative_eq!(best.x1, 80.0);
        assert_relative_eq!(best.x2, 120.0);
    }

    #[test]
    fn test_best_detection_transposed() {
        // [1, features=5, detections=8]: detection 3 is the only confident one
        let mut data = vec![0.0f32; 5 * 8];
        let det = 3;
        data[det] = 64.0; // cx
        data[8 + det] = 32.0; // cy
        data[2 * 8 + det] = 16.0; // w
        data[3 * 8 + det] = 8.0; // h
        data[4 * 8 + det] = 0.7; // conf
        let best = best_detection(&data, &[1, 5, 8], 0.5).unwrap().unwrap();
        assert_relative_eq!(best.x1, 56.0);
        assert_relative_eq!(best.y1, 28.0);
        assert_relative_eq!(best.x2, 72.0);
        assert_relative_eq!(best.y2, 36.0);
    }

    #[test]
    fn test_best_detection_below_threshold_is_none() {
        let mut data = vec![0.0f32; 5 * 8];
        data[4 * 8] = 0.2;
        assert!(best_detection(&data, &[1, 5, 8], 0.5).unwrap().is_none());
    }

    #[test]
    fn test_best_detection_rejects_bad_shape() {
        assert!(best_detection(&[0.0; 4], &[4], 0.5).is_err());
        assert!(best_detection(&[0.0; 24], &[1, 8, 3], 0.5).is_err());
    }
}
