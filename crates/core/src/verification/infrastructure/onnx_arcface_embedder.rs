/// ArcFace face embedder using ONNX Runtime.
///
/// Produces identity embeddings whose cosine distance separates
/// different people; used by the default verification backend.
use std::path::Path;

use crate::shared::face_image::FaceImage;
use crate::verification::domain::face_embedder::FaceEmbedder;

use super::execution_provider::load_session;

const INPUT_SIZE: usize = 112;
const NORM_MEAN: f32 = 127.5;
const NORM_STD: f32 = 127.5;

pub struct OnnxArcFaceEmbedder {
    session: ort::session::Session,
}

impl OnnxArcFaceEmbedder {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            session: load_session(model_path)?,
        })
    }
}

impl FaceEmbedder for OnnxArcFaceEmbedder {
    fn embed(&mut self, face: &FaceImage) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
        if face.width() == 0 || face.height() == 0 {
            return Err("Cannot embed an empty face crop".into());
        }
        let tensor = preprocess(face.data(), face.width(), face.height());
        let input_value = ort::value::Tensor::from_array(tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        let embedding_array = outputs[0].try_extract_array::<f32>()?;
        let embedding = embedding_array
            .as_slice()
            .ok_or("Cannot get embedding slice")?;
        Ok(embedding.to_vec())
    }
}

/// Resize crop to 112x112, normalize, NCHW layout.
fn preprocess(rgb_data: &[u8], width: u32, height: u32) -> ndarray::Array4<f32> {
    let src_w = width as usize;
    let src_h = height as usize;

    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, INPUT_SIZE, INPUT_SIZE));

    for y in 0..INPUT_SIZE {
        let src_y = (((y as f64 + 0.5) * src_h as f64 / INPUT_SIZE as f64) as usize).min(src_h - 1);
        for x in 0..INPUT_SIZE {
            let src_x =
                (((x as f64 + 0.5) * src_w as f64 / INPUT_SIZE as f64) as usize).min(src_w - 1);
            let offset = (src_y * src_w + src_x) * 3;
            if offset + 2 < rgb_data.len() {
                for c in 0..3 {
                    tensor[[0, c, y, x]] = (rgb_data[offset + c] as f32 - NORM_MEAN) / NORM_STD;
                }
            }
        }
    }

    tensor
}
