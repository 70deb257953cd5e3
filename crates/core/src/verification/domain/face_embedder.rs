use crate::shared::face_image::FaceImage;

/// Domain interface for turning a face crop into an identity embedding.
///
/// Embeddings from the same embedder are comparable by cosine distance.
pub trait FaceEmbedder: Send {
    fn embed(&mut self, face: &FaceImage) -> Result<Vec<f32>, Box<dyn std::error::Error>>;
}
