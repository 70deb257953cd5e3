/// Embedding-based face verification: locate, crop, embed, compare.
///
/// The probe embedding is computed on first use and reused for every
/// later candidate with the same probe path.
use std::path::{Path, PathBuf};

use crate::shared::constants::FACE_CROP_MARGIN;
use crate::shared::face_image::FaceImage;
use crate::verification::domain::face_embedder::FaceEmbedder;
use crate::verification::domain::face_locator::FaceLocator;
use crate::verification::domain::face_verifier::{FaceVerifier, Verification};
use crate::verification::infrastructure::math::{cosine_distance, l2_normalize};

pub struct EmbeddingFaceVerifier {
    locator: Box<dyn FaceLocator>,
    embedder: Box<dyn FaceEmbedder>,
    threshold: f64,
    probe: Option<(PathBuf, Vec<f32>)>,
}

impl EmbeddingFaceVerifier {
    /// `threshold` is the largest cosine distance still accepted as a match.
    pub fn new(
        locator: Box<dyn FaceLocator>,
        embedder: Box<dyn FaceEmbedder>,
        threshold: f64,
    ) -> Self {
        Self {
            locator,
            embedder,
            threshold,
            probe: None,
        }
    }

    fn represent(&mut self, path: &Path) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
        let image = FaceImage::open(path)
            .map_err(|e| format!("cannot decode {}: {e}", path.display()))?;
        let face = self
            .locator
            .locate(&image)?
            .ok_or_else(|| format!("no face detected in {}", path.display()))?;
        let crop = image.crop(&face.expanded(FACE_CROP_MARGIN).as_array());

        let mut embedding = self.embedder.embed(&crop)?;
        if embedding.is_empty() {
            return Err(format!("empty embedding for {}", path.display()).into());
        }
        l2_normalize(&mut embedding);
        Ok(embedding)
    }

    fn probe_embedding(&mut self, probe: &Path) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
        if let Some((path, embedding)) = &self.probe {
            if path == probe {
                return Ok(embedding.clone());
            }
        }
        let embedding = self.represent(probe)?;
        self.probe = Some((probe.to_path_buf(), embedding.clone()));
        Ok(embedding)
    }
}

impl FaceVerifier for EmbeddingFaceVerifier {
    fn verify(
        &mut self,
        probe: &Path,
        candidate: &Path,
    ) -> Result<Verification, Box<dyn std::error::Error>> {
        let probe_embedding = self.probe_embedding(probe)?;
        let candidate_embedding = self.represent(candidate)?;
        if probe_embedding.len() != candidate_embedding.len() {
            return Err(format!(
                "embedding size mismatch: {} vs {}",
                probe_embedding.len(),
                candidate_embedding.len()
            )
            .into());
        }

        let distance = cosine_distance(&probe_embedding, &candidate_embedding);
        log::debug!(
            "{} vs {}: distance {distance:.4} (threshold {:.4})",
            probe.display(),
            candidate.display(),
            self.threshold
        );
        Ok(Verification::from_distance(distance, self.threshold))
    }
}
