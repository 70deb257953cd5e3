pub const YOLO_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const YOLO_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

pub const EMBEDDING_MODEL_NAME: &str = "w600k_r50.onnx";
pub const EMBEDDING_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/w600k_r50.onnx";

/// Max cosine distance between ArcFace embeddings for two faces to count as
/// the same person.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.68;

/// Minimum detector confidence for a face box to be used.
pub const DEFAULT_DETECTION_CONFIDENCE: f64 = 0.5;

/// Fraction of the face box added on every side before embedding.
pub const FACE_CROP_MARGIN: f64 = 0.1;
