pub mod command_verifier;
pub mod embedding_face_verifier;
pub mod execution_provider;
pub mod full_image_locator;
pub mod math;
pub mod onnx_arcface_embedder;
pub mod onnx_yolo_locator;
pub mod unavailable_verifier;
