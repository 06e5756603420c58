pub mod execution_provider;
pub mod model_resolver;
pub mod onnx_ssd_detector;
pub mod openvino_ssd_detector;
