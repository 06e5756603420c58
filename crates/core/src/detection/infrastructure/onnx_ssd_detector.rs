/// SSD face detector for ONNX conversions of face-detection-0200, run
/// through ONNX Runtime via `ort`.
///
/// Runs the three timed stages of a frame: tensor preparation, inference,
/// and decoding of the `[1, 1, N, 7]` detection output.
use std::path::Path;
use std::time::Instant;

use crate::detection::domain::detection_decoder::DetectionDecoder;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::tensor_preprocessor::{preprocess, PreprocessConfig};
use crate::shared::constants::{DEFAULT_INPUT_HEIGHT, DEFAULT_INPUT_WIDTH};
use crate::shared::detection::FrameDetections;
use crate::shared::frame::Frame;
use crate::shared::stage_timings::StageTimings;

use super::execution_provider::build_session;

pub struct OnnxSsdDetector {
    session: ort::session::Session,
    preprocess: PreprocessConfig,
    decoder: DetectionDecoder,
}

impl OnnxSsdDetector {
    /// Load the model and prepare for inference.
    ///
    /// The input resolution is read from the model's NCHW input shape,
    /// falling back to 256x256 when the shape is dynamic or unreadable.
    pub fn new(model_path: &Path, confidence: f32) -> Result<Self, Box<dyn std::error::Error>> {
        let session = build_session(model_path)?;

        let (width, height) = session
            .inputs()
            .first()
            .and_then(|input| {
                if let ort::value::ValueType::Tensor { ref shape, .. } = input.dtype() {
                    if shape.len() >= 4 && shape[2] > 0 && shape[3] > 0 {
                        Some((shape[3] as u32, shape[2] as u32))
                    } else {
                        None
                    }
                } else {
                    None
                }
            })
            .unwrap_or((DEFAULT_INPUT_WIDTH, DEFAULT_INPUT_HEIGHT));
        log::info!("Model input shape: [1, 3, {height}, {width}]");

        Ok(Self {
            session,
            preprocess: PreprocessConfig::new(width, height)?,
            decoder: DetectionDecoder::new(confidence),
        })
    }
}

impl FaceDetector for OnnxSsdDetector {
    fn detect(&mut self, frame: &Frame) -> Result<FrameDetections, Box<dyn std::error::Error>> {
        // 1. Preprocess: resize + channel order + normalize → NCHW float32
        let start = Instant::now();
        let input_tensor = preprocess(frame, &self.preprocess)?;
        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let preprocess_ms = elapsed_ms(start);

        // 2. Inference
        let start = Instant::now();
        let outputs = self.session.run(ort::inputs![input_value])?;
        let infer_ms = elapsed_ms(start);

        // 3. Decode the detection records
        let start = Instant::now();
        if outputs.len() == 0 {
            return Err("face detection model produced no outputs".into());
        }
        let tensor = outputs[0].try_extract_array::<f32>()?;
        let detections = self.decoder.decode_output(tensor.view(), frame)?;
        let postprocess_ms = elapsed_ms(start);

        Ok(FrameDetections {
            detections,
            timings: StageTimings {
                preprocess_ms,
                infer_ms,
                postprocess_ms,
            },
        })
    }
}

pub(crate) fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
