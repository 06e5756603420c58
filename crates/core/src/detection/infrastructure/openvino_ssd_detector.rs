//! face-detection-0200 in OpenVINO IR form (`.xml` topology + `.bin`
//! weights), run through the OpenVINO runtime.
use std::path::Path;
use std::time::Instant;

use ndarray::ArrayView2;
use openvino::{CompiledModel, Core, DeviceType, ElementType, InferRequest, Shape, Tensor};

use crate::detection::domain::detection_decoder::{DetectionDecoder, RECORD_LEN};
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::tensor_preprocessor::{preprocess, PreprocessConfig};
use crate::shared::detection::FrameDetections;
use crate::shared::frame::Frame;
use crate::shared::stage_timings::StageTimings;

use super::onnx_ssd_detector::elapsed_ms;

pub struct OpenVinoSsdDetector {
    // Dropped before the compiled model and core it was created from.
    request: InferRequest,
    _compiled: CompiledModel,
    _core: Core,
    input_name: String,
    output_name: String,
    preprocess: PreprocessConfig,
    decoder: DetectionDecoder,
}

// Safety: the detector is driven from one thread at a time; the runtime
// handles inside are never shared.
unsafe impl Send for OpenVinoSsdDetector {}

impl OpenVinoSsdDetector {
    /// Reads `model_path` (`.xml`) and its `.bin` weights from the same
    /// folder, and compiles the model for the CPU device.
    pub fn new(model_path: &Path, confidence: f32) -> Result<Self, Box<dyn std::error::Error>> {
        let weights_path = model_path.with_extension("bin");
        let xml = model_path
            .to_str()
            .ok_or_else(|| format!("Non UTF-8 model path: {}", model_path.display()))?;
        let bin = weights_path
            .to_str()
            .ok_or_else(|| format!("Non UTF-8 weights path: {}", weights_path.display()))?;

        let mut core = Core::new()?;
        let model = core.read_model_from_file(xml, bin)?;
        let input_name = model.get_input_by_index(0)?.get_name()?;
        let output_name = model.get_output_by_index(0)?.get_name()?;
        let mut compiled = core.compile_model(&model, DeviceType::CPU)?;
        let request = compiled.create_infer_request()?;

        let preprocess = PreprocessConfig::default();
        log::info!(
            "Model input '{input_name}': [1, 3, {}, {}]",
            preprocess.height(),
            preprocess.width()
        );

        Ok(Self {
            request,
            _compiled: compiled,
            _core: core,
            input_name,
            output_name,
            preprocess,
            decoder: DetectionDecoder::new(confidence),
        })
    }
}

impl FaceDetector for OpenVinoSsdDetector {
    fn detect(&mut self, frame: &Frame) -> Result<FrameDetections, Box<dyn std::error::Error>> {
        let start = Instant::now();
        let input = preprocess(frame, &self.preprocess)?;
        let dims: Vec<i64> = input.shape().iter().map(|&d| d as i64).collect();
        let mut tensor = Tensor::new(ElementType::F32, &Shape::new(&dims)?)?;
        let values = input.as_slice().ok_or("input tensor is not contiguous")?;
        tensor.get_data_mut::<f32>()?.copy_from_slice(values);
        self.request.set_tensor(&self.input_name, &tensor)?;
        let preprocess_ms = elapsed_ms(start);

        let start = Instant::now();
        self.request.infer()?;
        let infer_ms = elapsed_ms(start);

        let start = Instant::now();
        let output = self.request.get_tensor(&self.output_name)?;
        let data = output.get_data::<f32>()?;
        // [1, 1, N, 7] flattened to one record per row.
        let records = ArrayView2::from_shape((data.len() / RECORD_LEN, RECORD_LEN), data)?;
        let detections = self.decoder.decode_output(records.into_dyn(), frame)?;
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
