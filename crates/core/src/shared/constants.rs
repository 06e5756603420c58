/// Folder name of the face-detection-0200 bundle inside the model cache.
pub const FACE_MODEL_FOLDER: &str = "face-detection-0200";

/// OpenVINO IR topology.
pub const FACE_MODEL_NAME: &str = "face-detection-0200.xml";

/// OpenVINO IR weights, read from the topology's folder.
pub const FACE_WEIGHTS_NAME: &str = "face-detection-0200.bin";

/// Open Model Zoo 2021.4 release of face-detection-0200 (FP16 weights).
pub const FACE_MODEL_BASE_URL: &str = "https://storage.openvinotoolkit.org/repositories/open_model_zoo/2021.4/models_bin/2/face-detection-0200/FP16";

/// Records scoring at or below this confidence are dropped.
pub const DEFAULT_CONFIDENCE: f32 = 0.5;

/// Input resolution of face-detection-0200.
pub const DEFAULT_INPUT_WIDTH: u32 = 256;
pub const DEFAULT_INPUT_HEIGHT: u32 = 256;

pub const DEFAULT_CAMERA_INDEX: i32 = 0;

pub const WINDOW_TITLE: &str = "frame";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
