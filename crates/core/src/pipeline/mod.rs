pub mod live_detection_use_case;
pub mod pipeline_logger;
