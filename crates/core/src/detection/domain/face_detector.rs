use crate::shared::detection::FrameDetections;
use crate::shared::frame::Frame;

/// Domain interface for face detection.
///
/// Implementations report how long each stage took alongside the
/// detections so the overlay can show live timings.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<FrameDetections, Box<dyn std::error::Error>>;
}
