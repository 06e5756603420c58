use crate::detection::domain::face_detector::FaceDetector;
use crate::overlay::domain::overlay_item::compose_overlay;
use crate::overlay::domain::overlay_renderer::OverlayRenderer;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::video::domain::frame_sink::{FrameSink, SinkControl};
use crate::video::domain::frame_source::FrameSource;

/// Metric name for the number of faces kept in a frame.
pub const FACES_METRIC: &str = "faces";

/// Totals of one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: usize,
    pub detections: usize,
}

/// Capture → detect → annotate → present, one frame at a time.
pub struct LiveDetectionUseCase {
    source: Box<dyn FrameSource>,
    detector: Box<dyn FaceDetector>,
    renderer: Box<dyn OverlayRenderer>,
    sinks: Vec<Box<dyn FrameSink>>,
    logger: Box<dyn PipelineLogger>,
    max_frames: Option<usize>,
}

impl LiveDetectionUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Box<dyn FaceDetector>,
        renderer: Box<dyn OverlayRenderer>,
        sinks: Vec<Box<dyn FrameSink>>,
        logger: Box<dyn PipelineLogger>,
        max_frames: Option<usize>,
    ) -> Self {
        Self {
            source,
            detector,
            renderer,
            sinks,
            logger,
            max_frames,
        }
    }

    /// Runs until the source is exhausted, a sink asks to stop, or the
    /// frame limit is reached.
    ///
    /// The source and every sink are closed even when a frame fails.
    pub fn execute(&mut self) -> Result<RunSummary, Box<dyn std::error::Error>> {
        let metadata = self.source.open()?;
        self.logger.info(&format!(
            "Opened {} ({}x{}, {:.1} fps)",
            metadata.description, metadata.width, metadata.height, metadata.fps
        ));

        let total = metadata
            .total_frames
            .map(|t| self.max_frames.map_or(t, |max| t.min(max)));
        let result = self.run_frames(total);

        self.source.close();
        for sink in &mut self.sinks {
            sink.close();
        }
        self.logger.summary();

        result
    }

    fn run_frames(&mut self, total: Option<usize>) -> Result<RunSummary, Box<dyn std::error::Error>> {
        let mut summary = RunSummary::default();
        if self.max_frames == Some(0) {
            return Ok(summary);
        }

        for frame in self.source.frames() {
            let mut frame = frame?;

            let result = self.detector.detect(&frame)?;
            for (stage, duration_ms) in result.timings.stages() {
                self.logger.timing(stage, duration_ms);
            }
            self.logger
                .metric(FACES_METRIC, result.detections.len() as f64);
            self.logger
                .info(&format!("totalTime={:.2}ms", result.timings.total_ms()));

            let items = compose_overlay(&result.detections, &result.timings);
            self.renderer.render(&mut frame, &items)?;

            summary.frames += 1;
            summary.detections += result.detections.len();
            self.logger.progress(summary.frames, total);

            let mut stop = false;
            for sink in &mut self.sinks {
                if sink.present(&frame)? == SinkControl::Stop {
                    stop = true;
                }
            }
            if stop {
                log::info!("Stop requested after {} frames", summary.frames);
                break;
            }
            if self.max_frames == Some(summary.frames) {
                break;
            }
        }

        Ok(summary)
    }
}
