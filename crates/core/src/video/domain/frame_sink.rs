use crate::shared::frame::Frame;

/// What the pipeline should do after a sink consumed a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SinkControl {
    Continue,
    Stop,
}

/// Consumes annotated frames (on-screen window, image files, ...).
pub trait FrameSink: Send {
    fn present(&mut self, frame: &Frame) -> Result<SinkControl, Box<dyn std::error::Error>>;

    /// Releases windows or handles. Default: no-op.
    fn close(&mut self) {}
}
