use crate::shared::frame::Frame;
use crate::shared::source_metadata::SourceMetadata;

/// Produces frames from a camera, video file or still image.
///
/// Implementations handle device and codec details while the pipeline
/// works with the abstract `Frame` and `SourceMetadata` types.
pub trait FrameSource: Send {
    /// Opens the underlying device or file and returns its metadata.
    fn open(&mut self) -> Result<SourceMetadata, Box<dyn std::error::Error>>;

    /// Returns an iterator over frames in capture order.
    ///
    /// The iterator ends when the source is exhausted or the device stops
    /// delivering frames.
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_>;

    /// Releases any resources held by the source.
    fn close(&mut self);
}
