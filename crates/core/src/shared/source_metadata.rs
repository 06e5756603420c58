#[derive(Clone, Debug, PartialEq)]
pub struct SourceMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    /// `None` for live sources.
    pub total_frames: Option<usize>,
    pub description: String,
}
