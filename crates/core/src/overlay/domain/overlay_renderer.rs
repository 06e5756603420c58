use crate::overlay::domain::overlay_item::OverlayItem;
use crate::shared::frame::Frame;

/// Draws overlay items onto a frame in place.
pub trait OverlayRenderer: Send {
    fn render(&self, frame: &mut Frame, items: &[OverlayItem]) -> Result<(), Box<dyn std::error::Error>>;
}
