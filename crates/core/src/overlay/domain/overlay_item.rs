use crate::shared::detection::{Detection, Rect};
use crate::shared::stage_timings::StageTimings;

/// Line height of the timing block, in pixels.
const TIMING_LINE_SPACING: i32 = 20;
const TIMING_ORIGIN: (i32, i32) = (10, 20);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub b: u8,
    pub g: u8,
    pub r: u8,
}

impl Color {
    pub const RED: Color = Color { b: 0, g: 0, r: 255 };
}

/// A drawing primitive, independent of the drawing backend.
#[derive(Clone, Debug, PartialEq)]
pub enum OverlayItem {
    Rectangle { rect: Rect, color: Color },
    /// `origin` is the bottom-left corner of the text baseline.
    Text {
        text: String,
        origin: (i32, i32),
        color: Color,
    },
}

/// Builds the overlay for one frame.
///
/// Each detection gets its confidence label at the box's top-left corner
/// followed by the box itself; four timing lines follow in the top-left
/// corner of the frame.
pub fn compose_overlay(detections: &[Detection], timings: &StageTimings) -> Vec<OverlayItem> {
    let mut items = Vec::with_capacity(detections.len() * 2 + 4);

    for det in detections {
        items.push(OverlayItem::Text {
            text: det.confidence_label(),
            origin: det.rect.top_left(),
            color: Color::RED,
        });
        items.push(OverlayItem::Rectangle {
            rect: det.rect,
            color: Color::RED,
        });
    }

    let lines = [
        format!("Preprocess: {:.2}ms", timings.preprocess_ms),
        format!("Infer: {:.2}ms", timings.infer_ms),
        format!("Postprocess: {:.2}ms", timings.postprocess_ms),
        format!("Total: {:.2}ms", timings.total_ms()),
    ];
    let (x, y0) = TIMING_ORIGIN;
    for (i, text) in lines.into_iter().enumerate() {
        items.push(OverlayItem::Text {
            text,
            origin: (x, y0 + i as i32 * TIMING_LINE_SPACING),
            color: Color::RED,
        });
    }

    items
}
