use opencv::core::{Point, Scalar};
use opencv::imgproc;
use opencv::prelude::*;

use crate::overlay::domain::overlay_item::{Color, OverlayItem};
use crate::overlay::domain::overlay_renderer::OverlayRenderer;
use crate::shared::frame::Frame;
use crate::video::infrastructure::mat_conversion::{frame_to_mat, OpenCvError};

const LINE_THICKNESS: i32 = 1;
const FONT_SCALE: f64 = 1.0;

/// Draws overlays with OpenCV's `imgproc` primitives.
#[derive(Clone, Debug, Default)]
pub struct OpenCvOverlayRenderer;

impl OpenCvOverlayRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl OverlayRenderer for OpenCvOverlayRenderer {
    fn render(&self, frame: &mut Frame, items: &[OverlayItem]) -> Result<(), Box<dyn std::error::Error>> {
        if items.is_empty() {
            return Ok(());
        }
        let mut mat = frame_to_mat(frame)?;
        for item in items {
            draw_item(&mut mat, item)?;
        }
        frame
            .data_mut()
            .copy_from_slice(mat.data_bytes().map_err(OpenCvError::from)?);
        Ok(())
    }
}

fn draw_item(mat: &mut Mat, item: &OverlayItem) -> Result<(), OpenCvError> {
    match item {
        OverlayItem::Rectangle { rect, color } => {
            imgproc::rectangle(
                mat,
                opencv::core::Rect::new(rect.x, rect.y, rect.width, rect.height),
                scalar(*color),
                LINE_THICKNESS,
                imgproc::LINE_8,
                0,
            )?;
        }
        OverlayItem::Text {
            text,
            origin,
            color,
        } => {
            imgproc::put_text(
                mat,
                text,
                Point::new(origin.0, origin.1),
                imgproc::FONT_HERSHEY_PLAIN,
                FONT_SCALE,
                scalar(*color),
                LINE_THICKNESS,
                imgproc::LINE_8,
                false,
            )?;
        }
    }
    Ok(())
}

fn scalar(color: Color) -> Scalar {
    Scalar::new(color.b as f64, color.g as f64, color.r as f64, 0.0)
}
