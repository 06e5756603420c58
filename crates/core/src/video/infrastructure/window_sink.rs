use opencv::highgui;

use crate::shared::frame::Frame;
use crate::video::domain::frame_sink::{FrameSink, SinkControl};

use super::mat_conversion::frame_to_mat;

const KEY_ESC: i32 = 27;

/// Shows frames in an OpenCV `highgui` window.
///
/// Each frame polls the keyboard for one millisecond; `Esc` or `q` stops
/// the pipeline.
pub struct WindowSink {
    title: String,
    created: bool,
}

impl WindowSink {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            created: false,
        }
    }
}

impl FrameSink for WindowSink {
    fn present(&mut self, frame: &Frame) -> Result<SinkControl, Box<dyn std::error::Error>> {
        if !self.created {
            highgui::named_window(&self.title, highgui::WINDOW_AUTOSIZE)?;
            self.created = true;
        }

        let mat = frame_to_mat(frame)?;
        highgui::imshow(&self.title, &mat)?;

        let key = highgui::wait_key(1)?;
        Ok(control_for_key(key))
    }

    fn close(&mut self) {
        if self.created {
            if let Err(e) = highgui::destroy_window(&self.title) {
                log::warn!("Failed to close window '{}': {e}", self.title);
            }
            self.created = false;
        }
    }
}

/// `wait_key` returns -1 when no key was pressed.
fn control_for_key(key: i32) -> SinkControl {
    if key < 0 {
        return SinkControl::Continue;
    }
    match key & 0xFF {
        KEY_ESC => SinkControl::Stop,
        k if k == b'q' as i32 || k == b'Q' as i32 => SinkControl::Stop,
        _ => SinkControl::Continue,
    }
}
