use std::path::{Path, PathBuf};

use crate::shared::frame::Frame;
use crate::video::domain::frame_sink::{FrameSink, SinkControl};

/// Writes every presented frame as `frame_{index:06}.png` using the `image` crate.
pub struct ImageDirectorySink {
    dir: PathBuf,
    written: usize,
}

impl ImageDirectorySink {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            written: 0,
        }
    }

    fn frame_path(&self, frame: &Frame) -> PathBuf {
        self.dir.join(format!("frame_{:06}.png", frame.index()))
    }
}

impl FrameSink for ImageDirectorySink {
    fn present(&mut self, frame: &Frame) -> Result<SinkControl, Box<dyn std::error::Error>> {
        std::fs::create_dir_all(&self.dir)?;

        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.to_rgb())
            .ok_or("Failed to create image from frame data")?;
        img.save(self.frame_path(frame))?;

        self.written += 1;
        Ok(SinkControl::Continue)
    }

    fn close(&mut self) {
        log::info!(
            "Wrote {} annotated frame(s) to {}",
            self.written,
            self.dir.display()
        );
    }
}
