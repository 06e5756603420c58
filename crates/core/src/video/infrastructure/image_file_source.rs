use std::path::{Path, PathBuf};

use crate::shared::frame::Frame;
use crate::shared::source_metadata::SourceMetadata;
use crate::video::domain::frame_source::FrameSource;

/// Adapts a single image file to the [`FrameSource`] interface.
///
/// Treats the image as a one-frame source with `fps=0`, so a still photo
/// goes through the same detect-and-render loop as a live camera.
pub struct ImageFileSource {
    path: PathBuf,
    frame: Option<Frame>,
}

impl ImageFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            frame: None,
        }
    }
}

impl FrameSource for ImageFileSource {
    fn open(&mut self) -> Result<SourceMetadata, Box<dyn std::error::Error>> {
        let rgb = image::open(&self.path)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        self.frame = Some(Frame::from_rgb(rgb.into_raw(), width, height, 0));

        Ok(SourceMetadata {
            width,
            height,
            fps: 0.0,
            total_frames: Some(1),
            description: self.path.display().to_string(),
        })
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        match self.frame.take() {
            Some(frame) => Box::new(std::iter::once(Ok(frame))),
            None => Box::new(std::iter::once(Err(format!(
                "ImageFileSource: {} not opened",
                self.path.display()
            )
            .into()))),
        }
    }

    fn close(&mut self) {
        self.frame = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(dir: &Path, w: u32, h: u32, rgb: [u8; 3]) -> PathBuf {
        let path = dir.join("still.png");
        image::RgbImage::from_pixel(w, h, image::Rgb(rgb))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_open_returns_single_frame_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), 40, 30, [0, 0, 0]);
        let mut source = ImageFileSource::new(&path);
        let meta = source.open().unwrap();
        assert_eq!(meta.width, 40);
        assert_eq!(meta.height, 30);
        assert_eq!(meta.total_frames, Some(1));
        assert_eq!(meta.fps, 0.0);
    }

    #[test]
    fn test_frame_is_converted_to_bgr() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), 4, 4, [200, 100, 50]);
        let mut source = ImageFileSource::new(&path);
        source.open().unwrap();

        let frames: Vec<_> = source.frames().collect();
        assert_eq!(frames.len(), 1);
        let frame = frames.into_iter().next().unwrap().unwrap();
        assert_eq!(&frame.data()[..3], &[50, 100, 200]);
        assert_eq!(frame.index(), 0);
    }

    #[test]
    fn test_open_missing_file_is_error() {
        let mut source = ImageFileSource::new("/nonexistent/still.png");
        assert!(source.open().is_err());
    }

    #[test]
    fn test_frames_without_open_returns_error() {
        let mut source = ImageFileSource::new("/nonexistent/still.png");
        assert!(source.frames().next().unwrap().is_err());
    }
}
