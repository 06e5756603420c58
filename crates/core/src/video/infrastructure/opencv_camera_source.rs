use opencv::core::Mat;
use opencv::prelude::*;
use opencv::videoio;
use thiserror::Error;

use crate::shared::frame::Frame;
use crate::shared::source_metadata::SourceMetadata;
use crate::video::domain::frame_source::FrameSource;

use super::mat_conversion::{mat_to_frame, OpenCvError};

#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Failed to open camera {index}: {source}")]
    OpenCameraFailed {
        index: i32,
        #[source]
        source: opencv::Error,
    },
    #[error("Camera {0} is not available")]
    NotAvailable(i32),
    #[error("Failed to read frame: {0}")]
    ReadFrameFailed(opencv::Error),
    #[error("Camera is not open")]
    NotOpened,
    #[error(transparent)]
    Conversion(#[from] OpenCvError),
}

/// Live frames from a local camera through OpenCV's `VideoCapture`.
pub struct OpenCvCameraSource {
    device_index: i32,
    capture: Option<videoio::VideoCapture>,
}

impl OpenCvCameraSource {
    pub fn new(device_index: i32) -> Self {
        Self {
            device_index,
            capture: None,
        }
    }
}

impl FrameSource for OpenCvCameraSource {
    fn open(&mut self) -> Result<SourceMetadata, Box<dyn std::error::Error>> {
        let index = self.device_index;
        let capture = videoio::VideoCapture::new(index, videoio::CAP_ANY)
            .map_err(|source| CameraError::OpenCameraFailed { index, source })?;
        if !capture.is_opened()? {
            return Err(CameraError::NotAvailable(index).into());
        }

        let metadata = SourceMetadata {
            width: capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32,
            height: capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32,
            fps: capture.get(videoio::CAP_PROP_FPS)?,
            total_frames: None,
            description: format!("camera {index}"),
        };
        self.capture = Some(capture);
        Ok(metadata)
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        let Some(capture) = self.capture.as_mut() else {
            return Box::new(std::iter::once(Err(CameraError::NotOpened.into())));
        };
        Box::new(CameraFrameIter {
            capture,
            frame_index: 0,
            done: false,
        })
    }

    fn close(&mut self) {
        if let Some(mut capture) = self.capture.take() {
            if let Err(e) = capture.release() {
                log::warn!("Failed to release camera {}: {e}", self.device_index);
            }
        }
    }
}

/// Grabs frames until the device stops delivering them.
struct CameraFrameIter<'a> {
    capture: &'a mut videoio::VideoCapture,
    frame_index: usize,
    done: bool,
}

impl Iterator for CameraFrameIter<'_> {
    type Item = Result<Frame, Box<dyn std::error::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut mat = Mat::default();
        match self.capture.read(&mut mat) {
            Ok(true) if !mat.empty() => {
                let frame = mat_to_frame(&mat, self.frame_index).map_err(|e| e.into());
                self.frame_index += 1;
                Some(frame)
            }
            Ok(_) => {
                log::info!("Camera stopped delivering frames");
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(CameraError::ReadFrameFailed(e).into()))
            }
        }
    }
}
