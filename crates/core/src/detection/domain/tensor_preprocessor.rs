//! Frame → input tensor conversion.
//!
//! Resizes to the model resolution, picks channels in the order the model
//! expects, applies per-channel `(value - mean) / std` and packs the result
//! as a `1×3×H×W` (NCHW) float tensor.
use image::imageops::{self, FilterType};
use image::RgbImage;
use ndarray::{s, Array4, ArrayView3, Axis};
use thiserror::Error;

use crate::shared::constants::{DEFAULT_INPUT_HEIGHT, DEFAULT_INPUT_WIDTH};
use crate::shared::frame::Frame;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PreprocessError {
    #[error("expected a 3-channel frame, got {0} channel(s)")]
    UnsupportedChannels(u8),
    #[error("cannot preprocess an empty frame")]
    EmptyFrame,
    #[error("frame data does not match its {width}x{height} dimensions")]
    MalformedFrame { width: u32, height: u32 },
    #[error("model input size must be non-zero, got {width}x{height}")]
    ZeroInputSize { width: u32, height: u32 },
    #[error("std for channel {0} must be non-zero")]
    ZeroStd(usize),
}

/// Channel order of the model input tensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelOrder {
    Bgr,
    Rgb,
}

impl ChannelOrder {
    /// Index into a BGR pixel for tensor channel `c`.
    fn source_channel(self, c: usize) -> usize {
        match self {
            ChannelOrder::Bgr => c,
            ChannelOrder::Rgb => 2 - c,
        }
    }
}

/// Input contract of a detection model.
///
/// `mean` and `std` are indexed by tensor channel, i.e. after reordering.
#[derive(Clone, Debug, PartialEq)]
pub struct PreprocessConfig {
    width: u32,
    height: u32,
    channel_order: ChannelOrder,
    mean: [f32; 3],
    std: [f32; 3],
}

impl PreprocessConfig {
    /// BGR input without normalization, as face-detection-0200 expects.
    pub fn new(width: u32, height: u32) -> Result<Self, PreprocessError> {
        if width == 0 || height == 0 {
            return Err(PreprocessError::ZeroInputSize { width, height });
        }
        Ok(Self {
            width,
            height,
            channel_order: ChannelOrder::Bgr,
            mean: [0.0; 3],
            std: [1.0; 3],
        })
    }

    pub fn with_channel_order(mut self, order: ChannelOrder) -> Self {
        self.channel_order = order;
        self
    }

    pub fn with_normalization(
        mut self,
        mean: [f32; 3],
        std: [f32; 3],
    ) -> Result<Self, PreprocessError> {
        if let Some(c) = std.iter().position(|&s| s == 0.0) {
            return Err(PreprocessError::ZeroStd(c));
        }
        self.mean = mean;
        self.std = std;
        Ok(self)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_INPUT_WIDTH,
            height: DEFAULT_INPUT_HEIGHT,
            channel_order: ChannelOrder::Bgr,
            mean: [0.0; 3],
            std: [1.0; 3],
        }
    }
}

/// Builds the NCHW input tensor for one frame.
pub fn preprocess(frame: &Frame, config: &PreprocessConfig) -> Result<Array4<f32>, PreprocessError> {
    if frame.channels() != 3 {
        return Err(PreprocessError::UnsupportedChannels(frame.channels()));
    }
    if frame.is_empty() {
        return Err(PreprocessError::EmptyFrame);
    }

    let w = config.width as usize;
    let h = config.height as usize;
    let malformed = PreprocessError::MalformedFrame {
        width: frame.width(),
        height: frame.height(),
    };

    // Resizing is channel-agnostic, so the BGR bytes go through RgbImage as-is.
    let resized;
    let pixels: &[u8] = if frame.width() == config.width && frame.height() == config.height {
        frame.data()
    } else {
        let img = RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or_else(|| malformed.clone())?;
        resized = imageops::resize(&img, config.width, config.height, FilterType::Triangle);
        resized.as_raw()
    };
    let src = ArrayView3::from_shape((h, w, 3), pixels).map_err(|_| malformed)?;

    let mut tensor = Array4::<f32>::zeros((1, 3, h, w));
    for c in 0..3 {
        let plane = src.index_axis(Axis(2), config.channel_order.source_channel(c));
        let mean = config.mean[c];
        let std = config.std[c];
        tensor
            .slice_mut(s![0, c, .., ..])
            .zip_mut_with(&plane, |dst, &v| *dst = (v as f32 - mean) / std);
    }

    Ok(tensor)
}
