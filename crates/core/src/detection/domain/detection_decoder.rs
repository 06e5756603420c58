//! Decoding of SSD-style `DetectionOutput` tensors.
//!
//! The model emits `[1, 1, N, 7]` records laid out as
//! `[image_id, class_id, confidence, x_min, y_min, x_max, y_max]`, with
//! box corners normalized to `[0, 1]`.
use std::borrow::Cow;

use ndarray::ArrayViewD;
use thiserror::Error;

use crate::shared::detection::{Detection, Rect};
use crate::shared::frame::Frame;

/// Floats per detection record.
pub const RECORD_LEN: usize = 7;

const IMAGE_ID: usize = 0;
const CLASS_ID: usize = 1;
const CONFIDENCE: usize = 2;
const X_MIN: usize = 3;
const Y_MIN: usize = 4;
const X_MAX: usize = 5;
const Y_MAX: usize = 6;

#[derive(Error, Debug, PartialEq)]
pub enum DecodeError {
    #[error("expected records of 7 floats, output shape is {0:?}")]
    RecordLength(Vec<usize>),
    #[error("output shape {shape:?} holds {expected} values but {actual} were provided")]
    DataLength {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },
}

#[derive(Clone, Debug)]
pub struct DetectionDecoder {
    confidence_threshold: f32,
}

impl DetectionDecoder {
    pub fn new(confidence_threshold: f32) -> Self {
        Self {
            confidence_threshold,
        }
    }

    /// Decodes a model output tensor against the frame it was computed from.
    ///
    /// Boxes are scaled by the source frame size, not the model input size.
    pub fn decode_output(
        &self,
        output: ArrayViewD<'_, f32>,
        frame: &Frame,
    ) -> Result<Vec<Detection>, DecodeError> {
        let data: Cow<'_, [f32]> = match output.as_slice() {
            Some(slice) => Cow::Borrowed(slice),
            None => Cow::Owned(output.iter().copied().collect()),
        };
        self.decode(&data, output.shape(), frame.width(), frame.height())
    }

    /// Converts the flat output tensor into pixel-space detections.
    ///
    /// Records keep model order. Only confidences strictly above the
    /// threshold pass. A negative `image_id` marks the end of valid records.
    pub fn decode(
        &self,
        data: &[f32],
        shape: &[usize],
        frame_width: u32,
        frame_height: u32,
    ) -> Result<Vec<Detection>, DecodeError> {
        if shape.last() != Some(&RECORD_LEN) {
            return Err(DecodeError::RecordLength(shape.to_vec()));
        }
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(DecodeError::DataLength {
                shape: shape.to_vec(),
                expected,
                actual: data.len(),
            });
        }

        let fw = frame_width as f32;
        let fh = frame_height as f32;

        let detections = data
            .chunks_exact(RECORD_LEN)
            .take_while(|record| record[IMAGE_ID] >= 0.0)
            .filter(|record| record[CONFIDENCE] > self.confidence_threshold)
            .map(|record| {
                let x1 = (record[X_MIN] * fw) as i32;
                let y1 = (record[Y_MIN] * fh) as i32;
                let x2 = (record[X_MAX] * fw) as i32;
                let y2 = (record[Y_MAX] * fh) as i32;
                Detection {
                    class_id: record[CLASS_ID] as i32,
                    confidence: record[CONFIDENCE],
                    rect: Rect::from_corners(x1, y1, x2, y2),
                }
            })
            .collect();

        Ok(detections)
    }
}
