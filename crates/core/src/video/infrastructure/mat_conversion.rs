//! Conversions between [`Frame`] and OpenCV `Mat` at the capture/display boundary.
use opencv::core::{Mat, Scalar, CV_8UC3};
use opencv::prelude::*;
use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum OpenCvError {
    #[error("OpenCV error: {0}")]
    OpenCv(#[from] opencv::Error),
    #[error("expected an 8-bit 3-channel image, got Mat type {0}")]
    UnsupportedMatType(i32),
    #[error("frame has {0} channel(s), OpenCV conversion needs 3")]
    UnsupportedChannels(u8),
}

/// Copies a BGR frame into a freshly allocated `CV_8UC3` Mat.
pub fn frame_to_mat(frame: &Frame) -> Result<Mat, OpenCvError> {
    if frame.channels() != 3 {
        return Err(OpenCvError::UnsupportedChannels(frame.channels()));
    }
    let mut mat = Mat::new_rows_cols_with_default(
        frame.height() as i32,
        frame.width() as i32,
        CV_8UC3,
        Scalar::all(0.0),
    )?;
    mat.data_bytes_mut()?.copy_from_slice(frame.data());
    Ok(mat)
}

/// Copies a `CV_8UC3` Mat into a tightly packed BGR frame.
pub fn mat_to_frame(mat: &Mat, index: usize) -> Result<Frame, OpenCvError> {
    if mat.typ() != CV_8UC3 {
        return Err(OpenCvError::UnsupportedMatType(mat.typ()));
    }
    // ROIs and padded rows are not contiguous; cloning packs them.
    let packed;
    let src = if mat.is_continuous() {
        mat
    } else {
        packed = mat.try_clone()?;
        &packed
    };
    let data = src.data_bytes()?.to_vec();
    Ok(Frame::new(data, src.cols() as u32, src.rows() as u32, 3, index))
}
