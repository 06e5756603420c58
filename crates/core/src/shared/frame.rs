/// A single captured frame: contiguous BGR bytes in row-major order.
///
/// BGR is the native layout of both OpenCV and the face detection model.
/// Sources that decode other layouts convert at the I/O boundary.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    /// Builds a BGR frame from tightly packed RGB bytes.
    pub fn from_rgb(mut data: Vec<u8>, width: u32, height: u32, index: usize) -> Self {
        swap_red_blue(&mut data);
        Self::new(data, width, height, 3, index)
    }

    /// Returns the pixel data as RGB, leaving the frame untouched.
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut rgb = self.data.clone();
        if self.channels == 3 {
            swap_red_blue(&mut rgb);
        }
        rgb
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

fn swap_red_blue(data: &mut [u8]) {
    for px in data.chunks_exact_mut(3) {
        px.swap(0, 2);
    }
}
