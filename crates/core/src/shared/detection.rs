use crate::shared::stage_timings::StageTimings;

/// Axis-aligned box in frame pixel coordinates.
///
/// Not clamped to the frame: a detection near the edge may extend past it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_corners(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self::new(x1, y1, x2 - x1, y2 - y1)
    }

    pub fn top_left(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

/// One decoded face detection.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub class_id: i32,
    pub confidence: f32,
    pub rect: Rect,
}

impl Detection {
    /// Confidence as a whole percentage, e.g. `"97%"`. Halves round away
    /// from zero.
    pub fn confidence_label(&self) -> String {
        format!("{}%", (self.confidence * 100.0).round() as i32)
    }
}

/// Detections for one frame together with the time spent producing them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameDetections {
    pub detections: Vec<Detection>,
    pub timings: StageTimings,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_from_corners() {
        let r = Rect::from_corners(10, 20, 110, 70);
        assert_eq!(r, Rect::new(10, 20, 100, 50));
        assert_eq!(r.top_left(), (10, 20));
    }

    #[test]
    fn test_inverted_corners_give_negative_size() {
        let r = Rect::from_corners(50, 50, 40, 40);
        assert_eq!(r, Rect::new(50, 50, -10, -10));
    }

    #[rstest]
    #[case(0.97, "97%")]
    #[case(0.5, "50%")]
    #[case(1.0, "100%")]
    #[case(0.514, "51%")]
    #[case(0.125, "13%")]
    #[case(0.625, "63%")]
    #[case(0.0, "0%")]
    fn test_confidence_label(#[case] confidence: f32, #[case] expected: &str) {
        let det = Detection {
            class_id: 0,
            confidence,
            rect: Rect::new(0, 0, 1, 1),
        };
        assert_eq!(det.confidence_label(), expected);
    }
}
