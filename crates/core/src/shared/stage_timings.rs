/// Wall-clock time spent in each stage of one frame, in milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StageTimings {
    pub preprocess_ms: f64,
    pub infer_ms: f64,
    pub postprocess_ms: f64,
}

impl StageTimings {
    pub const PREPROCESS: &'static str = "preprocess";
    pub const INFER: &'static str = "infer";
    pub const POSTPROCESS: &'static str = "postprocess";

    pub fn total_ms(&self) -> f64 {
        self.preprocess_ms + self.infer_ms + self.postprocess_ms
    }

    /// `(stage name, duration)` pairs in pipeline order.
    pub fn stages(&self) -> [(&'static str, f64); 3] {
        [
            (Self::PREPROCESS, self.preprocess_ms),
            (Self::INFER, self.infer_ms),
            (Self::POSTPROCESS, self.postprocess_ms),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_total_is_sum_of_stages() {
        let t = StageTimings {
            preprocess_ms: 1.25,
            infer_ms: 10.5,
            postprocess_ms: 0.25,
        };
        assert_relative_eq!(t.total_ms(), 12.0);
    }

    #[test]
    fn test_stages_in_pipeline_order() {
        let t = StageTimings {
            preprocess_ms: 1.0,
            infer_ms: 2.0,
            postprocess_ms: 3.0,
        };
        let names: Vec<_> = t.stages().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["preprocess", "infer", "postprocess"]);
    }

    #[test]
    fn test_default_is_zero() {
        assert_eq!(StageTimings::default().total_ms(), 0.0);
    }
}
