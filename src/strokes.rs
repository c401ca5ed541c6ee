use thiserror::Error;

/// A single captured pointer position, in screen coordinates (y grows
/// downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One continuous pointer-down-to-pointer-up drawing gesture.
///
/// Samples are ephemeral: the UI accumulates points during a drag, hands the
/// finished sample to [`classify`], and discards it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokeSample {
    pub points: Vec<Point>,
}

impl StrokeSample {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn push(&mut self, x: f64, y: f64) {
        self.points.push(Point::new(x, y));
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Coarse geometric bucket assigned to a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum StrokeShape {
    Horizontal,
    Vertical,
    Diagonal,
    Curve,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StrokeError {
    /// The gesture was too short to classify; callers drop it without
    /// advancing or penalizing anything.
    #[error("stroke sample needs at least two points")]
    InsufficientInput,
}

/// Result of comparing one drawn stroke against the expected shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeVerdict {
    pub matched: bool,
    pub observed: StrokeShape,
    pub message: &'static str,
}

const MATCHED_MSG: &str = "good stroke";
const UNMATCHED_MSG: &str = "check the stroke direction";

/// Classify a raw gesture and compare it against the expected shape.
///
/// The bucket is a pure function of the endpoint displacement: intermediate
/// points never change the verdict. Curvature, length, and speed are ignored
/// on purpose; this stays a coarse four-way direction check rather than
/// handwriting recognition.
pub fn classify(sample: &StrokeSample, expected: StrokeShape) -> Result<StrokeVerdict, StrokeError> {
    if sample.points.len() < 2 {
        return Err(StrokeError::InsufficientInput);
    }

    let first = sample.points[0];
    let last = sample.points[sample.points.len() - 1];
    let angle = (last.y - first.y).atan2(last.x - first.x).to_degrees();
    let observed = bucket_angle(angle);
    let matched = observed == expected;

    Ok(StrokeVerdict {
        matched,
        observed,
        message: if matched { MATCHED_MSG } else { UNMATCHED_MSG },
    })
}

/// Map an endpoint angle in degrees, range (-180, 180], to a shape bucket.
fn bucket_angle(angle: f64) -> StrokeShape {
    if angle.abs() < 30.0 {
        StrokeShape::Horizontal
    } else if (angle - 90.0).abs() < 30.0 || (angle + 90.0).abs() < 30.0 {
        StrokeShape::Vertical
    } else if (angle - 45.0).abs() < 30.0 || (angle + 135.0).abs() < 30.0 {
        StrokeShape::Diagonal
    } else {
        StrokeShape::Curve
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn sample(points: &[(f64, f64)]) -> StrokeSample {
        StrokeSample::new(points.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    #[test]
    fn test_rightward_stroke_is_horizontal() {
        let verdict = classify(&sample(&[(0.0, 0.0), (10.0, 0.0)]), StrokeShape::Horizontal)
            .unwrap();

        assert!(verdict.matched);
        assert_eq!(verdict.observed, StrokeShape::Horizontal);
        assert_eq!(verdict.message, MATCHED_MSG);
    }

    #[test]
    fn test_downward_stroke_is_vertical() {
        let verdict = classify(&sample(&[(0.0, 0.0), (0.0, 10.0)]), StrokeShape::Vertical)
            .unwrap();

        assert!(verdict.matched);
        assert_eq!(verdict.observed, StrokeShape::Vertical);
    }

    #[test]
    fn test_upward_stroke_is_vertical() {
        let verdict = classify(&sample(&[(0.0, 10.0), (0.0, 0.0)]), StrokeShape::Vertical)
            .unwrap();

        assert!(verdict.matched);
    }

    #[test]
    fn test_down_right_stroke_is_diagonal() {
        let verdict = classify(&sample(&[(0.0, 0.0), (10.0, 10.0)]), StrokeShape::Diagonal)
            .unwrap();

        assert!(verdict.matched);
        assert_eq!(verdict.observed, StrokeShape::Diagonal);
    }

    #[test]
    fn test_up_left_stroke_is_diagonal() {
        let verdict = classify(&sample(&[(10.0, 10.0), (0.0, 0.0)]), StrokeShape::Diagonal)
            .unwrap();

        assert!(verdict.matched);
    }

    #[test]
    fn test_leftward_stroke_falls_through_to_curve() {
        // 180 degrees sits outside every directional band
        let verdict = classify(&sample(&[(10.0, 0.0), (0.0, 0.0)]), StrokeShape::Horizontal)
            .unwrap();

        assert!(!verdict.matched);
        assert_eq!(verdict.observed, StrokeShape::Curve);
        assert_eq!(verdict.message, UNMATCHED_MSG);
    }

    #[test]
    fn test_mismatch_reports_observed_shape() {
        let verdict = classify(&sample(&[(0.0, 0.0), (10.0, 0.0)]), StrokeShape::Vertical)
            .unwrap();

        assert!(!verdict.matched);
        assert_eq!(verdict.observed, StrokeShape::Horizontal);
    }

    #[test]
    fn test_intermediate_points_do_not_change_the_bucket() {
        let straight = sample(&[(0.0, 0.0), (10.0, 0.0)]);
        let wobbly = sample(&[(0.0, 0.0), (3.0, 8.0), (6.0, -9.0), (10.0, 0.0)]);

        let a = classify(&straight, StrokeShape::Horizontal).unwrap();
        let b = classify(&wobbly, StrokeShape::Horizontal).unwrap();

        assert_eq!(a.observed, b.observed);
        assert_eq!(a.matched, b.matched);
    }

    #[test]
    fn test_band_boundary_at_30_degrees_is_not_horizontal() {
        // tan(30 deg) rise over a run of 10
        let rise = 30_f64.to_radians().tan() * 10.0;
        let verdict = classify(&sample(&[(0.0, 0.0), (10.0, rise)]), StrokeShape::Horizontal)
            .unwrap();

        assert_eq!(verdict.observed, StrokeShape::Diagonal);
    }

    #[test]
    fn test_empty_sample_is_insufficient() {
        assert_matches!(
            classify(&sample(&[]), StrokeShape::Horizontal),
            Err(StrokeError::InsufficientInput)
        );
    }

    #[test]
    fn test_single_point_sample_is_insufficient() {
        assert_matches!(
            classify(&sample(&[(5.0, 5.0)]), StrokeShape::Curve),
            Err(StrokeError::InsufficientInput)
        );
    }

    #[test]
    fn test_sample_push_and_clear() {
        let mut s = StrokeSample::default();
        assert!(s.is_empty());

        s.push(1.0, 2.0);
        s.push(3.0, 4.0);
        assert_eq!(s.points.len(), 2);

        s.clear();
        assert!(s.is_empty());
    }
}
