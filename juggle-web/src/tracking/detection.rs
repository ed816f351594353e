//! Detector output intake
//!
//! Picks the best-scoring box of the category of interest and converts it
//! from video pixels to display pixels, where all tracking happens.

use serde::Deserialize;

/// Axis-aligned box in video pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub origin_x: f64,
    pub origin_y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn center(&self) -> (f64, f64) {
        (self.origin_x + self.width / 2.0, self.origin_y + self.height / 2.0)
    }
}

/// One scored detection
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    #[serde(flatten)]
    pub bounding_box: BoundingBox,
    pub score: f64,
    #[serde(default)]
    pub category_name: Option<String>,
}

/// Ball observation handed to the tracker
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observation {
    /// Center in display pixels
    pub center: (f64, f64),
    /// Apparent diameter in display pixels
    pub diameter: f64,
}

impl Observation {
    /// Center and diameter are all finite numbers
    pub fn is_finite(&self) -> bool {
        self.center.0.is_finite() && self.center.1.is_finite() && self.diameter.is_finite()
    }
}

/// Which detections may be tracked
#[derive(Clone, Debug, PartialEq)]
pub struct DetectionFilter {
    pub score_threshold: f64,
    pub category_name: Option<String>,
}

impl DetectionFilter {
    fn accepts(&self, detection: &Detection) -> bool {
        if detection.score.is_nan() || detection.score < self.score_threshold {
            return false;
        }
        match (&self.category_name, &detection.category_name) {
            (None, _) => true,
            (Some(wanted), Some(name)) => wanted == name,
            (Some(_), None) => false,
        }
    }
}

/// Highest-scoring accepted detection, if any
pub fn select_best<'a>(detections: &'a [Detection], filter: &DetectionFilter) -> Option<&'a Detection> {
    detections
        .iter()
        .filter(|d| filter.accepts(d))
        .fold(None, |best: Option<&Detection>, d| match best {
            Some(b) if b.score >= d.score => Some(b),
            _ => Some(d),
        })
}

/// Video frame size vs. displayed size
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayGeometry {
    pub video_width: f64,
    pub video_height: f64,
    pub display_width: f64,
    pub display_height: f64,
}

impl DisplayGeometry {
    pub fn new(video_width: f64, video_height: f64, display_width: f64, display_height: f64) -> Self {
        Self {
            video_width,
            video_height,
            display_width,
            display_height,
        }
    }

    /// Video → display scale factors; a zero video size counts as 1
    pub fn scale(&self) -> (f64, f64) {
        let vw = if self.video_width > 0.0 { self.video_width } else { 1.0 };
        let vh = if self.video_height > 0.0 { self.video_height } else { 1.0 };
        (self.display_width / vw, self.display_height / vh)
    }

    /// Convert a box to a display-space observation
    ///
    /// The ball diameter is taken from the box height, scaled by the
    /// smaller of the two factors.
    pub fn observe(&self, bounding_box: &BoundingBox) -> Observation {
        let (sx, sy) = self.scale();
        let (cx, cy) = bounding_box.center();
        Observation {
            center: (cx * sx, cy * sy),
            diameter: bounding_box.height * sx.min(sy),
        }
    }
}

impl Default for DisplayGeometry {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(score: f64, category: Option<&str>) -> Detection {
        Detection {
            bounding_box: BoundingBox { origin_x: 10.0, origin_y: 20.0, width: 30.0, height: 40.0 },
            score,
            category_name: category.map(str::to_string),
        }
    }

    #[test]
    fn test_select_best_takes_highest_score() {
        let filter = DetectionFilter { score_threshold: 0.4, category_name: None };
        let detections = [detection(0.5, None), detection(0.9, None), detection(0.7, None)];
        assert_eq!(select_best(&detections, &filter).unwrap().score, 0.9);
    }

    #[test]
    fn test_select_best_applies_threshold_and_category() {
        let filter = DetectionFilter {
            score_threshold: 0.4,
            category_name: Some("ball".to_string()),
        };
        let detections = [
            detection(0.3, Some("ball")),
            detection(0.95, Some("hand")),
            detection(0.8, None),
        ];
        assert!(select_best(&detections, &filter).is_none());

        let detections = [detection(0.6, Some("ball")), detection(0.95, Some("hand"))];
        assert_eq!(select_best(&detections, &filter).unwrap().score, 0.6);
    }

    #[test]
    fn test_nan_score_never_selected() {
        let filter = DetectionFilter { score_threshold: 0.0, category_name: None };
        let detections = [detection(f64::NAN, None)];
        assert!(select_best(&detections, &filter).is_none());
    }

    #[test]
    fn test_observation_finiteness() {
        let obs = DisplayGeometry::default().observe(&BoundingBox { origin_x: 1.0, origin_y: 2.0, width: 4.0, height: 4.0 });
        assert!(obs.is_finite());
        assert!(!Observation { center: (f64::NAN, 0.0), ..obs }.is_finite());
        assert!(!Observation { diameter: f64::INFINITY, ..obs }.is_finite());
    }

    #[test]
    fn test_observe_scales_to_display() {
        let geometry = DisplayGeometry::new(640.0, 480.0, 1280.0, 720.0);
        let obs = geometry.observe(&BoundingBox { origin_x: 100.0, origin_y: 200.0, width: 40.0, height: 40.0 });
        assert_eq!(obs.center, (240.0, 330.0));
        assert_eq!(obs.diameter, 60.0);
    }

    #[test]
    fn test_zero_video_size_falls_back_to_unit() {
        let geometry = DisplayGeometry::new(0.0, 0.0, 2.0, 3.0);
        assert_eq!(geometry.scale(), (2.0, 3.0));
    }

    #[test]
    fn test_detection_from_json() {
        let d: Detection = serde_json::from_str(
            r#"{"originX": 1, "originY": 2, "width": 3, "height": 4, "score": 0.8, "categoryName": "ball"}"#,
        )
        .unwrap();
        assert_eq!(d.bounding_box.center(), (2.5, 4.0));
        assert_eq!(d.category_name.as_deref(), Some("ball"));
    }
}
