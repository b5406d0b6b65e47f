//! Normalisation of detector output into pixel polygons.
//!
//! Detectors report either segmentation masks (boundary traces) or
//! axis-aligned boxes. Both become a flat list of [`Detection`] polygons.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Axis-aligned box as `(x1, y1, x2, y2)` pixel corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct PixelRect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl PixelRect {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Rectangle ring, clockwise in image coordinates (y grows downward).
    pub fn to_ring(&self) -> Vec<[f64; 2]> {
        vec![
            [self.x1, self.y1],
            [self.x2, self.y1],
            [self.x2, self.y2],
            [self.x1, self.y2],
        ]
    }
}

impl From<[f64; 4]> for PixelRect {
    fn from([x1, y1, x2, y2]: [f64; 4]) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

impl From<PixelRect> for [f64; 4] {
    fn from(r: PixelRect) -> Self {
        [r.x1, r.y1, r.x2, r.y2]
    }
}

/// A detected bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxDetection {
    pub xyxy: PixelRect,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// A segmentation mask boundary trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMask")]
pub struct MaskDetection {
    pub points: Vec<[f64; 2]>,
    pub confidence: Option<f64>,
}

/// Masks arrive either as bare point lists or with a score attached.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawMask {
    Bare(Vec<[f64; 2]>),
    Scored {
        points: Vec<[f64; 2]>,
        #[serde(default)]
        confidence: Option<f64>,
    },
}

impl From<RawMask> for MaskDetection {
    fn from(raw: RawMask) -> Self {
        match raw {
            RawMask::Bare(points) => Self {
                points,
                confidence: None,
            },
            RawMask::Scored { points, confidence } => Self { points, confidence },
        }
    }
}

/// Raw per-image detector output, as emitted by the model wrapper.
///
/// Either list may be absent. Convert into [`DetectionSet`] before use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectorOutput {
    #[serde(default)]
    pub masks: Option<Vec<MaskDetection>>,
    #[serde(default)]
    pub boxes: Option<Vec<BoxDetection>>,
}

/// Detector results for one image: masks or boxes, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionSet {
    Masks(Vec<MaskDetection>),
    Boxes(Vec<BoxDetection>),
}

impl DetectionSet {
    pub fn empty() -> Self {
        DetectionSet::Boxes(Vec::new())
    }

    pub fn len(&self) -> usize {
        match self {
            DetectionSet::Masks(m) => m.len(),
            DetectionSet::Boxes(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop detections whose known confidence is below `min`.
    ///
    /// Detections without a score are kept.
    pub fn retain_confident(&mut self, min: f64) {
        let keep = |c: Option<f64>| c.map_or(true, |c| c >= min);
        match self {
            DetectionSet::Masks(m) => m.retain(|d| keep(d.confidence)),
            DetectionSet::Boxes(b) => b.retain(|d| keep(d.confidence)),
        }
    }
}

impl From<DetectorOutput> for DetectionSet {
    /// Masks take precedence over boxes when the detector reports both.
    fn from(output: DetectorOutput) -> Self {
        match (output.masks, output.boxes) {
            (Some(masks), _) if !masks.is_empty() => DetectionSet::Masks(masks),
            (_, Some(boxes)) => DetectionSet::Boxes(boxes),
            (Some(masks), None) => DetectionSet::Masks(masks),
            (None, None) => DetectionSet::empty(),
        }
    }
}

/// A detection normalised to a pixel polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub points: Vec<[f64; 2]>,
    pub confidence: Option<f64>,
}

/// Flatten a detection set into polygons, discarding those with fewer than
/// three points.
pub fn extract_polygons(set: &DetectionSet) -> Vec<Detection> {
    let all: Vec<Detection> = match set {
        DetectionSet::Masks(masks) => masks
            .iter()
            .map(|m| Detection {
                points: m.points.clone(),
                confidence: m.confidence,
            })
            .collect(),
        DetectionSet::Boxes(boxes) => boxes
            .iter()
            .map(|b| Detection {
                points: b.xyxy.to_ring(),
                confidence: b.confidence,
            })
            .collect(),
    };

    let total = all.len();
    let kept: Vec<Detection> = all.into_iter().filter(|d| d.points.len() >= 3).collect();
    if kept.len() < total {
        debug!(
            discarded = total - kept.len(),
            kept = kept.len(),
            "Discarded degenerate detections"
        );
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_to_clockwise_ring() {
        let set = DetectionSet::Boxes(vec![BoxDetection {
            xyxy: PixelRect::new(1.0, 2.0, 5.0, 8.0),
            confidence: Some(0.7),
        }]);
        let polys = extract_polygons(&set);
        assert_eq!(polys.len(), 1);
        assert_eq!(
            polys[0].points,
            vec![[1.0, 2.0], [5.0, 2.0], [5.0, 8.0], [1.0, 8.0]]
        );
        assert_eq!(polys[0].confidence, Some(0.7));
    }

    #[test]
    fn test_masks_used_directly() {
        let trace = vec![[0.0, 0.0], [4.0, 0.0], [2.0, 3.0]];
        let set = DetectionSet::Masks(vec![MaskDetection {
            points: trace.clone(),
            confidence: None,
        }]);
        assert_eq!(extract_polygons(&set)[0].points, trace);
    }

    #[test]
    fn test_short_masks_discarded() {
        let set = DetectionSet::Masks(vec![
            MaskDetection {
                points: vec![[0.0, 0.0], [1.0, 1.0]],
                confidence: None,
            },
            MaskDetection {
                points: vec![[0.0, 0.0], [4.0, 0.0], [2.0, 3.0]],
                confidence: None,
            },
        ]);
        assert_eq!(extract_polygons(&set).len(), 1);
    }

    #[test]
    fn test_masks_take_precedence() {
        let json = r#"{
            "masks": [[[0, 0], [4, 0], [2, 3]]],
            "boxes": [{"xyxy": [0, 0, 10, 10], "confidence": 0.9}]
        }"#;
        let output: DetectorOutput = serde_json::from_str(json).unwrap();
        let set = DetectionSet::from(output);
        assert!(matches!(set, DetectionSet::Masks(ref m) if m.len() == 1));
    }

    #[test]
    fn test_empty_masks_fall_back_to_boxes() {
        let json = r#"{"masks": [], "boxes": [{"xyxy": [0, 0, 10, 10]}]}"#;
        let output: DetectorOutput = serde_json::from_str(json).unwrap();
        let set = DetectionSet::from(output);
        assert!(matches!(set, DetectionSet::Boxes(ref b) if b.len() == 1));
    }

    #[test]
    fn test_no_lists_is_empty() {
        let output: DetectorOutput = serde_json::from_str("{}").unwrap();
        assert!(DetectionSet::from(output).is_empty());
    }

    #[test]
    fn test_scored_mask_parsing() {
        let json = r#"{"masks": [{"points": [[0, 0], [4, 0], [2, 3]], "confidence": 0.42}]}"#;
        let output: DetectorOutput = serde_json::from_str(json).unwrap();
        let masks = output.masks.unwrap();
        assert_eq!(masks[0].confidence, Some(0.42));
    }

    #[test]
    fn test_retain_confident() {
        let mut set = DetectionSet::Boxes(vec![
            BoxDetection {
                xyxy: PixelRect::new(0.0, 0.0, 1.0, 1.0),
                confidence: Some(0.1),
            },
            BoxDetection {
                xyxy: PixelRect::new(0.0, 0.0, 1.0, 1.0),
                confidence: Some(0.15),
            },
            BoxDetection {
                xyxy: PixelRect::new(0.0, 0.0, 1.0, 1.0),
                confidence: None,
            },
        ]);
        set.retain_confident(0.15);
        assert_eq!(set.len(), 2);
    }
}
