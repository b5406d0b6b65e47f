//! Common test fixtures for solar verification tests.
//!
//! Plain tuples and strings so the fixtures carry no dependency on the
//! crates under test.

/// Reference sites used in pipeline runs.
pub mod sites {
    /// (sample_id, latitude, longitude)
    pub const REFERENCE_SITES: [(&str, f64, f64); 5] = [
        ("1001", 28.5272, 77.2167),
        ("1002", 19.0445, 72.8895),
        ("1003", 12.9784, 77.6408),
        ("1004", 13.0827, 80.2707),
        ("1005", 23.0225, 72.5714),
    ];

    /// New Delhi, used for the worked radius example
    pub const DELHI: (f64, f64) = (28.6139, 77.2090);

    /// Sites list as JSON, ids as spreadsheet numbers.
    pub const SITES_JSON: &str = r#"[
    {"sample_id": 1001, "latitude": 28.5272, "longitude": 77.2167},
    {"sample_id": 1002, "latitude": 19.0445, "longitude": 72.8895},
    {"sample_id": 1003, "latitude": 12.9784, "longitude": 77.6408}
]"#;

    /// Sites list as YAML, including one polar site that must be rejected.
    pub const SITES_YAML: &str = r#"
- sample_id: 1004
  latitude: 13.0827
  longitude: 80.2707
- sample_id: "north-pole"
  latitude: 90.0
  longitude: 0.0
- sample_id: 1005
  latitude: 23.0225
  longitude: 72.5714
"#;
}

/// Image frame shapes.
pub mod frames {
    /// Default static map size
    pub const SQUARE_600: (u32, u32) = (600, 600);

    /// Odd dimensions, to exercise integer-division centring
    pub const ODD_601X599: (u32, u32) = (601, 599);
}

/// Raw detector outputs as the model wrapper writes them.
pub mod detector {
    /// Boxes only, one over the centre of a 600x600 image
    pub const BOXES_CENTER_JSON: &str = r#"{
    "boxes": [
        {"xyxy": [290.0, 290.0, 310.0, 310.0], "confidence": 0.82},
        {"xyxy": [10.0, 10.0, 40.0, 30.0], "confidence": 0.55}
    ]
}"#;

    /// Masks and boxes; masks must win
    pub const MASKS_AND_BOXES_JSON: &str = r#"{
    "masks": [
        {"points": [[295, 295], [305, 295], [305, 305], [295, 305]], "confidence": 0.9}
    ],
    "boxes": [
        {"xyxy": [0.0, 0.0, 600.0, 600.0], "confidence": 0.99}
    ]
}"#;

    /// Nothing detected
    pub const EMPTY_JSON: &str = r#"{"boxes": []}"#;

    /// A box below the default confidence threshold
    pub const LOW_CONFIDENCE_JSON: &str = r#"{
    "boxes": [
        {"xyxy": [290.0, 290.0, 310.0, 310.0], "confidence": 0.05}
    ]
}"#;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_sites_unique_ids() {
        let mut ids: Vec<&str> = sites::REFERENCE_SITES.iter().map(|s| s.0).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), sites::REFERENCE_SITES.len());
    }

    #[test]
    fn test_reference_sites_in_range() {
        for (_, lat, lon) in sites::REFERENCE_SITES {
            assert!(lat.abs() < 85.0);
            assert!(lon.abs() <= 180.0);
        }
    }
}
