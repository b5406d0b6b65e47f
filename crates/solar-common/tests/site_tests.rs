//! Tests for site parsing, validation and report records.

use solar_common::{
    centered_extent, lonlat_to_mercator, BufferTier, QcStatus, Site, SiteReport, SolarError,
};
use test_utils::fixtures::sites::REFERENCE_SITES;

// ============================================================================
// Site parsing
// ============================================================================

#[test]
fn test_parse_site_list() {
    let json = r#"[
        {"sample_id": 1001, "latitude": 28.5272, "longitude": 77.2167},
        {"sample_id": "roof-7", "latitude": 19.0445, "longitude": 72.8895}
    ]"#;
    let sites: Vec<Site> = serde_json::from_str(json).unwrap();
    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0].sample_id, "1001");
    assert_eq!(sites[1].sample_id, "roof-7");
}

#[test]
fn test_reference_sites_are_valid() {
    for (id, lat, lon) in REFERENCE_SITES {
        let site = Site::new(id.to_string(), lat, lon);
        assert!(site.validate().is_ok(), "site {} should be valid", id);
    }
}

#[test]
fn test_validation_error_names_site() {
    let err = Site::new("bad-1", 95.0, 0.0).validate().unwrap_err();
    assert!(err.to_string().contains("bad-1"));
    assert!(matches!(err, SolarError::InvalidCoordinate { .. }));
}

// ============================================================================
// Reports
// ============================================================================

#[test]
fn test_report_array_shape() {
    let sites = [Site::new("1", 28.5, 77.2), Site::new("2", 13.08, 80.27)];
    let reports = vec![
        SiteReport::new(&sites[0], true, Some(0.5), 3.25, Some(BufferTier::Sqft2400)),
        SiteReport::new(&sites[1], false, None, 0.0, None),
    ];
    let json = serde_json::to_string_pretty(&reports).unwrap();
    let back: Vec<SiteReport> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, reports);
    assert_eq!(back[0].qc_status, QcStatus::Verifiable);
    assert_eq!(back[0].buffer_radius_sqft, 2400);
    assert_eq!(back[1].qc_status, QcStatus::NotVerifiable);
}

// ============================================================================
// Mercator extents
// ============================================================================

#[test]
fn test_extent_is_centred_on_site() {
    for (_, lat, lon) in REFERENCE_SITES {
        let bbox = centered_extent(lon, lat, 19, 600, 600);
        let (x, y) = lonlat_to_mercator(lon, lat);
        let (cx, cy) = bbox.center();
        assert!((cx - x).abs() < 1e-6);
        assert!((cy - y).abs() < 1e-6);
    }
}
