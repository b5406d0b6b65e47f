//! Runs the example configuration and detector outputs under `testdata/`.

use image::RgbImage;
use site_inspector::{load_sites, Inspector, InspectorConfig, ProviderConfig};
use solar_common::QcStatus;
use test_utils::{require_test_file, service_testdata_dir, temp_test_dir};
use verifier::{GeometryPolicy, RoundingMode};

#[test]
fn test_example_config_is_valid() {
    let path = require_test_file!("inspector.yaml");
    let config = InspectorConfig::load(&path).unwrap();

    assert_eq!(config.imagery.provider, ProviderConfig::Local);
    assert_eq!(config.imagery.zoom, 18);
    assert_eq!(config.verification.geometry_policy, GeometryPolicy::Skip);
    assert_eq!(config.verification.rounding, RoundingMode::HalfEven);
    config.validate().unwrap();
}

#[tokio::test]
async fn test_example_sites_end_to_end() {
    let config_path = require_test_file!("inspector.yaml");
    let sites_path = require_test_file!("sites.json");
    let testdata = service_testdata_dir("site-inspector");

    // Sample imagery is generated; real rooftops are not checked in
    let out = temp_test_dir();
    let samples = out.path().join("samples");
    std::fs::create_dir_all(&samples).unwrap();
    RgbImage::new(600, 600).save(samples.join("blank.png")).unwrap();

    let mut config = InspectorConfig::load(&config_path).unwrap();
    config.imagery.fallback_dir = Some(samples);
    config.detector.json_dir = Some(testdata.join("detections"));
    config.output.dir = out.path().join("output");
    config.output.overlays = false;

    let sites = load_sites(&sites_path).unwrap();
    let inspector = Inspector::new(config).unwrap();
    let outcome = inspector.run(sites).await.unwrap();

    assert_eq!(outcome.summary.processed, 5);
    assert_eq!(outcome.summary.verified, 2);

    let by_id = |id: &str| {
        outcome
            .reports
            .iter()
            .find(|r| r.sample_id == id)
            .unwrap()
            .clone()
    };

    // Box over the centre
    let r1001 = by_id("1001");
    assert_eq!(r1001.qc_status, QcStatus::Verifiable);
    assert_eq!(r1001.buffer_radius_sqft, 1200);
    assert_eq!(r1001.confidence, 0.82);

    // Mask 12 px from the centre: outside the 10 px inner ring, inside the
    // 14 px outer ring at this latitude
    let r1003 = by_id("1003");
    assert_eq!(r1003.qc_status, QcStatus::Verifiable);
    assert_eq!(r1003.buffer_radius_sqft, 2400);
    assert_eq!(r1003.confidence, 0.64);

    for id in ["1002", "1004", "1005"] {
        let r = by_id(id);
        assert!(!r.has_solar, "{} should not verify", id);
        assert_eq!(r.pv_area_sqm_est, 0.0);
    }
}
