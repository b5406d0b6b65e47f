//! Site inputs and per-site report records.

use serde::{Deserialize, Deserializer, Serialize};

use crate::mercator::MAX_LATITUDE;
use crate::{BufferTier, SolarError, SolarResult};

/// A site to inspect: an identifier and the coordinate the buffers centre on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    #[serde(deserialize_with = "deserialize_sample_id")]
    pub sample_id: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Site {
    pub fn new(sample_id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            sample_id: sample_id.into(),
            latitude,
            longitude,
        }
    }

    /// Reject sites that cannot be imaged, scaled or written to disk.
    ///
    /// Latitudes beyond the Web Mercator limit (which includes the poles,
    /// where the ground sample distance collapses to zero) are invalid. The
    /// sample id names output files, so it must be a plain file stem.
    pub fn validate(&self) -> SolarResult<()> {
        if !is_plain_file_stem(&self.sample_id) {
            return Err(SolarError::InvalidSampleId(self.sample_id.clone()));
        }

        let invalid = |message: String| SolarError::InvalidCoordinate {
            sample_id: self.sample_id.clone(),
            message,
        };

        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(invalid("coordinates must be finite".to_string()));
        }
        if self.latitude.abs() > MAX_LATITUDE {
            return Err(invalid(format!(
                "latitude {} outside ±{}",
                self.latitude, MAX_LATITUDE
            )));
        }
        if self.longitude.abs() > 180.0 {
            return Err(invalid(format!("longitude {} outside ±180", self.longitude)));
        }
        Ok(())
    }
}

/// Non-empty, not made only of dots, no separators or control characters.
fn is_plain_file_stem(id: &str) -> bool {
    !id.is_empty()
        && !id.chars().all(|c| c == '.')
        && !id
            .chars()
            .any(|c| matches!(c, '/' | '\\' | ':') || c.is_control())
}

/// Identifiers come from spreadsheets as numbers or strings.
fn deserialize_sample_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Int(i64),
        Float(f64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Int(v) => v.to_string(),
        RawId::Float(v) if v.fract() == 0.0 => format!("{}", v as i64),
        RawId::Float(v) => v.to_string(),
        RawId::Text(s) => s,
    })
}

/// Quality-control gate on raw detections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QcStatus {
    Verifiable,
    NotVerifiable,
}

impl QcStatus {
    pub fn from_verified(verified: bool) -> Self {
        if verified {
            QcStatus::Verifiable
        } else {
            QcStatus::NotVerifiable
        }
    }
}

/// One record of the submission report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteReport {
    pub sample_id: String,
    pub lat: f64,
    pub lon: f64,
    pub has_solar: bool,
    /// Highest known confidence among matching detections, 0.0 if none
    pub confidence: f64,
    pub pv_area_sqm_est: f64,
    /// Tier that verified the site; the outer tier when nothing matched
    pub buffer_radius_sqft: u32,
    pub qc_status: QcStatus,
}

impl SiteReport {
    pub fn new(
        site: &Site,
        verified: bool,
        confidence: Option<f64>,
        area_sqm: f64,
        tier: Option<BufferTier>,
    ) -> Self {
        Self {
            sample_id: site.sample_id.clone(),
            lat: site.latitude,
            lon: site.longitude,
            has_solar: verified,
            confidence: confidence.unwrap_or(0.0),
            pv_area_sqm_est: area_sqm,
            buffer_radius_sqft: tier.unwrap_or(BufferTier::Sqft2400).sqft(),
            qc_status: QcStatus::from_verified(verified),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_sample_id() {
        let site: Site =
            serde_json::from_str(r#"{"sample_id": 1001, "latitude": 28.5, "longitude": 77.2}"#)
                .unwrap();
        assert_eq!(site.sample_id, "1001");
    }

    #[test]
    fn test_float_sample_id_from_spreadsheet() {
        let site: Site =
            serde_json::from_str(r#"{"sample_id": 1002.0, "latitude": 19.0, "longitude": 72.8}"#)
                .unwrap();
        assert_eq!(site.sample_id, "1002");
    }

    #[test]
    fn test_validate_rejects_pole() {
        let site = Site::new("p", 90.0, 0.0);
        assert!(site.validate().is_err());
        let site = Site::new("p", -90.0, 0.0);
        assert!(site.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_nan() {
        assert!(Site::new("n", f64::NAN, 0.0).validate().is_err());
        assert!(Site::new("n", 0.0, 181.0).validate().is_err());
        assert!(Site::new("ok", 12.9784, 77.6408).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_path_like_ids() {
        for id in ["", ".", "..", "../escape", "a/b", "a\\b", "c:evil", "tab\tid"] {
            let err = Site::new(id, 28.5, 77.2).validate().unwrap_err();
            assert!(
                matches!(err, SolarError::InvalidSampleId(_)),
                "id {:?} should be rejected",
                id
            );
        }
        for id in ["1001", "roof-7", "site_12.v2", "a..b"] {
            assert!(Site::new(id, 28.5, 77.2).validate().is_ok(), "id {:?}", id);
        }
    }

    #[test]
    fn test_report_serialization() {
        let site = Site::new("1001", 28.5272, 77.2167);
        let report = SiteReport::new(&site, true, Some(0.91), 12.34, Some(BufferTier::Sqft1200));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["qc_status"], "VERIFIABLE");
        assert_eq!(json["buffer_radius_sqft"], 1200);
        assert_eq!(json["has_solar"], true);
        assert_eq!(json["pv_area_sqm_est"], 12.34);
    }

    #[test]
    fn test_unverified_report_defaults() {
        let site = Site::new("1003", 12.9784, 77.6408);
        let report = SiteReport::new(&site, false, None, 0.0, None);
        assert_eq!(report.qc_status, QcStatus::NotVerifiable);
        assert_eq!(report.buffer_radius_sqft, 2400);
        assert_eq!(report.confidence, 0.0);
    }
}
