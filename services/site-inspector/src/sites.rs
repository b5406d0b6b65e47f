//! Loading the list of sites to inspect.

use std::path::Path;

use anyhow::{bail, Context, Result};
use solar_common::{Site, SolarError};
use tracing::{info, warn};

/// Load sites from a JSON or YAML array, chosen by file extension.
pub fn load_sites(path: &Path) -> Result<Vec<Site>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read sites file: {}", path.display()))?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let sites: Vec<Site> = match extension.as_str() {
        "json" => serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse sites JSON: {}", path.display()))?,
        "yaml" | "yml" => serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse sites YAML: {}", path.display()))?,
        other => bail!(SolarError::UnsupportedFormat(format!(
            "sites file extension '{}' (expected json, yaml or yml)",
            other
        ))),
    };

    info!(path = %path.display(), count = sites.len(), "Loaded sites");
    Ok(sites)
}

/// Split sites into those with usable coordinates and those without.
///
/// Rejected sites are logged; they never abort the run.
pub fn partition_valid(sites: Vec<Site>) -> (Vec<Site>, Vec<(Site, SolarError)>) {
    let mut valid = Vec::with_capacity(sites.len());
    let mut rejected = Vec::new();

    for site in sites {
        match site.validate() {
            Ok(()) => valid.push(site),
            Err(e) => {
                warn!(sample_id = %site.sample_id, error = %e, "Rejecting site");
                rejected.push((site, e));
            }
        }
    }

    (valid, rejected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::fixtures::sites;
    use test_utils::{temp_test_dir, write_test_file};

    #[test]
    fn test_load_json_sites() {
        let dir = temp_test_dir();
        let path = write_test_file(dir.path(), "sites.json", sites::SITES_JSON.as_bytes());
        let loaded = load_sites(&path).unwrap();
        assert_eq!(loaded.len(), sites::REFERENCE_SITES.len());
        assert_eq!(loaded[0].sample_id, "1001");
    }

    #[test]
    fn test_load_yaml_sites() {
        let dir = temp_test_dir();
        let path = write_test_file(dir.path(), "sites.yml", sites::SITES_YAML.as_bytes());
        let loaded = load_sites(&path).unwrap();
        assert!(!loaded.is_empty());
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let dir = temp_test_dir();
        let path = write_test_file(dir.path(), "sites.csv", b"sample_id,latitude,longitude\n");
        let err = load_sites(&path).unwrap_err();
        assert!(err.to_string().contains("csv"));
    }

    #[test]
    fn test_partition_rejects_pole() {
        let sites = vec![
            Site::new("ok", 28.6139, 77.2090),
            Site::new("pole", 90.0, 0.0),
            Site::new("nan", f64::NAN, 0.0),
        ];
        let (valid, rejected) = partition_valid(sites);
        assert_eq!(valid.len(), 1);
        assert_eq!(rejected.len(), 2);
        assert_eq!(rejected[0].0.sample_id, "pole");
    }

    #[test]
    fn test_partition_rejects_path_like_id() {
        let (valid, rejected) = partition_valid(vec![
            Site::new("../../etc/cron.d/x", 28.6139, 77.2090),
            Site::new("1001", 28.6139, 77.2090),
        ]);
        assert_eq!(valid.len(), 1);
        assert!(matches!(rejected[0].1, SolarError::InvalidSampleId(_)));
    }
}
