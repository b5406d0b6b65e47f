//! Per-site inspection and the batch run over a sites list.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use futures::stream::{self, StreamExt};
use solar_common::{ImageFrame, Site, SiteReport};
use tracing::{debug, info, instrument, warn};
use verifier::{extract_polygons, verify_frame, DetectionSet, Verification};

use crate::config::InspectorConfig;
use crate::detections::{self, DetectionSource};
use crate::imagery::{ImageSource, ImageryClient};
use crate::overlay::render_overlay;
use crate::report::{write_report, RunSummary};
use crate::sites::partition_valid;

/// Result of inspecting one site.
#[derive(Debug, Clone)]
pub struct SiteOutcome {
    pub report: SiteReport,
    pub verification: Verification,
    pub image_path: PathBuf,
    pub source: ImageSource,
}

/// Result of a whole run; `reports` follows the input order.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub reports: Vec<SiteReport>,
    pub summary: RunSummary,
}

pub struct Inspector {
    config: InspectorConfig,
    imagery: ImageryClient,
    detector: Arc<dyn DetectionSource>,
}

impl Inspector {
    /// Build an inspector with the detector named in the config.
    pub fn new(config: InspectorConfig) -> Result<Self> {
        let detector = detections::from_config(&config.detector)?;
        Self::with_detector(config, detector)
    }

    pub fn with_detector(
        config: InspectorConfig,
        detector: Arc<dyn DetectionSource>,
    ) -> Result<Self> {
        let imagery = ImageryClient::new(config.imagery.clone())?;
        Ok(Self {
            config,
            imagery,
            detector,
        })
    }

    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    fn images_dir(&self) -> PathBuf {
        self.config.output.dir.join("images")
    }

    /// Fetch imagery, run detection and verify one site.
    #[instrument(skip(self, site), fields(sample_id = %site.sample_id))]
    pub async fn inspect(&self, site: &Site) -> Result<SiteOutcome> {
        site.validate()?;
        let image = self.imagery.fetch(site, &self.images_dir()).await?;
        let frame = ImageFrame::new(image.width, image.height, site.latitude)?;

        let output = self.detector.detect(&site.sample_id, &image.path).await?;
        let mut detections = DetectionSet::from(output);
        let raw_count = detections.len();
        detections.retain_confident(self.config.detector.min_confidence);
        debug!(
            detector = self.detector.name(),
            raw = raw_count,
            kept = detections.len(),
            "Received detections"
        );

        let verification = verify_frame(
            &frame,
            self.config.imagery.zoom,
            &detections,
            self.config.verification,
        )?;

        if self.config.output.overlays {
            self.write_overlay(site, &image.path, &verification, &detections)
                .await;
        }

        let report = SiteReport::new(
            site,
            verification.verified,
            verification.best_confidence(),
            verification.area_sqm,
            verification.tier,
        );

        info!(
            has_solar = report.has_solar,
            pv_area_sqm_est = report.pv_area_sqm_est,
            buffer_radius_sqft = report.buffer_radius_sqft,
            gsd = verification.zones.gsd,
            "Inspected site"
        );

        Ok(SiteOutcome {
            report,
            verification,
            image_path: image.path,
            source: image.source,
        })
    }

    /// Overlays are diagnostic only; failures are logged, never returned.
    async fn write_overlay(
        &self,
        site: &Site,
        image_path: &Path,
        verification: &Verification,
        detections: &DetectionSet,
    ) {
        let out_path = self
            .config
            .output
            .dir
            .join(format!("overlay_{}.jpg", site.sample_id));
        let image_path = image_path.to_path_buf();
        let zones = verification.zones;
        let polygons = extract_polygons(detections);

        let task_out = out_path.clone();
        let result = tokio::task::spawn_blocking(move || {
            render_overlay(&image_path, &task_out, &zones, &polygons)
        })
        .await;

        match result {
            Ok(Ok(())) => debug!(path = %out_path.display(), "Saved overlay"),
            Ok(Err(e)) => warn!(error = %format!("{e:#}"), "Failed to render overlay"),
            Err(e) => warn!(error = %e, "Overlay task panicked"),
        }
    }

    /// Inspect every site, write the report and log a summary.
    ///
    /// Invalid sites and sites that fail are left out of the report; the run
    /// only fails if the report cannot be written.
    pub async fn run(&self, sites: Vec<Site>) -> Result<RunOutcome> {
        let mut summary = RunSummary {
            total: sites.len(),
            ..Default::default()
        };

        let (valid, rejected) = partition_valid(sites);
        summary.rejected = rejected.len();

        info!(
            sites = valid.len(),
            max_concurrent = self.config.max_concurrent,
            "Starting inspection run"
        );

        let results: Vec<(Site, Result<SiteOutcome>)> = stream::iter(valid)
            .map(|site| async move {
                let result = self.inspect(&site).await;
                (site, result)
            })
            .buffered(self.config.max_concurrent.max(1))
            .collect()
            .await;

        let mut reports = Vec::with_capacity(results.len());
        for (site, result) in results {
            match result {
                Ok(outcome) => {
                    if outcome.report.has_solar {
                        summary.verified += 1;
                    }
                    if matches!(outcome.source, ImageSource::Fallback(_)) {
                        summary.fallback_images += 1;
                    }
                    reports.push(outcome.report);
                }
                Err(e) => {
                    warn!(
                        sample_id = %site.sample_id,
                        error = %format!("{e:#}"),
                        "Site failed"
                    );
                    summary.failed += 1;
                }
            }
        }
        summary.processed = reports.len();

        write_report(&self.config.output.report_path(), &reports).await?;
        summary.log();

        Ok(RunOutcome { reports, summary })
    }
}
