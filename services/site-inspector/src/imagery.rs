//! Satellite imagery fetch with retry and local-sample fallback.
//!
//! Key features:
//! - MapTiler static maps or Esri World Imagery exports centred on the site
//! - Exponential backoff retry on failures
//! - Small responses treated as provider error pages
//! - Deterministic fallback to local sample images

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use reqwest::{header, Client, StatusCode};
use solar_common::{centered_extent, Site, SolarError};
use tokio::fs;
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use crate::config::{ImageryConfig, ProviderConfig};

/// Some imagery endpoints refuse requests without a browser user agent.
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36";

const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

const SAMPLE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Where a site's image came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Network,
    /// Copied from this local sample
    Fallback(PathBuf),
}

/// An image saved for a site, with its decoded pixel size.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub source: ImageSource,
}

/// Build the provider URL for a site, or `None` for the local provider.
pub fn imagery_url(
    provider: &ProviderConfig,
    site: &Site,
    zoom: u32,
    width: u32,
    height: u32,
) -> Option<String> {
    match provider {
        ProviderConfig::Maptiler { api_key, map_style } => Some(format!(
            "https://api.maptiler.com/maps/{}/static/{},{},{}/{}x{}.jpg?key={}",
            map_style, site.longitude, site.latitude, zoom, width, height, api_key
        )),
        ProviderConfig::EsriExport { endpoint } => {
            let bbox = centered_extent(site.longitude, site.latitude, zoom, width, height);
            Some(format!(
                "{}?bbox={}&bboxSR=3857&imageSR=3857&size={},{}&format=jpg&f=image",
                endpoint,
                bbox.to_query_string(),
                width,
                height
            ))
        }
        ProviderConfig::Local => None,
    }
}

/// Sample images under `dir`, sorted so selection is stable across runs.
pub fn list_samples(dir: &Path) -> Vec<PathBuf> {
    let mut samples: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .map(|e| SAMPLE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    samples.sort();
    samples
}

/// Pick a sample for a site; the same id always maps to the same sample.
pub fn pick_sample<'a>(samples: &'a [PathBuf], sample_id: &str) -> Option<&'a PathBuf> {
    if samples.is_empty() {
        return None;
    }
    // FNV-1a
    let hash = sample_id
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325u64, |h, b| {
            (h ^ b as u64).wrapping_mul(0x0100_0000_01b3)
        });
    samples.get((hash % samples.len() as u64) as usize)
}

/// Fetches and stores one image per site.
pub struct ImageryClient {
    client: Client,
    config: ImageryConfig,
}

impl ImageryClient {
    pub fn new(config: ImageryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// Save the site's image under `dest_dir` and read its dimensions.
    ///
    /// Tries the configured provider first, then the local samples.
    #[instrument(skip(self, dest_dir), fields(sample_id = %site.sample_id))]
    pub async fn fetch(&self, site: &Site, dest_dir: &Path) -> Result<FetchedImage> {
        fs::create_dir_all(dest_dir).await?;

        let url = imagery_url(
            &self.config.provider,
            site,
            self.config.zoom,
            self.config.width,
            self.config.height,
        );

        if let Some(url) = url {
            match self.download_with_retry(&url).await {
                Ok(bytes) => {
                    let path = dest_dir.join(format!("site_{}.jpg", site.sample_id));
                    fs::write(&path, &bytes)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!(
                        provider = self.config.provider.name(),
                        bytes = bytes.len(),
                        path = %path.display(),
                        "Fetched imagery"
                    );
                    return self.finish(path, ImageSource::Network);
                }
                Err(e) => {
                    warn!(
                        provider = self.config.provider.name(),
                        error = %e,
                        "Imagery fetch failed"
                    );
                }
            }
        }

        match self.copy_fallback(site, dest_dir).await? {
            Some((path, sample)) => {
                info!(
                    sample = %sample.display(),
                    path = %path.display(),
                    "Using fallback sample image"
                );
                self.finish(path, ImageSource::Fallback(sample))
            }
            None => Err(anyhow!(SolarError::ImageryUnavailable(
                site.sample_id.clone()
            ))),
        }
    }

    fn finish(&self, path: PathBuf, source: ImageSource) -> Result<FetchedImage> {
        let (width, height) = image::image_dimensions(&path)
            .with_context(|| format!("Failed to decode image {}", path.display()))?;
        debug!(width, height, "Decoded image dimensions");
        Ok(FetchedImage {
            path,
            width,
            height,
            source,
        })
    }

    async fn download_with_retry(&self, url: &str) -> Result<Vec<u8>> {
        let mut retry_count = 0;
        let mut delay = Duration::from_millis(self.config.retry_delay_ms);

        loop {
            match self.download_once(url).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) => {
                    retry_count += 1;
                    if retry_count > self.config.max_retries {
                        return Err(anyhow!(
                            "Imagery fetch failed after {} attempts: {}",
                            retry_count,
                            e
                        ));
                    }

                    warn!(
                        error = %e,
                        retry = retry_count,
                        max_retries = self.config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Imagery fetch failed, retrying"
                    );

                    tokio::time::sleep(delay).await;

                    // Exponential backoff
                    delay = std::cmp::min(delay * 2, MAX_RETRY_DELAY);
                }
            }
        }
    }

    async fn download_once(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "image/*")
            .send()
            .await
            .context("Request failed")?;

        let status = response.status();
        if status != StatusCode::OK {
            bail!("HTTP {}", status);
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read response body")?;
        if bytes.len() < self.config.min_image_bytes {
            bail!(
                "Response too small ({} bytes < {}), likely an error page",
                bytes.len(),
                self.config.min_image_bytes
            );
        }
        Ok(bytes.to_vec())
    }

    async fn copy_fallback(
        &self,
        site: &Site,
        dest_dir: &Path,
    ) -> Result<Option<(PathBuf, PathBuf)>> {
        let Some(dir) = &self.config.fallback_dir else {
            return Ok(None);
        };

        let samples = list_samples(dir);
        let Some(sample) = pick_sample(&samples, &site.sample_id) else {
            warn!(dir = %dir.display(), "No sample images in fallback directory");
            return Ok(None);
        };

        let extension = sample
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("jpg")
            .to_ascii_lowercase();
        let path = dest_dir.join(format!("site_{}.{}", site.sample_id, extension));
        fs::copy(sample, &path)
            .await
            .with_context(|| format!("Failed to copy sample {}", sample.display()))?;

        Ok(Some((path, sample.clone())))
    }
}
