//! Detector adapters.
//!
//! The detection model itself runs outside this service. Its output reaches
//! us either as pre-computed JSON files or from a command run per image.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument};
use verifier::DetectorOutput;

use crate::config::DetectorConfig;

/// Source of raw detector output for one image.
#[async_trait]
pub trait DetectionSource: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Detector output for the site's image.
    async fn detect(&self, sample_id: &str, image_path: &Path) -> Result<DetectorOutput>;
}

/// Build the configured detection source; the command wins over a directory.
pub fn from_config(config: &DetectorConfig) -> Result<Arc<dyn DetectionSource>> {
    if let Some(command) = &config.command {
        return Ok(Arc::new(CommandSource::new(command.clone())?));
    }
    if let Some(dir) = &config.json_dir {
        return Ok(Arc::new(JsonDirSource::new(dir.clone())));
    }
    bail!("no detector configured")
}

fn parse_output(bytes: &[u8], origin: &str) -> Result<DetectorOutput> {
    serde_json::from_slice(bytes)
        .with_context(|| format!("Failed to parse detector output from {}", origin))
}

/// Reads `{dir}/{sample_id}.json`.
pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl DetectionSource for JsonDirSource {
    fn name(&self) -> &'static str {
        "json_dir"
    }

    async fn detect(&self, sample_id: &str, _image_path: &Path) -> Result<DetectorOutput> {
        let path = self.dir.join(format!("{}.json", sample_id));
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No detector output, treating as empty");
                return Ok(DetectorOutput::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()))
            }
        };
        parse_output(&bytes, &path.display().to_string())
    }
}

/// Runs an external detector; `{image}` and `{sample_id}` in the arguments
/// are substituted, JSON is read from stdout.
pub struct CommandSource {
    program: String,
    args: Vec<String>,
}

impl CommandSource {
    pub fn new(command: Vec<String>) -> Result<Self> {
        let mut parts = command.into_iter();
        let program = parts
            .next()
            .ok_or_else(|| anyhow!("detector command is empty"))?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    fn expand_args(&self, sample_id: &str, image_path: &Path) -> Vec<String> {
        let image = image_path.display().to_string();
        self.args
            .iter()
            .map(|arg| arg.replace("{image}", &image).replace("{sample_id}", sample_id))
            .collect()
    }
}

#[async_trait]
impl DetectionSource for CommandSource {
    fn name(&self) -> &'static str {
        "command"
    }

    #[instrument(skip(self, image_path), fields(program = %self.program))]
    async fn detect(&self, sample_id: &str, image_path: &Path) -> Result<DetectorOutput> {
        let output = Command::new(&self.program)
            .args(self.expand_args(sample_id, image_path))
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("Failed to run detector '{}'", self.program))?;

        if !output.status.success() {
            bail!(
                "Detector exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        parse_output(&output.stdout, &self.program)
    }
}
