//! Rooftop solar site inspector service.
//!
//! Runs a batch of sites through:
//! - Satellite imagery fetch (MapTiler or Esri), with local fallback samples
//! - Detector output intake (JSON directory or external command)
//! - Buffer-zone verification and area estimation
//! - Submission report and optional diagnostic overlays

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use site_inspector::config::{InspectorConfig, ProviderConfig, DEFAULT_ESRI_ENDPOINT};
use site_inspector::{load_sites, Inspector};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Provider {
    Maptiler,
    EsriExport,
    Local,
}

#[derive(Parser, Debug)]
#[command(name = "site-inspector")]
#[command(about = "Verify rooftop solar installations against site buffer zones")]
struct Args {
    /// Sites file (JSON or YAML array of sample_id/latitude/longitude)
    #[arg(short, long)]
    sites: PathBuf,

    /// Configuration file (YAML)
    #[arg(short, long, env = "INSPECTOR_CONFIG")]
    config: Option<PathBuf>,

    /// Imagery provider
    #[arg(long, value_enum)]
    provider: Option<Provider>,

    /// MapTiler API key
    #[arg(long, env = "MAPTILER_KEY", hide_env_values = true)]
    maptiler_key: Option<String>,

    /// Zoom level of fetched imagery
    #[arg(long)]
    zoom: Option<u32>,

    /// Directory of local sample images used when fetching fails
    #[arg(long, env = "FALLBACK_DIR")]
    fallback_dir: Option<PathBuf>,

    /// Directory of per-sample detector JSON files
    #[arg(long)]
    detections_dir: Option<PathBuf>,

    /// External detector command, e.g. "python detect.py {image}"
    #[arg(long)]
    detector_command: Option<String>,

    /// Minimum detection confidence
    #[arg(long)]
    min_confidence: Option<f64>,

    /// Output directory for images, overlays and the report
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Skip overlay rendering
    #[arg(long)]
    no_overlays: bool,

    /// Sites processed concurrently
    #[arg(long)]
    max_concurrent: Option<usize>,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Human-readable logs instead of JSON
    #[arg(long)]
    pretty_logs: bool,
}

impl Args {
    /// Apply command-line overrides on top of the file configuration.
    fn apply(&self, config: &mut InspectorConfig) {
        if let Some(provider) = self.provider {
            config.imagery.provider = match provider {
                Provider::Maptiler => ProviderConfig::Maptiler {
                    api_key: String::new(),
                    map_style: "satellite".to_string(),
                },
                Provider::EsriExport => ProviderConfig::EsriExport {
                    endpoint: DEFAULT_ESRI_ENDPOINT.to_string(),
                },
                Provider::Local => ProviderConfig::Local,
            };
        }
        if let (Some(key), ProviderConfig::Maptiler { api_key, .. }) =
            (&self.maptiler_key, &mut config.imagery.provider)
        {
            if api_key.is_empty() {
                *api_key = key.clone();
            }
        }
        if let Some(zoom) = self.zoom {
            config.imagery.zoom = zoom;
        }
        if let Some(dir) = &self.fallback_dir {
            config.imagery.fallback_dir = Some(dir.clone());
        }
        if let Some(dir) = &self.detections_dir {
            config.detector.json_dir = Some(dir.clone());
        }
        if let Some(command) = &self.detector_command {
            config.detector.command = Some(command.split_whitespace().map(String::from).collect());
        }
        if let Some(min) = self.min_confidence {
            config.detector.min_confidence = min;
        }
        if let Some(dir) = &self.output_dir {
            config.output.dir = dir.clone();
        }
        if self.no_overlays {
            config.output.overlays = false;
        }
        if let Some(n) = self.max_concurrent {
            config.max_concurrent = n;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true);
    if args.pretty_logs {
        tracing::subscriber::set_global_default(builder.finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    }

    info!("Starting site inspector");

    let mut config = match &args.config {
        Some(path) => InspectorConfig::load(path)?,
        None => InspectorConfig::default(),
    };
    args.apply(&mut config);
    config.validate()?;

    info!(
        provider = config.imagery.provider.name(),
        zoom = config.imagery.zoom,
        output_dir = %config.output.dir.display(),
        "Configuration loaded"
    );

    let sites = load_sites(&args.sites)?;
    let inspector = Inspector::new(config)?;
    let outcome = inspector.run(sites).await?;

    info!(
        report = %inspector.config().output.report_path().display(),
        processed = outcome.summary.processed,
        "Site inspector finished"
    );

    Ok(())
}
