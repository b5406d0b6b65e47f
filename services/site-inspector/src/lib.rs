//! Rooftop solar site inspector.
//!
//! For each site: fetch a satellite image centred on it, collect the
//! detector's output for that image, verify detections against the 1200 and
//! 2400 sq.ft buffers and emit one report record.

pub mod config;
pub mod detections;
pub mod imagery;
pub mod overlay;
pub mod pipeline;
pub mod report;
pub mod sites;

pub use config::{DetectorConfig, ImageryConfig, InspectorConfig, OutputConfig, ProviderConfig};
pub use detections::{CommandSource, DetectionSource, JsonDirSource};
pub use imagery::{FetchedImage, ImageSource, ImageryClient};
pub use pipeline::{Inspector, RunOutcome, SiteOutcome};
pub use report::{write_report, RunSummary};
pub use sites::{load_sites, partition_valid};
