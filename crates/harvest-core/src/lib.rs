//! Shared domain types and configuration for the feed harvester.

pub mod app_config;
pub mod bucket;
pub mod config;
pub mod item;
pub mod params;

use thiserror::Error;

pub use app_config::HarvestConfig;
pub use bucket::{RecencyBucket, RecencyBuckets};
pub use config::{load_harvest_config, load_harvest_config_from_env};
pub use item::{parse_count_label, Item, UNKNOWN_AUTHOR};
pub use params::RunParams;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("invalid run parameter {param}: {reason}")]
    InvalidParam { param: &'static str, reason: String },
}
