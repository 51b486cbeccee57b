//! Configuration module

use clap::Args;

use crate::config::{observability::LoggingConfig, storage::StorageConfig};

pub mod observability;
pub mod storage;

pub use observability::LogFormat;

/// Marketplace cart configuration
#[derive(Debug, Args)]
pub struct CartConfig {
    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Durable storage settings.
    #[command(flatten)]
    pub storage: StorageConfig,
}
