//! Storage Config

use std::path::PathBuf;

use clap::Args;

/// Durable storage settings.
#[derive(Debug, Args)]
pub struct StorageConfig {
    /// Directory holding the cart snapshot
    #[arg(long, env = "CART_STORAGE_DIR", default_value = ".marketplace-cart")]
    pub storage_dir: PathBuf,
}
