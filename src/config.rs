//! Runtime configuration from flags, environment and `.env`.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

/// Flat price estimation front end
#[derive(Parser, Debug, Clone)]
#[command(name = "flat-valuer")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Base URL of the estimation service
    #[arg(long, env = "ESTIMATOR_API_URL", default_value = "http://localhost:8000")]
    pub api_url: String,

    /// Address the web server listens on
    #[arg(long, env = "FLAT_VALUER_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Timeout for each call to the estimation service, in seconds
    #[arg(long, env = "ESTIMATOR_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Largest accepted form post, in megabytes
    #[arg(long, env = "FLAT_VALUER_MAX_UPLOAD_MB", default_value_t = 20)]
    pub max_upload_mb: usize,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}
