//! Environment-driven configuration for the batch binary.

use std::fmt;
use std::path::PathBuf;

use paperfolio_core::constants::DEFAULT_BENCHMARK_SYMBOL;

/// Runtime settings, read once at startup.
///
/// Everything has a default except the provider token, which stays `None`
/// until a command that talks to the provider requires it.
#[derive(Clone)]
pub struct Config {
    /// SQLite database file. Parent directories are created on init.
    pub db_path: String,
    /// Market data API host override, used against test doubles.
    pub provider_base_url: Option<String>,
    /// Market data API token.
    pub provider_token: Option<String>,
    /// Directory receiving the JSON report exports.
    pub report_dir: PathBuf,
    /// Symbol whose closes anchor the benchmark series.
    pub benchmark_symbol: String,
}

impl Config {
    pub fn from_env() -> Self {
        let db_path =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "data/paperfolio.db".to_string());
        let provider_base_url = std::env::var("PROVIDER_BASE_URL").ok();
        let provider_token = std::env::var("PROVIDER_TOKEN").ok();
        let report_dir = std::env::var("REPORT_DIR").unwrap_or_else(|_| "reports".to_string());
        let benchmark_symbol = std::env::var("BENCHMARK_SYMBOL")
            .unwrap_or_else(|_| DEFAULT_BENCHMARK_SYMBOL.to_string());

        Config {
            db_path,
            provider_base_url,
            provider_token,
            report_dir: PathBuf::from(report_dir),
            benchmark_symbol,
        }
    }
}

// The token must never reach the logs, so Debug is written by hand.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("db_path", &self.db_path)
            .field("provider_base_url", &self.provider_base_url)
            .field(
                "provider_token",
                &self.provider_token.as_ref().map(|_| "<redacted>"),
            )
            .field("report_dir", &self.report_dir)
            .field("benchmark_symbol", &self.benchmark_symbol)
            .finish()
    }
}
