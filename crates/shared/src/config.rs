//! Application configuration management.

use serde::Deserialize;

/// Core engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CoreConfig {
    /// Report cache tuning.
    #[serde(default)]
    pub report_cache: ReportCacheConfig,
    /// Ledger drill-down tuning.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Report cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportCacheConfig {
    /// Maximum number of cached reports per process.
    #[serde(default = "default_cache_capacity")]
    pub max_capacity: u64,
    /// Time-to-live for cached reports, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_cache_capacity() -> u64 {
    1_000
}

fn default_cache_ttl_secs() -> u64 {
    300
}

impl Default for ReportCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_cache_capacity(),
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

/// Ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Reserved equity account code holding prior-years retained earnings.
    #[serde(default = "default_retained_earnings_code")]
    pub retained_earnings_code: String,
    /// Default page size for the GL drill-down.
    #[serde(default = "default_ledger_page_limit")]
    pub page_limit: u32,
}

fn default_retained_earnings_code() -> String {
    "3900".to_string()
}

fn default_ledger_page_limit() -> u32 {
    crate::types::pagination::DEFAULT_PAGE_LIMIT
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            retained_earnings_code: default_retained_earnings_code(),
            page_limit: default_ledger_page_limit(),
        }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            report_cache: ReportCacheConfig::default(),
            ledger: LedgerConfig::default(),
        }
    }
}

impl CoreConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
