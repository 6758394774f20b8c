//! Configuration infrastructure
//!
//! Every crawl knob lives in [`AppConfig`] and is passed explicitly into the
//! scheduler; nothing is read from process-wide constants at crawl time.
//!
//! Loading is layered through the `config` crate:
//! 1. Built-in defaults (`defaults` module)
//! 2. Optional config file (TOML, JSON or YAML by extension)
//! 3. `LISTING_CRAWLER__SECTION__KEY` environment variables

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::infrastructure::http_client::HttpClientConfig;
use crate::infrastructure::parsing::ParsingConfig;

/// Built-in defaults for the vehicle listings of tayara.tn
pub mod defaults {
    pub const LISTING_URL: &str = "https://www.tayara.tn/fr/ads/c/Véhicules/?page=";
    pub const BASE_URL: &str = "https://www.tayara.tn";
    pub const MAX_PAGE: u32 = 500;
    pub const MIN_PRICE: i64 = 0;
    pub const WORKER_COUNT: usize = 4;
    pub const FAIL_ON_WORKER_ERROR: bool = false;

    pub const OUTPUT_PATH: &str = "detailed_cars.json";
    pub const OUTPUT_INDENT: usize = 4;

    pub const LOG_LEVEL: &str = "info";
    pub const LOG_JSON_FORMAT: bool = false;
    pub const LOG_CONSOLE_OUTPUT: bool = true;
    pub const LOG_FILE_OUTPUT: bool = false;
    pub const LOG_FILE_NAME: &str = "listing-crawler.log";

    pub const ENV_PREFIX: &str = "LISTING_CRAWLER";
    pub const APP_DIR_NAME: &str = "listing-crawler";
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {source}")]
    Load {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub crawl: CrawlSettings,
    pub http: HttpClientConfig,
    pub parsing: ParsingConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Crawl knobs handed to the scheduler
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlSettings {
    /// Listing URL; the page number is appended verbatim
    pub listing_url: String,

    /// Domain prepended to relative detail links
    pub base_url: String,

    /// Last listing page to scan (pages start at 1)
    pub max_page: u32,

    /// Listings must be priced strictly above this
    pub min_price: i64,

    /// Number of concurrent page workers
    pub worker_count: usize,

    /// Fail the whole crawl when a worker dies instead of returning partial data
    pub fail_on_worker_error: bool,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            listing_url: defaults::LISTING_URL.to_string(),
            base_url: defaults::BASE_URL.to_string(),
            max_page: defaults::MAX_PAGE,
            min_price: defaults::MIN_PRICE,
            worker_count: defaults::WORKER_COUNT,
            fail_on_worker_error: defaults::FAIL_ON_WORKER_ERROR,
        }
    }
}

impl CrawlSettings {
    /// URL of one listing page
    pub fn listing_page_url(&self, page: u32) -> String {
        format!("{}{}", self.listing_url, page)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where the final JSON collection is written
    pub path: PathBuf,

    /// Spaces per indentation level
    pub indent: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(defaults::OUTPUT_PATH),
            indent: defaults::OUTPUT_INDENT,
        }
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs (file output only)
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Directory for log files; defaults to `logs/` next to the executable
    pub log_dir: Option<PathBuf>,

    /// Log file name inside `log_dir`
    pub file_name: String,

    /// Module-specific log level filters (e.g., "reqwest": "info")
    pub module_filters: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            log_dir: None,
            file_name: defaults::LOG_FILE_NAME.to_string(),
            module_filters: {
                let mut filters = HashMap::new();
                filters.insert("reqwest".to_string(), "info".to_string());
                filters.insert("hyper".to_string(), "warn".to_string());
                filters.insert("html5ever".to_string(), "warn".to_string());
                filters.insert("selectors".to_string(), "warn".to_string());
                filters
            },
        }
    }
}

impl AppConfig {
    /// Validate values that serde cannot check
    pub fn validate(&self) -> Result<(), ConfigError> {
        let crawl = &self.crawl;
        if crawl.worker_count == 0 {
            return Err(validation("crawl.worker_count must be at least 1"));
        }
        for (field, value) in [("crawl.listing_url", &crawl.listing_url), ("crawl.base_url", &crawl.base_url)] {
            Url::parse(value).map_err(|e| validation(&format!("{field} is not a valid URL ({value}): {e}")))?;
        }

        let listing = &self.parsing.listing_selectors;
        let detail = &self.parsing.detail_selectors;
        for (field, selectors) in [
            ("listing_selectors.container", &listing.container),
            ("listing_selectors.article", &listing.article),
            ("listing_selectors.price", &listing.price),
            ("listing_selectors.title", &listing.title),
            ("listing_selectors.link", &listing.link),
            ("listing_selectors.image", &listing.image),
            ("detail_selectors.criteria_list", &detail.criteria_list),
            ("detail_selectors.criteria_item", &detail.criteria_item),
            ("detail_selectors.key", &detail.key),
            ("detail_selectors.value", &detail.value),
        ] {
            if selectors.is_empty() {
                return Err(validation(&format!("parsing.{field} needs at least one selector")));
            }
        }

        if self.output.path.as_os_str().is_empty() {
            return Err(validation("output.path must not be empty"));
        }
        if !self.logging.console_output && !self.logging.file_output {
            return Err(validation("logging needs console_output or file_output"));
        }
        Ok(())
    }
}

fn validation(message: &str) -> ConfigError {
    ConfigError::Validation {
        message: message.to_string(),
    }
}

/// Configuration loader
pub struct ConfigManager {
    pub config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Per-user configuration directory
    pub fn get_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(defaults::APP_DIR_NAME))
    }

    /// Use an explicit file, or fall back to `<config dir>/listing-crawler/config.{toml,json,yaml}` when present
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self { config_path }
    }

    /// Resolve the file to read, if any
    fn resolved_path(&self) -> Option<PathBuf> {
        self.config_path
            .clone()
            .or_else(|| Self::get_config_dir().map(|dir| dir.join("config")))
    }

    /// Load configuration: defaults, then file, then environment
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?);

        match (&self.config_path, self.resolved_path()) {
            // An explicitly named file must exist
            (Some(path), _) => builder = builder.add_source(config::File::from(path.as_path())),
            (None, Some(path)) => {
                builder = builder.add_source(config::File::with_name(&path.to_string_lossy()).required(false));
            }
            (None, None) => {}
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(defaults::ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;

        if let Some(path) = &self.config_path {
            info!("Loaded configuration from: {}", path.display());
        }
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<AppConfig, ConfigError> {
        Self::new(Some(path.to_path_buf())).load()
    }
}
