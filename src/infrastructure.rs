//! Infrastructure layer: configuration, logging, HTTP transport, HTML parsing
//! and output.

pub mod config;
pub mod http_client;
pub mod logging;
pub mod output;
pub mod parsing;
pub mod parsing_error;

pub use config::{AppConfig, ConfigError, ConfigManager, CrawlSettings, LoggingConfig, OutputConfig};
pub use http_client::{FetchError, HttpClient, HttpClientConfig, PageFetcher};
pub use logging::{get_log_directory, init_logging_with_config};
pub use output::CollectionWriter;
pub use parsing::{DetailExtractor, ListingExtractor, ParsingConfig, ParsingError, ParsingResult};
