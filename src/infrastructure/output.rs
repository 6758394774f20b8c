//! JSON output for the final collection.
//!
//! The collection is serialized once after the crawl as a single JSON array.
//! Non-ASCII text is written as UTF-8, not escaped.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tokio::fs;
use tracing::info;

use crate::domain::ListingRecord;
use crate::infrastructure::config::OutputConfig;

/// Writes the collection to the configured path
pub struct CollectionWriter {
    path: PathBuf,
    indent: usize,
}

impl CollectionWriter {
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            path: config.path.clone(),
            indent: config.indent,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render the collection with the configured indentation
    pub fn render(&self, records: &[ListingRecord]) -> Result<Vec<u8>> {
        let indent = vec![b' '; self.indent];
        let mut buffer = Vec::new();
        let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(&indent));
        records
            .serialize(&mut serializer)
            .context("Failed to serialize collection")?;
        Ok(buffer)
    }

    /// Write the whole collection, creating parent directories as needed
    pub async fn write(&self, records: &[ListingRecord]) -> Result<()> {
        let content = self.render(records)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
        }

        fs::write(&self.path, content)
            .await
            .with_context(|| format!("Failed to write collection to: {}", self.path.display()))?;

        info!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(())
    }
}
