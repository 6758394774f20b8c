//! Parsing error types for listing and detail extraction
//!
//! Every variant is recoverable at the unit it occurs in: the offending
//! article or detail document is skipped, never the page or the worker.

use thiserror::Error;

use crate::domain::SkipReason;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Document is empty")]
    EmptyDocument,

    #[error("Required field '{field}' not found in HTML ({})", .context.as_deref().unwrap_or("no context"))]
    RequiredFieldMissing {
        field: String,
        context: Option<String>,
    },

    #[error("Invalid price format: {text:?}")]
    InvalidPrice { text: String },

    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("URL resolution failed: {url} - {reason}")]
    UrlResolutionFailed { url: String, reason: String },
}

impl ParsingError {
    /// Create a required field missing error with context
    pub fn required_field_missing(field: &str, context: Option<&str>) -> Self {
        Self::RequiredFieldMissing {
            field: field.to_string(),
            context: context.map(ToString::to_string),
        }
    }

    pub fn invalid_price(text: &str) -> Self {
        Self::InvalidPrice {
            text: text.to_string(),
        }
    }

    /// Skip reason reported when this error aborts a single article
    pub fn article_skip_reason(&self) -> SkipReason {
        match self {
            Self::InvalidPrice { .. } => SkipReason::PriceUnparsable,
            _ => SkipReason::ArticleMalformed,
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
