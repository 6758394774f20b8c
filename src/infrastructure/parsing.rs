//! HTML parsing infrastructure for listing and detail pages
//!
//! Trait-based extraction over `scraper` documents with selector fallbacks.
//! Parsed documents are never held across an await point: callers go through
//! [`ContextualParser::parse_str`], which owns the `Html` for the duration of
//! one synchronous extraction.

pub mod config;
pub mod context;
pub mod detail_parser;
pub mod listing_parser;

pub use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};
pub use config::{DetailSelectors, ListingSelectors, ParsingConfig};
pub use context::{DetailParseContext, ListingParseContext};
pub use detail_parser::{DetailExtraction, DetailExtractor};
pub use listing_parser::{ListingExtraction, ListingExtractor};

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

/// Parser over a fetched document with per-call context
pub trait ContextualParser {
    type Output;
    type Context;

    /// Extract from an already parsed document
    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> Self::Output;

    /// Parse a raw document body and extract from it
    fn parse_str(&self, body: &str, context: &Self::Context) -> ParsingResult<Self::Output> {
        let html = parse_document(body)?;
        Ok(self.parse_with_context(&html, context))
    }
}

/// Parse a raw body into a queryable tree; blank bodies are rejected
pub fn parse_document(body: &str) -> ParsingResult<Html> {
    if body.trim().is_empty() {
        return Err(ParsingError::EmptyDocument);
    }
    Ok(Html::parse_document(body))
}

/// Compile selector strings, keeping the ones that parse
pub(crate) fn compile_selectors(field: &str, selector_strings: &[String]) -> ParsingResult<Vec<Selector>> {
    let mut selectors = Vec::with_capacity(selector_strings.len());
    let mut errors = Vec::new();

    for selector_str in selector_strings {
        match Selector::parse(selector_str) {
            Ok(selector) => selectors.push(selector),
            Err(e) => {
                warn!("Failed to compile {} selector '{}': {}", field, selector_str, e);
                errors.push(format!("'{selector_str}': {e}"));
            }
        }
    }

    if selectors.is_empty() {
        return Err(ParsingError::InvalidSelector {
            selector: field.to_string(),
            reason: if errors.is_empty() {
                "no selectors configured".to_string()
            } else {
                errors.join(", ")
            },
        });
    }

    if !errors.is_empty() {
        debug!("Some {} selectors failed to compile: {}", field, errors.join(", "));
    }

    Ok(selectors)
}

/// First descendant matched by the first selector that matches anything
pub(crate) fn select_first<'a>(scope: ElementRef<'a>, selectors: &[Selector]) -> Option<ElementRef<'a>> {
    selectors
        .iter()
        .find_map(|selector| scope.select(selector).next())
}

/// All descendants matched by the first selector that matches anything
pub(crate) fn select_all<'a>(scope: ElementRef<'a>, selectors: &[Selector]) -> Vec<ElementRef<'a>> {
    selectors
        .iter()
        .map(|selector| scope.select(selector).collect::<Vec<_>>())
        .find(|elements| !elements.is_empty())
        .unwrap_or_default()
}

/// Text content with every text node trimmed, concatenated without separator
pub(crate) fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}
