//! Listing page parser
//!
//! Finds the article container of a listing page and turns every article
//! priced above the threshold into a [`CandidateRecord`]. Failures are
//! isolated per article: a malformed article is reported and skipped while
//! its siblings are still extracted.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use super::config::ListingSelectors;
use super::context::ListingParseContext;
use super::{compile_selectors, select_all, select_first, stripped_text, ContextualParser, ParsingError, ParsingResult};
use crate::domain::{CandidateRecord, SkipEvent, SkipReason, SkipUnit, UNKNOWN};

/// Candidates of one listing page plus the articles that were skipped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingExtraction {
    pub candidates: Vec<CandidateRecord>,
    pub skips: Vec<SkipEvent>,
    /// False when the page had no article container
    pub container_found: bool,
}

enum ArticleOutcome {
    Candidate(CandidateRecord),
    NoPrice,
    BelowThreshold(i64),
}

/// Parser for extracting candidate records from listing pages
pub struct ListingExtractor {
    container_selectors: Vec<Selector>,
    article_selectors: Vec<Selector>,
    price_selectors: Vec<Selector>,
    title_selectors: Vec<Selector>,
    link_selectors: Vec<Selector>,
    image_selectors: Vec<Selector>,
    currency_suffix: String,
    thousands_separator: String,
    /// Base that relative article links are joined onto
    base_url: Url,
}

impl ListingExtractor {
    /// Create a listing parser with default selectors
    pub fn new(base_url: &str) -> ParsingResult<Self> {
        Self::with_config(&ListingSelectors::default(), base_url)
    }

    /// Create parser with custom selector configuration
    pub fn with_config(selectors: &ListingSelectors, base_url: &str) -> ParsingResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ParsingError::UrlResolutionFailed {
            url: base_url.to_string(),
            reason: format!("Invalid base URL: {e}"),
        })?;

        Ok(Self {
            container_selectors: compile_selectors("container", &selectors.container)?,
            article_selectors: compile_selectors("article", &selectors.article)?,
            price_selectors: compile_selectors("price", &selectors.price)?,
            title_selectors: compile_selectors("title", &selectors.title)?,
            link_selectors: compile_selectors("link", &selectors.link)?,
            image_selectors: compile_selectors("image", &selectors.image)?,
            currency_suffix: selectors.currency_suffix.clone(),
            thousands_separator: selectors.thousands_separator.clone(),
            base_url,
        })
    }

    /// Extract every candidate priced strictly above `context.min_price`
    pub fn extract_listings(&self, html: &Html, context: &ListingParseContext) -> ListingExtraction {
        let Some(container) = select_first(html.root_element(), &self.container_selectors) else {
            debug!("No article container on page {}", context.page);
            return ListingExtraction::default();
        };

        let mut extraction = ListingExtraction {
            container_found: true,
            ..ListingExtraction::default()
        };

        for (index, article) in select_all(container, &self.article_selectors).into_iter().enumerate() {
            let unit = SkipUnit::Article {
                page: context.page,
                index,
            };
            match self.extract_article(article, context.min_price) {
                Ok(ArticleOutcome::Candidate(candidate)) => extraction.candidates.push(candidate),
                Ok(ArticleOutcome::NoPrice) => {
                    extraction.skips.push(SkipEvent::new(unit, SkipReason::PriceMissing));
                }
                Ok(ArticleOutcome::BelowThreshold(price)) => {
                    extraction.skips.push(
                        SkipEvent::new(unit, SkipReason::PriceBelowThreshold).with_detail(price.to_string()),
                    );
                }
                Err(e) => {
                    extraction
                        .skips
                        .push(SkipEvent::new(unit, e.article_skip_reason()).with_detail(e.to_string()));
                }
            }
        }

        debug!(
            "Extracted {} candidates from page {} ({} skipped)",
            extraction.candidates.len(),
            context.page,
            extraction.skips.len()
        );
        extraction
    }

    fn extract_article(&self, article: ElementRef<'_>, min_price: i64) -> ParsingResult<ArticleOutcome> {
        let Some(price_element) = select_first(article, &self.price_selectors) else {
            return Ok(ArticleOutcome::NoPrice);
        };
        let price = self.normalize_price(&stripped_text(price_element))?;
        if price <= min_price {
            return Ok(ArticleOutcome::BelowThreshold(price));
        }

        let title = select_first(article, &self.title_selectors)
            .map_or_else(|| UNKNOWN.to_string(), stripped_text);

        let link = match select_first(article, &self.link_selectors) {
            Some(anchor) => {
                let href = anchor
                    .value()
                    .attr("href")
                    .ok_or_else(|| ParsingError::required_field_missing("href", Some("listing link")))?;
                self.resolve_link(href)?
            }
            None => UNKNOWN.to_string(),
        };

        let image_url = match select_first(article, &self.image_selectors) {
            Some(image) => image
                .value()
                .attr("src")
                .ok_or_else(|| ParsingError::required_field_missing("src", Some("listing image")))?
                .to_string(),
            None => UNKNOWN.to_string(),
        };

        Ok(ArticleOutcome::Candidate(CandidateRecord {
            title,
            price,
            link,
            image_url,
        }))
    }

    /// Strip currency and separators, parse as a number and truncate to whole units
    pub fn normalize_price(&self, text: &str) -> ParsingResult<i64> {
        let mut cleaned = text.to_string();
        if !self.currency_suffix.is_empty() {
            cleaned = cleaned.replace(&self.currency_suffix, "");
        }
        if !self.thousands_separator.is_empty() {
            cleaned = cleaned.replace(&self.thousands_separator, "");
        }
        let cleaned = cleaned.trim();

        let value: f64 = cleaned.parse().map_err(|_| ParsingError::invalid_price(cleaned))?;
        // i64::MAX is not representable as f64; 2^63 is the first value out of range
        if !value.is_finite() || value.abs() >= 9_223_372_036_854_775_808.0 {
            return Err(ParsingError::invalid_price(cleaned));
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(value.trunc() as i64)
    }

    /// Resolve an href against the base URL; absolute links pass through
    pub fn resolve_link(&self, href: &str) -> ParsingResult<String> {
        self.base_url
            .join(href)
            .map(String::from)
            .map_err(|e| ParsingError::UrlResolutionFailed {
                url: href.to_string(),
                reason: format!("Failed to join onto {}: {e}", self.base_url),
            })
    }
}

impl ContextualParser for ListingExtractor {
    type Output = ListingExtraction;
    type Context = ListingParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> Self::Output {
        self.extract_listings(html, context)
    }
}
