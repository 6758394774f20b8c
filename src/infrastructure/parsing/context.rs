//! Parsing context for HTML extraction

/// Context for one listing page
#[derive(Debug, Clone)]
pub struct ListingParseContext {
    /// Page number being parsed, used for diagnostics
    pub page: u32,

    /// Articles must be priced strictly above this
    pub min_price: i64,
}

impl ListingParseContext {
    pub fn new(page: u32, min_price: i64) -> Self {
        Self { page, min_price }
    }
}

/// Context for one detail page
#[derive(Debug, Clone)]
pub struct DetailParseContext {
    /// Detail URL being parsed
    pub url: String,

    /// Listing page the record came from
    pub source_page: u32,
}

impl DetailParseContext {
    pub fn new(url: impl Into<String>, source_page: u32) -> Self {
        Self {
            url: url.into(),
            source_page,
        }
    }
}
