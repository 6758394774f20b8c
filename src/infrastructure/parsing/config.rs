//! Parsing configuration for HTML extraction
//!
//! Centralized configuration for CSS selectors. Every field is a list of
//! fallbacks tried in order; the first selector that matches wins.

use serde::{Deserialize, Serialize};

/// Main parsing configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ParsingConfig {
    /// Listing page selectors
    pub listing_selectors: ListingSelectors,

    /// Detail page selectors
    pub detail_selectors: DetailSelectors,
}

/// CSS selectors for listing pages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSelectors {
    /// Container holding every article of the page
    pub container: Vec<String>,

    /// Article entries, searched inside the container
    pub article: Vec<String>,

    /// Price element inside an article
    pub price: Vec<String>,

    /// Title element inside an article
    pub title: Vec<String>,

    /// Anchor carrying the detail page href
    pub link: Vec<String>,

    /// Image carrying the thumbnail src
    pub image: Vec<String>,

    /// Currency suffix stripped from price text
    pub currency_suffix: String,

    /// Thousands separator stripped from price text
    pub thousands_separator: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            container: vec![
                r#"div[class="flex flex-wrap justify-evenly lg:justify-around xl:justify-center mt-10 mb-4 gap-y-5 gap-x-0 lg:gap-x-4 xl:gap-x-4"]"#.to_string(),
            ],
            article: vec!["article.mx-0".to_string()],
            price: vec![
                r#"data[class="font-bold font-arabic text-red-600 undefined"]"#.to_string(),
            ],
            title: vec![
                r#"h2[class="card-title font-arabic text-sm font-medium leading-5 text-gray-800 max-w-min min-w-full line-clamp-2 my-2"]"#.to_string(),
            ],
            link: vec!["a".to_string()],
            image: vec!["img".to_string()],
            currency_suffix: "DT".to_string(),
            thousands_separator: ",".to_string(),
        }
    }
}

/// CSS selectors for detail pages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailSelectors {
    /// List container of key/value criteria
    pub criteria_list: Vec<String>,

    /// One criterion inside the list
    pub criteria_item: Vec<String>,

    /// Criterion name inside an item
    pub key: Vec<String>,

    /// Criterion value inside an item
    pub value: Vec<String>,
}

impl Default for DetailSelectors {
    fn default() -> Self {
        Self {
            criteria_list: vec![r#"ul[class="grid gap-3 grid-cols-12"]"#.to_string()],
            criteria_item: vec![r#"li[class="col-span-6 lg:col-span-3"]"#.to_string()],
            key: vec![r#"span[class~="text-gray-600/80"]"#.to_string()],
            value: vec![r#"span[class~="text-gray-700/80"]"#.to_string()],
        }
    }
}
