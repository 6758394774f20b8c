//! Detail page parser
//!
//! Scrapes the key/value criteria list of a detail page into an attribute map.

use std::collections::BTreeMap;

use scraper::{Html, Selector};
use tracing::debug;

use super::config::DetailSelectors;
use super::context::DetailParseContext;
use super::{compile_selectors, select_all, select_first, stripped_text, ContextualParser, ParsingResult};

/// Attributes scraped from one detail page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailExtraction {
    pub attributes: BTreeMap<String, String>,
    /// False when the page had no criteria list
    pub criteria_found: bool,
}

/// Parser for the criteria list of detail pages
pub struct DetailExtractor {
    criteria_list_selectors: Vec<Selector>,
    criteria_item_selectors: Vec<Selector>,
    key_selectors: Vec<Selector>,
    value_selectors: Vec<Selector>,
}

impl DetailExtractor {
    /// Create a detail parser with default selectors
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&DetailSelectors::default())
    }

    pub fn with_config(selectors: &DetailSelectors) -> ParsingResult<Self> {
        Ok(Self {
            criteria_list_selectors: compile_selectors("criteria_list", &selectors.criteria_list)?,
            criteria_item_selectors: compile_selectors("criteria_item", &selectors.criteria_item)?,
            key_selectors: compile_selectors("key", &selectors.key)?,
            value_selectors: compile_selectors("value", &selectors.value)?,
        })
    }

    /// Collect key/value criteria; a repeated key keeps its last value
    pub fn extract_details(&self, html: &Html) -> DetailExtraction {
        let Some(list) = select_first(html.root_element(), &self.criteria_list_selectors) else {
            return DetailExtraction::default();
        };

        let mut attributes = BTreeMap::new();
        for item in select_all(list, &self.criteria_item_selectors) {
            let key = select_first(item, &self.key_selectors);
            let value = select_first(item, &self.value_selectors);
            if let (Some(key), Some(value)) = (key, value) {
                attributes.insert(stripped_text(key), stripped_text(value));
            }
        }

        DetailExtraction {
            attributes,
            criteria_found: true,
        }
    }
}

impl ContextualParser for DetailExtractor {
    type Output = DetailExtraction;
    type Context = DetailParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> Self::Output {
        let extraction = self.extract_details(html);
        debug!(
            "Extracted {} attributes from {} (page {})",
            extraction.attributes.len(),
            context.url,
            context.source_page
        );
        extraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::parsing::ParsingError;
    use crate::test_utils::detail_page;

    fn extract(body: &str) -> ParsingResult<DetailExtraction> {
        DetailExtractor::new()
            .unwrap()
            .parse_str(body, &DetailParseContext::new("https://www.tayara.tn/item/1", 1))
    }

    #[test]
    fn criteria_become_attributes() {
        let page = detail_page(&[("Kilométrage", "120000"), ("Boite", "Manuelle"), ("Carburant", "Diesel")]);
        let extraction = extract(&page).unwrap();

        assert!(extraction.criteria_found);
        assert_eq!(extraction.attributes.len(), 3);
        assert_eq!(extraction.attributes["Kilométrage"], "120000");
        assert_eq!(extraction.attributes["Carburant"], "Diesel");
    }

    #[test]
    fn repeated_key_keeps_last_value() {
        let page = detail_page(&[("Couleur", "Rouge"), ("Couleur", "Noir")]);
        let extraction = extract(&page).unwrap();
        assert_eq!(extraction.attributes.len(), 1);
        assert_eq!(extraction.attributes["Couleur"], "Noir");
    }

    #[test]
    fn item_without_value_contributes_nothing() {
        let page = r#"<html><body><ul class="grid gap-3 grid-cols-12">
            <li class="col-span-6 lg:col-span-3"><span class="text-gray-600/80">Marque</span></li>
            <li class="col-span-6 lg:col-span-3"><span class="text-gray-600/80">Modèle</span><span class="text-gray-700/80">Golf</span></li>
        </ul></body></html>"#;
        let extraction = extract(page).unwrap();
        assert_eq!(extraction.attributes.len(), 1);
        assert_eq!(extraction.attributes["Modèle"], "Golf");
    }

    #[test]
    fn missing_list_yields_empty_mapping() {
        let extraction = extract("<html><body><p>Annonce expirée</p></body></html>").unwrap();
        assert!(!extraction.criteria_found);
        assert!(extraction.attributes.is_empty());
    }

    #[test]
    fn empty_document_is_an_error() {
        assert_eq!(extract("").unwrap_err(), ParsingError::EmptyDocument);
    }
}
