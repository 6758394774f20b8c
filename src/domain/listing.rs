use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

/// Sentinel used for optional listing fields whose markup is missing
pub const UNKNOWN: &str = "Unknown";

/// Keys serialized from the explicit record fields; attributes never override them
const RESERVED_KEYS: [&str; 4] = ["title", "price", "link", "image_url"];

/// Listing entry that passed the price filter but has not been enriched yet
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, serde::Serialize)]
pub struct CandidateRecord {
    pub title: String,
    pub price: i64,
    pub link: String,
    pub image_url: String,
}

impl CandidateRecord {
    /// True when the listing carried a usable detail link
    pub fn has_link(&self) -> bool {
        self.link != UNKNOWN
    }

    /// Merge detail-page attributes and freeze the record
    pub fn enrich(self, attributes: BTreeMap<String, String>) -> ListingRecord {
        ListingRecord {
            title: self.title,
            price: self.price,
            link: self.link,
            image_url: self.image_url,
            attributes,
        }
    }

    /// Record without detail-page enrichment
    pub fn into_bare_record(self) -> ListingRecord {
        self.enrich(BTreeMap::new())
    }
}

/// Fully assembled listing.
///
/// Serializes as one flat JSON object: the explicit fields first, then every
/// attribute in key order. An attribute named like an explicit field is
/// dropped from the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRecord {
    title: String,
    price: i64,
    link: String,
    image_url: String,
    attributes: BTreeMap<String, String>,
}

impl ListingRecord {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn price(&self) -> i64 {
        self.price
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Attributes that survive serialization
    fn visible_attributes(&self) -> impl Iterator<Item = (&String, &String)> {
        self.attributes
            .iter()
            .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
    }
}

impl Serialize for ListingRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4 + self.visible_attributes().count()))?;
        map.serialize_entry("title", &self.title)?;
        map.serialize_entry("price", &self.price)?;
        map.serialize_entry("link", &self.link)?;
        map.serialize_entry("image_url", &self.image_url)?;
        for (key, value) in self.visible_attributes() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate() -> CandidateRecord {
        CandidateRecord {
            title: "Golf 7".to_string(),
            price: 15000,
            link: "https://www.tayara.tn/item/1".to_string(),
            image_url: "https://cdn.example/1.jpg".to_string(),
        }
    }

    #[test]
    fn serializes_flat_object_with_explicit_fields_first() {
        let mut attributes = BTreeMap::new();
        attributes.insert("Kilométrage".to_string(), "120000".to_string());
        attributes.insert("Boite".to_string(), "Manuelle".to_string());

        let json = serde_json::to_string(&candidate().enrich(attributes)).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Golf 7","price":15000,"link":"https://www.tayara.tn/item/1","image_url":"https://cdn.example/1.jpg","Boite":"Manuelle","Kilométrage":"120000"}"#
        );
    }

    #[test]
    fn explicit_fields_win_over_colliding_attributes() {
        let mut attributes = BTreeMap::new();
        attributes.insert("price".to_string(), "1".to_string());
        attributes.insert("title".to_string(), "spoofed".to_string());
        attributes.insert("Couleur".to_string(), "Noir".to_string());

        let record = candidate().enrich(attributes);
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["price"], 15000);
        assert_eq!(value["title"], "Golf 7");
        assert_eq!(value["Couleur"], "Noir");
        assert_eq!(value.as_object().unwrap().len(), 5);
    }

    #[test]
    fn bare_record_has_no_attributes() {
        let record = candidate().into_bare_record();
        assert!(record.attributes().is_empty());
        assert_eq!(record.price(), 15000);
    }

    #[test]
    fn unknown_link_is_not_followable() {
        let mut c = candidate();
        assert!(c.has_link());
        c.link = UNKNOWN.to_string();
        assert!(!c.has_link());
    }
}
