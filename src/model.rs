//! Response payload returned by the identification and search endpoints.
//!
//! The backend is loose about types: `error` fields may be strings or
//! booleans, optional collections may be missing or `null`. Decoding is
//! lenient and the accessors apply the page's truthiness rules.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Taxon value that is never displayed.
pub const UNKNOWN_TAXON: &str = "Unknown";

/// Top-level response of both endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadResult {
    /// Request-level failure reported by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,

    /// Species record
    #[serde(default, deserialize_with = "null_as_default")]
    pub species_data: SpeciesData,

    /// Supplementary images, first one doubles as the main image
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<Image>,
}

impl UploadResult {
    /// Parse a response body.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Request-level error text, if the backend reported one.
    pub fn error_text(&self) -> Option<String> {
        self.error.as_ref().and_then(truthy_text)
    }

    /// URL of the first image, unless the list is empty or that image failed.
    pub fn main_image_url(&self) -> Option<&str> {
        self.images
            .first()
            .filter(|image| !image.has_error())
            .map(|image| image.url.as_str())
    }
}

/// Species record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeciesData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub habitat: Option<String>,
    #[serde(default)]
    pub classification: Classification,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fun_facts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_sources: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl SpeciesData {
    /// Lookup error text, if the backend reported one.
    pub fn error_text(&self) -> Option<String> {
        self.error.as_ref().and_then(truthy_text)
    }

    /// Title, if present and non-empty.
    pub fn title(&self) -> Option<&str> {
        non_empty(self.title.as_deref())
    }

    pub fn description(&self) -> Option<&str> {
        non_empty(self.description.as_deref())
    }

    pub fn habitat(&self) -> Option<&str> {
        non_empty(self.habitat.as_deref())
    }

    /// Fun facts, empty when absent.
    pub fn fun_facts(&self) -> &[String] {
        self.fun_facts.as_deref().unwrap_or_default()
    }
}

/// One image from the image search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Image {
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb_url: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl Image {
    /// Whether the backend flagged this image as failed.
    pub fn has_error(&self) -> bool {
        self.error.as_ref().is_some_and(is_truthy)
    }

    /// Thumbnail URL, falling back to the full-size URL.
    pub fn display_url(&self) -> &str {
        non_empty(self.thumb_url.as_deref()).unwrap_or(&self.url)
    }

    pub fn description(&self) -> Option<&str> {
        non_empty(self.description.as_deref())
    }

    pub fn author(&self) -> &str {
        non_empty(self.author.as_deref()).unwrap_or("Unknown")
    }

    pub fn license(&self) -> Option<&str> {
        non_empty(self.license.as_deref())
    }
}

/// Taxonomic ranks in the order the backend sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification(Vec<(String, String)>);

impl Classification {
    pub fn new(ranks: Vec<(String, String)>) -> Self {
        Self(ranks)
    }

    /// All ranks, including unknown ones.
    pub fn ranks(&self) -> &[(String, String)] {
        &self.0
    }

    /// Ranks whose taxon is known, in order.
    pub fn known(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter(|(_, taxon)| taxon != UNKNOWN_TAXON)
            .map(|(rank, taxon)| (rank.as_str(), taxon.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Classification {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (rank, taxon) in &self.0 {
            map.serialize_entry(rank, taxon)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Classification {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ClassificationVisitor;

        impl<'de> Visitor<'de> for ClassificationVisitor {
            type Value = Classification;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of rank names to taxon names")
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Classification::default())
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut ranks = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((rank, taxon)) = map.next_entry::<String, Option<String>>()? {
                    if let Some(taxon) = taxon {
                        ranks.push((rank, taxon));
                    }
                }
                Ok(Classification(ranks))
            }
        }

        deserializer.deserialize_any(ClassificationVisitor)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Whether a JSON value counts as set (`null`, `false`, `0` and `""` do not).
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Display text of a truthy error value.
fn truthy_text(value: &Value) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    Some(match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_response() {
        let json = r#"{
            "species_data": {
                "title": "Panthera leo",
                "description": "A large cat.",
                "habitat": "Savanna",
                "classification": {
                    "kingdom": "Animalia",
                    "phylum": "Chordata",
                    "order": "Unknown",
                    "genus": "Panthera"
                },
                "fun_facts": ["Lions live in prides."],
                "data_sources": ["Wikipedia", "Wikispecies"]
            },
            "images": [
                { "url": "https://img/1.jpg", "thumb_url": "https://img/1_t.jpg",
                  "title": "Lion", "author": "Jane", "license": "CC BY-SA" }
            ]
        }"#;

        let result = UploadResult::from_json(json).unwrap();
        assert!(result.error_text().is_none());
        assert_eq!(result.species_data.title(), Some("Panthera leo"));
        assert_eq!(result.species_data.fun_facts().len(), 1);
        assert_eq!(result.images.len(), 1);
        assert_eq!(result.images[0].display_url(), "https://img/1_t.jpg");
        assert_eq!(result.images[0].license(), Some("CC BY-SA"));
        assert_eq!(result.main_image_url(), Some("https://img/1.jpg"));
    }

    #[test]
    fn test_classification_keeps_order_and_hides_unknown() {
        let json = r#"{ "classification": {
            "kingdom": "Plantae", "family": "Unknown", "genus": "Rosa", "species": null
        } }"#;
        let data: SpeciesData = serde_json::from_str(json).unwrap();

        assert_eq!(data.classification.ranks().len(), 3);
        let known: Vec<_> = data.classification.known().collect();
        assert_eq!(known, vec![("kingdom", "Plantae"), ("genus", "Rosa")]);

        let json = serde_json::to_string(&data.classification).unwrap();
        assert_eq!(json, r#"{"kingdom":"Plantae","family":"Unknown","genus":"Rosa"}"#);
    }

    #[test]
    fn test_error_truthiness() {
        let falsy = [
            Value::Null,
            Value::Bool(false),
            Value::from(0),
            Value::from(""),
        ];
        for value in falsy {
            let image = Image {
                error: Some(value.clone()),
                ..Default::default()
            };
            assert!(!image.has_error(), "{value} should not count as an error");
        }

        let image = Image {
            error: Some(Value::Bool(true)),
            ..Default::default()
        };
        assert!(image.has_error());

        let data = SpeciesData {
            error: Some(Value::from("Species not found")),
            ..Default::default()
        };
        assert_eq!(data.error_text().as_deref(), Some("Species not found"));

        let data = SpeciesData {
            error: Some(Value::Bool(true)),
            ..Default::default()
        };
        assert_eq!(data.error_text().as_deref(), Some("true"));
    }

    #[test]
    fn test_missing_and_null_collections() {
        let result = UploadResult::from_json(r#"{ "error": "boom" }"#).unwrap();
        assert_eq!(result.error_text().as_deref(), Some("boom"));
        assert!(result.images.is_empty());
        assert!(result.species_data.classification.is_empty());

        let result =
            UploadResult::from_json(r#"{ "species_data": null, "images": null }"#).unwrap();
        assert!(result.images.is_empty());
        assert!(result.species_data.title().is_none());
        assert!(result.main_image_url().is_none());
    }

    #[test]
    fn test_main_image_skips_failed_first_image() {
        let result = UploadResult::from_json(
            r#"{ "images": [
                { "url": "a.jpg", "title": "a", "error": true },
                { "url": "b.jpg", "title": "b" }
            ] }"#,
        )
        .unwrap();
        assert!(result.main_image_url().is_none());
    }

    #[test]
    fn test_image_fallbacks() {
        let image = Image {
            url: "full.jpg".to_string(),
            thumb_url: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(image.display_url(), "full.jpg");
        assert_eq!(image.author(), "Unknown");
        assert!(image.description().is_none());
    }
}
