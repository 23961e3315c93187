//! Catalog entries as served by the template source.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Line count assumed when an entry does not declare a usable one.
pub const DEFAULT_LINE_COUNT: usize = 2;

/// Metadata for one symbolic template.
///
/// Fields the crate does not interpret are kept in `extra` so a cached
/// catalog round-trips without losing information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// URL of the blank background image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blank: Option<String>,

    /// Declared number of text lines; kept raw because sources disagree on
    /// its type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines: Option<Value>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<CatalogExample>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Example usage attached to a catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogExample {
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl CatalogEntry {
    /// Create a minimal entry.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            blank: None,
            lines: None,
            keywords: Vec::new(),
            example: None,
            extra: Map::new(),
        }
    }

    /// Set the blank image URL.
    pub fn with_blank(mut self, blank: impl Into<String>) -> Self {
        self.blank = Some(blank.into());
        self
    }

    /// Set the declared line count.
    pub fn with_lines(mut self, lines: impl Into<Value>) -> Self {
        self.lines = Some(lines.into());
        self
    }

    /// Set the search keywords.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Set the example text lines.
    pub fn with_example<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.example = Some(CatalogExample {
            text: lines.into_iter().map(Into::into).collect(),
            extra: Map::new(),
        });
        self
    }

    /// Display name, falling back to the ID.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Example text lines, if any.
    pub fn example_lines(&self) -> &[String] {
        self.example.as_ref().map(|e| e.text.as_slice()).unwrap_or(&[])
    }

    /// Number of text slots this template declares.
    ///
    /// Integers, integral strings and floats (truncated) are accepted and
    /// clamped to at least 1. Anything else yields [`DEFAULT_LINE_COUNT`].
    pub fn line_count(&self) -> usize {
        let declared = match &self.lines {
            Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
            Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        match declared {
            Some(n) => n.max(1) as usize,
            None => DEFAULT_LINE_COUNT,
        }
    }

    /// Case-insensitive substring match over ID, name and keywords.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        let searchable = format!(
            "{} {} {}",
            self.id,
            self.name.as_deref().unwrap_or(""),
            self.keywords.join(" ")
        )
        .to_lowercase();
        searchable.contains(&query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_memegen_listing_item() {
        let entry: CatalogEntry = serde_json::from_value(json!({
            "id": "buzz",
            "name": "X, X Everywhere",
            "lines": 2,
            "overlays": 0,
            "styles": [],
            "blank": "https://api.memegen.link/images/buzz.png",
            "example": {
                "text": ["memes", "memes everywhere"],
                "url": "https://api.memegen.link/images/buzz/memes/memes_everywhere.png"
            },
            "source": "http://knowyourmeme.com/memes/x-x-everywhere",
            "keywords": ["toy story"],
            "_self": "https://api.memegen.link/templates/buzz"
        }))
        .unwrap();

        assert_eq!(entry.id, "buzz");
        assert_eq!(entry.display_name(), "X, X Everywhere");
        assert_eq!(entry.line_count(), 2);
        assert_eq!(entry.example_lines(), ["memes", "memes everywhere"]);
        assert_eq!(entry.keywords, vec!["toy story"]);
        assert!(entry.extra.contains_key("_self"));
    }

    #[test]
    fn round_trip_keeps_unknown_fields() {
        let raw = json!({
            "id": "drake",
            "name": "Drakeposting",
            "overlays": 0,
            "example": {"text": ["a", "b"], "url": "https://x"}
        });
        let entry: CatalogEntry = serde_json::from_value(raw.clone()).unwrap();
        let back = serde_json::to_value(&entry).unwrap();

        assert_eq!(back["overlays"], 0);
        assert_eq!(back["example"]["url"], "https://x");
    }

    #[test]
    fn tolerates_nulls_and_missing_fields() {
        let entry: CatalogEntry =
            serde_json::from_value(json!({"id": "x", "keywords": null})).unwrap();
        assert!(entry.keywords.is_empty());
        assert_eq!(entry.display_name(), "x");
        assert!(entry.example_lines().is_empty());
        assert_eq!(entry.line_count(), DEFAULT_LINE_COUNT);
    }

    #[test]
    fn line_count_accepts_strings_and_floats() {
        assert_eq!(CatalogEntry::new("a", "a").with_lines("4").line_count(), 4);
        assert_eq!(CatalogEntry::new("a", "a").with_lines(3.7).line_count(), 3);
    }

    #[test]
    fn line_count_clamps_to_one() {
        assert_eq!(CatalogEntry::new("a", "a").with_lines(0).line_count(), 1);
        assert_eq!(CatalogEntry::new("a", "a").with_lines(-3).line_count(), 1);
    }

    #[test]
    fn line_count_defaults_when_unparseable() {
        let entry = CatalogEntry::new("a", "a").with_lines("many");
        assert_eq!(entry.line_count(), DEFAULT_LINE_COUNT);
        let entry = CatalogEntry::new("a", "a").with_lines(json!([1, 2]));
        assert_eq!(entry.line_count(), DEFAULT_LINE_COUNT);
    }

    #[test]
    fn matches_id_name_and_keywords() {
        let entry = CatalogEntry::new("doge", "Doge").with_keywords(["Shiba", "wow"]);
        assert!(entry.matches("DOG"));
        assert!(entry.matches("shiba"));
        assert!(entry.matches("wow"));
        assert!(!entry.matches("cat"));
    }
}
