//! # Record Validation
//!
//! Coerces the extracted payload into [`ArticleRecord`]s. Records are repaired
//! rather than rejected wherever a sensible default exists; only a record
//! without a usable title is dropped.

use crate::{
    constants::PLACEHOLDER_DESCRIPTION,
    errors::ValidationError,
    types::{ArticleList, ArticleRecord},
};
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

/// Keys accepted for the article link, in order of preference.
const URL_KEYS: &[&str] = &["url", "link"];

/// Keys accepted for the image link, in order of preference.
const IMAGE_KEYS: &[&str] = &["image", "imageUrl", "image_url", "urlToImage"];

/// Parses `payload` and normalizes every element into an [`ArticleRecord`].
///
/// `default_source` fills a missing `source`. At most `max_records` records are
/// returned. An unparseable payload, a non-array, an empty array, or an array
/// in which no element has a title are all failures.
pub fn validate_records(
    payload: &str,
    default_source: &str,
    max_records: usize,
) -> Result<ArticleList, ValidationError> {
    let value: Value = serde_json::from_str(payload)?;
    let elements = match value {
        Value::Array(elements) => elements,
        _ => return Err(ValidationError::NotAnArray),
    };
    if elements.is_empty() {
        return Err(ValidationError::EmptyArray);
    }

    let total = elements.len();
    let records: Vec<ArticleRecord> = elements
        .iter()
        .filter_map(|element| coerce_record(element, default_source))
        .take(max_records)
        .collect();

    if records.len() < total.min(max_records) {
        debug!(
            total,
            kept = records.len(),
            "Dropped elements without a usable title"
        );
    }

    ArticleList::new(records).ok_or(ValidationError::NoUsableRecords)
}

/// Builds one record from a JSON element, or `None` if it has no title.
fn coerce_record(element: &Value, default_source: &str) -> Option<ArticleRecord> {
    let object = element.as_object()?;
    let title = non_blank(object, "title")?;

    Some(ArticleRecord {
        title,
        source: non_blank(object, "source").unwrap_or_else(|| default_source.to_string()),
        description: non_blank(object, "description")
            .unwrap_or_else(|| PLACEHOLDER_DESCRIPTION.to_string()),
        url: first_link(object, URL_KEYS),
        image_url: first_link(object, IMAGE_KEYS),
    })
}

/// The trimmed string under `key`, if it is a non-blank string.
fn non_blank(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// The first value under `keys` that is an absolute http(s) URL.
fn first_link(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| non_blank(object, key))
        .find(|candidate| {
            Url::parse(candidate)
                .map(|url| matches!(url.scheme(), "http" | "https"))
                .unwrap_or(false)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_records_are_kept_verbatim() {
        let payload = r#"[
            {"title": "Rupee gains", "source": "Mint", "description": "The rupee rose.", "url": "https://livemint.com/a", "image": "https://img.livemint.com/a.jpg"}
        ]"#;
        let list = validate_records(payload, "The Economic Times", 5).unwrap();
        let record = &list.as_slice()[0];
        assert_eq!(record.title, "Rupee gains");
        assert_eq!(record.source, "Mint");
        assert_eq!(record.description, "The rupee rose.");
        assert_eq!(record.url.as_deref(), Some("https://livemint.com/a"));
        assert_eq!(record.image_url.as_deref(), Some("https://img.livemint.com/a.jpg"));
    }

    #[test]
    fn missing_source_and_description_get_defaults() {
        let list = validate_records(r#"[{"title": "Only a title"}]"#, "Vogue", 5).unwrap();
        let record = &list.as_slice()[0];
        assert_eq!(record.source, "Vogue");
        assert_eq!(record.description, PLACEHOLDER_DESCRIPTION);
    }

    #[test]
    fn blank_fields_count_as_missing() {
        let payload = r#"[{"title": "  T  ", "source": " ", "description": ""}]"#;
        let list = validate_records(payload, "News", 5).unwrap();
        let record = &list.as_slice()[0];
        assert_eq!(record.title, "T");
        assert_eq!(record.source, "News");
        assert_eq!(record.description, PLACEHOLDER_DESCRIPTION);
    }

    #[test]
    fn elements_without_title_are_dropped() {
        let payload = r#"[
            {"source": "BBC", "description": "No title"},
            {"title": 42},
            "just a string",
            {"title": "Kept"}
        ]"#;
        let list = validate_records(payload, "News", 5).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.as_slice()[0].title, "Kept");
    }

    #[test]
    fn unsafe_or_relative_links_are_discarded() {
        let payload = r#"[{"title": "T", "url": "javascript:alert(1)", "link": "https://ok.example/x", "image": "/relative.png"}]"#;
        let list = validate_records(payload, "News", 5).unwrap();
        let record = &list.as_slice()[0];
        assert_eq!(record.url.as_deref(), Some("https://ok.example/x"));
        assert_eq!(record.image_url, None);
    }

    #[test]
    fn image_aliases_are_accepted() {
        let payload = r#"[{"title": "T", "urlToImage": "http://img.example/a.png"}]"#;
        let list = validate_records(payload, "News", 5).unwrap();
        assert_eq!(
            list.as_slice()[0].image_url.as_deref(),
            Some("http://img.example/a.png")
        );
    }

    #[test]
    fn output_is_truncated_to_cap() {
        let payload = serde_json::to_string(
            &(0..10)
                .map(|i| serde_json::json!({ "title": format!("Headline {i}") }))
                .collect::<Vec<_>>(),
        )
        .unwrap();
        let list = validate_records(&payload, "News", 6).unwrap();
        assert_eq!(list.len(), 6);
        assert_eq!(list.as_slice()[5].title, "Headline 5");
    }

    #[test]
    fn invalid_json_is_a_parse_failure() {
        assert!(matches!(
            validate_records("[invalid json]", "News", 5),
            Err(ValidationError::Parse(_))
        ));
    }

    #[test]
    fn object_payload_is_rejected() {
        assert!(matches!(
            validate_records(r#"{"title": "A"}"#, "News", 5),
            Err(ValidationError::NotAnArray)
        ));
    }

    #[test]
    fn empty_array_is_a_failure() {
        assert!(matches!(
            validate_records("[]", "News", 5),
            Err(ValidationError::EmptyArray)
        ));
    }

    #[test]
    fn array_without_any_title_is_a_failure() {
        assert!(matches!(
            validate_records(r#"[{"source": "BBC"}, {"title": ""}]"#, "News", 5),
            Err(ValidationError::NoUsableRecords)
        ));
    }
}
