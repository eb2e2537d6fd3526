//! Article payload normalization.
//!
//! Incoming bodies are arbitrary JSON from an admin UI; normalization is
//! fail-soft. A malformed body degrades to "no fields supplied" and then
//! fails required-field validation, instead of surfacing a parse error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A normalized article record, ready to upsert keyed on `slug`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticlePayload {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub body: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub minutes: f64,
}

impl ArticlePayload {
    /// Parse raw request bytes and normalize into a payload.
    ///
    /// Bytes that are not valid JSON normalize as if an empty object had
    /// been sent.
    pub fn from_request_body(bytes: &[u8]) -> Self {
        let value: Value =
            serde_json::from_slice(bytes).unwrap_or(Value::Object(Default::default()));
        Self::from_json(&value)
    }

    /// Normalize an arbitrary JSON value into a payload.
    ///
    /// Field rules:
    /// - `slug`, `title`: string, trimmed; anything else becomes `""`
    /// - `excerpt`, `body`: string; anything else becomes `""`
    /// - `category`: non-empty string or `None`
    /// - `tags`: the string elements of an array, else empty
    /// - `minutes`: finite non-negative number (numeric strings accepted),
    ///   else `0`
    pub fn from_json(value: &Value) -> Self {
        let text = |field: &str| {
            value
                .get(field)
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string()
        };

        let category = value
            .get("category")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(String::from);

        let tags = value
            .get("tags")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            slug: text("slug").trim().to_string(),
            title: text("title").trim().to_string(),
            excerpt: text("excerpt"),
            body: text("body"),
            category,
            tags,
            minutes: coerce_minutes(value.get("minutes")),
        }
    }

    /// Whether slug and title survived normalization non-empty.
    pub fn has_required_fields(&self) -> bool {
        !self.slug.is_empty() && !self.title.is_empty()
    }
}

/// Coerce a JSON value to a finite, non-negative reading-time number.
///
/// Numbers and numeric strings are accepted; everything else, along with
/// NaN, infinities, and negatives, coerces to 0.
fn coerce_minutes(value: Option<&Value>) -> f64 {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match n {
        Some(n) if n.is_finite() && n >= 0.0 => n,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_payload() {
        let payload = ArticlePayload::from_json(&json!({
            "slug": "  hello ",
            "title": " Hello ",
            "excerpt": "An intro",
            "body": "Lots of words",
            "category": "rust",
            "tags": ["a", "b"],
            "minutes": 7
        }));

        assert_eq!(payload.slug, "hello");
        assert_eq!(payload.title, "Hello");
        assert_eq!(payload.excerpt, "An intro");
        assert_eq!(payload.body, "Lots of words");
        assert_eq!(payload.category.as_deref(), Some("rust"));
        assert_eq!(payload.tags, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(payload.minutes, 7.0);
        assert!(payload.has_required_fields());
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let payload = ArticlePayload::from_json(&json!({
            "slug": "hello",
            "title": "Hello"
        }));

        assert_eq!(payload.excerpt, "");
        assert_eq!(payload.body, "");
        assert_eq!(payload.category, None);
        assert!(payload.tags.is_empty());
        assert_eq!(payload.minutes, 0.0);
    }

    #[test]
    fn test_malformed_json_degrades_to_empty_object() {
        let payload = ArticlePayload::from_request_body(b"{not json at all");
        assert_eq!(payload.slug, "");
        assert_eq!(payload.title, "");
        assert!(!payload.has_required_fields());
    }

    #[test]
    fn test_empty_body_degrades_to_empty_object() {
        let payload = ArticlePayload::from_request_body(b"");
        assert!(!payload.has_required_fields());
    }

    #[test]
    fn test_whitespace_only_slug_fails_validation() {
        let payload = ArticlePayload::from_json(&json!({
            "slug": "   ",
            "title": "Hello"
        }));
        assert!(!payload.has_required_fields());
    }

    #[test]
    fn test_empty_category_becomes_none() {
        let payload = ArticlePayload::from_json(&json!({
            "slug": "s", "title": "t", "category": ""
        }));
        assert_eq!(payload.category, None);
    }

    #[test]
    fn test_non_array_tags_become_empty() {
        let payload = ArticlePayload::from_json(&json!({
            "slug": "s", "title": "t", "tags": "not-an-array"
        }));
        assert!(payload.tags.is_empty());
    }

    #[test]
    fn test_non_string_tag_elements_are_dropped() {
        let payload = ArticlePayload::from_json(&json!({
            "slug": "s", "title": "t", "tags": ["a", 3, null, "b"]
        }));
        assert_eq!(payload.tags, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_tag_order_is_preserved() {
        let payload = ArticlePayload::from_json(&json!({
            "slug": "s", "title": "t", "tags": ["z", "a", "m"]
        }));
        assert_eq!(
            payload.tags,
            vec!["z".to_string(), "a".to_string(), "m".to_string()]
        );
    }

    #[test]
    fn test_minutes_coercions() {
        let minutes = |v: Value| {
            ArticlePayload::from_json(&json!({"slug": "s", "title": "t", "minutes": v})).minutes
        };

        assert_eq!(minutes(json!(5)), 5.0);
        assert_eq!(minutes(json!(2.5)), 2.5);
        assert_eq!(minutes(json!("8")), 8.0);
        assert_eq!(minutes(json!(" 8 ")), 8.0);
        assert_eq!(minutes(json!("eight")), 0.0);
        assert_eq!(minutes(json!(-3)), 0.0);
        assert_eq!(minutes(json!(null)), 0.0);
        assert_eq!(minutes(json!([1])), 0.0);
    }

    #[test]
    fn test_non_string_scalar_fields_become_empty() {
        let payload = ArticlePayload::from_json(&json!({
            "slug": 42, "title": true
        }));
        assert_eq!(payload.slug, "");
        assert_eq!(payload.title, "");
        assert!(!payload.has_required_fields());
    }

    #[test]
    fn test_serializes_with_expected_field_names() {
        let payload = ArticlePayload::from_json(&json!({"slug": "s", "title": "t"}));
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["slug"], "s");
        assert_eq!(json["title"], "t");
        assert_eq!(json["category"], Value::Null);
        assert_eq!(json["tags"], json!([]));
        assert_eq!(json["minutes"], json!(0.0));
    }
}
