//! Wire format helpers
//!
//! The backend evolved from a mock prototype to a real API and older
//! payloads are still around: ids arrive as numbers or strings, and the
//! category field as a bare string or a list. These deserializers accept
//! every shape the backend has ever produced.

use serde::{Deserialize, Deserializer};

/// Deserialize an id that may be a JSON number or string into a `String`.
pub(crate) fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n.to_string()),
        Raw::Text(s) => Ok(s),
    }
}

/// Deserialize a category field that may be a string, a list of strings,
/// or absent into a `Vec<String>`.
pub(crate) fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        One(String),
        Many(Vec<String>),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(Raw::One(s)) if s.is_empty() => Ok(Vec::new()),
        Some(Raw::One(s)) => Ok(vec![s]),
        Some(Raw::Many(list)) => Ok(list),
    }
}

/// Compare two ids the way the backend does: as trimmed strings.
///
/// Comment authors and session users can carry ids of different JSON
/// types, so ownership checks must normalize before comparing.
pub fn ids_match(a: &str, b: &str) -> bool {
    let a = a.trim();
    let b = b.trim();
    !a.is_empty() && a == b
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct IdHolder {
        #[serde(deserialize_with = "id_string")]
        id: String,
    }

    #[derive(Deserialize)]
    struct CategoryHolder {
        #[serde(default, deserialize_with = "string_list")]
        category: Vec<String>,
    }

    #[test]
    fn test_id_from_number() {
        let h: IdHolder = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(h.id, "42");
    }

    #[test]
    fn test_id_from_string() {
        let h: IdHolder = serde_json::from_str(r#"{"id": "42"}"#).unwrap();
        assert_eq!(h.id, "42");
    }

    #[test]
    fn test_category_from_string() {
        let h: CategoryHolder = serde_json::from_str(r#"{"category": "ai"}"#).unwrap();
        assert_eq!(h.category, vec!["ai"]);
    }

    #[test]
    fn test_category_from_list() {
        let h: CategoryHolder =
            serde_json::from_str(r#"{"category": ["ai", "finance"]}"#).unwrap();
        assert_eq!(h.category, vec!["ai", "finance"]);
    }

    #[test]
    fn test_category_absent_or_empty() {
        let h: CategoryHolder = serde_json::from_str(r#"{}"#).unwrap();
        assert!(h.category.is_empty());
        let h: CategoryHolder = serde_json::from_str(r#"{"category": ""}"#).unwrap();
        assert!(h.category.is_empty());
    }

    #[test]
    fn test_ids_match_normalizes() {
        assert!(ids_match(" 42 ", "42"));
        assert!(!ids_match("42", "7"));
        assert!(!ids_match("", ""));
    }
}
