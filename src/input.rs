//! Input list normalization
//!
//! Connector inputs (URLs, search queries) arrive as a single configuration
//! string. They may be written as a JSON array, a JSON string, a
//! comma-separated list, a newline-separated list, or a single bare value.

use crate::error::{Error, Result};
use serde_json::Value;

/// Normalize a raw configuration string into an ordered list of items.
///
/// Items are trimmed and empty items dropped. Order and duplicates are kept so
/// that every item maps 1:1 onto the results requested for it.
pub fn normalize(raw: &str) -> Result<Vec<String>> {
    if raw.trim().is_empty() {
        return Err(Error::config("input list is empty"));
    }

    let items = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(elements)) => elements.iter().filter_map(coerce).collect(),
        Ok(Value::Null) => return Err(Error::config("input list is null")),
        Ok(Value::Object(_)) => {
            return Err(Error::config(
                "input must be a list, a string or a separated list, not a JSON object",
            ))
        }
        Ok(scalar) => coerce(&scalar).into_iter().collect(),
        Err(_) => split(raw),
    };

    if items.is_empty() {
        return Err(Error::config("input list has no usable items"));
    }
    Ok(items)
}

fn split(raw: &str) -> Vec<String> {
    let separator = if raw.contains(',') {
        ','
    } else if raw.contains('\n') {
        '\n'
    } else {
        return vec![raw.trim().to_string()];
    };

    raw.split(separator)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// Coerce one JSON element into an item; nulls and blanks are dropped
fn coerce(value: &Value) -> Option<String> {
    let item = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    (!item.is_empty()).then_some(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(r#"["https://a.com", "https://b.com"]"#, &["https://a.com", "https://b.com"] ; "json array")]
    #[test_case(r#"[" q1 ", "", "q2"]"#, &["q1", "q2"] ; "json array trimmed")]
    #[test_case(r#"[1, true, null, "x"]"#, &["1", "true", "x"] ; "json array coerced")]
    #[test_case(r#""https://a.com""#, &["https://a.com"] ; "json string")]
    #[test_case("https://a.com,https://b.com", &["https://a.com", "https://b.com"] ; "comma separated")]
    #[test_case(" a , ,b,, c ", &["a", "b", "c"] ; "comma separated with blanks")]
    #[test_case("a\nb\r\n\nc", &["a", "b", "c"] ; "newline separated")]
    #[test_case("  pizza near me ", &["pizza near me"] ; "single value")]
    #[test_case("a,a", &["a", "a"] ; "duplicates kept")]
    #[test_case("42", &["42"] ; "json number")]
    fn test_normalize(raw: &str, expected: &[&str]) {
        assert_eq!(normalize(raw).unwrap(), expected);
    }

    #[test_case("" ; "empty")]
    #[test_case("   \n " ; "whitespace")]
    #[test_case(",,," ; "only commas")]
    #[test_case("[]" ; "empty json array")]
    #[test_case("null" ; "json null")]
    #[test_case(r#"{"url": "https://a.com"}"# ; "json object")]
    fn test_normalize_rejects(raw: &str) {
        assert!(matches!(normalize(raw), Err(Error::Config { .. })));
    }

    #[test]
    fn test_malformed_json_falls_back_to_commas() {
        let items = normalize(r#"["https://a.com", "https://b.com""#).unwrap();
        assert_eq!(items, vec![r#"["https://a.com""#, r#""https://b.com""#]);
    }
}
