//! Pull a JSON object out of free-form model output
//!
//! Models asked for "strict JSON" still wrap answers in prose or markdown
//! fences. Both AI consumers take the first balanced `{ ... }` in the text.

use serde_json::Value;

/// Slice of `text` holding the first balanced JSON object, if any
///
/// Braces inside string literals (including escaped quotes) are ignored.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse the first balanced JSON object in `text`
pub fn parse_json_object(text: &str) -> Option<Value> {
    let raw = extract_json_object(text)?;
    serde_json::from_str::<Value>(raw).ok().filter(Value::is_object)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_object() {
        let text = r#"{"intent": "x", "concepts": []}"#;
        assert_eq!(extract_json_object(text), Some(text));
    }

    #[test]
    fn test_extract_from_prose_and_fences() {
        let text = "Sure! Here you go:\n```json\n{\"a\": {\"b\": 1}}\n```\nAnything else?";
        assert_eq!(extract_json_object(text), Some("{\"a\": {\"b\": 1}}"));
    }

    #[test]
    fn test_braces_inside_strings_ignored() {
        let text = r#"{"reasoning": "uses } and { freely \" still quoted }", "ok": true} trailing"#;
        let value = parse_json_object(text).unwrap();
        assert_eq!(value["ok"], true);
    }

    #[test]
    fn test_takes_first_object() {
        let text = r#"{"first": 1} {"second": 2}"#;
        assert_eq!(parse_json_object(text).unwrap()["first"], 1);
    }

    #[test]
    fn test_unbalanced_or_missing() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object(r#"{"open": [1, 2"#), None);
        assert!(parse_json_object("{not json}").is_none());
    }
}
