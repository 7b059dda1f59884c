//! Recover named sections from a model's free-form reply.
//!
//! Two attempts, in order: a strict JSON parse of the (de-fenced) reply, then
//! a per-key pattern search over the raw text. The result is all-or-nothing:
//! every requested key with a value, or `None`.

use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Section key to section content.
pub type Sections = BTreeMap<String, String>;

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?i:json)?").expect("valid regex"));

/// Extract exactly `keys` from `raw`, or `None` if any key is unrecoverable.
pub fn extract(raw: &str, keys: &[String]) -> Option<Sections> {
    if let Some(sections) = extract_strict(raw, keys) {
        return Some(sections);
    }
    tracing::debug!("Strict JSON parse incomplete, falling back to key search");
    extract_fallback(raw, keys)
}

/// Strict stage: the whole reply (minus code fences) is one JSON object.
fn extract_strict(raw: &str, keys: &[String]) -> Option<Sections> {
    let cleaned = CODE_FENCE.replace_all(raw, "");
    let object: Map<String, Value> = match serde_json::from_str(cleaned.trim()) {
        Ok(Value::Object(object)) => object,
        Ok(_) => return None,
        Err(e) => {
            tracing::debug!("Reply is not a JSON object: {e}");
            return None;
        }
    };

    keys.iter()
        .map(|key| {
            let value = match object.get(key)? {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), value))
        })
        .collect()
}

/// Fallback stage: look for `"key": "value"` pairs anywhere in the text.
fn extract_fallback(raw: &str, keys: &[String]) -> Option<Sections> {
    keys.iter()
        .map(|key| find_quoted_value(raw, key).map(|value| (key.clone(), value)))
        .collect()
}

fn find_quoted_value(raw: &str, key: &str) -> Option<String> {
    let pattern = format!(r#"(?s)"{}"\s*:\s*"((?:[^"\\]|\\.)*)""#, regex::escape(key));
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            tracing::warn!("Cannot build search pattern for key '{key}': {e}");
            return None;
        }
    };
    let value = re.captures(raw)?.get(1)?.as_str();
    Some(value.replace("\\\"", "\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structured::augment;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sections(pairs: &[(&str, &str)]) -> Sections {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_plain_json_object() {
        let raw = r#"{"summary": "ok", "advice": "none"}"#;
        assert_eq!(
            extract(raw, &keys(&["summary", "advice"])),
            Some(sections(&[("summary", "ok"), ("advice", "none")]))
        );
    }

    #[test]
    fn test_fenced_json_object() {
        let raw = "```json\n{\"summary\":\"ok\",\"advice\":\"none\"}\n```";
        assert_eq!(
            extract(raw, &keys(&["summary", "advice"])),
            Some(sections(&[("summary", "ok"), ("advice", "none")]))
        );
    }

    #[test]
    fn test_untagged_fence() {
        let raw = "```\n{\"summary\":\"fine\"}\n```\n";
        assert_eq!(
            extract(raw, &keys(&["summary"])),
            Some(sections(&[("summary", "fine")]))
        );
    }

    #[test]
    fn test_extra_keys_are_dropped() {
        let raw = r#"{"summary": "ok", "advice": "none", "mood": "calm"}"#;
        let result = extract(raw, &keys(&["summary", "advice"])).unwrap();
        assert_eq!(result.len(), 2);
        assert!(!result.contains_key("mood"));
    }

    #[test]
    fn test_strict_keeps_json_escapes_decoded() {
        let raw = r#"{"summary": "line one\nline \"two\""}"#;
        assert_eq!(
            extract(raw, &keys(&["summary"])).unwrap()["summary"],
            "line one\nline \"two\""
        );
    }

    #[test]
    fn test_non_string_values_become_json_text() {
        let raw = r#"{"score": 7, "tags": ["a", "b"], "ok": true}"#;
        let result = extract(raw, &keys(&["score", "tags", "ok"])).unwrap();
        assert_eq!(result["score"], "7");
        assert_eq!(result["tags"], r#"["a","b"]"#);
        assert_eq!(result["ok"], "true");
    }

    #[test]
    fn test_null_value_is_not_complete() {
        let raw = r#"{"summary": "ok", "advice": null}"#;
        assert_eq!(extract(raw, &keys(&["summary", "advice"])), None);
    }

    #[test]
    fn test_fallback_on_json_embedded_in_prose() {
        let raw = "Sure! Here is the analysis:\n{\"summary\": \"Healthy leaves.\", \"advice\": \"Water weekly.\"}\nHope that helps.";
        assert_eq!(
            extract(raw, &keys(&["summary", "advice"])),
            Some(sections(&[
                ("summary", "Healthy leaves."),
                ("advice", "Water weekly.")
            ]))
        );
    }

    #[test]
    fn test_fallback_on_truncated_json() {
        let raw = "{\"summary\": \"Healthy.\", \"advice\": \"Water weekly.\", \"extra\": \"cut of";
        assert_eq!(
            extract(raw, &keys(&["summary", "advice"])),
            Some(sections(&[("summary", "Healthy."), ("advice", "Water weekly.")]))
        );
    }

    #[test]
    fn test_fallback_unescapes_quotes_and_spans_newlines() {
        let raw = "not json at all \"summary\" :\n \"She said \\\"hi\\\"\nthen left\" trailing";
        assert_eq!(
            extract(raw, &keys(&["summary"])).unwrap()["summary"],
            "She said \"hi\"\nthen left"
        );
    }

    #[test]
    fn test_fallback_escapes_key_metacharacters() {
        let raw = "prefix \"a.b\": \"dotted\" and \"axb\": \"wrong\"";
        assert_eq!(
            extract(raw, &keys(&["a.b"])).unwrap()["a.b"],
            "dotted"
        );
    }

    #[test]
    fn test_partial_recovery_is_none() {
        let raw = "Here you go: \"summary\": \"ok\" but I forgot the rest.";
        assert_eq!(extract(raw, &keys(&["summary", "advice"])), None);
    }

    #[test]
    fn test_plain_prose_is_none() {
        let raw = "Your plant looks healthy. Keep it in indirect light.";
        assert_eq!(extract(raw, &keys(&["summary", "advice"])), None);
    }

    #[test]
    fn test_json_array_is_not_an_object() {
        assert_eq!(extract(r#"["summary", "ok"]"#, &keys(&["summary"])), None);
    }

    #[test]
    fn test_strict_missing_key_then_fallback_also_missing() {
        let raw = r#"{"summary": "ok"}"#;
        assert_eq!(extract(raw, &keys(&["summary", "advice"])), None);
    }

    #[test]
    fn test_augmented_prompt_shape_round_trips() {
        let k = keys(&["summary", "advice", "next_steps"]);
        let prompt = augment("Analyze this.", &k);
        let start = prompt.find('{').unwrap();
        let end = prompt.rfind('}').unwrap();
        let echoed = &prompt[start..=end];

        let result = extract(echoed, &k).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result["next_steps"], "Your content for next_steps");
    }

    #[test]
    fn test_result_has_exactly_requested_keys() {
        let raw = "```json\n{\"a\": \"1\", \"b\": \"2\", \"c\": \"3\"}\n```";
        for requested in [keys(&["a"]), keys(&["a", "c"]), keys(&["c", "b", "a"])] {
            let result = extract(raw, &requested).unwrap();
            let mut got: Vec<_> = result.keys().cloned().collect();
            let mut want = requested.clone();
            got.sort();
            want.sort();
            assert_eq!(got, want);
        }
    }
}
