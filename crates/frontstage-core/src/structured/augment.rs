//! Output instructions appended to a prompt when a flow wants sections.

/// Append JSON output instructions for `keys` to `prompt`.
///
/// Keys are listed in the given order, each with a placeholder value. With no
/// keys the prompt is returned unchanged.
pub fn augment(prompt: &str, keys: &[String]) -> String {
    if keys.is_empty() {
        return prompt.to_string();
    }

    let keys_example = keys
        .iter()
        .map(|key| {
            let key = json_escape(key);
            format!("\"{key}\": \"Your content for {key}\"")
        })
        .collect::<Vec<_>>()
        .join(",\n  ");

    format!(
        "{prompt}\n\n\
         IMPORTANT: You MUST respond with ONLY a valid JSON object with the following keys, no other text:\n\
         {{\n  {keys_example}\n}}\n\n\
         Each value should be a detailed string (2-4 sentences). Do not include any text outside the JSON."
    )
}

fn json_escape(key: &str) -> String {
    key.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_keys_is_identity() {
        let prompt = "Describe this plant.\n\nBe kind.";
        assert_eq!(augment(prompt, &[]), prompt);
    }

    #[test]
    fn test_keys_listed_in_order() {
        let out = augment("Analyze.", &keys(&["summary", "advice", "risks"]));
        assert!(out.starts_with("Analyze.\n\n"));
        let summary = out.find("\"summary\"").unwrap();
        let advice = out.find("\"advice\"").unwrap();
        let risks = out.find("\"risks\"").unwrap();
        assert!(summary < advice && advice < risks);
    }

    #[test]
    fn test_instruction_block_content() {
        let out = augment("Analyze.", &keys(&["summary"]));
        assert!(out.contains("ONLY a valid JSON object"));
        assert!(out.contains("\"summary\": \"Your content for summary\""));
        assert!(out.contains("2-4 sentences"));
        assert!(out.ends_with("Do not include any text outside the JSON."));
    }

    #[test]
    fn test_deterministic() {
        let k = keys(&["a", "b"]);
        assert_eq!(augment("p", &k), augment("p", &k));
    }
}
