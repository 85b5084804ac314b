//! JSON payload extraction from raw model text.
//!
//! Models frequently wrap their answer in commentary ("Here is the plan:")
//! or markdown fences even when told not to. Extraction is deliberately
//! forgiving and never fails: when nothing JSON-like is found the trimmed
//! text is returned unchanged so the downstream parse reports the problem.

/// Opening and closing marker of a markdown code fence.
const FENCE: &str = "```";

/// Pulls a candidate JSON payload out of raw model output.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputExtractor;

impl OutputExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Returns the candidate JSON substring.
    ///
    /// # Policy
    /// 1. Inner content of the first fenced block, minus any language tag
    /// 2. Greedy span from the first `{` to the last `}`
    /// 3. The trimmed input
    pub fn extract(&self, raw: &str) -> String {
        let trimmed = raw.trim();

        if let Some(inner) = Self::fenced_block(trimmed) {
            return inner;
        }

        if let Some(span) = Self::outer_brace_span(trimmed) {
            return span;
        }

        trimmed.to_string()
    }

    fn fenced_block(s: &str) -> Option<String> {
        let open = s.find(FENCE)?;
        let after_fence = &s[open + FENCE.len()..];

        let body = match after_fence.find('\n') {
            Some(newline) if Self::is_info_string(&after_fence[..newline]) => {
                &after_fence[newline + 1..]
            }
            _ => match after_fence.get(..4) {
                Some(tag) if tag.eq_ignore_ascii_case("json") => &after_fence[4..],
                _ => after_fence,
            },
        };

        let close = body.find(FENCE)?;
        Some(body[..close].trim().to_string())
    }

    /// A fence's first line is a language tag unless it already holds
    /// payload or the closing fence.
    fn is_info_string(line: &str) -> bool {
        !line.contains(FENCE) && !line.contains('{') && !line.contains('[')
    }

    fn outer_brace_span(s: &str) -> Option<String> {
        let start = s.find('{')?;
        let end = s.rfind('}')?;
        (end > start).then(|| s[start..=end].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    fn extract(raw: &str) -> String {
        OutputExtractor::new().extract(raw)
    }

    #[test]
    fn extracts_plain_json() {
        assert_eq!(extract(r#"{"a": 1}"#), r#"{"a": 1}"#);
    }

    #[test]
    fn extracts_json_from_tagged_fence() {
        let raw = "Sure! ```json\n{\"translatedMessage\":\"...\"}\n```";
        assert_eq!(extract(raw), r#"{"translatedMessage":"..."}"#);
    }

    #[test]
    fn extracts_json_from_untagged_fence() {
        let raw = "```\n{\"a\": true}\n```";
        assert_eq!(extract(raw), r#"{"a": true}"#);
    }

    #[test]
    fn fence_tag_is_case_insensitive() {
        let raw = "```JSON\n{\"a\": true}\n```";
        assert_eq!(extract(raw), r#"{"a": true}"#);
    }

    #[test]
    fn extracts_json_after_preamble() {
        let raw = "Here is the plan: {\"steps\": [{\"n\": 1}]} Hope this helps.";
        assert_eq!(extract(raw), r#"{"steps": [{"n": 1}]}"#);
    }

    #[test]
    fn brace_span_is_greedy() {
        let raw = "{\"outer\": {\"inner\": 1}} trailing";
        assert_eq!(extract(raw), r#"{"outer": {"inner": 1}}"#);
    }

    #[test]
    fn returns_trimmed_text_when_nothing_found() {
        assert_eq!(extract("  no json here \n"), "no json here");
    }

    #[test]
    fn unclosed_fence_falls_back_to_braces() {
        let raw = "```json\n{\"a\": 1}";
        assert_eq!(extract(raw), r#"{"a": 1}"#);
    }

    #[test]
    fn reversed_braces_fall_back_to_raw() {
        assert_eq!(extract("} oops {"), "} oops {");
    }

    #[test]
    fn multibyte_text_after_fence_does_not_panic() {
        let raw = "```日本\n{\"a\": 1}\n```";
        assert_eq!(extract(raw), r#"{"a": 1}"#);
    }

    #[test]
    fn any_fence_language_tag_is_dropped() {
        for raw in [
            "```js\n{\"a\": 1}\n```",
            "```javascript\n{\"a\": 1}\n```",
            "``` json\n{\"a\": 1}\n```",
        ] {
            assert_eq!(extract(raw), r#"{"a": 1}"#, "input: {raw:?}");
        }
    }

    #[test]
    fn inline_fence_keeps_payload() {
        assert_eq!(extract("```{\"a\": 1}```"), r#"{"a": 1}"#);
        assert_eq!(extract("```json{\"a\": 1}```\nbye"), r#"{"a": 1}"#);
    }

    fn arb_object() -> impl Strategy<Value = Value> {
        prop::collection::btree_map(
            "[a-z]{1,8}",
            prop_oneof![
                "[a-zA-Z0-9 .,]{0,16}".prop_map(Value::String),
                any::<i32>().prop_map(|n| json!(n)),
                any::<bool>().prop_map(Value::Bool),
            ],
            0..6,
        )
        .prop_map(|map| Value::Object(map.into_iter().collect()))
    }

    proptest! {
        #[test]
        fn wrapping_style_does_not_change_parsed_object(
            object in arb_object(),
            prose in "[a-zA-Z ,.!:]{0,30}",
        ) {
            let body = serde_json::to_string_pretty(&object).unwrap();
            let styles = [
                body.clone(),
                format!("{} {}", prose, body),
                format!("```json\n{}\n```", body),
                format!("{}\n```\n{}\n```\n{}", prose, body, prose),
            ];

            for style in styles {
                let parsed: Value = serde_json::from_str(&extract(&style)).unwrap();
                prop_assert_eq!(&parsed, &object);
            }
        }
    }
}
