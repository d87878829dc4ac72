//! crates/formscan_core/src/parser.rs
//!
//! Best-effort extraction of a JSON payload from the model's free-text reply.
//!
//! The model is not guaranteed to emit valid JSON or to use any particular
//! fencing convention, so parse failure degrades to a raw-text wrapper rather
//! than failing the request.

use serde_json::{json, Value};

/// Parses the model's raw reply into a structured value.
///
/// The candidate text is selected by three ordered branches:
/// 1. content between the first ```` ```json ```` marker and the next ```` ``` ````;
/// 2. else content between the first pair of ```` ``` ```` markers;
/// 3. else the whole reply.
/// The candidate is trimmed and parsed as JSON; on failure the original,
/// untrimmed reply is returned under a single `raw_text` field.
///
/// The branch order is observable on ambiguous inputs and must not change.
pub fn parse_model_reply(raw: &str) -> Value {
    let candidate = if let Some((_, rest)) = raw.split_once("```json") {
        before_next_fence(rest)
    } else if let Some((_, rest)) = raw.split_once("```") {
        before_next_fence(rest)
    } else {
        raw.trim()
    };

    serde_json::from_str(candidate).unwrap_or_else(|_| json!({ "raw_text": raw }))
}

fn before_next_fence(rest: &str) -> &str {
    rest.split("```").next().unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_labeled_json_fence() {
        let reply = "```json\n{\"a\":1}\n```";
        assert_eq!(parse_model_reply(reply), json!({"a": 1}));
    }

    #[test]
    fn parses_an_unlabeled_fence() {
        let reply = "Here you go:\n```\n{\"total\": 4200}\n```\nLet me know!";
        assert_eq!(parse_model_reply(reply), json!({"total": 4200}));
    }

    #[test]
    fn parses_bare_json_with_surrounding_whitespace() {
        let reply = "  \n {\"invoices\": []} \n";
        assert_eq!(parse_model_reply(reply), json!({"invoices": []}));
    }

    #[test]
    fn labeled_fence_wins_over_an_earlier_plain_fence() {
        let reply = "```\nnot the payload\n```\n```json\n{\"a\": 1}\n```";
        assert_eq!(parse_model_reply(reply), json!({"a": 1}));
    }

    #[test]
    fn unclosed_labeled_fence_takes_the_remainder() {
        let reply = "prose\n```json\n{\"a\": 1}";
        assert_eq!(parse_model_reply(reply), json!({"a": 1}));
    }

    #[test]
    fn non_json_reply_falls_back_to_raw_text() {
        let reply = "not json at all";
        assert_eq!(parse_model_reply(reply), json!({"raw_text": "not json at all"}));
    }

    #[test]
    fn fallback_preserves_the_untrimmed_reply() {
        let reply = " ```json\nthis is { broken\n``` trailing ";
        assert_eq!(parse_model_reply(reply), json!({"raw_text": reply}));
    }

    #[test]
    fn fenced_array_payloads_parse_too() {
        let reply = "```json\n[1, 2, 3]\n```";
        assert_eq!(parse_model_reply(reply), json!([1, 2, 3]));
    }
}
