//! Parsing of model replies into summary and next steps

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{AdvisorError, AdvisorResult};
use crate::types::ReplyPayload;

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)```").expect("fence pattern is valid"))
}

/// Locate the JSON object inside a reply that may be fenced or padded with prose
fn extract_json(content: &str) -> Option<&str> {
    let body = fence_regex()
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(content);

    let start = body.find('{')?;
    let end = body.rfind('}')?;
    (start < end).then(|| &body[start..=end])
}

/// Parse a reply of the shape `{"summary": ..., "next_steps": [...]}`.
///
/// Extra keys are ignored. A missing or blank summary, or next steps that are
/// not a list of strings, is a parse failure.
pub fn parse_reply(content: &str) -> AdvisorResult<ReplyPayload> {
    let json = extract_json(content).ok_or_else(|| AdvisorError::ReplyParseError {
        message: "reply contains no JSON object".to_string(),
    })?;

    let payload: ReplyPayload = serde_json::from_str(json).map_err(|e| AdvisorError::ReplyParseError {
        message: e.to_string(),
    })?;

    let summary = payload.summary.trim().to_string();
    if summary.is_empty() {
        return Err(AdvisorError::ReplyParseError {
            message: "summary is empty".to_string(),
        });
    }

    let next_steps = payload
        .next_steps
        .into_iter()
        .map(|step| step.trim().to_string())
        .filter(|step| !step.is_empty())
        .collect();

    Ok(ReplyPayload { summary, next_steps })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_plain_json_reply() {
        let reply = r#"{"summary": "Cancel Netflix.", "next_steps": ["Open billing", "Disable auto-renew"]}"#;
        let payload = parse_reply(reply).unwrap();

        assert_eq!(payload.summary, "Cancel Netflix.");
        assert_eq!(payload.next_steps, vec!["Open billing", "Disable auto-renew"]);
    }

    #[test]
    fn test_fenced_reply_with_prose() {
        let reply = "Here is the plan:\n```json\n{\"summary\": \"Drop two tools.\", \"next_steps\": [\"  Export data \", \"\"]}\n```\nGood luck!";
        let payload = parse_reply(reply).unwrap();

        assert_eq!(payload.summary, "Drop two tools.");
        assert_eq!(payload.next_steps, vec!["Export data"]);
    }

    #[test]
    fn test_extra_keys_are_ignored() {
        let reply = r#"{"summary": "ok", "next_steps": [], "confidence": 0.9}"#;
        assert!(parse_reply(reply).is_ok());
    }

    #[test]
    fn test_wrong_shapes_are_rejected() {
        assert_matches!(parse_reply("I cannot help with that."), Err(AdvisorError::ReplyParseError { .. }));
        assert_matches!(
            parse_reply(r#"[{"service": "Netflix", "reason": "unused"}]"#),
            Err(AdvisorError::ReplyParseError { .. })
        );
        assert_matches!(
            parse_reply(r#"{"summary": "ok", "next_steps": "call them"}"#),
            Err(AdvisorError::ReplyParseError { .. })
        );
        assert_matches!(parse_reply(r#"{"next_steps": ["a"]}"#), Err(AdvisorError::ReplyParseError { .. }));
        assert_matches!(
            parse_reply(r#"{"summary": "   ", "next_steps": ["a"]}"#),
            Err(AdvisorError::ReplyParseError { .. })
        );
    }
}
