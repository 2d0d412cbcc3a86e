//! Reasoning-block removal for thinking models.
//!
//! Some models (qwen3, deepseek-r1, gpt-oss in raw mode) wrap their
//! chain-of-thought in `<think>...</think>` before the answer. Summaries only
//! keep the answer.

const OPEN_TAG: &str = "<think>";
const CLOSE_TAG: &str = "</think>";

/// A model response split into reasoning and answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThinkingResponse {
    /// Text found inside `<think>` blocks, if any.
    pub thinking_content: Option<String>,
    /// Everything outside the blocks, trimmed.
    pub answer_content: String,
}

/// Whether the response contains an explicit reasoning block.
pub fn has_thinking(response: &str) -> bool {
    response.contains(OPEN_TAG)
}

/// Split a response into reasoning and answer.
///
/// An unclosed `<think>` swallows the rest of the response as reasoning.
///
/// # Examples
///
/// ```
/// use mitra_inference::thinking::parse_thinking_response;
///
/// let parsed = parse_thinking_response("<think>Plot first.</think>A tense heist film.");
/// assert_eq!(parsed.thinking_content.as_deref(), Some("Plot first."));
/// assert_eq!(parsed.answer_content, "A tense heist film.");
/// ```
pub fn parse_thinking_response(response: &str) -> ThinkingResponse {
    let mut thinking = String::new();
    let mut answer = String::new();
    let mut rest = response;

    while let Some(start) = rest.find(OPEN_TAG) {
        answer.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN_TAG.len()..];

        if !thinking.is_empty() {
            thinking.push('\n');
        }
        match after_open.find(CLOSE_TAG) {
            Some(end) => {
                thinking.push_str(&after_open[..end]);
                rest = &after_open[end + CLOSE_TAG.len()..];
            }
            None => {
                thinking.push_str(after_open);
                rest = "";
            }
        }
    }
    answer.push_str(rest);

    let thinking = thinking.trim();
    ThinkingResponse {
        thinking_content: (!thinking.is_empty()).then(|| thinking.to_string()),
        answer_content: answer.trim().to_string(),
    }
}

/// The answer portion of a response with reasoning removed.
pub fn strip_thinking(response: &str) -> String {
    if has_thinking(response) {
        parse_thinking_response(response).answer_content
    } else {
        response.trim().to_string()
    }
}
