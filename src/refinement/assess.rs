//! Assess stage: one chat call that turns a content snapshot into a typed
//! suggestion list.

use super::parser::parse_suggestions;
use super::types::{RefinementPhase, RefinementSuggestion};
use crate::llm::{ChatClient, ChatMessage, ChatOptions};
use crate::notify::Notifier;
use tracing::debug;

/// Low temperature: assessment favors determinism over creativity.
const ASSESS_TEMPERATURE: f64 = 0.2;

/// Longest review-context excerpt forwarded as extra grounding.
const REVIEW_CONTEXT_LIMIT: usize = 2000;

const SUGGESTION_FORMAT: &str = r#"Output STRICTLY a single JSON array and nothing else — no prose, no markdown fences. Each element:
{"id":"1","type":"consistency|completeness|style|safety|logic|other","summary":"one-sentence problem statement","detail":"optional concrete fix direction","severity":"info|suggestion|should_fix"}
If nothing needs improving, output an empty array []."#;

const SYSTEM_PROMPT_ASSESS_FINAL: &str = r#"You are an editor of content for young readers. Review the finished manuscript the user provides and produce specific, actionable improvement suggestions covering consistency, completeness, style, content safety and logic.
"#;

const SYSTEM_PROMPT_ASSESS_BRIEF: &str = r#"You are an editor of content for young readers. Review the story brief the user provides and produce specific, actionable improvement suggestions: missing requirements, contradictory constraints, unclear audience or tone, safety concerns.
"#;

pub struct AssessInput<'a> {
    pub phase: RefinementPhase,
    pub content: &'a str,
    /// Prior review/quality-check text, used as grounding for `final` only.
    pub review_context: Option<&'a str>,
}

/// Assess one phase's content. Every failure mode degrades to an empty list:
/// unwired phase, unavailable backend, no result, unparsable output.
pub async fn run_assess(
    client: Option<&dyn ChatClient>,
    notifier: &dyn Notifier,
    input: &AssessInput<'_>,
) -> Vec<RefinementSuggestion> {
    let system_prompt = match input.phase {
        RefinementPhase::Final => SYSTEM_PROMPT_ASSESS_FINAL,
        RefinementPhase::Brief => SYSTEM_PROMPT_ASSESS_BRIEF,
        phase => {
            debug!(%phase, "assess has no behavior for this phase");
            return Vec::new();
        }
    };

    let Some(client) = client else {
        notifier.info("No LLM backend is configured; assessment is unavailable.");
        return Vec::new();
    };

    let content = if input.content.is_empty() {
        "(no content yet)"
    } else {
        input.content
    };
    let mut text = format!(
        "Assess the following {} and reply with a JSON array of suggestions:\n\n{content}",
        match input.phase {
            RefinementPhase::Brief => "story brief",
            _ => "finished manuscript",
        }
    );
    if input.phase == RefinementPhase::Final {
        if let Some(review) = input.review_context.map(str::trim).filter(|r| !r.is_empty()) {
            let excerpt: String = review.chars().take(REVIEW_CONTEXT_LIMIT).collect();
            text.push_str("\n\n[Reference: existing review notes]\n");
            text.push_str(&excerpt);
        }
    }

    let messages = [
        ChatMessage::system(format!("{system_prompt}\n{SUGGESTION_FORMAT}")),
        ChatMessage::user(text),
    ];
    let options = ChatOptions {
        temperature: Some(ASSESS_TEMPERATURE),
    };

    match client.chat(&messages, Some(options)).await {
        Some(raw) if !raw.trim().is_empty() => parse_suggestions(&raw),
        _ => Vec::new(),
    }
}
