//! Revise stage: one chat call that applies accepted suggestions to the
//! content, persisting the result into the phase's content document.

use super::types::{RefinementPhase, RefinementSuggestion};
use crate::llm::{ChatClient, ChatMessage, ChatOptions};
use crate::notify::Notifier;
use crate::storage::ContentStore;
use tracing::{debug, info, warn};

/// Moderate temperature: revision favors adherence over creativity.
const REVISE_TEMPERATURE: f64 = 0.3;

const SYSTEM_PROMPT_REVISE_FINAL: &str = r#"You are an editor of content for young readers. The user provides a finished manuscript and a list of improvement suggestions. Apply ONLY those suggestions and output the full revised text. Requirements:
- address every suggestion, none skipped;
- keep the original voice and structure, changing only what the suggestions touch;
- output the revised text directly, with no heading or commentary."#;

const SYSTEM_PROMPT_REVISE_BRIEF: &str = r#"You are an editor of content for young readers. The user provides a story brief and a list of improvement suggestions. Apply ONLY those suggestions and output the full revised brief. Requirements:
- address every suggestion, none skipped;
- keep the brief's structure, changing only what the suggestions touch;
- output the revised brief directly, with no heading or commentary."#;

pub struct ReviseInput<'a> {
    pub phase: RefinementPhase,
    pub content: &'a str,
    pub suggestions: &'a [RefinementSuggestion],
}

/// Render the accepted suggestions as the bulleted instruction block the
/// model revises against.
fn render_suggestions(suggestions: &[RefinementSuggestion]) -> String {
    suggestions
        .iter()
        .map(|s| match &s.detail {
            Some(detail) => format!("- [{}] {}\n  {detail}", s.kind, s.summary),
            None => format!("- [{}] {}", s.kind, s.summary),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Revise one phase's content. Revision failures are never fatal: an unwired
/// phase, an unavailable backend, an empty response or a failed content write
/// all resolve to the original content.
pub async fn run_revise(
    client: Option<&dyn ChatClient>,
    notifier: &dyn Notifier,
    content_store: &ContentStore,
    input: &ReviseInput<'_>,
) -> String {
    let system_prompt = match input.phase {
        RefinementPhase::Final => SYSTEM_PROMPT_REVISE_FINAL,
        RefinementPhase::Brief => SYSTEM_PROMPT_REVISE_BRIEF,
        phase => {
            debug!(%phase, "revise has no behavior for this phase");
            return input.content.to_string();
        }
    };

    let Some(client) = client else {
        notifier.info("No LLM backend is configured; revision is unavailable.");
        return input.content.to_string();
    };

    let content = if input.content.is_empty() {
        "(empty)"
    } else {
        input.content
    };
    let user_content = format!(
        "[Current text]\n\n{content}\n\n[Suggestions to apply, every one of them]\n\n{}",
        render_suggestions(input.suggestions)
    );

    let messages = [
        ChatMessage::system(system_prompt),
        ChatMessage::user(user_content),
    ];
    let options = ChatOptions {
        temperature: Some(REVISE_TEMPERATURE),
    };

    let revised = match client.chat(&messages, Some(options)).await {
        Some(text) if !text.trim().is_empty() => text.trim().to_string(),
        _ => input.content.to_string(),
    };

    // Persist the outcome even when unchanged; the content document is the
    // source of truth the next assess reads.
    if let Err(e) = content_store.write_text(input.phase, &revised) {
        warn!(phase = %input.phase, error = %e, "failed to persist revised content");
        notifier.warn("Revision could not be saved; the original text is unchanged.");
        return input.content.to_string();
    }
    info!(phase = %input.phase, "revised content persisted");
    revised
}
