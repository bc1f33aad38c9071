//! End-to-end refinement loop over a mock hosted backend and a tempdir
//! project: assess into suggestions, fold them into persisted state, revise
//! against them, and settle the round.

use storyloom::llm::DeepSeekClient;
use storyloom::llm::RetryPolicy;
use storyloom::notify::{NoticeLevel, Notifier};
use storyloom::refinement::{
    AssessInput, RefinementPhase, RefinementStore, ReviseInput, run_assess, run_revise,
};
use storyloom::storage::{ContentStore, ProjectLayout};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _level: NoticeLevel, _message: &str) {}
}

fn policy() -> RetryPolicy {
    RetryPolicy {
        attempts: 2,
        timeout: std::time::Duration::from_secs(5),
        default_temperature: 0.7,
    }
}

fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    })
}

#[tokio::test]
async fn assess_then_revise_round_trip() {
    let server = MockServer::start().await;

    // The assess call asks for a JSON suggestion array.
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Assess the following"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            r#"[{"id":"1","type":"logic","summary":"the fox vanishes in act two","severity":"should_fix"}]"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    // The revise call carries the current text plus the suggestion block.
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("[Current text]"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            "A story where the fox stays in act two.",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let layout = ProjectLayout::new(dir.path());
    let content_store = ContentStore::new(layout.clone());
    let state_store = RefinementStore::new(layout.state_path());
    let client = DeepSeekClient::with_base_url("sk-test", "deepseek-chat", policy(), Some(&server.uri()));
    let notifier = SilentNotifier;

    content_store
        .write_text(RefinementPhase::Final, "A story.")
        .unwrap();

    // Assess.
    let content = content_store.read_text(RefinementPhase::Final).unwrap();
    let suggestions = run_assess(
        Some(&client),
        &notifier,
        &AssessInput {
            phase: RefinementPhase::Final,
            content: &content,
            review_context: Some("Reviewer notes: act two feels thin."),
        },
    )
    .await;
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].summary, "the fox vanishes in act two");

    // Fold the assessment into persisted state: round opens as 1.
    let opened = state_store
        .update_after_assess(RefinementPhase::Final, suggestions.clone())
        .unwrap();
    assert_eq!(opened.state.round, 1);
    let open_round = opened.current_round.as_ref().unwrap();
    assert_eq!(open_round.round, 1);
    assert_eq!(open_round.suggestions, suggestions);

    // Revise against the accepted suggestions.
    let revised = run_revise(
        Some(&client),
        &notifier,
        &content_store,
        &ReviseInput {
            phase: RefinementPhase::Final,
            content: &content,
            suggestions: &suggestions,
        },
    )
    .await;
    assert_eq!(revised, "A story where the fox stays in act two.");
    assert_eq!(
        content_store.read_text(RefinementPhase::Final).as_deref(),
        Some("A story where the fox stays in act two.")
    );

    // Settle the round: round count survives, the open round clears.
    let settled = state_store.update_after_revise(RefinementPhase::Final).unwrap();
    assert_eq!(settled.state.round, 1);
    assert!(settled.current_round.is_none());
    assert!(settled.state.last_assessed_at.is_some());
    assert!(settled.state.last_revised_at.is_some());
}

#[tokio::test]
async fn unavailable_backend_leaves_state_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let layout = ProjectLayout::new(dir.path());
    let state_store = RefinementStore::new(layout.state_path());
    let notifier = SilentNotifier;

    state_store.get_or_init(RefinementPhase::Final).unwrap();

    let suggestions = run_assess(
        None,
        &notifier,
        &AssessInput {
            phase: RefinementPhase::Final,
            content: "draft text",
            review_context: None,
        },
    )
    .await;
    assert!(suggestions.is_empty());

    let state = state_store.read().unwrap();
    assert_eq!(state.state.round, 0);
    assert!(state.current_round.is_none());
}
