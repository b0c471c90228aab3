//! End-to-end navigation through a session with canned catalog and endpoint.

use std::cell::Cell;

use ui::core::config::SurveyConfig;
use ui::core::ident::SessionId;
use ui::survey::catalog::TreeListing;
use ui::survey::flow::{self, Step};
use ui::survey::{
    CallbackPayload, CallbackRegistry, CatalogError, CatalogSource, EngineState, Participant,
    ScriptTransport, SubmissionClient, SubmissionError, SurveyEngine, SurveyError,
    ValidationError,
};
use url::Url;

struct FixedTree {
    paths: Vec<String>,
    calls: Cell<usize>,
}

impl FixedTree {
    fn with_images(n: usize) -> Self {
        let mut paths: Vec<String> = (0..n).map(|i| format!("images/{i:02}.jpg")).collect();
        paths.push("images/readme.md".into());
        paths.push("other/skip.png".into());
        Self {
            paths,
            calls: Cell::new(0),
        }
    }
}

impl CatalogSource for FixedTree {
    async fn fetch_tree(&self, _config: &SurveyConfig) -> Result<TreeListing, CatalogError> {
        self.calls.set(self.calls.get() + 1);
        let listing = serde_json::json!({
            "tree": self
                .paths
                .iter()
                .map(|p| serde_json::json!({"path": p, "type": "blob"}))
                .collect::<Vec<_>>()
        });
        Ok(serde_json::from_value(listing)?)
    }
}

struct Unreachable;

impl CatalogSource for Unreachable {
    async fn fetch_tree(&self, _config: &SurveyConfig) -> Result<TreeListing, CatalogError> {
        Err(CatalogError::Network("dns failure".into()))
    }
}

/// Endpoint that answers each submission with the next scripted reply.
struct Endpoint {
    replies: std::cell::RefCell<Vec<CallbackPayload>>,
}

impl Endpoint {
    fn replying(replies: Vec<CallbackPayload>) -> Self {
        Self {
            replies: std::cell::RefCell::new(replies),
        }
    }
}

impl ScriptTransport for Endpoint {
    async fn inject(
        &self,
        _url: &Url,
        callback: &str,
        registry: &CallbackRegistry,
    ) -> Result<(), SubmissionError> {
        let reply = self.replies.borrow_mut().remove(0);
        registry.resolve(callback, reply);
        Ok(())
    }
}

fn config(sample_size: usize) -> SurveyConfig {
    SurveyConfig {
        sample_size,
        ..SurveyConfig::default()
    }
}

async fn started(sample_size: usize, images: usize) -> SurveyEngine {
    let mut engine = SurveyEngine::new(SessionId::generate());
    flow::start(
        &mut engine,
        Participant::new("female", "20s"),
        &config(sample_size),
        &FixedTree::with_images(images),
    )
    .await
    .unwrap();
    engine
}

#[tokio::test]
async fn start_samples_only_catalog_images() {
    let engine = started(23, 40).await;
    assert_eq!(engine.sample.len(), 23);
    assert_eq!(engine.state, EngineState::InProgress { position: 0 });
    assert!(engine.responses.is_empty());
    assert!(engine
        .sample
        .iter()
        .all(|img| img.url.contains("/images/") && img.id.ends_with(".jpg")));
}

#[tokio::test]
async fn short_catalog_gives_short_sample() {
    let engine = started(23, 4).await;
    assert_eq!(engine.sample.len(), 4);
    assert_eq!(engine.progress_label().as_deref(), Some("1 / 4"));
}

#[tokio::test]
async fn missing_demographics_skip_the_catalog() {
    let mut engine = SurveyEngine::new(SessionId::generate());
    let tree = FixedTree::with_images(5);
    let err = flow::start(&mut engine, Participant::new("male", ""), &config(3), &tree)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SurveyError::Validation(ValidationError::MissingDemographics)
    ));
    assert_eq!(tree.calls.get(), 0);
    assert_eq!(engine.state, EngineState::NotStarted);
}

#[tokio::test]
async fn catalog_failure_creates_no_session() {
    let mut engine = SurveyEngine::new(SessionId::generate());
    let err = flow::start(
        &mut engine,
        Participant::new("male", "30s"),
        &config(3),
        &Unreachable,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SurveyError::Catalog(CatalogError::Network(_))));
    assert_eq!(engine.state, EngineState::NotStarted);
    assert!(engine.sample.is_empty());
}

#[tokio::test]
async fn last_confirm_with_success_completes() {
    let mut engine = started(3, 10).await;
    let client = SubmissionClient::new(
        "https://endpoint.example/exec",
        Endpoint::replying(vec![CallbackPayload::success()]),
    );

    for expected in 1..3 {
        let step = flow::confirm(&mut engine, Some(3), &client, |_| {}).await.unwrap();
        assert_eq!(step, Step::Advanced { position: expected });
    }

    let mut saw_submitting = false;
    let step = flow::confirm(&mut engine, Some(5), &client, |eng| {
        saw_submitting = eng.is_submitting();
    })
    .await
    .unwrap();

    assert!(saw_submitting);
    assert_eq!(step, Step::Completed);
    assert_eq!(engine.state, EngineState::Completed);
    assert_eq!(engine.responses.len(), 3);
    assert_eq!(client.registry().pending_count(), 0);
}

#[tokio::test]
async fn last_confirm_with_server_error_stays_on_last_image() {
    let mut engine = started(2, 10).await;
    let client = SubmissionClient::new(
        "https://endpoint.example/exec",
        Endpoint::replying(vec![
            CallbackPayload::error("bad data"),
            CallbackPayload::success(),
        ]),
    );

    flow::confirm(&mut engine, Some(2), &client, |_| {}).await.unwrap();
    let err = flow::confirm(&mut engine, Some(4), &client, |_| {})
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SurveyError::Submission(SubmissionError::Server(ref message)) if message == "bad data"
    ));
    assert_eq!(engine.state, EngineState::InProgress { position: 1 });
    assert_eq!(engine.responses.len(), 2);
    assert_eq!(engine.responses[1].score, 4);

    // Retrying replaces the unsent tail instead of appending a duplicate.
    let step = flow::confirm(&mut engine, Some(4), &client, |_| {}).await.unwrap();
    assert_eq!(step, Step::Completed);
    assert_eq!(engine.responses.len(), 2);
}

#[tokio::test]
async fn confirm_without_score_keeps_position() {
    let mut engine = started(3, 10).await;
    let client = SubmissionClient::new(
        "https://endpoint.example/exec",
        Endpoint::replying(Vec::new()),
    );
    let err = flow::confirm(&mut engine, None, &client, |_| {})
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SurveyError::Validation(ValidationError::MissingScore)
    ));
    assert_eq!(engine.position(), Some(0));
    assert!(engine.responses.is_empty());
}
