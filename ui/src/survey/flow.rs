//! Async navigation steps that combine the engine with the network pieces.

use dioxus::logger::tracing::info;

use crate::core::config::SurveyConfig;
use crate::core::timing;

use super::catalog::{load_catalog, CatalogSource};
use super::engine::{ConfirmOutcome, SurveyEngine};
use super::error::SurveyError;
use super::payload::Participant;
use super::sampler;
use super::submit::SubmissionClient;
use super::transport::ScriptTransport;

/// Result of a successful confirm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Advanced { position: usize },
    Completed,
}

/// Validate demographics, load and sample the catalog, enter `InProgress(0)`.
/// Nothing changes on failure.
pub async fn start<S: CatalogSource>(
    engine: &mut SurveyEngine,
    participant: Participant,
    config: &SurveyConfig,
    source: &S,
) -> Result<(), SurveyError> {
    participant.validate()?;
    if engine.is_submitting() {
        return Err(SurveyError::SubmissionInFlight);
    }

    let catalog = load_catalog(source, config).await?;
    let sample = sampler::sample_random(&catalog, config.sample_size);
    info!(
        catalog = catalog.len(),
        sample = sample.len(),
        "survey sample drawn"
    );
    engine.begin(participant, sample)
}

/// Confirm `score` for the current image. On the last image this submits the
/// session; `on_submit` runs once the engine has entered `Submitting` so the
/// caller can reflect it before the network wait.
pub async fn confirm<T: ScriptTransport>(
    engine: &mut SurveyEngine,
    score: Option<u8>,
    client: &SubmissionClient<T>,
    on_submit: impl FnOnce(&SurveyEngine),
) -> Result<Step, SurveyError> {
    match engine.confirm_score(score, timing::now_rfc3339())? {
        ConfirmOutcome::Advanced { position } => Ok(Step::Advanced { position }),
        ConfirmOutcome::Submit(payload) => {
            on_submit(engine);
            match client.submit(&payload).await {
                Ok(_) => {
                    engine.submission_succeeded();
                    Ok(Step::Completed)
                }
                Err(err) => {
                    engine.submission_failed();
                    Err(err.into())
                }
            }
        }
    }
}
