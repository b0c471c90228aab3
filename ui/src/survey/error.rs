//! Error types for the survey flow.

use thiserror::Error;

/// Missing user input. Never changes session state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("gender and age bracket are required")]
    MissingDemographics,
    #[error("a score must be selected")]
    MissingScore,
    #[error("score {0} is outside the rating scale")]
    ScoreOutOfRange(u8),
}

/// Errors emitted while listing the image catalog.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog request failed with status {0}")]
    HttpStatus(u16),
    #[error("catalog request failed: {0}")]
    Network(String),
    #[error("catalog response was malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("no images found under the configured folder")]
    Empty,
}

/// Errors emitted by the submission client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SubmissionError {
    #[error("server rejected the submission: {0}")]
    Server(String),
    #[error("network error during submission: {0}")]
    Network(String),
    #[error("submission timed out after {0} ms")]
    Timeout(u64),
    #[error("invalid submission endpoint: {0}")]
    Endpoint(String),
    #[error("failed to encode submission payload: {0}")]
    Encode(String),
}

/// Errors surfaced by the navigation controller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SurveyError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("the survey is not in progress")]
    NotInProgress,
}
