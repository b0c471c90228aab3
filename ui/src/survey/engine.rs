//! Session state machine for one pass through the image sample.
//!
//! ```text
//! NotStarted -> InProgress(0) <-> InProgress(n) -> Submitting -> Completed
//!                                      ^               |
//!                                      +--- failure ---+
//! ```
//!
//! While a session is in progress `responses.len() == position`. The one
//! exception is the unsubmitted tail left behind by a failed submission: it
//! sits at index `position` and is replaced (not duplicated) when the user
//! confirms again, or dropped when they step back.

use crate::core::format;
use crate::core::ident::SessionId;

use super::catalog::ImageRef;
use super::error::{CatalogError, SurveyError, ValidationError};
use super::payload::{Participant, ResponseRecord, SubmissionPayload, SCORE_SCALE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    NotStarted,
    InProgress { position: usize },
    Submitting { position: usize },
    Completed,
}

/// What the caller should do after a confirmed score.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmOutcome {
    /// Moved on; load the image at `position`.
    Advanced { position: usize },
    /// Last image scored; hand the payload to the submission client.
    Submit(SubmissionPayload),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurveyEngine {
    pub session_id: SessionId,
    pub participant: Participant,
    pub sample: Vec<ImageRef>,
    pub responses: Vec<ResponseRecord>,
    pub state: EngineState,
}

impl SurveyEngine {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            participant: Participant::default(),
            sample: Vec::new(),
            responses: Vec::new(),
            state: EngineState::NotStarted,
        }
    }

    /// Enter `InProgress(0)` with a freshly drawn sample.
    pub fn begin(
        &mut self,
        participant: Participant,
        sample: Vec<ImageRef>,
    ) -> Result<(), SurveyError> {
        if matches!(self.state, EngineState::Submitting { .. }) {
            return Err(SurveyError::SubmissionInFlight);
        }
        participant.validate()?;
        if sample.is_empty() {
            return Err(CatalogError::Empty.into());
        }

        self.participant = participant;
        self.sample = sample;
        self.responses.clear();
        self.state = EngineState::InProgress { position: 0 };
        Ok(())
    }

    /// Record `score` for the current image and advance, or request submission
    /// when the current image is the last one.
    pub fn confirm_score(
        &mut self,
        score: Option<u8>,
        timestamp: String,
    ) -> Result<ConfirmOutcome, SurveyError> {
        let position = match self.state {
            EngineState::InProgress { position } => position,
            EngineState::Submitting { .. } => return Err(SurveyError::SubmissionInFlight),
            EngineState::NotStarted | EngineState::Completed => {
                return Err(SurveyError::NotInProgress)
            }
        };
        let score = score.ok_or(ValidationError::MissingScore)?;
        if !SCORE_SCALE.contains(&score) {
            return Err(ValidationError::ScoreOutOfRange(score).into());
        }
        let image = self
            .sample
            .get(position)
            .ok_or(SurveyError::NotInProgress)?;

        let record = ResponseRecord {
            timestamp,
            session_id: self.session_id.clone(),
            participant: self.participant.clone(),
            image_id: image.id.clone(),
            score,
        };
        self.responses.truncate(position);
        self.responses.push(record);

        if position + 1 >= self.sample.len() {
            self.state = EngineState::Submitting { position };
            return Ok(ConfirmOutcome::Submit(self.payload()));
        }

        let position = position + 1;
        self.state = EngineState::InProgress { position };
        Ok(ConfirmOutcome::Advanced { position })
    }

    /// Step back one image, dropping its response. Returns `false` at the first image.
    pub fn go_back(&mut self) -> Result<bool, SurveyError> {
        let position = match self.state {
            EngineState::InProgress { position } => position,
            EngineState::Submitting { .. } => return Err(SurveyError::SubmissionInFlight),
            EngineState::NotStarted | EngineState::Completed => {
                return Err(SurveyError::NotInProgress)
            }
        };
        if position == 0 {
            return Ok(false);
        }

        let position = position - 1;
        self.responses.truncate(position);
        self.state = EngineState::InProgress { position };
        Ok(true)
    }

    pub fn submission_succeeded(&mut self) {
        if matches!(self.state, EngineState::Submitting { .. }) {
            self.state = EngineState::Completed;
        }
    }

    /// Back to the last image with its response kept as the retry tail.
    pub fn submission_failed(&mut self) {
        if let EngineState::Submitting { position } = self.state {
            self.state = EngineState::InProgress { position };
        }
    }

    pub fn payload(&self) -> SubmissionPayload {
        SubmissionPayload {
            participant: self.participant.clone(),
            session_id: self.session_id.clone(),
            responses: self.responses.clone(),
        }
    }

    pub fn position(&self) -> Option<usize> {
        match self.state {
            EngineState::InProgress { position } | EngineState::Submitting { position } => {
                Some(position)
            }
            EngineState::NotStarted | EngineState::Completed => None,
        }
    }

    pub fn current_image(&self) -> Option<&ImageRef> {
        self.position().and_then(|p| self.sample.get(p))
    }

    pub fn progress_label(&self) -> Option<String> {
        self.position()
            .map(|p| format::format_progress(p, self.sample.len()))
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, EngineState::Submitting { .. })
    }

    /// The last image is being re-shown after a failed submission.
    pub fn has_pending_tail(&self) -> bool {
        self.position()
            .map(|p| self.responses.len() > p)
            .unwrap_or(false)
    }
}
