//! Image-rating survey: catalog, sampling, session engine, submission and view.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod flow;
pub mod page;
pub mod payload;
pub mod registry;
pub mod sampler;
pub mod submit;
pub mod transport;
mod view;

pub use catalog::{CatalogSource, GitHubCatalog, ImageRef};
pub use engine::{ConfirmOutcome, EngineState, SurveyEngine};
pub use error::{CatalogError, SubmissionError, SurveyError, ValidationError};
pub use payload::{Participant, ResponseRecord, SubmissionPayload};
pub use registry::{CallbackPayload, CallbackRegistry};
pub use submit::{SubmissionClient, SUBMIT_TIMEOUT_MS};
pub use transport::{PlatformTransport, ScriptTransport};
pub use view::SurveyView;
