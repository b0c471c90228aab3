//! Submission client: one timeout-bounded script-injection call per attempt.

use dioxus::logger::tracing::{info, warn};
use futures::{pin_mut, select, FutureExt};
use url::Url;

use crate::core::timing;

use super::error::SubmissionError;
use super::payload::SubmissionPayload;
use super::registry::{CallbackPayload, CallbackRegistry};
use super::transport::ScriptTransport;

pub const SUBMIT_TIMEOUT_MS: u64 = 30_000;

pub struct SubmissionClient<T> {
    endpoint: String,
    transport: T,
    registry: CallbackRegistry,
    timeout_ms: u64,
}

impl<T: ScriptTransport> SubmissionClient<T> {
    pub fn new(endpoint: impl Into<String>, transport: T) -> Self {
        Self {
            endpoint: endpoint.into(),
            transport,
            registry: CallbackRegistry::new(),
            timeout_ms: SUBMIT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn registry(&self) -> &CallbackRegistry {
        &self.registry
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `<endpoint>?callback=<name>&data=<url-encoded JSON>`
    pub fn request_url(&self, callback: &str, data: &str) -> Result<Url, SubmissionError> {
        Url::parse_with_params(&self.endpoint, &[("callback", callback), ("data", data)])
            .map_err(|err| SubmissionError::Endpoint(err.to_string()))
    }

    /// Send `payload` and wait for the endpoint's verdict.
    ///
    /// # Errors
    ///
    /// `Server` when the endpoint reports a non-success status, `Network` when
    /// the script cannot be fetched, `Timeout` when no callback arrives in time.
    /// The callback registration is released on every path.
    pub async fn submit(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<CallbackPayload, SubmissionError> {
        let data = payload
            .to_json()
            .map_err(|err| SubmissionError::Encode(err.to_string()))?;
        let (pending, receiver) = self.registry.register();
        let url = self.request_url(pending.name(), &data)?;
        info!(
            callback = pending.name(),
            responses = payload.responses.len(),
            url_len = url.as_str().len(),
            "submitting responses"
        );

        let outcome = {
            let injected = self
                .transport
                .inject(&url, pending.name(), &self.registry)
                .fuse();
            let callback = receiver.fuse();
            let timeout = timing::sleep_ms(self.timeout_ms).fuse();
            pin_mut!(injected, callback, timeout);

            loop {
                select! {
                    result = callback => break match result {
                        Ok(reply) => interpret(reply),
                        Err(_) => Err(SubmissionError::Network("callback was dropped".into())),
                    },
                    loaded = injected => {
                        // A loaded script may already have called back; keep waiting.
                        if let Err(err) = loaded {
                            break Err(err);
                        }
                    },
                    _ = timeout => break Err(SubmissionError::Timeout(self.timeout_ms)),
                }
            }
        };
        drop(pending);

        match &outcome {
            Ok(_) => info!("submission accepted"),
            Err(err) => warn!(%err, "submission failed"),
        }
        outcome
    }
}

fn interpret(reply: CallbackPayload) -> Result<CallbackPayload, SubmissionError> {
    if reply.is_success() {
        Ok(reply)
    } else {
        Err(SubmissionError::Server(
            reply
                .message
                .clone()
                .unwrap_or_else(|| "unknown error".to_string()),
        ))
    }
}
