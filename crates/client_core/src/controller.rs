//! Form submission controller: validate, post once, settle the view.

use shared::{
    domain::SubmittedUrl,
    protocol::{BypassRequest, ResponseEnvelope},
};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    error::SubmitError,
    transport::{BypassTransport, RawResponse},
    view::UiState,
};

pub struct FormController<T: BypassTransport> {
    transport: T,
    state: watch::Sender<UiState>,
}

impl<T: BypassTransport> FormController<T> {
    pub fn new(transport: T) -> Self {
        let (state, _) = watch::channel(UiState::Idle);
        Self { transport, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> UiState {
        self.state.borrow().clone()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Handles one form submission.
    ///
    /// Taking `&mut self` keeps at most one request in flight per controller.
    /// The returned result mirrors what the view shows once this settles.
    pub async fn submit(&mut self, input: &str) -> Result<String, SubmitError> {
        let url = match SubmittedUrl::parse(input) {
            Ok(url) => url,
            Err(err) => {
                debug!(%err, "form input rejected locally");
                let err = SubmitError::from(err);
                self.state.send_replace(UiState::Error {
                    message: err.panel_message(),
                });
                return Err(err);
            }
        };

        let guard = SubmittingGuard::enter(&self.state);
        let outcome = self.dispatch(&url).await;
        match &outcome {
            Ok(link) => {
                info!(%url, %link, "bypass succeeded");
                guard.settle(UiState::Success { link: link.clone() });
            }
            Err(err) => {
                warn!(%url, error = %err, "bypass failed");
                guard.settle(UiState::Error {
                    message: err.panel_message(),
                });
            }
        }
        outcome
    }

    async fn dispatch(&self, url: &SubmittedUrl) -> Result<String, SubmitError> {
        let request = BypassRequest::from(url);
        let response = self
            .transport
            .post_bypass(&request)
            .await
            .map_err(|err| SubmitError::Transport(err.to_string()))?;
        interpret_response(&response)
    }
}

/// Maps a settled response onto the submission outcome.
///
/// The body is parsed before the status is looked at, so a non-JSON error
/// page surfaces as a parse failure rather than a status message.
pub fn interpret_response(response: &RawResponse) -> Result<String, SubmitError> {
    let envelope = ResponseEnvelope::parse(&response.body)
        .map_err(|err| SubmitError::MalformedBody(err.to_string()))?;

    if !response.status.is_success() {
        return Err(SubmitError::Http {
            status: response.status.as_u16(),
            detail: envelope.detail().map(str::to_owned),
        });
    }

    envelope
        .direct_link()
        .map(str::to_owned)
        .ok_or(SubmitError::MissingLink)
}

/// Holds the view in `Submitting` and guarantees it leaves that state on
/// every exit path, including cancellation and unwinding.
struct SubmittingGuard<'a> {
    state: &'a watch::Sender<UiState>,
    settled: bool,
}

impl<'a> SubmittingGuard<'a> {
    fn enter(state: &'a watch::Sender<UiState>) -> Self {
        state.send_replace(UiState::Submitting);
        debug!("form submitting; trigger disabled");
        Self {
            state,
            settled: false,
        }
    }

    fn settle(mut self, next: UiState) {
        self.settled = true;
        self.state.send_replace(next);
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("bypass request abandoned before settling");
            self.state.send_replace(UiState::Idle);
        }
        debug!("form settled; trigger re-enabled");
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
