use shared::domain::UrlInputError;
use thiserror::Error;

pub const GENERIC_FAILURE_MESSAGE: &str =
    "Failed to process the link. Please check the link or try again later.";
pub const MISSING_LINK_MESSAGE: &str = "Failed to extract the link. No link found in response.";

/// Every way a form submission can end without a direct link.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Rejected before any request was sent.
    #[error(transparent)]
    Validation(#[from] UrlInputError),
    #[error("{}", http_message(*.status, .detail.as_deref()))]
    Http { status: u16, detail: Option<String> },
    /// 2xx response without a `direct_link`.
    #[error("Failed to extract the link. No link found in response.")]
    MissingLink,
    #[error("{}", or_generic(.0))]
    Transport(String),
    #[error("{}", or_generic(.0))]
    MalformedBody(String),
}

impl SubmitError {
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Text for the result panel. Failures that happened after a request was
    /// attempted carry an `Error:` prefix; validation messages do not.
    pub fn panel_message(&self) -> String {
        if self.is_local() {
            self.to_string()
        } else {
            format!("Error: {self}")
        }
    }
}

fn http_message(status: u16, detail: Option<&str>) -> String {
    match detail {
        Some(detail) => detail.to_string(),
        None => format!("HTTP error! Status: {status}"),
    }
}

fn or_generic(message: &str) -> &str {
    if message.trim().is_empty() {
        GENERIC_FAILURE_MESSAGE
    } else {
        message
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    #[error("{0}")]
    Other(String),
}
