use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Host fragments the front end accepts before handing a link to the backend.
///
/// Matching is a plain substring test, so this only weeds out obviously wrong
/// input; the backend performs the authoritative URL check.
pub const SUPPORTED_HOSTS: [&str; 3] = ["pahe.ink", "pahe.li", "intercelestial.com"];

/// Hosts that serve intermediate landing pages rather than the final file.
pub const INTERMEDIATE_HOSTS: [&str; 3] = SUPPORTED_HOSTS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UrlInputError {
    #[error("Please paste a link first.")]
    Empty,
    #[error("Invalid URL format. Please use a supported link.")]
    UnsupportedHost,
}

/// A link as typed into the form: trimmed, non-empty and naming a supported host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SubmittedUrl(String);

impl SubmittedUrl {
    pub fn parse(raw: &str) -> Result<Self, UrlInputError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UrlInputError::Empty);
        }
        if !mentions_supported_host(trimmed) {
            return Err(UrlInputError::UnsupportedHost);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SubmittedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SubmittedUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub fn mentions_supported_host(candidate: &str) -> bool {
    SUPPORTED_HOSTS.iter().any(|host| candidate.contains(host))
}

/// Exact host test used where a parsed URL is available: the host must be a
/// supported domain or one of its subdomains.
pub fn is_supported_host(host: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    SUPPORTED_HOSTS
        .iter()
        .any(|supported| host == *supported || host.ends_with(&format!(".{supported}")))
}
