use std::sync::Arc;

use axum::http::StatusCode;
use shared::{domain::is_supported_host, error::ErrorBody, protocol::BypassResponse};
use tracing::{error, info};
use url::Url;

use crate::resolver::LinkResolver;

pub const EMPTY_URL_DETAIL: &str = "URL cannot be empty.";
pub const INVALID_URL_DETAIL: &str =
    "Invalid URL format. Please provide a valid Pahe.ink/Pahe.li link.";

pub type ApiFailure = (StatusCode, ErrorBody);

#[derive(Clone)]
pub struct ApiContext {
    pub resolver: Arc<dyn LinkResolver>,
}

fn bad_request(detail: &str) -> ApiFailure {
    (StatusCode::BAD_REQUEST, ErrorBody::new(detail))
}

/// Authoritative check behind the front end's substring test: an absolute
/// http(s) URL whose host is a supported domain or a subdomain of one.
pub fn validate_bypass_url(raw: &str) -> Result<Url, ApiFailure> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(bad_request(EMPTY_URL_DETAIL));
    }

    Url::parse(trimmed)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .filter(|url| url.port().is_none())
        .filter(|url| url.host_str().is_some_and(is_supported_host))
        .ok_or_else(|| bad_request(INVALID_URL_DETAIL))
}

pub async fn bypass(ctx: &ApiContext, raw_url: &str) -> Result<BypassResponse, ApiFailure> {
    let url = validate_bypass_url(raw_url)?;

    match ctx.resolver.resolve(&url).await {
        Ok(direct_link) => {
            info!(%url, %direct_link, "extracted direct link");
            Ok(BypassResponse { direct_link })
        }
        Err(err) => {
            error!(%url, error = %err, "link extraction failed");
            Err((err.status(), ErrorBody::new(err.to_string())))
        }
    }
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
