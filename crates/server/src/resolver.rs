use anyhow::Context;
use async_trait::async_trait;
use axum::http::StatusCode;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER},
    Client,
};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::{config::Settings, landing};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Timeout when contacting Pahe.ink server.")]
    Timeout,
    #[error("Failed to fetch the Pahe.ink URL: {0}")]
    Upstream(String),
    #[error("Could not find the final download link structure on the page.")]
    NotFound,
    #[error("An internal server error occurred: {0}")]
    Internal(String),
}

impl ResolveError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for ResolveError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            Self::Timeout
        } else {
            Self::Upstream(value.to_string())
        }
    }
}

/// Turns a validated intermediate link into the final download link.
#[async_trait]
pub trait LinkResolver: Send + Sync {
    async fn resolve(&self, url: &Url) -> Result<String, ResolveError>;
}

/// Walks the landing page flow over HTTP: fetch the page, submit its landing
/// form, then pick the download anchor if the redirect chain stopped on
/// another intermediate page.
pub struct HttpLinkResolver {
    http: Client,
}

impl HttpLinkResolver {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(REFERER, HeaderValue::from_static("https://google.com/"));

        // The landing form POST must carry the session cookie set by the page fetch.
        let mut builder = Client::builder()
            .user_agent(settings.user_agent.clone())
            .default_headers(headers)
            .cookie_store(true);
        if let Some(timeout) = settings.upstream_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .context("failed to build upstream HTTP client")?;
        Ok(Self { http })
    }
}

#[async_trait]
impl LinkResolver for HttpLinkResolver {
    async fn resolve(&self, url: &Url) -> Result<String, ResolveError> {
        info!(%url, "fetching landing page");
        let page = self.http.get(url.clone()).send().await?.error_for_status()?;
        let page_url = page.url().clone();
        let html = page.text().await?;

        let Some(form) = landing::find_landing_form(&html) else {
            warn!(%page_url, "no landing form on page");
            return Err(ResolveError::NotFound);
        };
        let action = page_url
            .join(&form.action)
            .map_err(|e| ResolveError::Internal(format!("bad form action '{}': {e}", form.action)))?;

        info!(%action, fields = form.fields.len(), "submitting landing form");
        let res = self
            .http
            .post(action)
            .form(&form.fields)
            .send()
            .await?
            .error_for_status()?;
        let landed = res.url().clone();
        let mut final_url = landed.to_string();

        if landing::is_intermediate(&landed) {
            let body = res.text().await?;
            match landing::find_download_anchor(&body) {
                Some(href) => {
                    final_url = landed.join(&href).map(String::from).unwrap_or(href);
                }
                None => warn!(%landed, "no download anchor on second layer; returning intermediate url"),
            }
        }

        if !landing::looks_like_file_host(&final_url) {
            warn!(%final_url, "resolved url is not on a known file host");
        }
        Ok(final_url)
    }
}

#[cfg(test)]
#[path = "tests/resolver_tests.rs"]
mod tests;
