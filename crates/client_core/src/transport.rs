use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client, StatusCode};
use shared::protocol::BypassRequest;
use tracing::debug;

use crate::{config::ClientSettings, error::TransportError};

/// Status and raw body of a settled bypass request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// The single network call a form submission makes.
#[async_trait]
pub trait BypassTransport: Send + Sync {
    async fn post_bypass(&self, request: &BypassRequest) -> Result<RawResponse, TransportError>;
}

pub struct HttpTransport {
    http: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(settings: &ClientSettings) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            endpoint: settings.endpoint(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl BypassTransport for HttpTransport {
    async fn post_bypass(&self, request: &BypassRequest) -> Result<RawResponse, TransportError> {
        debug!(endpoint = %self.endpoint, "posting bypass request");
        let res = self
            .http
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await?;
        let status = res.status();
        let body = res.bytes().await?;
        Ok(RawResponse::new(status, body.to_vec()))
    }
}
