use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::SubmittedUrl;

pub const BYPASS_PATH: &str = "/bypass";
pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BypassRequest {
    #[serde(alias = "pahe_url")]
    pub url: String,
}

impl From<&SubmittedUrl> for BypassRequest {
    fn from(value: &SubmittedUrl) -> Self {
        Self {
            url: value.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BypassResponse {
    pub direct_link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Loosely typed view over whatever JSON the backend sent back.
///
/// The backend promises a JSON body on every status but not its shape, so
/// fields are looked up rather than deserialized. Empty strings count as
/// absent.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope(Value);

impl ResponseEnvelope {
    pub fn parse(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body).map(Self)
    }

    pub fn direct_link(&self) -> Option<&str> {
        self.non_empty_str("direct_link")
    }

    pub fn detail(&self) -> Option<&str> {
        self.non_empty_str("detail")
    }

    fn non_empty_str(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    }
}
