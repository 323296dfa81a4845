use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::advisor::trait_def::{AdvisorError, AdvisorRequest, SettlementAdvisor};
use crate::config::AdvisorConfig;
use crate::error::AppError;

/// Advisor reached over HTTP: the request is POSTed as JSON and the reply is
/// either plain text or a JSON object with a `settlement` string.
pub struct HttpAdvisor {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct JsonReply {
    settlement: String,
}

impl HttpAdvisor {
    pub fn from_config(config: &AdvisorConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AppError::config(format!("Unable to build advisor HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: config.url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl SettlementAdvisor for HttpAdvisor {
    async fn suggest(&self, request: &AdvisorRequest) -> Result<String, AdvisorError> {
        let mut call = self.client.post(&self.url).json(request);
        if let Some(key) = &self.api_key {
            call = call.bearer_auth(key);
        }

        let response = call.send().await.map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(AdvisorError::Status(status.as_u16()));
        }
        let body = response.text().await.map_err(transport_error)?;
        debug!(bytes = body.len(), "advisor replied");

        extract_suggestion(&body)
    }
}

fn transport_error(err: reqwest::Error) -> AdvisorError {
    if err.is_timeout() {
        AdvisorError::Timeout
    } else {
        AdvisorError::Transport(err.to_string())
    }
}

/// Pulls the suggestion text out of a reply body.
pub(crate) fn extract_suggestion(body: &str) -> Result<String, AdvisorError> {
    let text = match serde_json::from_str::<JsonReply>(body) {
        Ok(reply) => reply.settlement,
        Err(_) => body.to_string(),
    };
    let text = text.trim();
    if text.is_empty() {
        return Err(AdvisorError::Empty);
    }
    Ok(text.to_string())
}
