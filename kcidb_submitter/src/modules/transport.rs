use async_trait::async_trait;
use log::debug;
use serde_json::Value;

use crate::modules::error::SubmitError;

// Delivers a JSON body to the submission endpoint and returns the HTTP status
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, url: &str, token: &str, body: &Value) -> Result<u16, SubmitError>;
}

// Transport backed by a reqwest client, with its default timeouts
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, token: &str, body: &Value) -> Result<u16, SubmitError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        debug!("POST {} answered {}", url, status);
        Ok(status.as_u16())
    }
}
