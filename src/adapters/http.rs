use crate::domain::ports::CapabilitiesSource;
use crate::utils::error::{PreviewError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("wms-preview/", env!("CARGO_PKG_VERSION"));

/// Fetches capabilities documents over HTTP(S). No caching: every search hits the service.
#[derive(Debug, Clone)]
pub struct HttpCapabilitiesSource {
    client: Client,
}

impl HttpCapabilitiesSource {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpCapabilitiesSource {
    fn default() -> Self {
        Self::with_client(Client::new())
    }
}

#[async_trait]
impl CapabilitiesSource for HttpCapabilitiesSource {
    async fn fetch(&self, url: &str) -> Result<String> {
        tracing::debug!("Requesting capabilities from: {}", url);
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/xml, text/xml")
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Capabilities response status: {}", status);

        if !status.is_success() {
            return Err(PreviewError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
