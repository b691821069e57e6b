use crate::core::{OembedError, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Fetches a URL and returns its body. Anything but a 2xx status is an error.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: &str) -> Result<String>;
}

pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self { client })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(&default_user_agent(), Duration::from_secs(30))
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<String> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json, text/xml, text/html;q=0.9, */*;q=0.8")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("HTTP {} from {}", status, url);
            return Err(OembedError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

pub fn default_user_agent() -> String {
    format!("oembed-ng/{}", env!("CARGO_PKG_VERSION"))
}
