use crate::core::{Consumer, Provider, ProviderRecord, ReqwestClient};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub user_agent: String,
    pub timeout: u64,
    pub discovery: bool,
    pub use_default_providers: bool,
    pub format: String,
    pub providers: Vec<ProviderRecord>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: crate::core::http::default_user_agent(),
            timeout: 30,
            discovery: true,
            use_default_providers: true,
            format: "json".to_string(),
            providers: Vec::new(),
        }
    }
}

impl Config {
    /// Reads a TOML config file; without a path the defaults are used.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        tracing::debug!(
            "Loaded config from {} ({} custom providers)",
            path.display(),
            config.providers.len()
        );
        Ok(config)
    }

    pub fn build_consumer(&self) -> anyhow::Result<Consumer> {
        let client = ReqwestClient::new(&self.user_agent, Duration::from_secs(self.timeout))?;

        let mut builder = Consumer::builder()
            .use_default_providers(self.use_default_providers)
            .discovery(self.discovery)
            .http_client(Arc::new(client));

        for record in &self.providers {
            let provider = Provider::try_from(record.clone())
                .with_context(|| format!("invalid provider `{}` in config", record.name))?;
            builder = builder.provider(provider);
        }

        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            discovery = false

            [[providers]]
            name = "Example"
            endpoint = "http://example.com/oembed"
            url_schemes = ["http://example.com/videos/*"]
            "#,
        )
        .unwrap();

        assert!(!config.discovery);
        assert!(config.use_default_providers);
        assert_eq!(config.timeout, 30);
        assert_eq!(config.format, "json");
        assert_eq!(config.providers.len(), 1);
        assert_eq!(config.providers[0].display_url, None);
    }

    #[test]
    fn test_build_consumer_appends_custom_providers() {
        let config = Config {
            use_default_providers: false,
            providers: vec![ProviderRecord {
                name: "Example".into(),
                endpoint: "http://example.com/oembed".into(),
                url_schemes: vec!["http://example.com/*".into()],
                display_url: None,
            }],
            ..Config::default()
        };

        let consumer = config.build_consumer().unwrap();
        assert_eq!(consumer.providers().len(), 1);
        assert!(consumer.discovery_enabled());
    }

    #[test]
    fn test_invalid_provider_rejected() {
        let config = Config {
            providers: vec![ProviderRecord {
                name: "Broken".into(),
                endpoint: "http://example.com/oembed".into(),
                url_schemes: vec![],
                display_url: None,
            }],
            ..Config::default()
        };

        let err = config.build_consumer().unwrap_err();
        assert!(err.to_string().contains("Broken"));
    }
}
