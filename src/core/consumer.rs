use crate::core::{
    normalize, resolve_endpoint, Discoverer, Embed, HtmlDiscoverer, HttpClient, OembedError,
    Provider, ProviderRecord, ProviderRegistry, ReqwestClient, Result,
};
use crate::utils::{build_request_url, validate_url};
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Entry point: holds the target URL and everything needed to turn it into
/// an [`Embed`].
///
/// ```rust,no_run
/// use oembed_ng::Consumer;
///
/// # async fn example() -> oembed_ng::core::Result<()> {
/// let mut consumer = Consumer::new()?;
/// consumer.set_url("http://www.flickr.com/photos/bees/2341623661/")?;
/// let embed = consumer.get_object(&[("maxwidth", "500")]).await?;
/// println!("{:?}", embed.title());
/// # Ok(())
/// # }
/// ```
pub struct Consumer {
    url: Option<String>,
    endpoint: Option<String>,
    explicit_endpoint: bool,
    discovery: bool,
    registry: ProviderRegistry,
    discoverer: Option<Arc<dyn Discoverer>>,
    client: Arc<dyn HttpClient>,
}

impl Consumer {
    pub fn new() -> Result<Self> {
        ConsumerBuilder::new().build()
    }

    pub fn builder() -> ConsumerBuilder {
        ConsumerBuilder::new()
    }

    /// Sets the resource to embed. Any endpoint resolved for the previous
    /// URL is dropped; an explicitly set endpoint is kept.
    pub fn set_url(&mut self, url: &str) -> Result<()> {
        validate_url(url)?;
        self.url = Some(url.to_string());
        if !self.explicit_endpoint {
            self.endpoint = None;
        }
        Ok(())
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Pins the API endpoint, skipping provider matching and discovery.
    pub fn set_endpoint(&mut self, endpoint: &str) -> Result<()> {
        validate_url(&endpoint.replace("{format}", "json"))?;
        self.endpoint = Some(endpoint.to_string());
        self.explicit_endpoint = true;
        Ok(())
    }

    /// The endpoint in use: explicit, or resolved by the last request.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn enable_discovery(&mut self) {
        self.discovery = true;
    }

    pub fn disable_discovery(&mut self) {
        self.discovery = false;
    }

    pub fn discovery_enabled(&self) -> bool {
        self.discovery
    }

    pub fn set_discoverer(&mut self, discoverer: Arc<dyn Discoverer>) {
        self.discoverer = Some(discoverer);
    }

    pub fn discoverer(&self) -> Option<&Arc<dyn Discoverer>> {
        self.discoverer.as_ref()
    }

    pub fn add_provider(&mut self, provider: Provider) {
        self.registry.add(provider);
    }

    pub fn add_provider_record(&mut self, record: ProviderRecord) -> Result<()> {
        self.registry.add(Provider::try_from(record)?);
        Ok(())
    }

    pub fn remove_provider(&mut self, provider: &Provider) {
        self.registry.remove(provider);
    }

    pub fn clear_providers(&mut self) {
        self.registry.clear();
    }

    pub fn providers(&self) -> &[Provider] {
        self.registry.providers()
    }

    /// Resolves the endpoint if needed, fetches the oEmbed response and
    /// normalizes it.
    pub async fn get_object(&mut self, params: &[(&str, &str)]) -> Result<Embed> {
        let url = self.url.clone().ok_or(OembedError::MissingUrl)?;

        let endpoint = match self.endpoint.clone() {
            Some(endpoint) => endpoint,
            None => {
                let endpoint = self.resolve(&url).await?;
                self.endpoint = Some(endpoint.clone());
                endpoint
            }
        };

        let (request, format) = build_request_url(&endpoint, &url, params)?;
        info!("Requesting oEmbed ({}) from {}", format, request);

        let body = self.client.get(request.as_str()).await?;
        normalize(format, &body)
    }

    async fn resolve(&self, url: &str) -> Result<String> {
        if !self.discovery {
            return resolve_endpoint(url, None, &self.registry, None).await;
        }

        match &self.discoverer {
            Some(discoverer) => {
                resolve_endpoint(url, None, &self.registry, Some(discoverer.as_ref())).await
            }
            None => {
                let discoverer = HtmlDiscoverer::new(self.client.clone());
                resolve_endpoint(url, None, &self.registry, Some(&discoverer as &dyn Discoverer))
                    .await
            }
        }
    }
}

impl fmt::Debug for Consumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer")
            .field("url", &self.url)
            .field("endpoint", &self.endpoint)
            .field("explicit_endpoint", &self.explicit_endpoint)
            .field("discovery", &self.discovery)
            .field("registry", &self.registry)
            .field("custom_discoverer", &self.discoverer.is_some())
            .finish()
    }
}

pub struct ConsumerBuilder {
    url: Option<String>,
    endpoint: Option<String>,
    providers: Vec<Provider>,
    use_default_providers: bool,
    discovery: bool,
    discoverer: Option<Arc<dyn Discoverer>>,
    client: Option<Arc<dyn HttpClient>>,
}

impl ConsumerBuilder {
    pub fn new() -> Self {
        Self {
            url: None,
            endpoint: None,
            providers: Vec::new(),
            use_default_providers: true,
            discovery: true,
            discoverer: None,
            client: None,
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Providers registered after the built-in ones.
    pub fn provider(mut self, provider: Provider) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn use_default_providers(mut self, enabled: bool) -> Self {
        self.use_default_providers = enabled;
        self
    }

    pub fn discovery(mut self, enabled: bool) -> Self {
        self.discovery = enabled;
        self
    }

    pub fn discoverer(mut self, discoverer: Arc<dyn Discoverer>) -> Self {
        self.discoverer = Some(discoverer);
        self
    }

    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> Result<Consumer> {
        let mut registry = if self.use_default_providers {
            ProviderRegistry::with_defaults()?
        } else {
            ProviderRegistry::new()
        };
        for provider in self.providers {
            registry.add(provider);
        }

        let client: Arc<dyn HttpClient> = match self.client {
            Some(client) => client,
            None => Arc::new(ReqwestClient::with_defaults()?),
        };

        let mut consumer = Consumer {
            url: None,
            endpoint: None,
            explicit_endpoint: false,
            discovery: self.discovery,
            registry,
            discoverer: self.discoverer,
            client,
        };

        if let Some(url) = &self.url {
            consumer.set_url(url)?;
        }
        if let Some(endpoint) = &self.endpoint {
            consumer.set_endpoint(endpoint)?;
        }

        Ok(consumer)
    }
}

impl Default for ConsumerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
