use crate::core::{Discoverer, OembedError, ProviderRegistry, Result};
use tracing::debug;

/// Picks the endpoint for `url`.
///
/// An explicit endpoint wins, then the first matching provider, then
/// discovery. Passing no discoverer means discovery is disabled.
pub async fn resolve_endpoint(
    url: &str,
    explicit: Option<&str>,
    registry: &ProviderRegistry,
    discoverer: Option<&dyn Discoverer>,
) -> Result<String> {
    if let Some(endpoint) = explicit {
        debug!("Using explicit endpoint {}", endpoint);
        return Ok(endpoint.to_string());
    }

    if let Some(provider) = registry.find(url) {
        debug!("Matched provider {} for {}", provider.name(), url);
        return Ok(provider.endpoint().to_string());
    }

    match discoverer {
        Some(discoverer) => {
            debug!("No provider matched {}, trying discovery", url);
            discoverer.endpoint_for_url(url).await
        }
        None => Err(OembedError::NoEndpoint(url.to_string())),
    }
}
