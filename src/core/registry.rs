use crate::core::{Provider, Result};
use crate::providers::default_providers;

/// Ordered set of providers. Earlier registrations win when several match.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Provider>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Result<Self> {
        Ok(Self {
            providers: default_providers()?,
        })
    }

    pub fn add(&mut self, provider: Provider) {
        self.providers.push(provider);
    }

    pub fn remove(&mut self, provider: &Provider) {
        self.providers.retain(|p| p != provider);
    }

    pub fn clear(&mut self) {
        self.providers.clear();
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn find(&self, url: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.matches(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(name: &str, endpoint: &str, scheme: &str) -> Provider {
        Provider::new(name, endpoint, [scheme], None).unwrap()
    }

    #[test]
    fn test_first_registered_wins() {
        let mut registry = ProviderRegistry::new();
        registry.add(provider("first", "http://one/oembed", "http://media.test/*"));
        registry.add(provider("second", "http://two/oembed", "http://media.test/video/*"));

        let found = registry.find("http://media.test/video/42").unwrap();
        assert_eq!(found.name(), "first");
    }

    #[test]
    fn test_remove_and_clear() {
        let a = provider("a", "http://a/oembed", "http://a.test/*");
        let b = provider("b", "http://b/oembed", "http://b.test/*");
        let mut registry = ProviderRegistry::new();
        registry.add(a.clone());
        registry.add(b.clone());

        registry.remove(&a);
        assert_eq!(registry.providers(), &[b.clone()]);
        assert!(registry.find("http://a.test/x").is_none());

        // not present: no-op
        registry.remove(&a);
        assert_eq!(registry.len(), 1);

        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.find("http://b.test/x").is_none());
    }

    #[test]
    fn test_defaults_match_known_sites() {
        let registry = ProviderRegistry::with_defaults().unwrap();
        let cases = [
            ("http://www.flickr.com/photos/bees/2341623661/", "Flickr"),
            ("http://www.youtube.com/watch?v=dQw4w9WgXcQ", "YouTube"),
            ("http://vimeo.com/7100569", "Vimeo"),
            ("http://www.slideshare.net/alice/deck", "SlideShare"),
            ("http://www.hulu.com/watch/20807/late-night", "Hulu"),
        ];
        for (url, name) in cases {
            assert_eq!(registry.find(url).map(|p| p.name()), Some(name), "{url}");
        }
        assert!(registry.find("http://example.com/nothing").is_none());
    }
}
