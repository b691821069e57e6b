use crate::core::{OembedError, Result};
use crate::utils::validate_url;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Plain description of a provider, as found in config files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRecord {
    pub name: String,
    pub endpoint: String,
    pub url_schemes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_url: Option<String>,
}

/// An oEmbed API together with the URL patterns it serves.
///
/// Patterns use `*` as a wildcard for one or more characters of any kind.
/// They are compiled once, when the provider is built.
#[derive(Clone)]
pub struct Provider {
    name: String,
    endpoint: String,
    url_schemes: Vec<String>,
    display_url: Option<String>,
    compiled: Vec<Regex>,
}

impl Provider {
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        url_schemes: impl IntoIterator<Item = S>,
        display_url: Option<String>,
    ) -> Result<Self> {
        let name = name.into();
        let endpoint = endpoint.into();
        let url_schemes: Vec<String> = url_schemes.into_iter().map(Into::into).collect();

        if url_schemes.is_empty() {
            return Err(OembedError::InvalidProvider {
                name,
                reason: "at least one URL scheme is required".to_string(),
            });
        }
        if let Err(e) = validate_url(&endpoint.replace("{format}", "json")) {
            return Err(OembedError::InvalidProvider {
                name,
                reason: format!("bad endpoint: {e}"),
            });
        }

        let mut compiled = Vec::with_capacity(url_schemes.len());
        for scheme in &url_schemes {
            match compile_scheme(scheme) {
                Ok(re) => compiled.push(re),
                Err(e) => {
                    return Err(OembedError::InvalidProvider {
                        name,
                        reason: format!("bad URL scheme {scheme}: {e}"),
                    })
                }
            }
        }

        Ok(Self {
            name,
            endpoint,
            url_schemes,
            display_url,
            compiled,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn url_schemes(&self) -> &[String] {
        &self.url_schemes
    }

    pub fn display_url(&self) -> Option<&str> {
        self.display_url.as_deref()
    }

    pub fn matches(&self, url: &str) -> bool {
        self.compiled.iter().any(|re| re.is_match(url))
    }

    pub fn to_record(&self) -> ProviderRecord {
        ProviderRecord {
            name: self.name.clone(),
            endpoint: self.endpoint.clone(),
            url_schemes: self.url_schemes.clone(),
            display_url: self.display_url.clone(),
        }
    }
}

impl TryFrom<ProviderRecord> for Provider {
    type Error = OembedError;

    fn try_from(record: ProviderRecord) -> Result<Self> {
        Provider::new(
            record.name,
            record.endpoint,
            record.url_schemes,
            record.display_url,
        )
    }
}

// Compiled patterns are derived from `url_schemes`, so they take no part in equality.
impl PartialEq for Provider {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.endpoint == other.endpoint
            && self.url_schemes == other.url_schemes
            && self.display_url == other.display_url
    }
}

impl Eq for Provider {}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("name", &self.name)
            .field("endpoint", &self.endpoint)
            .field("url_schemes", &self.url_schemes)
            .field("display_url", &self.display_url)
            .finish()
    }
}

fn compile_scheme(scheme: &str) -> std::result::Result<Regex, regex::Error> {
    let pattern = regex::escape(scheme).replace(r"\*", ".+?");
    Regex::new(&format!("^{pattern}$"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flickr() -> Provider {
        Provider::new(
            "Flickr",
            "http://www.flickr.com/services/oembed/",
            ["http://*.flickr.com/photos/*"],
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_wildcard_matching() {
        let provider = flickr();
        assert!(provider.matches("http://www.flickr.com/photos/bees/2341623661/"));
        assert!(provider.matches("http://farm1.flickr.com/photos/x"));
        // `*` needs at least one character
        assert!(!provider.matches("http://.flickr.com/photos/x"));
        assert!(!provider.matches("http://www.flickr.com/photos/"));
        assert!(!provider.matches("https://www.flickr.com/photos/x"));
        assert!(!provider.matches("http://www.flickr.com/groups/x"));
    }

    #[test]
    fn test_literal_characters_are_escaped() {
        let provider = flickr();
        // '.' in the pattern must not act as a regex wildcard
        assert!(!provider.matches("http://wwwXflickrXcom/photos/x"));
        assert!(provider.matches("http://www.flickr.com/photos/x?trailing=yes"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert!(!flickr().matches("HTTP://WWW.FLICKR.COM/photos/x"));
    }

    #[test]
    fn test_empty_schemes_rejected() {
        let err = Provider::new("Empty", "http://e/oembed", Vec::<String>::new(), None)
            .unwrap_err();
        assert!(matches!(err, OembedError::InvalidProvider { .. }));
    }

    #[test]
    fn test_bad_endpoint_rejected() {
        for endpoint in ["", "not a url", "/relative/oembed"] {
            let err = Provider::new("Bad", endpoint, ["http://bad.test/*"], None).unwrap_err();
            assert!(matches!(err, OembedError::InvalidProvider { .. }), "{endpoint}");
            assert_eq!(err.kind(), crate::core::ErrorKind::InvalidInput);
        }
        assert!(
            Provider::new("Templated", "http://t.test/oembed.{format}", ["http://t.test/*"], None)
                .is_ok()
        );
    }

    #[test]
    fn test_record_conversion() {
        let record = ProviderRecord {
            name: "Example".into(),
            endpoint: "http://example.com/oembed".into(),
            url_schemes: vec!["http://example.com/*".into()],
            display_url: Some("http://example.com".into()),
        };
        let provider = Provider::try_from(record.clone()).unwrap();
        assert_eq!(provider.display_url(), Some("http://example.com"));
        assert_eq!(provider.to_record(), record);
        assert!(provider.matches("http://example.com/a/b/c"));
    }
}
