use crate::core::{HttpClient, OembedError, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::sync::Arc;
use url::Url;

pub const JSON_OEMBED_TYPE: &str = "application/json+oembed";
pub const XML_OEMBED_TYPE: &str = "application/xml+oembed";
pub const TEXT_XML_OEMBED_TYPE: &str = "text/xml+oembed";

/// Finds an oEmbed endpoint for a page that no registered provider covers.
#[async_trait]
pub trait Discoverer: Send + Sync {
    async fn endpoint_for_url(&self, url: &str) -> Result<String>;
}

/// An alternate link declared in a page's `<head>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternateLink {
    pub mime_type: String,
    pub href: String,
}

/// Returns every `<link rel="alternate">` carrying both a type and an href,
/// in document order. Broken markup yields whatever the parser recovered.
pub fn extract_alternate_links(markup: &str) -> Vec<AlternateLink> {
    let document = Html::parse_document(markup);
    let Ok(selector) = Selector::parse("link[rel][type][href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter(|el| {
            el.value()
                .attr("rel")
                .map(|rel| {
                    rel.split_ascii_whitespace()
                        .any(|r| r.eq_ignore_ascii_case("alternate"))
                })
                .unwrap_or(false)
        })
        .filter_map(|el| {
            let mime_type = el.value().attr("type")?.trim().to_ascii_lowercase();
            let href = el.value().attr("href")?.trim().to_string();
            Some(AlternateLink { mime_type, href })
        })
        .collect()
}

/// Picks the oEmbed link to use. JSON wins over XML regardless of order.
pub fn select_oembed_link(links: &[AlternateLink]) -> Option<&AlternateLink> {
    links
        .iter()
        .find(|l| l.mime_type == JSON_OEMBED_TYPE)
        .or_else(|| {
            links.iter().find(|l| {
                l.mime_type == XML_OEMBED_TYPE || l.mime_type == TEXT_XML_OEMBED_TYPE
            })
        })
}

/// Fetches the page and reads its alternate oEmbed links.
pub struct HtmlDiscoverer {
    client: Arc<dyn HttpClient>,
}

impl HtmlDiscoverer {
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Discoverer for HtmlDiscoverer {
    async fn endpoint_for_url(&self, url: &str) -> Result<String> {
        let markup = self.client.get(url).await?;
        let links = extract_alternate_links(&markup);
        tracing::debug!("Found {} alternate links on {}", links.len(), url);

        let link = select_oembed_link(&links)
            .ok_or_else(|| OembedError::NothingDiscovered(url.to_string()))?;

        // hrefs may be relative to the page
        let endpoint = match Url::parse(url).and_then(|base| base.join(&link.href)) {
            Ok(resolved) => resolved.to_string(),
            Err(_) => link.href.clone(),
        };

        tracing::info!("Discovered {} endpoint {}", link.mime_type, endpoint);
        Ok(endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html><head>
  <title>A page</title>
  <link rel="stylesheet" type="text/css" href="/style.css">
  <link rel="alternate" type="text/xml+oembed" href="http://example.com/oembed?format=xml">
  <link rel="alternate" type="application/json+oembed" href="http://example.com/oembed?format=json">
</head><body><p>Hi</body></html>"#;

    #[test]
    fn test_extract_alternate_links() {
        let links = extract_alternate_links(PAGE);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].mime_type, TEXT_XML_OEMBED_TYPE);
        assert_eq!(links[1].href, "http://example.com/oembed?format=json");
    }

    #[test]
    fn test_json_preferred_over_xml() {
        let links = extract_alternate_links(PAGE);
        let chosen = select_oembed_link(&links).unwrap();
        assert_eq!(chosen.mime_type, JSON_OEMBED_TYPE);
    }

    #[test]
    fn test_xml_used_when_alone() {
        let links = vec![
            AlternateLink {
                mime_type: "application/rss+xml".into(),
                href: "/feed".into(),
            },
            AlternateLink {
                mime_type: XML_OEMBED_TYPE.into(),
                href: "/oembed.xml".into(),
            },
        ];
        assert_eq!(select_oembed_link(&links).unwrap().href, "/oembed.xml");
    }

    #[test]
    fn test_malformed_markup_is_tolerated() {
        let markup = r#"<html><head><link rel="Alternate Feed" type="Application/JSON+oEmbed" href=" /o.json "><div><<<"#;
        let links = extract_alternate_links(markup);
        assert_eq!(
            links,
            vec![AlternateLink {
                mime_type: JSON_OEMBED_TYPE.into(),
                href: "/o.json".into(),
            }]
        );
    }

    #[test]
    fn test_non_alternate_links_ignored() {
        let markup = r#"<link rel="canonical" type="application/json+oembed" href="/x">"#;
        assert!(extract_alternate_links(markup).is_empty());
    }
}
