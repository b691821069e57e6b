use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedType {
    Photo,
    Video,
    Link,
    Rich,
}

impl EmbedType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbedType::Photo => "photo",
            EmbedType::Video => "video",
            EmbedType::Link => "link",
            EmbedType::Rich => "rich",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "photo" => Some(EmbedType::Photo),
            "video" => Some(EmbedType::Video),
            "link" => Some(EmbedType::Link),
            "rich" => Some(EmbedType::Rich),
            _ => None,
        }
    }
}

impl fmt::Display for EmbedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields every oEmbed response may carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_age: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(flatten)]
    pub common: CommonFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(flatten)]
    pub common: CommonFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(flatten)]
    pub common: CommonFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rich {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(flatten)]
    pub common: CommonFields,
}

/// A normalized oEmbed response, tagged by its `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Embed {
    Photo(Photo),
    Video(Video),
    Link(Link),
    Rich(Rich),
}

impl Embed {
    pub fn kind(&self) -> EmbedType {
        match self {
            Embed::Photo(_) => EmbedType::Photo,
            Embed::Video(_) => EmbedType::Video,
            Embed::Link(_) => EmbedType::Link,
            Embed::Rich(_) => EmbedType::Rich,
        }
    }

    pub fn common(&self) -> &CommonFields {
        match self {
            Embed::Photo(p) => &p.common,
            Embed::Video(v) => &v.common,
            Embed::Link(l) => &l.common,
            Embed::Rich(r) => &r.common,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.common().title.as_deref()
    }

    pub fn html(&self) -> Option<&str> {
        match self {
            Embed::Video(v) => v.html.as_deref(),
            Embed::Rich(r) => r.html.as_deref(),
            Embed::Photo(_) | Embed::Link(_) => None,
        }
    }

    pub fn width(&self) -> Option<u32> {
        match self {
            Embed::Photo(p) => p.width,
            Embed::Video(v) => v.width,
            Embed::Rich(r) => r.width,
            Embed::Link(_) => None,
        }
    }

    pub fn height(&self) -> Option<u32> {
        match self {
            Embed::Photo(p) => p.height,
            Embed::Video(v) => v.height,
            Embed::Rich(r) => r.height,
            Embed::Link(_) => None,
        }
    }

    /// Markup suitable for dropping into a page.
    ///
    /// Video and rich embeds return the provider's html as-is; photos are
    /// rendered as an `<img>` tag. Links have nothing to embed.
    pub fn embed_html(&self) -> Option<String> {
        match self {
            Embed::Photo(photo) => {
                let src = photo.url.as_deref()?;
                let mut tag = format!("<img src=\"{}\"", escape_attr(src));
                if let Some(title) = &photo.common.title {
                    tag.push_str(&format!(" alt=\"{}\"", escape_attr(title)));
                }
                if let Some(width) = photo.width {
                    tag.push_str(&format!(" width=\"{width}\""));
                }
                if let Some(height) = photo.height {
                    tag.push_str(&format!(" height=\"{height}\""));
                }
                tag.push_str(" />");
                Some(tag)
            }
            Embed::Video(_) | Embed::Rich(_) => self.html().map(str::to_string),
            Embed::Link(_) => None,
        }
    }
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo() -> Embed {
        Embed::Photo(Photo {
            url: Some("http://x/img.jpg?a=1&b=2".into()),
            width: Some(100),
            height: Some(50),
            common: CommonFields {
                title: Some("Bees \"up close\"".into()),
                ..Default::default()
            },
        })
    }

    #[test]
    fn test_photo_embed_html() {
        assert_eq!(
            photo().embed_html().unwrap(),
            "<img src=\"http://x/img.jpg?a=1&amp;b=2\" alt=\"Bees &quot;up close&quot;\" width=\"100\" height=\"50\" />"
        );
    }

    #[test]
    fn test_link_has_no_markup() {
        let link = Embed::Link(Link {
            common: CommonFields::default(),
        });
        assert_eq!(link.embed_html(), None);
        assert_eq!(link.width(), None);
        assert_eq!(link.kind(), EmbedType::Link);
    }

    #[test]
    fn test_serializes_with_type_tag() {
        let value = serde_json::to_value(photo()).unwrap();
        assert_eq!(value["type"], "photo");
        assert_eq!(value["width"], 100);
        assert_eq!(value["title"], "Bees \"up close\"");
        assert!(value.get("author_name").is_none());
    }
}
