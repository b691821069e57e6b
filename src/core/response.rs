use crate::core::{
    CommonFields, Embed, EmbedType, Link, OembedError, Photo, Result, Rich, Video,
};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Wire format of an oEmbed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Json,
    Xml,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Xml => "xml",
        }
    }
}

impl FromStr for Format {
    type Err = OembedError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(Format::Json),
            "xml" => Ok(Format::Xml),
            other => Err(OembedError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a raw response body into an [`Embed`].
pub fn normalize(format: Format, body: &str) -> Result<Embed> {
    let fields = match format {
        Format::Json => json_fields(body)?,
        Format::Xml => xml_fields(body)?,
    };
    build_embed(&fields)
}

fn malformed(msg: impl Into<String>) -> OembedError {
    OembedError::MalformedResponse(msg.into())
}

fn json_fields(body: &str) -> Result<HashMap<String, Value>> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| malformed(format!("invalid JSON: {e}")))?;

    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        other => Err(malformed(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Collects the text of each direct child of the root element.
fn xml_fields(body: &str) -> Result<HashMap<String, Value>> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut fields = HashMap::new();
    let mut stack: Vec<String> = Vec::new();
    let mut seen_root = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            malformed(format!(
                "invalid XML at position {}: {e}",
                reader.error_position()
            ))
        })?;

        match event {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if stack.is_empty() {
                    if seen_root {
                        return Err(malformed("invalid XML: multiple root elements"));
                    }
                    seen_root = true;
                }
                stack.push(name);
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Empty(e) => {
                if stack.len() == 1 {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    fields.insert(name, Value::String(String::new()));
                } else if stack.is_empty() {
                    if seen_root {
                        return Err(malformed("invalid XML: multiple root elements"));
                    }
                    seen_root = true;
                }
            }
            Event::Text(t) => {
                if stack.is_empty() && t.iter().any(|b| !b.is_ascii_whitespace()) {
                    return Err(malformed("invalid XML: text outside the root element"));
                }
                if stack.len() == 2 {
                    let text = t
                        .unescape()
                        .map_err(|e| malformed(format!("invalid XML text: {e}")))?;
                    append_text(&mut fields, &stack[1], &text);
                }
            }
            Event::CData(c) => {
                if stack.len() == 2 {
                    let raw = c.into_inner();
                    append_text(&mut fields, &stack[1], &String::from_utf8_lossy(&raw));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(malformed(format!("invalid XML: unclosed element <{open}>")));
    }
    if !seen_root {
        return Err(malformed("invalid XML: no root element"));
    }

    Ok(fields)
}

fn append_text(fields: &mut HashMap<String, Value>, name: &str, text: &str) {
    match fields.get_mut(name) {
        Some(Value::String(existing)) => existing.push_str(text),
        _ => {
            fields.insert(name.to_string(), Value::String(text.to_string()));
        }
    }
}

fn build_embed(fields: &HashMap<String, Value>) -> Result<Embed> {
    let type_name = match fields.get("type") {
        Some(Value::String(s)) => s.as_str(),
        Some(other) => {
            return Err(malformed(format!(
                "field `type` must be a string, got {}",
                json_kind(other)
            )))
        }
        None => return Err(malformed("missing required field `type`")),
    };
    let kind = EmbedType::from_wire(type_name)
        .ok_or_else(|| malformed(format!("unknown embed type `{type_name}`")))?;

    let common = CommonFields {
        version: text_field(fields, "version")?,
        title: text_field(fields, "title")?,
        author_name: text_field(fields, "author_name")?,
        author_url: text_field(fields, "author_url")?,
        provider_name: text_field(fields, "provider_name")?,
        provider_url: text_field(fields, "provider_url")?,
        cache_age: number_field(fields, "cache_age")?,
        thumbnail_url: text_field(fields, "thumbnail_url")?,
        thumbnail_width: number_field(fields, "thumbnail_width")?,
        thumbnail_height: number_field(fields, "thumbnail_height")?,
    };

    let embed = match kind {
        EmbedType::Photo => Embed::Photo(Photo {
            url: text_field(fields, "url")?,
            width: number_field(fields, "width")?,
            height: number_field(fields, "height")?,
            common,
        }),
        EmbedType::Video => Embed::Video(Video {
            html: text_field(fields, "html")?,
            width: number_field(fields, "width")?,
            height: number_field(fields, "height")?,
            common,
        }),
        EmbedType::Link => Embed::Link(Link { common }),
        EmbedType::Rich => Embed::Rich(Rich {
            html: text_field(fields, "html")?,
            width: number_field(fields, "width")?,
            height: number_field(fields, "height")?,
            common,
        }),
    };

    Ok(embed)
}

fn text_field(fields: &HashMap<String, Value>, name: &str) -> Result<Option<String>> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        // version is commonly sent as a bare number
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(malformed(format!(
            "field `{name}` must be a string, got {}",
            json_kind(other)
        ))),
    }
}

fn number_field<T>(fields: &HashMap<String, Value>, name: &str) -> Result<Option<T>>
where
    T: TryFrom<u64>,
{
    let invalid = || malformed(format!("field `{name}` is not a non-negative integer"));

    let n = match fields.get(name) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => match n.as_u64() {
            Some(n) => Some(n),
            None => n.as_f64().and_then(integral),
        },
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        Some(_) => None,
    };

    let n = n.ok_or_else(invalid)?;
    T::try_from(n).map(Some).map_err(|_| invalid())
}

// 640.0 is a width, 640.5 is not
fn integral(f: f64) -> Option<u64> {
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}
