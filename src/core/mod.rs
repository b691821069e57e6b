pub mod consumer;
pub mod discovery;
pub mod embed;
pub mod error;
pub mod http;
pub mod provider;
pub mod registry;
pub mod resolver;
pub mod response;

pub use consumer::{Consumer, ConsumerBuilder};
pub use discovery::{
    extract_alternate_links, select_oembed_link, AlternateLink, Discoverer, HtmlDiscoverer,
};
pub use embed::{CommonFields, Embed, EmbedType, Link, Photo, Rich, Video};
pub use error::{ErrorKind, OembedError, Result};
pub use http::{HttpClient, ReqwestClient};
pub use provider::{Provider, ProviderRecord};
pub use registry::ProviderRegistry;
pub use resolver::resolve_endpoint;
pub use response::{normalize, Format};
