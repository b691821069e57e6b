pub mod cli;
pub mod config;
pub mod core;
pub mod providers;
pub mod utils;

pub use crate::core::{
    Consumer, Embed, EmbedType, ErrorKind, Format, OembedError, Provider, ProviderRegistry,
};
