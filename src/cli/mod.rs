use crate::config::Config;
use crate::core::{Embed, Format};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "oembed-ng")]
#[command(about = "Fetch and normalize oEmbed data for a URL")]
#[command(version)]
pub struct Cli {
    /// URL of the resource to embed
    #[arg(value_name = "URL", required_unless_present = "list_providers")]
    pub url: Option<String>,

    /// Query this oEmbed endpoint instead of matching providers
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Response format (json or xml)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Maximum embed width
    #[arg(long)]
    pub maxwidth: Option<u32>,

    /// Maximum embed height
    #[arg(long)]
    pub maxheight: Option<u32>,

    /// Extra request parameter, may be repeated
    #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,

    /// Do not scan the page for oEmbed links when no provider matches
    #[arg(long)]
    pub no_discovery: bool,

    /// Start with an empty provider list
    #[arg(long)]
    pub no_default_providers: bool,

    /// Config file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print only the embeddable HTML
    #[arg(long)]
    pub html: bool,

    /// List registered providers and exit
    #[arg(long)]
    pub list_providers: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))
}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        let mut config = Config::load(self.config.as_deref())?;
        if self.no_discovery {
            config.discovery = false;
        }
        if self.no_default_providers {
            config.use_default_providers = false;
        }
        if let Some(format) = &self.format {
            config.format = format.clone();
        }
        // reject unknown formats before any network traffic
        config.format.parse::<Format>()?;

        let mut consumer = config.build_consumer()?;

        if self.list_providers {
            for provider in consumer.providers() {
                println!("{} -> {}", provider.name(), provider.endpoint());
                for scheme in provider.url_schemes() {
                    println!("    {}", scheme);
                }
            }
            return Ok(());
        }

        let url = self.url.as_deref().context("a URL is required")?;
        consumer.set_url(url)?;
        if let Some(endpoint) = &self.endpoint {
            consumer.set_endpoint(endpoint)?;
        }

        let maxwidth = self.maxwidth.map(|w| w.to_string());
        let maxheight = self.maxheight.map(|h| h.to_string());

        let mut params: Vec<(&str, &str)> = vec![("format", config.format.as_str())];
        if let Some(w) = &maxwidth {
            params.push(("maxwidth", w.as_str()));
        }
        if let Some(h) = &maxheight {
            params.push(("maxheight", h.as_str()));
        }
        params.extend(self.params.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        info!("Resolving: {}", url);

        let embed = consumer.get_object(&params).await?;

        if let Some(endpoint) = consumer.endpoint() {
            debug!("Endpoint: {}", endpoint);
        }

        println!("{}", self.render(&embed)?);

        Ok(())
    }

    /// Everything written to stdout; diagnostics go through tracing.
    fn render(&self, embed: &Embed) -> Result<String> {
        if self.html {
            match embed.embed_html() {
                Some(html) => Ok(html),
                None => anyhow::bail!("{} embeds have no HTML representation", embed.kind()),
            }
        } else {
            Ok(serde_json::to_string_pretty(embed)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("maxwidth=300"),
            Ok(("maxwidth".to_string(), "300".to_string()))
        );
        assert_eq!(
            parse_key_value("callback="),
            Ok(("callback".to_string(), String::new()))
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn test_verbose_output_is_plain_json() {
        let cli = Cli::try_parse_from(["oembed-ng", "http://vimeo.com/1", "--verbose"]).unwrap();
        let embed = crate::core::normalize(
            Format::Json,
            r#"{"type":"video","html":"<iframe></iframe>","width":640}"#,
        )
        .unwrap();

        let out = cli.render(&embed).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["type"], "video");
        assert_eq!(value["width"], 640);
    }

    #[test]
    fn test_html_output() {
        let cli = Cli::try_parse_from(["oembed-ng", "http://vimeo.com/1", "--html"]).unwrap();
        let video = crate::core::normalize(Format::Json, r#"{"type":"video","html":"<iframe></iframe>"}"#)
            .unwrap();
        assert_eq!(cli.render(&video).unwrap(), "<iframe></iframe>");

        let link = crate::core::normalize(Format::Json, r#"{"type":"link"}"#).unwrap();
        assert!(cli.render(&link).is_err());
    }

    #[test]
    fn test_cli_arguments() {
        let cli = Cli::try_parse_from([
            "oembed-ng",
            "http://vimeo.com/1",
            "--maxwidth",
            "400",
            "-p",
            "autoplay=1",
            "--no-discovery",
        ])
        .unwrap();

        assert_eq!(cli.url.as_deref(), Some("http://vimeo.com/1"));
        assert_eq!(cli.maxwidth, Some(400));
        assert_eq!(cli.params, vec![("autoplay".to_string(), "1".to_string())]);
        assert!(cli.no_discovery);
        assert!(Cli::try_parse_from(["oembed-ng"]).is_err());
        assert!(Cli::try_parse_from(["oembed-ng", "--list-providers"]).is_ok());
    }
}
