//! Built-in provider table.

use crate::core::{Provider, Result};

struct BuiltinProvider {
    name: &'static str,
    endpoint: &'static str,
    url_schemes: &'static [&'static str],
    display_url: &'static str,
}

const BUILTIN_PROVIDERS: &[BuiltinProvider] = &[
    BuiltinProvider {
        name: "Flickr",
        endpoint: "http://www.flickr.com/services/oembed/",
        url_schemes: &["http://*.flickr.com/*", "http://flic.kr/*"],
        display_url: "http://www.flickr.com/",
    },
    BuiltinProvider {
        name: "Hulu",
        endpoint: "http://www.hulu.com/api/oembed.{format}",
        url_schemes: &["http://www.hulu.com/watch/*"],
        display_url: "http://www.hulu.com/",
    },
    BuiltinProvider {
        name: "iFixit",
        endpoint: "http://www.ifixit.com/Embed",
        url_schemes: &["http://www.ifixit.com/Guide/View/*"],
        display_url: "http://www.ifixit.com/",
    },
    BuiltinProvider {
        name: "PollEverywhere",
        endpoint: "http://www.polleverywhere.com/services/oembed/",
        url_schemes: &[
            "http://www.polleverywhere.com/polls/*",
            "http://www.polleverywhere.com/multiple_choice_polls/*",
            "http://www.polleverywhere.com/free_text_polls/*",
        ],
        display_url: "http://www.polleverywhere.com/",
    },
    BuiltinProvider {
        name: "Qik",
        endpoint: "http://qik.com/api/oembed.{format}",
        url_schemes: &["http://qik.com/video/*", "http://qik.com/*"],
        display_url: "http://qik.com/",
    },
    BuiltinProvider {
        name: "Revision3",
        endpoint: "http://revision3.com/api/oembed/",
        url_schemes: &["http://*.revision3.com/*"],
        display_url: "http://revision3.com/",
    },
    BuiltinProvider {
        name: "SlideShare",
        endpoint: "http://www.slideshare.net/api/oembed/2",
        url_schemes: &["http://www.slideshare.net/*/*"],
        display_url: "http://www.slideshare.net/",
    },
    BuiltinProvider {
        name: "SmugMug",
        endpoint: "http://api.smugmug.com/services/oembed/",
        url_schemes: &["http://*.smugmug.com/*"],
        display_url: "http://www.smugmug.com/",
    },
    BuiltinProvider {
        name: "Viddler",
        endpoint: "http://lab.viddler.com/services/oembed/",
        url_schemes: &["http://*.viddler.com/*"],
        display_url: "http://www.viddler.com/",
    },
    BuiltinProvider {
        name: "Vimeo",
        endpoint: "http://vimeo.com/api/oembed.{format}",
        url_schemes: &[
            "http://vimeo.com/*",
            "https://vimeo.com/*",
            "http://www.vimeo.com/*",
            "http://vimeo.com/groups/*/videos/*",
        ],
        display_url: "http://vimeo.com/",
    },
    BuiltinProvider {
        name: "YouTube",
        endpoint: "http://www.youtube.com/oembed",
        url_schemes: &[
            "http://*.youtube.com/watch*",
            "https://*.youtube.com/watch*",
            "http://youtu.be/*",
            "https://youtu.be/*",
        ],
        display_url: "http://www.youtube.com/",
    },
];

/// Builds a fresh copy of the built-in providers, in registration order.
pub fn default_providers() -> Result<Vec<Provider>> {
    BUILTIN_PROVIDERS
        .iter()
        .map(|b| {
            Provider::new(
                b.name,
                b.endpoint,
                b.url_schemes.iter().copied(),
                Some(b.display_url.to_string()),
            )
        })
        .collect()
}
