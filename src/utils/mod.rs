use crate::core::{Format, OembedError, Result};
use url::Url;

/// Accepts only absolute URLs with a host, e.g. `http://example.com/x`.
pub fn validate_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| OembedError::InvalidUrl(format!("{url}: {e}")))?;
    if parsed.cannot_be_a_base() || !parsed.has_host() {
        return Err(OembedError::InvalidUrl(url.to_string()));
    }
    Ok(parsed)
}

/// Builds the final request URL for `target` against `endpoint`.
///
/// Base parameters are `url`, `format` (defaulting to json) and the caller's
/// extras. Parameters already in the endpoint's query string replace base
/// parameters of the same name. `{format}` in the endpoint is filled with the
/// format that ends up in the query.
/// Returns the request URL and the format the response will be in.
pub fn build_request_url(
    endpoint: &str,
    target: &str,
    params: &[(&str, &str)],
) -> Result<(Url, Format)> {
    let (base, endpoint_query) = match endpoint.split_once('?') {
        Some((base, rest)) => (base, rest.split('#').next().unwrap_or_default()),
        None => (endpoint, ""),
    };

    let mut merged: Vec<(String, String)> = vec![
        ("url".to_string(), target.to_string()),
        ("format".to_string(), Format::default().to_string()),
    ];
    for (key, value) in params {
        set_param(&mut merged, key, value);
    }
    for (key, value) in url::form_urlencoded::parse(endpoint_query.as_bytes()) {
        set_param(&mut merged, &key, &value);
    }

    let format = merged
        .iter()
        .find(|(k, _)| k == "format")
        .map(|(_, v)| v.parse::<Format>())
        .transpose()?
        .unwrap_or_default();

    let mut request = validate_url(&base.replace("{format}", format.as_str()))?;
    request.query_pairs_mut().clear().extend_pairs(&merged);

    Ok((request, format))
}

fn set_param(params: &mut Vec<(String, String)>, key: &str, value: &str) {
    match params.iter_mut().find(|(k, _)| k == key) {
        Some(existing) => existing.1 = value.to_string(),
        None => params.push((key.to_string(), value.to_string())),
    }
}
