use thiserror::Error;

/// Broad classes of failure a caller can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    ResolutionFailure,
    TransportFailure,
    MalformedResponse,
}

#[derive(Debug, Error)]
pub enum OembedError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("missing URL: set a target URL before requesting an embed")]
    MissingUrl,

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid provider {name}: {reason}")]
    InvalidProvider { name: String, reason: String },

    #[error("no oEmbed endpoint found for {0}")]
    NoEndpoint(String),

    #[error("no oEmbed link discovered in {0}")]
    NothingDiscovered(String),

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl OembedError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OembedError::InvalidUrl(_)
            | OembedError::MissingUrl
            | OembedError::UnsupportedFormat(_)
            | OembedError::InvalidProvider { .. } => ErrorKind::InvalidInput,
            OembedError::NoEndpoint(_) | OembedError::NothingDiscovered(_) => {
                ErrorKind::ResolutionFailure
            }
            OembedError::Http { .. } | OembedError::Request(_) => ErrorKind::TransportFailure,
            OembedError::MalformedResponse(_) => ErrorKind::MalformedResponse,
        }
    }
}

pub type Result<T> = std::result::Result<T, OembedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(OembedError::MissingUrl.kind(), ErrorKind::InvalidInput);
        assert_eq!(
            OembedError::NothingDiscovered("http://a/".into()).kind(),
            ErrorKind::ResolutionFailure
        );
        assert_eq!(
            OembedError::Http { status: 404, url: "http://a/".into() }.kind(),
            ErrorKind::TransportFailure
        );
        assert_eq!(
            OembedError::MalformedResponse("x".into()).kind(),
            ErrorKind::MalformedResponse
        );
    }
}
