use thiserror::Error;

/// Result type for restverb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for restverb
#[derive(Error, Debug)]
pub enum Error {
    /// Unsupported verb, unknown header or malformed option
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The connection ended before a response completed
    #[error("Disconnected: {0}")]
    Disconnected(String),

    /// Any other transport failure, unchanged
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing errors
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// HTTP protocol errors
    #[error("HTTP error: {0}")]
    Http(#[from] http::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// SSL/TLS errors
    #[error("SSL/TLS error: {0}")]
    Tls(String),

    /// Proxy errors
    #[error("Proxy error: {0}")]
    Proxy(String),

    /// Filesystem errors while loading key material
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    /// Create a new disconnect error
    pub fn disconnected(message: impl Into<String>) -> Self {
        Error::Disconnected(message.into())
    }

    /// Create a new TLS error
    pub fn tls(message: impl Into<String>) -> Self {
        Error::Tls(message.into())
    }

    /// Create a new proxy error
    pub fn proxy(message: impl Into<String>) -> Self {
        Error::Proxy(message.into())
    }

    /// Check if this is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }

    /// Check if this is a disconnect error
    pub fn is_disconnected(&self) -> bool {
        matches!(self, Error::Disconnected(_))
    }

    /// Check if this is a network error
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_))
    }

    /// Check if this is a TLS error
    pub fn is_tls(&self) -> bool {
        matches!(self, Error::Tls(_))
    }

    /// Get the underlying reqwest error if this is a network error
    pub fn as_network_error(&self) -> Option<&reqwest::Error> {
        match self {
            Error::Network(e) => Some(e),
            _ => None,
        }
    }
}

impl From<http::header::InvalidHeaderName> for Error {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Error::InvalidArgument(format!("Invalid header name: {}", err))
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Error::InvalidArgument(format!("Invalid header value: {}", err))
    }
}

impl From<http::method::InvalidMethod> for Error {
    fn from(err: http::method::InvalidMethod) -> Self {
        Error::InvalidArgument(format!("Invalid method: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_predicates() {
        assert!(Error::invalid_argument("verb").is_invalid_argument());
        assert!(Error::disconnected("eof").is_disconnected());
        assert!(Error::tls("bad pem").is_tls());
        assert!(!Error::proxy("no host").is_network());
    }

    #[test]
    fn test_header_errors_are_invalid_arguments() {
        let err: Error = "bad header"
            .parse::<http::header::HeaderName>()
            .unwrap_err()
            .into();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_error_display() {
        let err = Error::invalid_argument("unsupported verb PATCH");
        assert_eq!(err.to_string(), "Invalid argument: unsupported verb PATCH");
    }
}
