use std::error::Error as StdError;
use std::io::ErrorKind;
use std::time::Duration;
use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, Request as ReqwestRequest};

use crate::error::{Error, Result};
use crate::proxy::ProxySettings;
use crate::response::Response;
use crate::tls::TlsSettings;

/// A prepared call, ready to hand to a transport
///
/// The TLS plan and proxy apply to this call only.
#[derive(Debug)]
pub struct Call {
    /// The request with method, URL, headers, body and credentials applied
    pub request: ReqwestRequest,
    /// TLS settings resolved from the request options
    pub tls: TlsSettings,
    /// Proxy settings for the request's scheme, if any
    pub proxy: Option<ProxySettings>,
}

/// Transport trait for HTTP operations
///
/// This trait abstracts the network, so a call can be executed by reqwest
/// or by a stub in tests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute a call and return the response
    async fn execute(&self, call: Call) -> Result<Response>;

    /// Get the transport name
    fn name(&self) -> &str;
}

/// Transport configuration
#[derive(Clone, Debug)]
pub struct TransportConfig {
    /// Total request timeout
    pub timeout: Option<Duration>,
    /// Connection timeout
    pub connect_timeout: Option<Duration>,
    /// User agent sent with each request
    pub user_agent: String,
    /// Maximum redirects to follow; zero disables redirects
    pub max_redirects: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: None,
            user_agent: concat!("restverb/", env!("CARGO_PKG_VERSION")).to_string(),
            max_redirects: 10,
        }
    }
}

/// Transport builder for creating transport configurations
pub struct TransportBuilder {
    config: TransportConfig,
}

impl TransportBuilder {
    /// Create a new transport builder
    pub fn new() -> Self {
        Self {
            config: TransportConfig::default(),
        }
    }

    /// Set the total request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.config.user_agent = user_agent.to_string();
        self
    }

    /// Set the maximum redirects to follow
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.config.max_redirects = max;
        self
    }

    /// Build the transport configuration
    pub fn build(self) -> TransportConfig {
        self.config
    }
}

impl Default for TransportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Default HTTP transport implementation using reqwest
///
/// A client is built for every call so TLS and proxy settings never leak
/// from one request into the next.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    config: TransportConfig,
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    /// Get the transport configuration
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    fn client_for(&self, call: &Call) -> Result<ReqwestClient> {
        // Proxies come from our own resolution only.
        let mut builder = ReqwestClient::builder()
            .no_proxy()
            .user_agent(self.config.user_agent.clone())
            .redirect(if self.config.max_redirects == 0 {
                reqwest::redirect::Policy::none()
            } else {
                reqwest::redirect::Policy::limited(self.config.max_redirects)
            });

        if let Some(timeout) = self.config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = self.config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        builder = call.tls.apply_to_builder(builder)?;
        if let Some(proxy) = &call.proxy {
            tracing::debug!(proxy = %proxy.authority(), "routing through proxy");
            builder = proxy.apply_to_builder(builder)?;
        }

        builder.build().map_err(Error::Network)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, call: Call) -> Result<Response> {
        let client = self.client_for(&call)?;
        let response = client
            .execute(call.request)
            .await
            .map_err(classify_error)?;

        Response::from_reqwest_response(response)
            .await
            .map_err(classify_error)
    }

    fn name(&self) -> &str {
        "reqwest"
    }
}

/// Map a reqwest failure onto the crate error kinds
///
/// A connection that ended early becomes [`Error::Disconnected`]; every
/// other failure is passed through as [`Error::Network`].
pub fn classify_error(err: reqwest::Error) -> Error {
    if is_disconnect(&err) {
        Error::disconnected(err.to_string())
    } else {
        Error::Network(err)
    }
}

/// Check whether an error, or anything in its source chain, is an
/// unexpected end of the connection
pub fn is_disconnect(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            if matches!(
                io.kind(),
                ErrorKind::UnexpectedEof
                    | ErrorKind::ConnectionReset
                    | ErrorKind::ConnectionAborted
                    | ErrorKind::BrokenPipe
            ) {
                return true;
            }
        }
        // hyper 0.14 (under reqwest 0.11) reports a peer hang-up without an
        // io::Error underneath; test_peer_hang_up_is_disconnected in
        // tests/http_transport.rs fails if the wording changes.
        if err.to_string().contains("connection closed before message completed") {
            return true;
        }
        current = err.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Wrapped(std::io::Error);

    impl std::fmt::Display for Wrapped {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "request failed")
        }
    }

    impl StdError for Wrapped {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_eof_is_disconnect() {
        let err = std::io::Error::new(ErrorKind::UnexpectedEof, "eof");
        assert!(is_disconnect(&err));
    }

    #[test]
    fn test_nested_reset_is_disconnect() {
        let err = Wrapped(std::io::Error::new(ErrorKind::ConnectionReset, "reset"));
        assert!(is_disconnect(&err));
    }

    #[derive(Debug)]
    struct HungUp;

    impl std::fmt::Display for HungUp {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "connection closed before message completed")
        }
    }

    impl StdError for HungUp {}

    #[test]
    fn test_incomplete_message_is_disconnect() {
        assert!(is_disconnect(&HungUp));
    }

    #[test]
    fn test_refused_is_not_disconnect() {
        let err = Wrapped(std::io::Error::new(ErrorKind::ConnectionRefused, "refused"));
        assert!(!is_disconnect(&err));
    }

    #[test]
    fn test_transport_builder() {
        let config = TransportBuilder::new()
            .timeout(Duration::from_secs(5))
            .user_agent("test/1.0")
            .max_redirects(0)
            .build();

        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.connect_timeout, None);
        assert_eq!(config.user_agent, "test/1.0");
        assert_eq!(config.max_redirects, 0);
    }

    #[test]
    fn test_http_transport_name() {
        let transport = HttpTransport::default();
        assert_eq!(transport.name(), "reqwest");
        assert!(transport.config().user_agent.starts_with("restverb/"));
    }
}
