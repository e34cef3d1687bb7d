use std::fmt;
use std::str::FromStr;
use http::{HeaderMap, HeaderValue, Method};
use reqwest::Request as ReqwestRequest;
use url::Url;

use crate::auth::BasicAuth;
use crate::client::Client;
use crate::env::Environment;
use crate::error::{Error, Result};
use crate::options::RequestOptions;
use crate::proxy::ProxySettings;
use crate::response::Response;
use crate::tls::TlsSettings;
use crate::transport::{Call, Transport};

/// The verbs a request may use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// GET
    Get,
    /// HEAD
    Head,
    /// DELETE
    Delete,
    /// PUT
    Put,
    /// POST
    Post,
}

impl Verb {
    /// Every supported verb
    pub const ALL: [Verb; 5] = [Verb::Get, Verb::Head, Verb::Delete, Verb::Put, Verb::Post];

    /// The HTTP method for this verb
    pub fn as_method(&self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Head => Method::HEAD,
            Verb::Delete => Method::DELETE,
            Verb::Put => Method::PUT,
            Verb::Post => Method::POST,
        }
    }
}

impl TryFrom<&Method> for Verb {
    type Error = Error;

    fn try_from(method: &Method) -> Result<Self> {
        Verb::ALL
            .into_iter()
            .find(|verb| verb.as_method() == *method)
            .ok_or_else(|| Error::invalid_argument(format!("Unsupported verb: {}", method)))
    }
}

impl FromStr for Verb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let method = Method::from_bytes(s.to_ascii_uppercase().as_bytes())?;
        Verb::try_from(&method)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_method().as_str())
    }
}

impl From<Verb> for Method {
    fn from(verb: Verb) -> Self {
        verb.as_method()
    }
}

/// HTTP request representation
///
/// A request holds everything needed for one call: method, URL, body,
/// headers and options. The method is only checked against the supported
/// verbs when the request is performed, and nothing touches the network
/// before that check passes.
#[derive(Clone, Debug)]
pub struct Request {
    method: Method,
    url: Url,
    body: Vec<u8>,
    headers: HeaderMap,
    options: RequestOptions,
}

impl Request {
    /// Create a new request with an empty body, no headers and no options
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            body: Vec::new(),
            headers: HeaderMap::new(),
            options: RequestOptions::default(),
        }
    }

    /// Create a request from a method name and URL string
    pub fn parse(method: &str, url: &str) -> Result<Self> {
        let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())?;
        Ok(Self::new(method, Url::parse(url)?))
    }

    /// Get the HTTP method
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Get the URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Get the body
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Get the headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get mutable access to headers
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Get the options
    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    /// Get mutable access to options
    pub fn options_mut(&mut self) -> &mut RequestOptions {
        &mut self.options
    }

    /// Set the body
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Add a header, keeping earlier values of the same name
    pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = name.parse::<http::header::HeaderName>()?;
        let value = value.parse::<HeaderValue>()?;
        self.headers.append(name, value);
        Ok(self)
    }

    /// Replace the headers
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Replace the options
    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// The supported verb this request uses
    pub fn verb(&self) -> Result<Verb> {
        Verb::try_from(&self.method)
    }

    /// Resolve TLS, proxy and credentials into a call for a transport
    ///
    /// Fails with [`Error::InvalidArgument`] for unsupported verbs before
    /// reading any settings.
    pub fn prepare(self, env: &Environment) -> Result<Call> {
        let verb = self.verb()?;
        let tls = TlsSettings::from_options(&self.options)?;
        let proxy = ProxySettings::for_url(&self.url, env)?;

        let mut request = ReqwestRequest::new(verb.as_method(), self.url);
        *request.headers_mut() = self.headers;
        if let Some(auth) = BasicAuth::from_options(&self.options) {
            tracing::debug!(username = %auth.username, "applying basic auth");
            auth.apply_to_headers(request.headers_mut())?;
        }
        if !self.body.is_empty() {
            *request.body_mut() = Some(self.body.into());
        }

        Ok(Call {
            request,
            tls,
            proxy,
        })
    }

    /// Send the request using the default transport and the process
    /// environment as it is right now
    pub async fn perform(self) -> Result<Response> {
        Client::new().execute(self).await
    }

    /// Send the request through `transport`, resolving proxies from `env`
    pub async fn perform_with(self, transport: &dyn Transport, env: &Environment) -> Result<Response> {
        let call = self.prepare(env)?;
        tracing::debug!(
            method = %call.request.method(),
            url = %call.request.url(),
            transport = transport.name(),
            "performing request"
        );
        transport.execute(call).await
    }
}

/// Builder for creating and sending requests through a [`Client`]
///
/// Errors from invalid URLs or headers are held until [`RequestBuilder::send`].
pub struct RequestBuilder {
    client: Client,
    request: Result<Request>,
}

impl RequestBuilder {
    /// Create a new request builder
    pub fn new(client: Client, request: Result<Request>) -> Self {
        Self { client, request }
    }

    fn map(mut self, f: impl FnOnce(Request) -> Result<Request>) -> Self {
        self.request = self.request.and_then(f);
        self
    }

    /// Add a header
    pub fn header(self, name: &str, value: &str) -> Self {
        self.map(|request| request.header(name, value))
    }

    /// Add every header in `headers`
    pub fn headers(self, headers: HeaderMap) -> Self {
        self.map(|mut request| {
            for (name, value) in headers.iter() {
                request.headers_mut().append(name.clone(), value.clone());
            }
            Ok(request)
        })
    }

    /// Set the body
    pub fn body(self, body: impl Into<Vec<u8>>) -> Self {
        let body = body.into();
        self.map(|request| Ok(request.with_body(body)))
    }

    /// Set a text body
    pub fn text(self, body: &str) -> Self {
        self.header("Content-Type", "text/plain").body(body)
    }

    /// Set a JSON body
    pub fn json<T>(self, body: &T) -> Self
    where
        T: serde::Serialize,
    {
        let body = serde_json::to_vec(body).map_err(Error::from);
        self.header("Content-Type", "application/json")
            .map(|request| Ok(request.with_body(body?)))
    }

    /// Set basic authentication
    pub fn basic_auth(self, username: &str, password: Option<&str>) -> Self {
        self.map(|mut request| {
            let options = std::mem::take(request.options_mut()).basic_auth(username, password);
            Ok(request.with_options(options))
        })
    }

    /// Replace the options
    pub fn options(self, options: RequestOptions) -> Self {
        self.map(|request| Ok(request.with_options(options)))
    }

    /// Set one option by key
    pub fn option(self, key: &str, value: &str) -> Self {
        self.map(|mut request| {
            request.options_mut().set(key, value)?;
            Ok(request)
        })
    }

    /// Build the request
    pub fn build(self) -> Result<Request> {
        self.request
    }

    /// Send the request and return the response
    pub async fn send(self) -> Result<Response> {
        let request = self.request?;
        self.client.execute(request).await
    }
}
