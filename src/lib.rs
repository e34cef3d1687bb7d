//! restverb - a small REST client over reqwest
//!
//! restverb wraps an existing HTTP stack with the handful of things a REST
//! caller usually needs and nothing more.
//!
//! ## Features
//!
//! - **Convenience verbs**: GET, HEAD, DELETE, PUT and POST
//! - **Per-request TLS options**: peer verification, CA bundles and client
//!   certificates
//! - **Basic authentication** from request options
//! - **Proxy discovery** from `HTTP_PROXY` / `HTTPS_PROXY` (and their
//!   lowercase forms), chosen by the scheme of the request URL
//! - **Pluggable transport** so calls can be stubbed in tests
//!
//! ## Quick Start
//!
//! ```no_run
//! use restverb::{Client, Response};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new();
//!     let response: Response = client.get("https://httpbin.org/json").send().await?;
//!
//!     println!("Status: {}", response.status());
//!     println!("Body: {}", response.text());
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod env;
pub mod error;
pub mod options;
pub mod proxy;
pub mod request;
pub mod response;
pub mod tls;
pub mod transport;

// Re-export main types for convenience
pub use client::{Client, ClientBuilder};
pub use env::Environment;
pub use error::{Error, Result};
pub use options::RequestOptions;
pub use proxy::ProxySettings;
pub use request::{Request, RequestBuilder, Verb};
pub use response::Response;
pub use tls::TlsSettings;
pub use transport::{Call, HttpTransport, Transport, TransportBuilder, TransportConfig};

// Re-export common HTTP types
pub use http::{HeaderMap, HeaderValue, Method, StatusCode};

// Re-export URL types
pub use url::Url;

// Re-export common traits
pub use async_trait::async_trait;
