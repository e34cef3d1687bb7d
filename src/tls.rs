use std::path::PathBuf;
use reqwest::{ClientBuilder as ReqwestBuilder, Certificate, Identity};
use rustls_native_certs::load_native_certs;

use crate::error::{Error, Result};
use crate::options::RequestOptions;

/// Peer certificate verification mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyMode {
    /// Leave the transport's own default in place
    Default,
    /// Verify the peer certificate
    Peer,
    /// Accept any peer certificate
    None,
}

/// Where trusted CA certificates come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaSource {
    /// The platform's native root store
    Native,
    /// A PEM bundle on disk, used as the only trust anchor
    File(PathBuf),
}

/// Where the client identity (key + certificate) comes from
#[derive(Clone, PartialEq, Eq)]
pub enum IdentitySource {
    /// Separate PEM key and certificate
    KeyAndCertificate { key: String, certificate: String },
    /// One PEM blob holding both
    Combined(String),
    /// A PEM file holding both
    File(PathBuf),
}

impl std::fmt::Debug for IdentitySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentitySource::KeyAndCertificate { .. } => write!(f, "KeyAndCertificate"),
            IdentitySource::Combined(_) => write!(f, "Combined"),
            IdentitySource::File(path) => write!(f, "File({})", path.display()),
        }
    }
}

impl IdentitySource {
    /// Load the PEM text for this identity
    pub fn to_pem(&self) -> Result<Vec<u8>> {
        match self {
            IdentitySource::KeyAndCertificate { key, certificate } => {
                let mut pem = Vec::with_capacity(key.len() + certificate.len() + 1);
                pem.extend_from_slice(key.as_bytes());
                pem.push(b'\n');
                pem.extend_from_slice(certificate.as_bytes());
                Ok(pem)
            }
            IdentitySource::Combined(pem) => Ok(pem.as_bytes().to_vec()),
            IdentitySource::File(path) => std::fs::read(path).map_err(|e| {
                Error::tls(format!(
                    "Failed to read client key and certificate {}: {}",
                    path.display(),
                    e
                ))
            }),
        }
    }
}

/// TLS settings resolved from request options
///
/// Resolution happens once per call; nothing here outlives the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsSettings {
    /// Peer verification mode
    pub verify: VerifyMode,
    /// Trusted CA source, if any is applied explicitly
    pub ca: Option<CaSource>,
    /// Client identity, if any
    pub identity: Option<IdentitySource>,
}

impl Default for TlsSettings {
    fn default() -> Self {
        Self {
            verify: VerifyMode::Default,
            ca: None,
            identity: None,
        }
    }
}

impl TlsSettings {
    /// Resolve the TLS plan for a request
    ///
    /// An explicit key and certificate pair wins over a combined PEM, which
    /// wins over a combined PEM file. With `tls_verify` on, the native roots
    /// are trusted unless `tls_ca_file` names a bundle.
    pub fn from_options(options: &RequestOptions) -> Result<Self> {
        let identity = match (&options.tls_key, &options.tls_certificate) {
            (Some(key), Some(certificate)) => Some(IdentitySource::KeyAndCertificate {
                key: key.clone(),
                certificate: certificate.clone(),
            }),
            (Some(_), None) | (None, Some(_)) => {
                return Err(Error::invalid_argument(
                    "tls_key and tls_certificate must be supplied together",
                ))
            }
            (None, None) => options
                .tls_key_and_certificate
                .clone()
                .map(IdentitySource::Combined)
                .or_else(|| {
                    options
                        .tls_key_and_certificate_file
                        .clone()
                        .map(IdentitySource::File)
                }),
        };

        let explicit_ca = options.tls_ca_file.clone().map(CaSource::File);
        let (verify, ca) = match options.tls_verify {
            Some(true) => (VerifyMode::Peer, explicit_ca.or(Some(CaSource::Native))),
            Some(false) => (VerifyMode::None, None),
            None => (VerifyMode::Default, explicit_ca),
        };

        Ok(Self {
            verify,
            ca,
            identity,
        })
    }

    /// Check whether the peer certificate will be verified
    pub fn verifies_peer(&self) -> bool {
        self.verify != VerifyMode::None
    }

    /// Apply this configuration to a reqwest client builder
    pub fn apply_to_builder(&self, mut builder: ReqwestBuilder) -> Result<ReqwestBuilder> {
        if let Some(identity) = &self.identity {
            tracing::debug!(source = ?identity, "applying client identity");
            let pem = identity.to_pem()?;
            let identity = Identity::from_pem(&pem)
                .map_err(|e| Error::tls(format!("Invalid client key or certificate: {}", e)))?;
            builder = builder.identity(identity);
        }

        if self.verify == VerifyMode::None {
            tracing::debug!("peer verification disabled");
            return Ok(builder.danger_accept_invalid_certs(true));
        }

        match &self.ca {
            Some(CaSource::File(path)) => {
                let data = std::fs::read(path).map_err(|e| {
                    Error::tls(format!("Failed to read CA file {}: {}", path.display(), e))
                })?;
                let cert = Certificate::from_pem(&data)
                    .map_err(|e| Error::tls(format!("Invalid CA file {}: {}", path.display(), e)))?;
                tracing::debug!(ca_file = %path.display(), "trusting CA file only");
                builder = builder
                    .tls_built_in_root_certs(false)
                    .add_root_certificate(cert);
            }
            Some(CaSource::Native) => {
                let certs = load_native_certs()
                    .map_err(|e| Error::tls(format!("Failed to load native certificates: {}", e)))?;
                tracing::debug!(count = certs.len(), "trusting native root certificates");
                for cert in certs {
                    let cert = Certificate::from_der(cert.as_ref())
                        .map_err(|e| Error::tls(format!("Invalid native certificate: {}", e)))?;
                    builder = builder.add_root_certificate(cert);
                }
            }
            None => {}
        }

        Ok(builder)
    }
}
