use http::{header::AUTHORIZATION, HeaderMap, HeaderValue};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

use crate::error::Result;
use crate::options::RequestOptions;

/// Basic-auth credentials taken from request options
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    /// User name
    pub username: String,
    /// Password; a missing password encodes as empty
    pub password: Option<String>,
}

impl BasicAuth {
    /// Create new basic-auth credentials
    pub fn new(username: &str, password: Option<&str>) -> Self {
        Self {
            username: username.to_string(),
            password: password.map(str::to_string),
        }
    }

    /// Credentials from request options, present when a username is set
    pub fn from_options(options: &RequestOptions) -> Option<Self> {
        options
            .username
            .as_deref()
            .map(|username| Self::new(username, options.password.as_deref()))
    }

    /// Get the authorization header value
    pub fn authorization_header(&self) -> Result<HeaderValue> {
        let credentials = format!(
            "{}:{}",
            self.username,
            self.password.as_deref().unwrap_or("")
        );
        let mut value = format!("Basic {}", BASE64.encode(credentials.as_bytes()))
            .parse::<HeaderValue>()?;
        value.set_sensitive(true);
        Ok(value)
    }

    /// Apply the credentials to headers, replacing any existing authorization
    pub fn apply_to_headers(&self, headers: &mut HeaderMap) -> Result<()> {
        headers.insert(AUTHORIZATION, self.authorization_header()?);
        Ok(())
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_auth_header() {
        let auth = BasicAuth::new("rob", Some("secret"));
        let header = auth.authorization_header().unwrap();
        assert_eq!(header.to_str().unwrap(), "Basic cm9iOnNlY3JldA==");
        assert!(header.is_sensitive());
    }

    #[test]
    fn test_missing_password_encodes_empty() {
        let auth = BasicAuth::new("rob", None);
        let header = auth.authorization_header().unwrap();
        assert_eq!(header.to_str().unwrap(), "Basic cm9iOg==");
    }

    #[test]
    fn test_from_options() {
        assert_eq!(BasicAuth::from_options(&RequestOptions::new()), None);

        let options = RequestOptions::new().basic_auth("rob", Some("secret"));
        let auth = BasicAuth::from_options(&options).unwrap();
        assert_eq!(auth, BasicAuth::new("rob", Some("secret")));
    }

    #[test]
    fn test_apply_replaces_existing_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer old"));
        BasicAuth::new("rob", Some("secret"))
            .apply_to_headers(&mut headers)
            .unwrap();
        assert_eq!(headers.get_all(AUTHORIZATION).iter().count(), 1);
        assert_eq!(headers[AUTHORIZATION], "Basic cm9iOnNlY3JldA==");
    }
}
