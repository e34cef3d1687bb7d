use std::collections::HashMap;

/// A snapshot of environment variables.
///
/// Proxy discovery reads from an `Environment` rather than the live process
/// environment, so resolution is a pure function of its inputs. Use
/// [`Environment::capture`] to snapshot the process environment at call time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// Create an empty environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current process environment
    pub fn capture() -> Self {
        // Non-unicode variables cannot name a proxy we could use anyway.
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    /// Set a variable, returning the updated snapshot
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }

    /// Look up a variable by its exact name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Look up the first of `names` that is set to a non-empty value
    pub fn first_of(&self, names: &[&str]) -> Option<&str> {
        names
            .iter()
            .filter_map(|name| self.get(name))
            .find(|value| !value.is_empty())
    }
}

impl<K, V> FromIterator<(K, V)> for Environment
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_sensitive() {
        let env = Environment::new().with("http_proxy", "http://proxy:3128");
        assert_eq!(env.get("http_proxy"), Some("http://proxy:3128"));
        assert_eq!(env.get("HTTP_PROXY"), None);
    }

    #[test]
    fn test_first_of_skips_unset_and_empty() {
        let env: Environment = [("HTTPS_PROXY", ""), ("https_proxy", "http://lower:8080")]
            .into_iter()
            .collect();
        assert_eq!(
            env.first_of(&["HTTPS_PROXY", "https_proxy"]),
            Some("http://lower:8080")
        );
        assert_eq!(env.first_of(&["NOPE"]), None);
    }

    #[test]
    fn test_capture_sees_process_variables() {
        let env = Environment::capture();
        assert_eq!(env.get("PATH").is_some(), std::env::var_os("PATH").is_some());
    }
}
