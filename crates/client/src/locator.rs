//! Identifier to URL resolution.

use tracing::debug;
use url::form_urlencoded;

/// Prefix of canonical resource URNs.
pub const URN_PREFIX: &str = "urn:ya.ru:";

/// Resolves resource identifiers against the API base URL.
///
/// | Identifier | URL |
/// |------------|-----|
/// | `https://host/path/` | unchanged |
/// | `urn:ya.ru:person/1` | `{api}/resource/?id=urn%3Aya.ru%3Aperson%2F1` |
/// | `/me/` or `me/` | `{api}/me/` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocator {
    api_server: String,
}

impl ResourceLocator {
    /// Creates a locator for the given base URL.
    pub fn new(api_server: impl Into<String>) -> Self {
        let mut api_server = api_server.into();
        while api_server.ends_with('/') {
            api_server.pop();
        }
        Self { api_server }
    }

    /// Base URL without a trailing slash.
    pub fn api_server(&self) -> &str {
        &self.api_server
    }

    /// Returns the URL to fetch for an identifier.
    pub fn resolve(&self, identifier: &str) -> String {
        debug!(identifier, "Resource requested");
        let name = identifier.trim_start_matches('/');

        if is_absolute(name) {
            name.to_string()
        } else if name.starts_with(URN_PREFIX) {
            let query = form_urlencoded::Serializer::new(String::new())
                .append_pair("id", name)
                .finish();
            format!("{}/resource/?{}", self.api_server, query)
        } else {
            format!("{}/{}", self.api_server, name)
        }
    }
}

/// Returns true for identifiers that already are HTTP(S) URLs.
pub fn is_absolute(identifier: &str) -> bool {
    identifier.starts_with("http://") || identifier.starts_with("https://")
}
