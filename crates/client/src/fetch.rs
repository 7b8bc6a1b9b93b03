//! Resource fetcher boundary.
//!
//! The object mapper never talks HTTP itself. It hands a [`FetchRequest`] to
//! an injected [`Fetcher`] and gets back the server-declared resource type,
//! the raw body and a success flag. [`crate::http::HttpFetcher`] is the
//! production implementation; tests script their own.
//!
//! # Status mapping
//!
//! | Status | Outcome |
//! |--------|---------|
//! | 2xx | `success = true` |
//! | 400 | [`TransportError::BadRequest`] |
//! | 403 | [`TransportError::Forbidden`] |
//! | 404 | [`TransportError::NotFound`] |
//! | 500 | [`TransportError::InternalServerError`] |
//! | other | `success = false` |

use std::fmt;

use thiserror::Error;
use tracing::error;

/// Declared type the API still sends for persons on some endpoints.
const LEGACY_PERSON_TYPE: &str = "blog";

/// Errors raised by the transport layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server rejected the request as malformed (HTTP 400).
    #[error("bad request to \"{url}\"; check it for malformed data")]
    BadRequest {
        /// Target URL.
        url: String,
        /// Request body that was sent, if any.
        body: Option<String>,
    },

    /// Access to the resource is forbidden (HTTP 403).
    #[error("access to \"{url}\" is forbidden")]
    Forbidden {
        /// Target URL.
        url: String,
    },

    /// The resource does not exist (HTTP 404).
    #[error("requested resource \"{url}\" is not found")]
    NotFound {
        /// Target URL.
        url: String,
    },

    /// The server failed while handling the request (HTTP 500).
    #[error("internal server error occurred while opening \"{url}\"")]
    InternalServerError {
        /// Target URL.
        url: String,
    },

    /// The redirect chain exceeded the configured limit.
    #[error("too many redirects while opening \"{url}\"")]
    TooManyRedirects {
        /// URL of the last hop.
        url: String,
    },

    /// A redirect response carried no usable `Location` header.
    #[error("redirect from \"{url}\" has no usable Location header")]
    MissingLocation {
        /// URL that answered with the redirect.
        url: String,
    },

    /// The request URL could not be parsed.
    #[error("invalid URL \"{url}\": {source}")]
    InvalidUrl {
        /// Offending URL.
        url: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },

    /// Connection-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// HTTP methods used against resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Read a resource.
    Get,
    /// Create a resource under a collection URL.
    Post,
    /// Replace a resource at its edit link.
    Put,
    /// Remove a resource at its edit link.
    Delete,
}

impl Method {
    /// Returns the HTTP method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One request handed to a [`Fetcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest<'a> {
    /// Fully resolved URL.
    pub url: &'a str,
    /// HTTP method.
    pub method: Method,
    /// Request body for writes.
    pub body: Option<&'a [u8]>,
    /// Content type of the body, without charset.
    pub content_type: Option<&'a str>,
}

impl<'a> FetchRequest<'a> {
    /// A GET request.
    pub fn get(url: &'a str) -> Self {
        Self {
            url,
            method: Method::Get,
            body: None,
            content_type: None,
        }
    }

    /// A POST request carrying a document.
    pub fn post(url: &'a str, body: &'a [u8], content_type: &'a str) -> Self {
        Self {
            url,
            method: Method::Post,
            body: Some(body),
            content_type: Some(content_type),
        }
    }

    /// A PUT request carrying a document.
    pub fn put(url: &'a str, body: &'a [u8], content_type: &'a str) -> Self {
        Self {
            url,
            method: Method::Put,
            body: Some(body),
            content_type: Some(content_type),
        }
    }

    /// A DELETE request.
    pub fn delete(url: &'a str) -> Self {
        Self {
            url,
            method: Method::Delete,
            body: None,
            content_type: None,
        }
    }
}

/// What a fetch returns: `(declaredType, body, success)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchResponse {
    /// The `type=` parameter of the response content type.
    pub declared_type: Option<String>,
    /// Raw response body.
    pub body: Vec<u8>,
    /// True for 2xx responses.
    pub success: bool,
}

impl FetchResponse {
    /// A successful response with the given declared type and body.
    pub fn ok(declared_type: Option<&str>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            declared_type: declared_type.map(str::to_string),
            body: body.into(),
            success: true,
        }
    }

    /// Returns true when the body holds anything besides whitespace.
    pub fn has_body(&self) -> bool {
        !self.body.iter().all(u8::is_ascii_whitespace)
    }
}

/// Performs requests against the resource API.
///
/// Implementations follow redirects themselves and classify statuses with
/// [`classify_status`].
pub trait Fetcher: Send + Sync {
    /// Executes one logical request.
    fn fetch(&self, request: &FetchRequest<'_>) -> Result<FetchResponse, TransportError>;
}

/// Maps a final HTTP status to the success flag or a transport error.
pub fn classify_status(
    status: u16,
    url: &str,
    body: Option<&[u8]>,
) -> Result<bool, TransportError> {
    let url = url.to_string();
    let failure = match status {
        400 => TransportError::BadRequest {
            url,
            body: body.map(|b| String::from_utf8_lossy(b).into_owned()),
        },
        403 => TransportError::Forbidden { url },
        404 => TransportError::NotFound { url },
        500 => TransportError::InternalServerError { url },
        200..=299 => return Ok(true),
        _ => return Ok(false),
    };
    error!(status, error = %failure, "Request failed");
    Err(failure)
}

/// Extracts the resource type from a `Content-Type` header value.
///
/// Example: `application/x-yaru+xml; type=person; charset=utf-8` yields
/// `person`.
pub fn declared_type(content_type: &str) -> Option<String> {
    let value = content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("type") {
            Some(value.trim().trim_matches('"'))
        } else {
            None
        }
    })?;

    match value {
        "" => None,
        LEGACY_PERSON_TYPE => Some("person".to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_type_from_content_type() {
        assert_eq!(
            declared_type("application/x-yaru+xml; type=person; charset=utf-8"),
            Some("person".to_string())
        );
        assert_eq!(
            declared_type("application/atom+xml;type=entry"),
            Some("entry".to_string())
        );
        assert_eq!(
            declared_type("application/atom+xml; TYPE=\"clubs\""),
            Some("clubs".to_string())
        );
        assert_eq!(declared_type("application/atom+xml"), None);
        assert_eq!(declared_type("application/atom+xml; type="), None);
        assert_eq!(declared_type("application/atom+xml; charset=utf-8"), None);
    }

    #[test]
    fn test_declared_type_legacy_blog_is_person() {
        assert_eq!(
            declared_type("application/x-yaru+xml; type=blog"),
            Some("person".to_string())
        );
    }

    #[test]
    fn test_classify_status() {
        assert!(classify_status(200, "u", None).unwrap());
        assert!(classify_status(201, "u", None).unwrap());
        assert!(classify_status(204, "u", None).unwrap());
        assert!(!classify_status(401, "u", None).unwrap());
        assert!(!classify_status(409, "u", None).unwrap());

        assert!(matches!(
            classify_status(400, "u", Some(b"<entry/>")),
            Err(TransportError::BadRequest { body: Some(_), .. })
        ));
        assert!(matches!(classify_status(403, "u", None), Err(TransportError::Forbidden { .. })));
        assert!(matches!(classify_status(404, "u", None), Err(TransportError::NotFound { .. })));
        assert!(matches!(
            classify_status(500, "u", None),
            Err(TransportError::InternalServerError { .. })
        ));
    }

    #[test]
    fn test_has_body() {
        assert!(!FetchResponse::ok(None, "").has_body());
        assert!(!FetchResponse::ok(None, " \n").has_body());
        assert!(FetchResponse::ok(None, "<a/>").has_body());
    }
}
