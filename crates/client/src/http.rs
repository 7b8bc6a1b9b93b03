//! Blocking HTTP implementation of [`Fetcher`].

use std::time::Duration;

use reqwest::blocking::{Client as HttpClient, Response};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, LOCATION};
use reqwest::redirect::Policy;
use tracing::{debug, info};
use url::Url;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::fetch::{
    FetchRequest, FetchResponse, Fetcher, Method, TransportError, classify_status, declared_type,
};

/// Fetcher backed by `reqwest`'s blocking client.
///
/// Redirects are followed here rather than by `reqwest`: 301, 302 and 303
/// re-issue the same method and body at the `Location` target, up to the
/// configured number of hops.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: HttpClient,
    access_token: Option<String>,
    max_redirects: usize,
}

impl HttpFetcher {
    /// Builds a fetcher from the client configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .redirect(Policy::none())
            .timeout(Duration::from_secs(config.request_timeout))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(TransportError::from)?;

        Ok(Self {
            http,
            access_token: config.resolve_access_token()?,
            max_redirects: config.max_redirects,
        })
    }

    fn send(
        &self,
        url: &Url,
        request: &FetchRequest<'_>,
    ) -> std::result::Result<Response, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.http.request(method, url.clone());
        if let Some(token) = &self.access_token {
            builder = builder.header(AUTHORIZATION, format!("OAuth {}", token));
        }
        if let Some(content_type) = request.content_type {
            builder = builder.header(CONTENT_TYPE, format!("{}; charset=utf-8", content_type));
        }
        if let Some(body) = request.body {
            builder = builder.body(body.to_vec());
        }
        Ok(builder.send()?)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(
        &self,
        request: &FetchRequest<'_>,
    ) -> std::result::Result<FetchResponse, TransportError> {
        let mut url = Url::parse(request.url).map_err(|source| TransportError::InvalidUrl {
            url: request.url.to_string(),
            source,
        })?;
        let mut hops = 0;

        let response = loop {
            info!(url = %url, method = %request.method, "Opening URL");
            let response = self.send(&url, request)?;
            if !is_redirect(response.status().as_u16()) {
                break response;
            }

            hops += 1;
            if hops > self.max_redirects {
                return Err(TransportError::TooManyRedirects {
                    url: url.to_string(),
                });
            }
            let next = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|location| url.join(location).ok())
                .ok_or_else(|| TransportError::MissingLocation {
                    url: url.to_string(),
                })?;
            info!(location = %next, "Redirected");
            url = next;
        };

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes()?.to_vec();
        if !body.is_empty() {
            debug!(status, body = %String::from_utf8_lossy(&body), "Response received");
        }

        let success = classify_status(status, url.as_str(), request.body)?;
        Ok(FetchResponse {
            declared_type: content_type.as_deref().and_then(declared_type),
            body,
            success,
        })
    }
}

fn is_redirect(status: u16) -> bool {
    matches!(status, 301 | 302 | 303)
}
