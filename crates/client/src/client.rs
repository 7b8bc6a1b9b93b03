//! Client entry point.

use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::dispatch::{AnyResource, spawn};
use crate::error::{Error, Result};
use crate::fetch::{FetchRequest, FetchResponse, Fetcher};
use crate::http::HttpFetcher;
use crate::locator::ResourceLocator;
use crate::resource::ResourceObject;

/// Resolves identifiers and performs requests for resource objects.
///
/// The client itself holds no per-object state and can be shared; objects
/// borrow it for every operation that may reach the network.
pub struct Client {
    locator: ResourceLocator,
    fetcher: Box<dyn Fetcher>,
}

impl Client {
    /// Creates a client talking HTTP as configured.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|errors| Error::Config(errors.join("; ")))?;
        let fetcher = HttpFetcher::new(config)?;
        info!(api_server = %config.api_server, "Client created");
        Ok(Self::with_fetcher(
            ResourceLocator::new(config.api_server.as_str()),
            fetcher,
        ))
    }

    /// Creates a client with a custom fetcher.
    pub fn with_fetcher(locator: ResourceLocator, fetcher: impl Fetcher + 'static) -> Self {
        Self {
            locator,
            fetcher: Box::new(fetcher),
        }
    }

    pub fn locator(&self) -> &ResourceLocator {
        &self.locator
    }

    /// Returns the URL an identifier resolves to.
    pub fn resolve(&self, identifier: &str) -> String {
        self.locator.resolve(identifier)
    }

    /// Reads the resource behind an identifier.
    pub fn get(&self, identifier: &str) -> Result<FetchResponse> {
        let url = self.resolve(identifier);
        Ok(self.fetcher.fetch(&FetchRequest::get(&url))?)
    }

    /// Posts a new document to a collection URL.
    pub fn create(&self, target: &str, body: &[u8], content_type: &str) -> Result<FetchResponse> {
        Ok(self
            .fetcher
            .fetch(&FetchRequest::post(target, body, content_type))?)
    }

    /// Replaces the document at an edit link.
    pub fn update(&self, target: &str, body: &[u8], content_type: &str) -> Result<FetchResponse> {
        Ok(self
            .fetcher
            .fetch(&FetchRequest::put(target, body, content_type))?)
    }

    /// Deletes the resource at an edit link.
    pub fn delete(&self, target: &str) -> Result<FetchResponse> {
        Ok(self.fetcher.fetch(&FetchRequest::delete(target))?)
    }

    /// Fetches a resource and builds the object matching its declared type.
    ///
    /// Returns `Ok(None)` when the server declares no type or one without a
    /// registered object kind.
    pub fn get_object(&self, identifier: &str) -> Result<Option<AnyResource>> {
        let response = self.get(identifier)?;
        if !response.success {
            let url = self.resolve(identifier);
            return Err(Error::failed(
                format!("Unable to fetch resource at \"{}\".", url),
                Some(&url),
            ));
        }

        let Some(mut object) = spawn(
            response.declared_type.as_deref(),
            Some(identifier.to_string()),
        ) else {
            return Ok(None);
        };
        object.parse_body(&response.body)?;
        debug!(kind = %object.kind(), id = object.id(), "Object materialized");
        Ok(Some(object))
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("locator", &self.locator)
            .finish_non_exhaustive()
    }
}
