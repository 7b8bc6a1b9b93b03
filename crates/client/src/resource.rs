//! Base resource state and the lazy lifecycle shared by every object.
//!
//! An object starts either unsaved (no identifier) or as a reference to a
//! server resource that has not been fetched yet. The first attribute read
//! on such a reference fetches and parses the document; after that the
//! object holds the parsed attributes and links until the next explicit
//! [`ResourceObject::get`].

use tracing::debug;
use yaru_xml::{AttributeValue, Attributes, Element, Links, ParsedResource, parse_element};

use crate::client::Client;
use crate::error::{Error, Result};
use crate::kind::ResourceKind;

/// State common to every resource object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    kind: ResourceKind,
    id: Option<String>,
    materialized: bool,
    attributes: Attributes,
    links: Links,
}

impl Resource {
    /// Creates an unmaterialized resource.
    pub fn new(kind: ResourceKind, id: Option<String>) -> Self {
        Self {
            kind,
            id,
            materialized: false,
            attributes: Attributes::new(),
            links: Links::new(),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns true once a document has been assigned.
    pub fn is_materialized(&self) -> bool {
        self.materialized
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Looks up an attribute without fetching.
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Sets an attribute, replacing any previous value.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<AttributeValue> {
        self.attributes.remove(name)
    }

    pub fn links(&self) -> &Links {
        &self.links
    }

    /// Target of the link with the given relation.
    pub fn link(&self, rel: &str) -> Option<&str> {
        self.links.get(rel).map(String::as_str)
    }

    pub(crate) fn set_link(&mut self, rel: &str, href: Option<String>) {
        match href {
            Some(href) => {
                self.links.insert(rel.to_string(), href);
            }
            None => {
                self.links.remove(rel);
            }
        }
    }

    pub(crate) fn clear_id(&mut self) {
        self.id = None;
    }

    /// Replaces attributes and links with a parsed document.
    ///
    /// Nothing from the previous state survives. A scalar `id` in the
    /// document becomes the object's identifier.
    pub(crate) fn assign(&mut self, parsed: ParsedResource) {
        let ParsedResource {
            mut attributes,
            links,
        } = parsed;

        if let Some(id) = attributes
            .get("id")
            .and_then(AttributeValue::as_str)
            .map(str::to_string)
        {
            attributes.remove("id");
            self.id = Some(id);
        }

        self.attributes = attributes;
        self.links = links;
        self.materialized = true;
    }
}

/// Behavior shared by persons, clubs, entries and collections.
///
/// Implementors provide access to their [`Resource`] state and may override
/// [`apply`](ResourceObject::apply) to pull typed fields out of a parsed
/// document, or [`compose`](ResourceObject::compose) to support writes.
pub trait ResourceObject {
    fn resource(&self) -> &Resource;

    fn resource_mut(&mut self) -> &mut Resource;

    /// Assigns a parsed document to this object.
    fn apply(&mut self, document: &Element) -> Result<()> {
        self.resource_mut().assign(parse_element(document));
        Ok(())
    }

    /// Serializes this object for create and update.
    fn compose(&self) -> Result<Vec<u8>> {
        Err(Error::unsupported("compose", self.kind()))
    }

    fn kind(&self) -> ResourceKind {
        self.resource().kind()
    }

    fn id(&self) -> Option<&str> {
        self.resource().id()
    }

    fn is_materialized(&self) -> bool {
        self.resource().is_materialized()
    }

    fn link(&self, rel: &str) -> Option<&str> {
        self.resource().link(rel)
    }

    /// Parses a raw body and assigns it.
    fn parse_body(&mut self, body: &[u8]) -> Result<()> {
        let document = Element::parse(body)?;
        self.apply(&document)
    }

    /// Fetches the resource by its identifier and assigns the document.
    ///
    /// The declared type must match this object's kind, except for entry
    /// collections which accept any declared type. On mismatch nothing is
    /// assigned.
    fn get(&mut self, client: &Client) -> Result<()> {
        let Some(id) = self.id().map(str::to_string) else {
            return Err(Error::failed(
                "Unable to fetch resource: identifier is undefined.",
                None,
            ));
        };

        let response = client.get(&id)?;
        if !response.success {
            let url = client.resolve(&id);
            return Err(Error::failed(
                format!("Unable to fetch resource at \"{}\".", url),
                Some(&url),
            ));
        }

        let kind = self.kind();
        if !kind.accepts(response.declared_type.as_deref()) {
            return Err(Error::TypeMismatch {
                expected: kind,
                declared: response.declared_type,
            });
        }
        self.parse_body(&response.body)
    }

    /// Fetches the resource if it has an identifier and was never fetched.
    fn ensure_materialized(&mut self, client: &Client) -> Result<()> {
        if !self.is_materialized() && self.id().is_some() {
            debug!(id = self.id(), kind = %self.kind(), "Materializing resource");
            self.get(client)?;
        }
        Ok(())
    }

    /// Reads an attribute, materializing the object first when needed.
    fn fetch_attribute(&mut self, client: &Client, name: &str) -> Result<&AttributeValue> {
        self.ensure_materialized(client)?;
        self.resource()
            .attribute(name)
            .ok_or_else(|| Error::UnknownAttribute(name.to_string()))
    }

    /// Creates or updates the resource on the server.
    ///
    /// Without an identifier the composed document is posted to
    /// `target_url` and the response becomes the object's state. With an
    /// identifier it is put to the `edit` link, and a non-empty response is
    /// assigned.
    fn save(&mut self, client: &Client, target_url: Option<&str>) -> Result<()> {
        let data = self.compose()?;
        let content_type = self.kind().content_type();

        if self.id().is_none() {
            let Some(target) = target_url else {
                return Err(Error::failed(
                    "Unable to create resource: target URL is undefined.",
                    None,
                ));
            };
            let response = client.create(target, &data, content_type)?;
            if !response.success {
                return Err(Error::failed(
                    format!("Unable to create resource at \"{}\".", target),
                    Some(target),
                ));
            }
            return self.parse_body(&response.body);
        }

        self.ensure_materialized(client)?;
        let Some(edit) = self.link("edit").map(str::to_string) else {
            return Err(Error::failed(
                "Unable to update resource: edit resource link is undefined.",
                None,
            ));
        };
        let response = client.update(&edit, &data, content_type)?;
        if !response.success {
            return Err(Error::failed(
                format!("Unable to update resource at \"{}\".", edit),
                Some(&edit),
            ));
        }
        if response.has_body() {
            self.parse_body(&response.body)?;
        }
        Ok(())
    }

    /// Deletes the resource on the server and clears its identifier.
    ///
    /// Unsaved objects have nothing to delete.
    fn delete(&mut self, client: &Client) -> Result<()> {
        if self.id().is_none() {
            return Ok(());
        }

        self.ensure_materialized(client)?;
        let Some(edit) = self.link("edit").map(str::to_string) else {
            return Err(Error::failed(
                "Unable to delete resource: edit resource link is undefined.",
                None,
            ));
        };
        let response = client.delete(&edit)?;
        if !response.success {
            return Err(Error::failed(
                format!("Unable to delete resource at \"{}\".", edit),
                Some(&edit),
            ));
        }
        self.resource_mut().clear_id();
        Ok(())
    }
}
