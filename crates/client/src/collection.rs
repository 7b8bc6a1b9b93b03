//! Paginated collections of persons, clubs and entries.

use tracing::{debug, warn};
use yaru_xml::{Element, parse_element};

use crate::client::Client;
use crate::dispatch::{AnyResource, spawn_member};
use crate::entry::EntryType;
use crate::error::{Error, Result};
use crate::kind::ResourceKind;
use crate::locator::is_absolute;
use crate::resource::{Resource, ResourceObject};

const NEXT: &str = "next";

/// A page-by-page view of a server collection.
///
/// Members are filled from the collection document; [`Collection::more`]
/// fetches the page behind the `next` link and appends its members.
/// Collections are read-only: saving or deleting one is unsupported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    resource: Resource,
    members: Vec<AnyResource>,
}

impl Collection {
    /// A collection of persons behind the identifier.
    pub fn persons(id: impl Into<String>) -> Self {
        Self::with_kind(ResourceKind::Persons, id.into())
    }

    /// A collection of clubs behind the identifier.
    pub fn clubs(id: impl Into<String>) -> Self {
        Self::with_kind(ResourceKind::Clubs, id.into())
    }

    /// A feed of entries behind the identifier.
    pub fn entries(id: impl Into<String>) -> Self {
        Self::with_kind(ResourceKind::Entries, id.into())
    }

    /// A feed of entries limited to one type.
    ///
    /// The filter is a path segment, so it only applies to full URLs.
    pub fn entries_filtered(id: impl Into<String>, by_type: Option<EntryType>) -> Self {
        let mut id = id.into();
        if let Some(entry_type) = by_type {
            if is_absolute(&id) {
                id = format!("{}{}/", id, entry_type);
            } else {
                warn!(
                    by_type = %entry_type,
                    id = %id,
                    "Entry type filter ignored for non-URL identifier"
                );
            }
        }
        Self::entries(id)
    }

    /// Fetches the collection behind one of `owner`'s links.
    ///
    /// `owner` is materialized first so its link table is known.
    pub(crate) fn follow(
        owner: &mut dyn ResourceObject,
        client: &Client,
        rel: &str,
        build: impl FnOnce(String) -> Collection,
    ) -> Result<Collection> {
        owner.ensure_materialized(client)?;
        let Some(href) = owner.link(rel).map(str::to_string) else {
            return Err(Error::failed(
                format!("Unable to follow link: \"{}\" is undefined.", rel),
                None,
            ));
        };
        let mut collection = build(href);
        collection.get(client)?;
        Ok(collection)
    }

    fn with_kind(kind: ResourceKind, id: String) -> Self {
        Self::from_resource(Resource::new(kind, Some(id)))
    }

    pub(crate) fn from_resource(resource: Resource) -> Self {
        Self {
            resource,
            members: Vec::new(),
        }
    }

    /// Members loaded so far, in document order.
    pub fn members(&self) -> &[AnyResource] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Takes the loaded members out of the collection.
    pub fn into_members(self) -> Vec<AnyResource> {
        self.members
    }

    /// Fetches the next page and appends its members.
    ///
    /// Returns `Ok(None)` when there is no `next` link or the next page is
    /// empty; the collection is left untouched in both cases. Otherwise
    /// returns the newly appended members.
    pub fn more(&mut self, client: &Client) -> Result<Option<&[AnyResource]>> {
        let Some(next) = self.resource.link(NEXT).map(str::to_string) else {
            return Ok(None);
        };

        let mut page = Self::with_kind(self.kind(), next);
        page.get(client)?;
        if page.members.is_empty() {
            debug!(kind = %self.kind(), "Next page is empty");
            return Ok(None);
        }

        let start = self.members.len();
        self.resource
            .set_link(NEXT, page.resource.link(NEXT).map(str::to_string));
        self.members.append(&mut page.members);
        debug!(kind = %self.kind(), added = self.members.len() - start, "Page appended");
        Ok(Some(&self.members[start..]))
    }

    /// Walks every member, fetching further pages on demand.
    ///
    /// Yields the members already loaded, then the members of each page
    /// returned by [`Collection::more`], until it reports no more. A fetch
    /// error is yielded once and ends the walk.
    pub fn iter_all<'a>(&'a mut self, client: &'a Client) -> MemberIter<'a> {
        MemberIter {
            collection: self,
            client,
            position: 0,
            exhausted: false,
        }
    }
}

impl ResourceObject for Collection {
    fn resource(&self) -> &Resource {
        &self.resource
    }

    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.resource
    }

    fn apply(&mut self, document: &Element) -> Result<()> {
        let mut parsed = parse_element(document);
        let mut members = Vec::new();

        if let Some((namespace, tag)) = self.kind().member_element() {
            for element in document.find_all(namespace, tag) {
                let mut member = spawn_member(element.name())?;
                member.parse_body(&element.to_document()?)?;
                members.push(member);
            }
            parsed.attributes.remove(tag);
        }

        self.resource.assign(parsed);
        self.members = members;
        Ok(())
    }

    fn save(&mut self, _client: &Client, _target_url: Option<&str>) -> Result<()> {
        Err(Error::unsupported("save", self.kind()))
    }

    fn delete(&mut self, _client: &Client) -> Result<()> {
        Err(Error::unsupported("delete", self.kind()))
    }
}

/// Iterator returned by [`Collection::iter_all`].
pub struct MemberIter<'a> {
    collection: &'a mut Collection,
    client: &'a Client,
    position: usize,
    exhausted: bool,
}

impl Iterator for MemberIter<'_> {
    type Item = Result<AnyResource>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(member) = self.collection.members.get(self.position) {
                self.position += 1;
                return Some(Ok(member.clone()));
            }
            if self.exhausted {
                return None;
            }
            match self.collection.more(self.client) {
                Ok(Some(_)) => continue,
                Ok(None) => {
                    self.exhausted = true;
                    return None;
                }
                Err(e) => {
                    self.exhausted = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
