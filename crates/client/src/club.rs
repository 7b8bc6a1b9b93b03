//! Communities.

use crate::client::Client;
use crate::collection::Collection;
use crate::entry::EntryType;
use crate::error::Result;
use crate::kind::ResourceKind;
use crate::resource::{Resource, ResourceObject};

/// A club, fetched on first use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Club {
    resource: Resource,
}

impl Club {
    pub fn new(id: impl Into<String>) -> Self {
        Self::from_resource(Resource::new(ResourceKind::Club, Some(id.into())))
    }

    pub(crate) fn from_resource(resource: Resource) -> Self {
        Self { resource }
    }

    /// Posts published in the club, optionally of one type.
    pub fn entries(&mut self, client: &Client, by_type: Option<EntryType>) -> Result<Collection> {
        Collection::follow(self, client, "posts", |href| {
            Collection::entries_filtered(href, by_type)
        })
    }

    pub fn members(&mut self, client: &Client) -> Result<Collection> {
        Collection::follow(self, client, "club_members", Collection::persons)
    }
}

impl ResourceObject for Club {
    fn resource(&self) -> &Resource {
        &self.resource
    }

    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.resource
    }
}
