//! User profiles.

use std::fmt;
use std::str::FromStr;

use crate::client::Client;
use crate::collection::Collection;
use crate::entry::EntryType;
use crate::error::{Error, Result};
use crate::kind::ResourceKind;
use crate::resource::{Resource, ResourceObject};

/// A person's relation to a club.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClubRole {
    #[default]
    Member,
    Moderator,
    Owner,
}

impl ClubRole {
    pub const ALL: [ClubRole; 3] = [ClubRole::Member, ClubRole::Moderator, ClubRole::Owner];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClubRole::Member => "member",
            ClubRole::Moderator => "moderator",
            ClubRole::Owner => "owner",
        }
    }

    /// Relation of the person link listing clubs with this role.
    pub fn link_rel(&self) -> String {
        format!("{}_of_clubs", self.as_str())
    }
}

impl FromStr for ClubRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| Error::UnknownClubRole(s.to_string()))
    }
}

impl fmt::Display for ClubRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user profile.
///
/// The navigation helpers follow the profile's links. Each one materializes
/// the profile first if needed and returns a freshly fetched collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    resource: Resource,
}

impl Person {
    /// A reference to a profile, fetched on first use. `/me/` names the
    /// authenticated user.
    pub fn new(id: impl Into<String>) -> Self {
        Self::from_resource(Resource::new(ResourceKind::Person, Some(id.into())))
    }

    pub(crate) fn from_resource(resource: Resource) -> Self {
        Self { resource }
    }

    pub fn friends(&mut self, client: &Client) -> Result<Collection> {
        Collection::follow(self, client, "friends", Collection::persons)
    }

    /// Clubs in which the person holds the given role.
    pub fn clubs(&mut self, client: &Client, role: ClubRole) -> Result<Collection> {
        Collection::follow(self, client, &role.link_rel(), Collection::clubs)
    }

    /// The person's own posts, optionally of one type.
    pub fn entries(&mut self, client: &Client, by_type: Option<EntryType>) -> Result<Collection> {
        Collection::follow(self, client, "posts", |href| {
            Collection::entries_filtered(href, by_type)
        })
    }

    /// Posts of the person's friends, optionally of one type.
    pub fn friends_entries(
        &mut self,
        client: &Client,
        by_type: Option<EntryType>,
    ) -> Result<Collection> {
        Collection::follow(self, client, "friends_posts", |href| {
            Collection::entries_filtered(href, by_type)
        })
    }
}

impl ResourceObject for Person {
    fn resource(&self) -> &Resource {
        &self.resource
    }

    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.resource
    }
}
