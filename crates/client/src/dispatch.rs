//! Declared-type dispatch.
//!
//! A closed registry maps each type token to the constructor of its object
//! kind. It serves both generic retrieval, where an unknown token yields no
//! object, and collection member instantiation, where it is an error.

use tracing::{debug, error, warn};
use yaru_xml::Element;

use crate::client::Client;
use crate::club::Club;
use crate::collection::Collection;
use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::kind::ResourceKind;
use crate::person::Person;
use crate::resource::{Resource, ResourceObject};

/// Any object the client can build from a declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyResource {
    Person(Person),
    Club(Club),
    Entry(Entry),
    Collection(Collection),
}

impl AnyResource {
    pub fn as_person(&self) -> Option<&Person> {
        match self {
            AnyResource::Person(person) => Some(person),
            _ => None,
        }
    }

    pub fn as_club(&self) -> Option<&Club> {
        match self {
            AnyResource::Club(club) => Some(club),
            _ => None,
        }
    }

    pub fn as_entry(&self) -> Option<&Entry> {
        match self {
            AnyResource::Entry(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            AnyResource::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    fn object(&self) -> &dyn ResourceObject {
        match self {
            AnyResource::Person(person) => person,
            AnyResource::Club(club) => club,
            AnyResource::Entry(entry) => entry,
            AnyResource::Collection(collection) => collection,
        }
    }

    fn object_mut(&mut self) -> &mut dyn ResourceObject {
        match self {
            AnyResource::Person(person) => person,
            AnyResource::Club(club) => club,
            AnyResource::Entry(entry) => entry,
            AnyResource::Collection(collection) => collection,
        }
    }
}

impl ResourceObject for AnyResource {
    fn resource(&self) -> &Resource {
        self.object().resource()
    }

    fn resource_mut(&mut self) -> &mut Resource {
        self.object_mut().resource_mut()
    }

    fn apply(&mut self, document: &Element) -> Result<()> {
        self.object_mut().apply(document)
    }

    fn compose(&self) -> Result<Vec<u8>> {
        self.object().compose()
    }

    fn save(&mut self, client: &Client, target_url: Option<&str>) -> Result<()> {
        self.object_mut().save(client, target_url)
    }

    fn delete(&mut self, client: &Client) -> Result<()> {
        self.object_mut().delete(client)
    }
}

/// Builds an object of one kind around an optional identifier.
pub type Constructor = fn(Option<String>) -> AnyResource;

fn person(id: Option<String>) -> AnyResource {
    AnyResource::Person(Person::from_resource(Resource::new(ResourceKind::Person, id)))
}

fn club(id: Option<String>) -> AnyResource {
    AnyResource::Club(Club::from_resource(Resource::new(ResourceKind::Club, id)))
}

fn entry(id: Option<String>) -> AnyResource {
    AnyResource::Entry(Entry::from_resource(Resource::new(ResourceKind::Entry, id)))
}

fn persons(id: Option<String>) -> AnyResource {
    collection(ResourceKind::Persons, id)
}

fn clubs(id: Option<String>) -> AnyResource {
    collection(ResourceKind::Clubs, id)
}

fn entries(id: Option<String>) -> AnyResource {
    collection(ResourceKind::Entries, id)
}

fn collection(kind: ResourceKind, id: Option<String>) -> AnyResource {
    AnyResource::Collection(Collection::from_resource(Resource::new(kind, id)))
}

static REGISTRY: [(ResourceKind, Constructor); 6] = [
    (ResourceKind::Person, person),
    (ResourceKind::Club, club),
    (ResourceKind::Entry, entry),
    (ResourceKind::Persons, persons),
    (ResourceKind::Clubs, clubs),
    (ResourceKind::Entries, entries),
];

/// Looks up the constructor registered for a type token.
pub fn constructor(token: &str) -> Option<Constructor> {
    let kind = ResourceKind::from_token(token)?;
    REGISTRY
        .iter()
        .find(|(registered, _)| *registered == kind)
        .map(|(_, constructor)| *constructor)
}

/// Builds an unmaterialized object for a declared type.
///
/// Missing and unknown types are logged and yield `None`.
pub fn spawn(declared_type: Option<&str>, id: Option<String>) -> Option<AnyResource> {
    let Some(token) = declared_type else {
        warn!("Resource type is none");
        return None;
    };
    match constructor(token) {
        Some(construct) => {
            debug!(resource_type = token, "Resource type dispatched");
            Some(construct(id))
        }
        None => {
            error!(resource_type = token, "Resource type is unknown");
            None
        }
    }
}

/// Builds an empty member object for a collection member tag.
pub fn spawn_member(tag: &str) -> Result<AnyResource> {
    constructor(tag)
        .map(|construct| construct(None))
        .ok_or_else(|| Error::UnknownResourceType(tag.to_string()))
}
