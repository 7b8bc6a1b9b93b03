//! Entries: the one writable resource kind.
//!
//! Besides the free-form attributes every resource has, an entry carries
//! typed fields that are validated on assignment:
//!
//! - `type`: one of [`EntryType`], read from the post-type category
//! - `access`: one of [`AccessLevel`], read from `y:access`
//! - `comments_disabled`: presence of `y:comments-disabled`
//!
//! Parsing also collects the terms of other categories and turns `updated`
//! into a UTC timestamp.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use tracing::warn;
use yaru_xml::namespaces::{ATOM, POST_TYPES_SCHEME};
use yaru_xml::{
    AttributeValue, Attributes, Element, EntryHeader, compose_entry, html_unescape, parse_element,
};

use crate::error::{Error, Result};
use crate::kind::ResourceKind;
use crate::resource::{Resource, ResourceObject};

const TYPE: &str = "type";
const ACCESS: &str = "access";
const COMMENTS_DISABLED: &str = "comments_disabled";
const COMMENTS_DISABLED_ELEMENT: &str = "comments-disabled";
const CATEGORY: &str = "category";
const CONTENT: &str = "content";
const UPDATED: &str = "updated";

/// Post types accepted by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntryType {
    Link,
    #[default]
    Text,
    Complaint,
    Photo,
    Video,
    Poll,
    Wishlist,
    Congratulation,
    Description,
    Question,
    Answer,
    Friend,
    Unfriend,
    ModelGrade,
    ModelOpinion,
    ShopGrade,
    ShopOpinion,
    Status,
    Userpic,
    Rename,
    News,
    Rules,
    Join,
    Unjoin,
    ActivityFotki,
    ActivityVideo,
    Offline,
    Opinion,
    Premoderated,
}

impl EntryType {
    /// Every entry type in vocabulary order.
    pub const ALL: [EntryType; 29] = [
        EntryType::Link,
        EntryType::Text,
        EntryType::Complaint,
        EntryType::Photo,
        EntryType::Video,
        EntryType::Poll,
        EntryType::Wishlist,
        EntryType::Congratulation,
        EntryType::Description,
        EntryType::Question,
        EntryType::Answer,
        EntryType::Friend,
        EntryType::Unfriend,
        EntryType::ModelGrade,
        EntryType::ModelOpinion,
        EntryType::ShopGrade,
        EntryType::ShopOpinion,
        EntryType::Status,
        EntryType::Userpic,
        EntryType::Rename,
        EntryType::News,
        EntryType::Rules,
        EntryType::Join,
        EntryType::Unjoin,
        EntryType::ActivityFotki,
        EntryType::ActivityVideo,
        EntryType::Offline,
        EntryType::Opinion,
        EntryType::Premoderated,
    ];

    /// Returns the category term for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Link => "link",
            EntryType::Text => "text",
            EntryType::Complaint => "complaint",
            EntryType::Photo => "photo",
            EntryType::Video => "video",
            EntryType::Poll => "poll",
            EntryType::Wishlist => "wishlist",
            EntryType::Congratulation => "congratulation",
            EntryType::Description => "description",
            EntryType::Question => "question",
            EntryType::Answer => "answer",
            EntryType::Friend => "friend",
            EntryType::Unfriend => "unfriend",
            EntryType::ModelGrade => "model_grade",
            EntryType::ModelOpinion => "model_opinion",
            EntryType::ShopGrade => "shop_grade",
            EntryType::ShopOpinion => "shop_opinion",
            EntryType::Status => "status",
            EntryType::Userpic => "userpic",
            EntryType::Rename => "rename",
            EntryType::News => "news",
            EntryType::Rules => "rules",
            EntryType::Join => "join",
            EntryType::Unjoin => "unjoin",
            EntryType::ActivityFotki => "activity_fotki",
            EntryType::ActivityVideo => "activity_video",
            EntryType::Offline => "offline",
            EntryType::Opinion => "opinion",
            EntryType::Premoderated => "premoderated",
        }
    }
}

impl FromStr for EntryType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::UnknownEntryType(s.to_string()))
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who may read an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccessLevel {
    Public,
    #[default]
    Private,
    Friends,
}

impl AccessLevel {
    pub const ALL: [AccessLevel; 3] = [
        AccessLevel::Public,
        AccessLevel::Private,
        AccessLevel::Friends,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Public => "public",
            AccessLevel::Private => "private",
            AccessLevel::Friends => "friends",
        }
    }
}

impl FromStr for AccessLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| Error::UnknownAccessLevel(s.to_string()))
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A post.
///
/// New entries default to [`EntryType::Text`] and [`AccessLevel::Private`].
/// A fetched entry without an access element is public.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    resource: Resource,
    entry_type: EntryType,
    access: AccessLevel,
    comments_disabled: bool,
    categories: Vec<String>,
    updated: Option<DateTime<Utc>>,
}

impl Default for Entry {
    fn default() -> Self {
        Self::from_resource(Resource::new(ResourceKind::Entry, None))
    }
}

impl Entry {
    /// Creates an unsaved entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a reference to an existing entry, fetched on first use.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self::from_resource(Resource::new(ResourceKind::Entry, Some(id.into())))
    }

    /// Creates an unsaved entry from seed attributes.
    ///
    /// `type`, `access` and `comments_disabled` are validated and moved into
    /// the typed fields; everything else is kept as attributes.
    pub fn from_attributes(seed: Attributes) -> Result<Self> {
        let mut entry = Self::new();
        for (name, value) in seed {
            entry.set_attribute(name, value)?;
        }
        Ok(entry)
    }

    pub(crate) fn from_resource(resource: Resource) -> Self {
        Self {
            resource,
            entry_type: EntryType::default(),
            access: AccessLevel::default(),
            comments_disabled: false,
            categories: Vec::new(),
            updated: None,
        }
    }

    pub fn entry_type(&self) -> EntryType {
        self.entry_type
    }

    pub fn set_entry_type(&mut self, entry_type: EntryType) {
        self.entry_type = entry_type;
    }

    /// Sets the type from its term. Unknown terms leave the type unchanged.
    pub fn set_type(&mut self, term: &str) -> Result<()> {
        self.entry_type = term.parse()?;
        Ok(())
    }

    pub fn access(&self) -> AccessLevel {
        self.access
    }

    pub fn set_access_level(&mut self, access: AccessLevel) {
        self.access = access;
    }

    /// Sets the access level from its name. Unknown names leave it unchanged.
    pub fn set_access(&mut self, access: &str) -> Result<()> {
        self.access = access.parse()?;
        Ok(())
    }

    pub fn comments_disabled(&self) -> bool {
        self.comments_disabled
    }

    pub fn set_comments_disabled(&mut self, disabled: bool) {
        self.comments_disabled = disabled;
    }

    /// Terms of categories outside the post-type scheme.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Last modification time reported by the server.
    pub fn updated(&self) -> Option<DateTime<Utc>> {
        self.updated
    }

    /// Unescaped HTML content, empty when the entry has none.
    pub fn content(&self) -> &str {
        self.resource
            .attribute(CONTENT)
            .and_then(AttributeValue::as_str)
            .unwrap_or("")
    }

    pub fn set_content(&mut self, html: impl Into<String>) {
        self.resource.set_attribute(CONTENT, html.into());
    }

    /// Sets an attribute, routing typed names through their validating
    /// setters.
    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Result<()> {
        let name = name.into();
        let value = value.into();
        match name.as_str() {
            TYPE => return self.set_type(value.as_str().unwrap_or_default()),
            ACCESS => return self.set_access(value.as_str().unwrap_or_default()),
            COMMENTS_DISABLED => {
                self.comments_disabled = is_truthy(&value);
                return Ok(());
            }
            _ => {}
        }
        self.resource.set_attribute(name, value);
        Ok(())
    }
}

impl ResourceObject for Entry {
    fn resource(&self) -> &Resource {
        &self.resource
    }

    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.resource
    }

    fn apply(&mut self, document: &Element) -> Result<()> {
        let mut parsed = parse_element(document);
        let attributes = &mut parsed.attributes;

        let access = match attributes.remove(ACCESS) {
            Some(value) => value.as_str().unwrap_or_default().parse()?,
            None => AccessLevel::Public,
        };
        let comments_disabled = attributes.remove(COMMENTS_DISABLED_ELEMENT).is_some();
        attributes.remove(CATEGORY);

        let mut entry_type = EntryType::default();
        let mut categories = Vec::new();
        for category in document.children().iter().filter(|c| c.is(ATOM, CATEGORY)) {
            let Some(term) = category.attribute("term") else {
                continue;
            };
            if category.attribute("scheme") == Some(POST_TYPES_SCHEME) {
                entry_type = term.parse()?;
            } else {
                categories.push(term.to_string());
            }
        }

        let updated = match attributes.get(UPDATED).and_then(AttributeValue::as_str) {
            Some(raw) => match DateTime::parse_from_rfc3339(raw) {
                Ok(timestamp) => Some(timestamp.with_timezone(&Utc)),
                Err(e) => {
                    warn!(updated = raw, error = %e, "Unparseable entry timestamp");
                    None
                }
            },
            None => None,
        };
        if updated.is_some() {
            attributes.remove(UPDATED);
        }

        let content = attributes
            .get(CONTENT)
            .and_then(AttributeValue::as_str)
            .map(html_unescape)
            .unwrap_or_default();
        attributes.insert(CONTENT.to_string(), content.into());

        self.resource.assign(parsed);
        self.entry_type = entry_type;
        self.access = access;
        self.comments_disabled = comments_disabled;
        self.categories = categories;
        self.updated = updated;
        Ok(())
    }

    fn compose(&self) -> Result<Vec<u8>> {
        let header = EntryHeader {
            id: self.resource.id(),
            term: self.entry_type.as_str(),
            access: self.access.as_str(),
            comments_disabled: self.comments_disabled,
        };
        Ok(compose_entry(&header, self.resource.attributes())?)
    }
}

fn is_truthy(value: &AttributeValue) -> bool {
    matches!(value.as_str(), Some("true" | "1" | "yes"))
}
