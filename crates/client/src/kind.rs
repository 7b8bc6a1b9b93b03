//! Resource kinds known to the client.

use std::fmt;

use yaru_xml::namespaces::{ATOM, YARU};

/// The kind of a resource, as declared by the server's `type=` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A user profile.
    Person,
    /// A list of profiles.
    Persons,
    /// A single post.
    Entry,
    /// An Atom feed of posts.
    Entries,
    /// A community.
    Club,
    /// A list of communities.
    Clubs,
}

impl ResourceKind {
    /// Every kind, singular kinds first.
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Person,
        ResourceKind::Entry,
        ResourceKind::Club,
        ResourceKind::Persons,
        ResourceKind::Entries,
        ResourceKind::Clubs,
    ];

    /// Returns the type token used in content types.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Person => "person",
            ResourceKind::Persons => "persons",
            ResourceKind::Entry => "entry",
            ResourceKind::Entries => "entries",
            ResourceKind::Club => "club",
            ResourceKind::Clubs => "clubs",
        }
    }

    /// Looks a kind up by its type token.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == token)
    }

    /// Returns true for kinds holding member objects.
    pub fn is_collection(&self) -> bool {
        self.member_element().is_some()
    }

    /// The `(namespace, tag)` of member elements, for collection kinds.
    pub fn member_element(&self) -> Option<(&'static str, &'static str)> {
        match self {
            ResourceKind::Persons => Some((YARU, "person")),
            ResourceKind::Clubs => Some((YARU, "club")),
            ResourceKind::Entries => Some((ATOM, "entry")),
            ResourceKind::Person | ResourceKind::Entry | ResourceKind::Club => None,
        }
    }

    /// Content type sent with documents of this kind.
    pub fn content_type(&self) -> &'static str {
        match self {
            ResourceKind::Person => "application/x-yaru+xml; type=person",
            ResourceKind::Persons => "application/x-yaru+xml; type=persons",
            ResourceKind::Club => "application/x-yaru+xml; type=club",
            ResourceKind::Clubs => "application/x-yaru+xml; type=clubs",
            ResourceKind::Entry => "application/atom+xml; type=entry",
            ResourceKind::Entries => "application/atom+xml",
        }
    }

    /// Returns true when a response declaring `declared` may fill this kind.
    ///
    /// Feeds come back under several declared types, so entry collections
    /// accept any of them.
    pub fn accepts(&self, declared: Option<&str>) -> bool {
        *self == ResourceKind::Entries || declared == Some(self.as_str())
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_roundtrip() {
        for kind in ResourceKind::ALL {
            assert_eq!(ResourceKind::from_token(kind.as_str()), Some(kind));
        }
        assert_eq!(ResourceKind::from_token("blog"), None);
        assert_eq!(ResourceKind::from_token("Person"), None);
    }

    #[test]
    fn test_member_elements() {
        assert_eq!(ResourceKind::Persons.member_element(), Some((YARU, "person")));
        assert_eq!(ResourceKind::Clubs.member_element(), Some((YARU, "club")));
        assert_eq!(ResourceKind::Entries.member_element(), Some((ATOM, "entry")));
        assert!(!ResourceKind::Entry.is_collection());
        assert!(ResourceKind::Entries.is_collection());
    }

    #[test]
    fn test_content_types() {
        assert_eq!(ResourceKind::Entry.content_type(), "application/atom+xml; type=entry");
        assert_eq!(ResourceKind::Entries.content_type(), "application/atom+xml");
        assert_eq!(ResourceKind::Clubs.content_type(), "application/x-yaru+xml; type=clubs");
    }

    #[test]
    fn test_accepts() {
        assert!(ResourceKind::Person.accepts(Some("person")));
        assert!(!ResourceKind::Club.accepts(Some("person")));
        assert!(!ResourceKind::Club.accepts(None));
        assert!(ResourceKind::Entries.accepts(Some("entry")));
        assert!(ResourceKind::Entries.accepts(None));
    }
}
