//! Namespace URIs and reserved names used by the Ya.ru resource format.

/// Atom namespace. Entries, feeds, links and categories live here.
pub const ATOM: &str = "http://www.w3.org/2005/Atom";

/// Vendor namespace for persons, clubs and entry metadata.
pub const YARU: &str = "http://api.yandex.ru/yaru/";

/// Atom threading extension namespace.
pub const THREAD: &str = "http://purl.org/syndication/thread/1.0";

/// Prefix bound to [`YARU`] in composed documents.
pub const YARU_PREFIX: &str = "y";

/// Scheme of the category carrying an entry's post type.
pub const POST_TYPES_SCHEME: &str = "urn:ya.ru:posttypes";

/// Local name of link elements, which are hoisted into link tables.
pub const LINK: &str = "link";

/// Key under which nested link elements are collected.
pub const LINKS: &str = "links";

/// Attribute names starting with this prefix are private and never composed.
pub const RESERVED_PREFIX: char = '_';

/// Returns true when an attribute name is public (not reserved).
pub fn is_public_attribute(name: &str) -> bool {
    !name.starts_with(RESERVED_PREFIX)
}
