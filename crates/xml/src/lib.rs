//! # yaru-xml
//!
//! XML handling for the Ya.ru resource model: a loosely-typed Atom dialect
//! where an element may be a scalar in one document and a nested structure or
//! a repeated list in the next, and where Atom and vendor namespaces mix
//! freely inside a branch.
//!
//! ## Features
//!
//! - **Element tree** ([`Element`]): namespace-aware reading on top of
//!   `quick-xml`, with every element carrying the namespace map in scope so a
//!   subtree can be written back as a standalone document.
//! - **Tree parser** ([`parse`]): turns a document into [`Attributes`] plus a
//!   [`Links`] table without any fixed schema.
//! - **Composer** ([`compose_entry`]): writes an entry's attributes back into
//!   the document format accepted for create and update.
//!
//! ## Mapping
//!
//! | XML | Attribute value |
//! |-----|-----------------|
//! | `<name>Ivan</name>` | `Scalar(Some("Ivan"))` |
//! | `<name>  </name>` | `Scalar(None)` |
//! | `<author><name>Ivan</name></author>` | `Mapping({"name": ...})` |
//! | `<tag>a</tag><tag>b</tag>` | `List([Scalar("a"), Scalar("b")])` |
//! | `<link rel="edit" href="..."/>` under the root | link table entry `edit` |
//! | `<link rel="self" href="..."/>` deeper | `links` mapping entry `self` |
//!
//! ## Example
//!
//! ```
//! use yaru_xml::parse;
//!
//! let parsed = parse(br#"<person xmlns="http://api.yandex.ru/yaru/">
//!     <name>Ivan</name>
//!     <link rel="friends" href="https://api-yaru.yandex.ru/person/1/friend/"/>
//! </person>"#)?;
//!
//! assert_eq!(parsed.attributes["name"].as_str(), Some("Ivan"));
//! assert_eq!(parsed.links["friends"], "https://api-yaru.yandex.ru/person/1/friend/");
//! # Ok::<(), yaru_xml::XmlError>(())
//! ```

pub mod compose;
pub mod element;
pub mod error;
pub mod namespaces;
pub mod parse;
pub mod value;

pub use compose::{EntryHeader, compose_entry, html_escape, html_unescape};
pub use element::{Element, NamespaceMap};
pub use error::{Result, XmlError};
pub use parse::{ParsedResource, link_pair, parse, parse_element};
pub use value::{AttributeValue, Attributes, Links, insert_accumulating};
