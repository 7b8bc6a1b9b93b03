//! Composer: object attributes back to an entry document.
//!
//! The document always starts with the post-type category and the access
//! element; the comments-disabled marker is written only when set, its
//! absence meaning "enabled". After that, public scalar attributes become
//! Atom elements and a `meta` mapping becomes a vendor-namespace subtree.
//!
//! Lists and mappings other than `meta` are not written. Derived lists such
//! as categories therefore do not survive an update.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::debug;

use crate::error::Result;
use crate::namespaces::{ATOM, POST_TYPES_SCHEME, YARU, YARU_PREFIX, is_public_attribute};
use crate::value::{AttributeValue, Attributes};

/// Attribute whose free text is HTML-escaped before writing.
const CONTENT: &str = "content";

/// Mapping attribute composed into the vendor namespace.
const META: &str = "meta";

/// Fixed leading part of an entry document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryHeader<'a> {
    /// Canonical identifier, written as `<id>` when the entry already exists.
    pub id: Option<&'a str>,
    /// Post type, written as the category term.
    pub term: &'a str,
    /// Access level.
    pub access: &'a str,
    /// Whether to write the comments-disabled marker.
    pub comments_disabled: bool,
}

/// Composes an entry document from its header and attributes.
pub fn compose_entry(header: &EntryHeader<'_>, attributes: &Attributes) -> Result<Vec<u8>> {
    let mut composer = Composer::new();
    composer.declaration()?;

    let yaru_decl = format!("xmlns:{}", YARU_PREFIX);
    composer.start("entry", &[("xmlns", ATOM), (yaru_decl.as_str(), YARU)])?;
    composer.empty(
        "category",
        &[("term", header.term), ("scheme", POST_TYPES_SCHEME)],
    )?;
    composer.text_element(&vendor("access"), header.access)?;
    if header.comments_disabled {
        composer.empty(&vendor("comments-disabled"), &[])?;
    }
    if let Some(id) = header.id {
        composer.text_element("id", id)?;
    }

    for (name, value) in attributes {
        if !is_public_attribute(name) {
            continue;
        }
        match value {
            AttributeValue::Scalar(Some(text)) if name == CONTENT => {
                composer.text_element(name, &html_escape(text))?;
            }
            AttributeValue::Scalar(Some(text)) => composer.text_element(name, text)?,
            AttributeValue::Mapping(_) if name == META => composer.vendor_value(name, value)?,
            AttributeValue::Scalar(None) => {}
            _ => debug!(attribute = %name, "Attribute is not composed"),
        }
    }

    composer.end("entry")?;
    let xml = composer.finish();
    debug!(xml = %String::from_utf8_lossy(&xml), "Composed entry document");
    Ok(xml)
}

/// Prepares HTML for embedding as entry content.
pub fn html_escape(html: &str) -> String {
    html.replace('<', "&lt;")
}

/// Restores HTML from entry content.
pub fn html_unescape(text: &str) -> String {
    text.replace("&amp;", "&").replace("&lt;", "<")
}

fn vendor(name: &str) -> String {
    format!("{}:{}", YARU_PREFIX, name)
}

struct Composer {
    writer: Writer<Vec<u8>>,
}

impl Composer {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }

    fn declaration(&mut self) -> Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(())
    }

    fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let mut element = BytesStart::new(name);
        for attribute in attributes {
            element.push_attribute(*attribute);
        }
        self.writer.write_event(Event::Start(element))?;
        Ok(())
    }

    fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let mut element = BytesStart::new(name);
        for attribute in attributes {
            element.push_attribute(*attribute);
        }
        self.writer.write_event(Event::Empty(element))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<()> {
        self.start(name, &[])?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    /// Writes a value and its nested keys in the vendor namespace.
    fn vendor_value(&mut self, name: &str, value: &AttributeValue) -> Result<()> {
        let qualified = vendor(name);
        match value {
            AttributeValue::Scalar(Some(text)) => self.text_element(&qualified, text),
            AttributeValue::Mapping(map) => {
                self.start(&qualified, &[])?;
                for (key, nested) in map {
                    self.vendor_value(key, nested)?;
                }
                self.end(&qualified)
            }
            AttributeValue::Scalar(None) | AttributeValue::List(_) => Ok(()),
        }
    }
}
