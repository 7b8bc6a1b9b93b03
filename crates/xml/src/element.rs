//! Namespace-aware element tree.
//!
//! Resource documents are small, so they are read into an owned tree once and
//! then walked by the attribute parser, the collection member scan and the
//! entry category scan. Every element keeps the full namespace map in scope at
//! its position, which lets a subtree be written back out as a standalone
//! document with all the declarations it needs.
//!
//! Whitespace is not trimmed by the reader: entity references arrive as
//! separate events, so trimming per text event would eat spaces around them.
//! Callers trim the accumulated text instead.

use std::collections::BTreeMap;
use std::io::Write;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesRef, BytesStart, BytesText, Event};

use crate::error::{Result, XmlError};

/// In-scope namespace declarations keyed by prefix. The empty prefix holds the
/// default namespace.
pub type NamespaceMap = BTreeMap<String, String>;

/// A parsed XML element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    prefix: Option<String>,
    name: String,
    namespace: Option<String>,
    nsmap: NamespaceMap,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    /// Parses a complete document and returns its root element.
    ///
    /// Malformed input is an error: mismatched or unclosed tags, unbound
    /// prefixes, unknown entities, multiple roots or a missing root.
    pub fn parse(xml: &[u8]) -> Result<Element> {
        let mut reader = Reader::from_reader(xml);
        let mut buf = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(start) => {
                    let element = open_element(&start, stack.last())?;
                    if stack.is_empty() && root.is_some() {
                        return Err(XmlError::structure("multiple root elements"));
                    }
                    stack.push(element);
                }
                Event::Empty(start) => {
                    let element = open_element(&start, stack.last())?;
                    close_element(element, &mut stack, &mut root)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| XmlError::structure("closing tag without an open element"))?;
                    close_element(element, &mut stack, &mut root)?;
                }
                Event::Text(text) => push_text(&mut stack, &text.decode()?)?,
                Event::CData(data) => push_text(&mut stack, &data.decode()?)?,
                Event::GeneralRef(reference) => {
                    push_text(&mut stack, &resolve_reference(&reference)?)?
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if let Some(open) = stack.last() {
            return Err(XmlError::structure(format!(
                "unclosed element <{}>",
                open.qualified_name()
            )));
        }

        root.ok_or_else(|| XmlError::structure("document has no root element"))
    }

    /// Local name without any prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Prefix as written in the source, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Name as written in the source, `prefix:name` or `name`.
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.name),
            None => self.name.clone(),
        }
    }

    /// Resolved namespace URI, `None` when the element is in no namespace.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Namespace declarations in scope at this element.
    pub fn nsmap(&self) -> &NamespaceMap {
        &self.nsmap
    }

    /// Returns true when this element has the given namespace and local name.
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.name == name && self.namespace.as_deref() == Some(namespace)
    }

    /// Looks up an attribute by qualified name, falling back to its local part.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .or_else(|| {
                self.attributes
                    .iter()
                    .find(|(k, _)| k.rsplit(':').next() == Some(key))
            })
            .map(|(_, v)| v.as_str())
    }

    /// Non-namespace attributes in document order.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Child elements in document order.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Returns true when the element has no child elements.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Concatenated character data directly inside this element, untrimmed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Collects this element and all descendants matching the namespace and
    /// local name, in document order.
    pub fn find_all<'a>(&'a self, namespace: &str, name: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_matching(namespace, name, &mut found);
        found
    }

    fn collect_matching<'a>(&'a self, namespace: &str, name: &str, found: &mut Vec<&'a Element>) {
        if self.is(namespace, name) {
            found.push(self);
        }
        for child in &self.children {
            child.collect_matching(namespace, name, found);
        }
    }

    /// Writes this element as a standalone document with an XML declaration.
    ///
    /// Every namespace in scope is declared on the written root, so a subtree
    /// taken out of a larger document parses on its own.
    pub fn to_document(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.write_element(&mut writer, &NamespaceMap::new())?;
        Ok(writer.into_inner())
    }

    fn write_element<W: Write>(&self, writer: &mut Writer<W>, scope: &NamespaceMap) -> Result<()> {
        let qname = self.qualified_name();
        let mut start = BytesStart::new(qname.as_str());

        if scope.contains_key("") && !self.nsmap.contains_key("") {
            start.push_attribute(("xmlns", ""));
        }
        for (prefix, uri) in &self.nsmap {
            if scope.get(prefix) == Some(uri) {
                continue;
            }
            if prefix.is_empty() {
                start.push_attribute(("xmlns", uri.as_str()));
            } else {
                let key = format!("xmlns:{}", prefix);
                start.push_attribute((key.as_str(), uri.as_str()));
            }
        }
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() && self.text.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        if !self.text.is_empty() {
            writer.write_event(Event::Text(BytesText::new(&self.text)))?;
        }
        for child in &self.children {
            child.write_element(writer, &self.nsmap)?;
        }
        writer.write_event(Event::End(BytesEnd::new(qname.as_str())))?;
        Ok(())
    }
}

fn open_element(start: &BytesStart<'_>, parent: Option<&Element>) -> Result<Element> {
    let mut nsmap = parent.map(|p| p.nsmap.clone()).unwrap_or_default();
    let mut attributes = Vec::new();

    for attr in start.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
        let value = attr.unescape_value()?.into_owned();

        if key == "xmlns" {
            if value.is_empty() {
                nsmap.remove("");
            } else {
                nsmap.insert(String::new(), value);
            }
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            nsmap.insert(prefix.to_string(), value);
        } else {
            attributes.push((key, value));
        }
    }

    let qname_bytes = start.name();
    let qname = std::str::from_utf8(qname_bytes.as_ref())?;
    let (prefix, name) = match qname.split_once(':') {
        Some((prefix, local)) => (Some(prefix.to_string()), local.to_string()),
        None => (None, qname.to_string()),
    };

    let namespace = match &prefix {
        Some(prefix) => Some(nsmap.get(prefix).cloned().ok_or_else(|| {
            XmlError::structure(format!(
                "unbound namespace prefix '{}' on <{}>",
                prefix, qname
            ))
        })?),
        None => nsmap.get("").cloned(),
    };

    Ok(Element {
        prefix,
        name,
        namespace,
        nsmap,
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

fn close_element(
    element: Element,
    stack: &mut [Element],
    root: &mut Option<Element>,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_some() {
                return Err(XmlError::structure("multiple root elements"));
            }
            *root = Some(element);
        }
    }
    Ok(())
}

fn push_text(stack: &mut [Element], text: &str) -> Result<()> {
    match stack.last_mut() {
        Some(element) => element.text.push_str(text),
        None if text.trim().is_empty() => {}
        None => return Err(XmlError::structure("character data outside the root element")),
    }
    Ok(())
}

fn resolve_reference(reference: &BytesRef<'_>) -> Result<String> {
    let name = reference.decode()?;

    if let Some(code) = name.strip_prefix('#') {
        let parsed = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        return parsed
            .and_then(char::from_u32)
            .map(String::from)
            .ok_or_else(|| {
                XmlError::structure(format!("invalid character reference '&{};'", name))
            });
    }

    quick_xml::escape::resolve_predefined_entity(&name)
        .map(str::to_string)
        .ok_or_else(|| XmlError::structure(format!("unknown entity '&{};'", name)))
}
