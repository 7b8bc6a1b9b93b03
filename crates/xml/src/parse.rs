//! Tree parser: XML document to attribute mapping plus link table.
//!
//! The walk is depth-first over child elements. Tags are reduced to their
//! local names using each element's own namespace map, so vendor-namespace
//! elements nested inside Atom branches resolve the same way as top-level
//! ones. `link` elements never become attributes: directly under the root they
//! fill the object's link table, deeper down they are gathered into a nested
//! `links` mapping keyed by relation.

use tracing::warn;

use crate::element::Element;
use crate::error::Result;
use crate::namespaces::{LINK, LINKS};
use crate::value::{AttributeValue, Attributes, Links, insert_accumulating};

/// Relation assumed for a link element without `rel`, as in Atom.
const DEFAULT_REL: &str = "alternate";

/// Result of parsing one resource document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedResource {
    /// Attributes built from the root's child elements.
    pub attributes: Attributes,
    /// Links found directly under the root.
    pub links: Links,
}

/// Parses a raw document into root attributes and links.
pub fn parse(xml: &[u8]) -> Result<ParsedResource> {
    let root = Element::parse(xml)?;
    Ok(parse_element(&root))
}

/// Builds attributes and links from an already parsed root element.
pub fn parse_element(root: &Element) -> ParsedResource {
    let (attributes, links) = collect(root);
    ParsedResource { attributes, links }
}

/// Extracts the `(rel, href)` pair of a link element.
pub fn link_pair(element: &Element) -> Option<(String, String)> {
    let Some(href) = element.attribute("href") else {
        warn!(
            rel = element.attribute("rel").unwrap_or(DEFAULT_REL),
            "Skipping link element without href"
        );
        return None;
    };
    let rel = element.attribute("rel").unwrap_or(DEFAULT_REL);
    Some((rel.to_string(), href.to_string()))
}

fn collect(element: &Element) -> (Attributes, Links) {
    let mut attributes = Attributes::new();
    let mut links = Links::new();

    for child in element.children() {
        if child.name() == LINK {
            if let Some((rel, href)) = link_pair(child) {
                links.insert(rel, href);
            }
            continue;
        }

        let value = if child.is_leaf() {
            AttributeValue::from_text(child.text())
        } else {
            let (mut nested, nested_links) = collect(child);
            merge_nested_links(&mut nested, nested_links);
            AttributeValue::Mapping(nested)
        };
        insert_accumulating(&mut attributes, child.name(), value);
    }

    (attributes, links)
}

fn merge_nested_links(map: &mut Attributes, links: Links) {
    if links.is_empty() {
        return;
    }
    let slot = map
        .entry(LINKS.to_string())
        .or_insert_with(|| AttributeValue::Mapping(Attributes::new()));
    if !matches!(slot, AttributeValue::Mapping(_)) {
        *slot = AttributeValue::Mapping(Attributes::new());
    }
    if let AttributeValue::Mapping(table) = slot {
        for (rel, href) in links {
            table.insert(rel, AttributeValue::from(href));
        }
    }
}
