//! Minimal owned element tree built from `quick-xml` events.
//!
//! Capabilities documents are small enough to hold in memory, and a tree lets
//! the parser walk the nesting levels explicitly instead of searching for the
//! first matching descendant anywhere.

use crate::utils::error::{PreviewError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Local name, namespace prefix stripped (`sld:GetLegendGraphic` -> `GetLegendGraphic`).
    pub name: String,
    /// Attributes keyed by their qualified name.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Follows the first matching child at every step.
    pub fn path(&self, names: &[&str]) -> Option<&Element> {
        names
            .iter()
            .try_fold(self, |current, name| current.child(name))
    }

    /// First descendant in document order, excluding `self`.
    pub fn descendant(&self, name: &str) -> Option<&Element> {
        for child in &self.children {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.descendant(name) {
                return Some(found);
            }
        }
        None
    }

    /// Looks an attribute up by local name, so `href` also matches `xlink:href`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name || local_part(key) == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn text(&self) -> &str {
        self.text.trim()
    }

    pub fn child_text(&self, name: &str) -> String {
        self.child(name)
            .map(|c| c.text().to_string())
            .unwrap_or_default()
    }
}

fn local_part(qualified: &str) -> &str {
    qualified.rsplit(':').next().unwrap_or(qualified)
}

/// Reads a whole document into a tree. Anything that is not well-formed XML
/// with exactly one root element is rejected.
pub fn read_document(raw: &str) -> Result<Element> {
    let mut reader = Reader::from_str(raw);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let element = open_element(e)?;
                if stack.is_empty() && root.is_some() {
                    return Err(PreviewError::malformed(format!(
                        "unexpected second root element <{}>",
                        element.name
                    )));
                }
                stack.push(element);
            }
            Ok(Event::Empty(ref e)) => {
                let element = open_element(e)?;
                close_element(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| PreviewError::malformed("closing tag without opening tag"))?;
                close_element(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(ref t)) => {
                let text = t
                    .unescape()
                    .map_err(|e| PreviewError::malformed(e.to_string()))?;
                append_text(&mut stack, &text)?;
            }
            Ok(Event::CData(ref c)) => {
                let text =
                    std::str::from_utf8(c).map_err(|e| PreviewError::malformed(e.to_string()))?;
                append_text(&mut stack, text)?;
            }
            Ok(Event::Eof) => break,
            // declarations, comments, processing instructions, doctype
            Ok(_) => {}
            Err(e) => {
                return Err(PreviewError::malformed(format!(
                    "XML error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(PreviewError::malformed(format!(
            "element <{}> is never closed",
            open.name
        )));
    }

    root.ok_or_else(|| PreviewError::malformed("document has no root element"))
}

fn open_element(start: &BytesStart<'_>) -> Result<Element> {
    let local = start.local_name();
    let name = std::str::from_utf8(local.as_ref())
        .map_err(|e| PreviewError::malformed(e.to_string()))?
        .to_string();

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| PreviewError::malformed(e.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| PreviewError::malformed(e.to_string()))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| PreviewError::malformed(e.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

fn close_element(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(PreviewError::malformed(format!(
                "unexpected second root element <{}>",
                element.name
            )))
        }
    }
    Ok(())
}

fn append_text(stack: &mut [Element], text: &str) -> Result<()> {
    match stack.last_mut() {
        Some(current) => {
            current.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(PreviewError::malformed(
            "text content outside of the root element",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_nested_elements_and_prefixes() {
        let root = read_document(
            r#"<?xml version="1.0"?>
<Root xmlns:xlink="http://www.w3.org/1999/xlink" version="1">
  <sld:Thing><Leaf xlink:href="http://a/b?x=1&amp;y=2"/></sld:Thing>
  <Name> spaced &amp; escaped </Name>
</Root>"#,
        )
        .unwrap();

        assert_eq!(root.name, "Root");
        assert_eq!(root.attribute("version"), Some("1"));
        let leaf = root.path(&["Thing", "Leaf"]).unwrap();
        assert_eq!(leaf.attribute("href"), Some("http://a/b?x=1&y=2"));
        assert_eq!(leaf.attribute("xlink:href"), Some("http://a/b?x=1&y=2"));
        assert_eq!(root.child_text("Name"), "spaced & escaped");
        assert_eq!(root.child_text("Missing"), "");
    }

    #[test]
    fn test_descendant_is_document_order() {
        let root = read_document("<a><b><c>first</c></b><c>second</c></a>").unwrap();
        assert_eq!(root.descendant("c").unwrap().text(), "first");
        assert!(root.descendant("a").is_none());
    }

    #[test]
    fn test_rejects_non_xml() {
        assert!(read_document("").is_err());
        assert!(read_document("   ").is_err());
        assert!(read_document("just some words").is_err());
        assert!(read_document("<a><b></a>").is_err());
        assert!(read_document("<a><b>").is_err());
        assert!(read_document("<a/><b/>").is_err());
    }

    #[test]
    fn test_cdata_is_text() {
        let root = read_document("<a><![CDATA[x < y]]></a>").unwrap();
        assert_eq!(root.text(), "x < y");
    }
}
