//! Minimal namespace-stripped element tree for schema-tolerant walks.
//!
//! E2B reports arrive in a fixed HL7 namespace but with enough vendor
//! variation that strict deserialization is the wrong tool. This module
//! reads the whole document into a plain element tree (local names
//! only, prefixes stripped) and offers the small set of lookups the
//! field extractor needs: first/all descendants by name, descendant by
//! attribute value, direct child, attribute access.

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};

use crate::error::{IngestError, Result};

/// One element of the parsed document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlNode {
    /// Local element name with any namespace prefix stripped.
    pub name: String,
    /// Attributes in document order, keys also prefix-stripped.
    pub attrs: Vec<(String, String)>,
    /// Concatenated text content of this element (not descendants).
    pub text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    /// Attribute value by local name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First direct child with the given local name.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Trimmed text content, or `None` when blank.
    pub fn text_trimmed(&self) -> Option<&str> {
        let trimmed = self.text.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Depth-first preorder iterator over all descendants (excluding
    /// this node itself).
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// First descendant with the given local name.
    pub fn find(&self, name: &str) -> Option<&XmlNode> {
        self.descendants().find(|n| n.name == name)
    }

    /// All descendants with the given local name, in document order.
    pub fn find_all(&self, name: &str) -> Vec<&XmlNode> {
        self.descendants().filter(|n| n.name == name).collect()
    }

    /// First descendant with the given local name carrying the given
    /// attribute value.
    pub fn find_with_attr(&self, name: &str, attr: &str, value: &str) -> Option<&XmlNode> {
        self.descendants()
            .find(|n| n.name == name && n.attr(attr) == Some(value))
    }
}

/// Depth-first preorder walk over a subtree.
pub struct Descendants<'a> {
    stack: Vec<&'a XmlNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Parses a complete XML document into its root element.
///
/// Namespace prefixes are stripped from element and attribute names;
/// everything outside elements, attributes, and text (processing
/// instructions, comments, doctype) is ignored.
pub fn parse_document(xml: &str) -> Result<XmlNode> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                stack.push(node_from_start(&start)?);
            }
            Event::Empty(start) => {
                let node = node_from_start(&start)?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                let node = stack.pop().ok_or_else(|| {
                    IngestError::Malformed("unbalanced closing tag".to_string())
                })?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(text) => {
                if let Some(top) = stack.last_mut() {
                    match text.xml_content() {
                        Ok(unescaped) => top.text.push_str(&unescaped),
                        Err(_) => top.text.push_str(&String::from_utf8_lossy(&text)),
                    }
                }
            }
            Event::GeneralRef(entity) => {
                if let Some(top) = stack.last_mut() {
                    if let Ok(Some(ch)) = entity.resolve_char_ref() {
                        top.text.push(ch);
                    } else if let Some(resolved) = entity
                        .decode()
                        .ok()
                        .and_then(|name| resolve_predefined_entity(&name))
                    {
                        top.text.push_str(resolved);
                    } else {
                        top.text.push('&');
                        top.text.push_str(&String::from_utf8_lossy(&entity));
                        top.text.push(';');
                    }
                }
            }
            Event::CData(data) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(IngestError::Malformed(
            "document ended with unclosed elements".to_string(),
        ));
    }

    root.ok_or_else(|| IngestError::Malformed("document has no root element".to_string()))
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    } else if root.is_none() {
        *root = Some(node);
    } else {
        return Err(IngestError::Malformed(
            "multiple root elements".to_string(),
        ));
    }
    Ok(())
}

fn node_from_start(start: &BytesStart<'_>) -> Result<XmlNode> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut attrs = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        attrs.push((key, value));
    }
    Ok(XmlNode {
        name,
        attrs,
        text: String::new(),
        children: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_namespaced_document() {
        let xml = r#"<hl7:root xmlns:hl7="urn:hl7-org:v3">
            <hl7:id root="oid.1" extension="E1"/>
            <hl7:inner><hl7:value code="7">text body</hl7:value></hl7:inner>
        </hl7:root>"#;
        let doc = parse_document(xml).expect("parse");
        assert_eq!(doc.name, "root");
        assert_eq!(doc.find("id").and_then(|n| n.attr("extension")), Some("E1"));
        let value = doc.find("value").expect("value node");
        assert_eq!(value.attr("code"), Some("7"));
        assert_eq!(value.text_trimmed(), Some("text body"));
    }

    #[test]
    fn find_with_attr_selects_by_attribute() {
        let xml = r#"<r><id root="a" extension="1"/><id root="b" extension="2"/></r>"#;
        let doc = parse_document(xml).expect("parse");
        let node = doc.find_with_attr("id", "root", "b").expect("id b");
        assert_eq!(node.attr("extension"), Some("2"));
    }

    #[test]
    fn descendants_walk_in_document_order() {
        let xml = "<r><a><b/></a><c/></r>";
        let doc = parse_document(xml).expect("parse");
        let names: Vec<&str> = doc.descendants().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(parse_document("<r><a></r>").is_err());
        assert!(parse_document("not xml at all").is_err());
    }

    #[test]
    fn entities_are_unescaped() {
        let doc = parse_document("<r><t>a &amp; b</t></r>").expect("parse");
        assert_eq!(doc.find("t").and_then(|n| n.text_trimmed()), Some("a & b"));
    }
}
