//! Raw XML node types for round-trip preservation

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::BufRead;

use crate::error::Result;
use crate::xml::{attributes_of, local_of, unexpected_eof};

/// Raw XML node for preserving unknown elements during round-trip
#[derive(Clone, Debug, PartialEq)]
pub enum RawXmlNode {
    /// Element node
    Element(RawXmlElement),
    /// Text node
    Text(String),
    /// Comment node
    Comment(String),
}

/// Raw XML element with attributes and children
#[derive(Clone, Debug, PartialEq)]
pub struct RawXmlElement {
    /// Full element name (with prefix, e.g., "w:customXml")
    pub name: String,
    /// Attributes as (name, value) pairs, unescaped
    pub attributes: Vec<(String, String)>,
    /// Child nodes
    pub children: Vec<RawXmlNode>,
    /// Whether this was a self-closing element
    pub self_closing: bool,
}

impl RawXmlElement {
    /// Create a new empty element that is written with start and end tags
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            self_closing: false,
        }
    }

    /// Create a new self-closing element
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            self_closing: true,
            ..Self::new(name)
        }
    }

    /// Read a complete element from XML reader (starting after the start tag was read)
    pub fn from_reader<R: BufRead>(reader: &mut Reader<R>, start: &BytesStart) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).to_string();
        let attributes = attributes_of(start);

        let mut children = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let child = Self::from_reader(reader, &e)?;
                    children.push(RawXmlNode::Element(child));
                }
                Event::Empty(e) => {
                    children.push(RawXmlNode::Element(Self::from_empty(&e)));
                }
                Event::Text(t) => {
                    let text = t.unescape()?.to_string();
                    if !text.is_empty() {
                        children.push(RawXmlNode::Text(text));
                    }
                }
                Event::CData(c) => {
                    children.push(RawXmlNode::Text(String::from_utf8_lossy(&c).to_string()));
                }
                Event::Comment(c) => {
                    children.push(RawXmlNode::Comment(String::from_utf8_lossy(&c).to_string()));
                }
                Event::End(e) => {
                    if e.name().as_ref() == name.as_bytes() {
                        break;
                    }
                }
                Event::Eof => return Err(unexpected_eof(&name)),
                _ => {}
            }
            buf.clear();
        }

        Ok(Self {
            name,
            attributes,
            children,
            self_closing: false,
        })
    }

    /// Create from empty element tag
    pub fn from_empty(e: &BytesStart) -> Self {
        Self {
            name: String::from_utf8_lossy(e.name().as_ref()).to_string(),
            attributes: attributes_of(e),
            children: Vec::new(),
            self_closing: true,
        }
    }

    /// Element name without its namespace prefix
    pub fn local_name(&self) -> &str {
        local_of(&self.name)
    }

    /// Look up an attribute by local name (`w:val` and `val` both match "val")
    pub fn attr(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| local_of(k) == local)
            .map(|(_, v)| v.as_str())
    }

    /// Shorthand for the ubiquitous `w:val` attribute
    pub fn val(&self) -> Option<&str> {
        self.attr("val")
    }

    /// Set an attribute, replacing an existing one with the same name
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    /// Iterate over child elements, skipping text and comments
    pub fn elements(&self) -> impl Iterator<Item = &RawXmlElement> {
        self.children.iter().filter_map(|c| match c {
            RawXmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Whether this element or any descendant satisfies `pred`
    pub fn any_descendant(&self, pred: &impl Fn(&RawXmlElement) -> bool) -> bool {
        pred(self) || self.elements().any(|e| e.any_descendant(pred))
    }

    /// Write element to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() && self.self_closing {
            writer.write_event(Event::Empty(start))?;
        } else {
            writer.write_event(Event::Start(start))?;
            for child in &self.children {
                child.write_to(writer)?;
            }
            writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        }

        Ok(())
    }

    /// Add an attribute
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Add a child element
    pub fn with_child(mut self, child: RawXmlElement) -> Self {
        self.children.push(RawXmlNode::Element(child));
        self
    }
}

impl RawXmlNode {
    /// The element inside this node, if it is one
    pub fn as_element(&self) -> Option<&RawXmlElement> {
        match self {
            RawXmlNode::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Write node to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        match self {
            RawXmlNode::Element(e) => e.write_to(writer),
            RawXmlNode::Text(t) => {
                writer.write_event(Event::Text(BytesText::new(t)))?;
                Ok(())
            }
            RawXmlNode::Comment(c) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(c.as_str())))?;
                Ok(())
            }
        }
    }
}
