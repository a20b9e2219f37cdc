//! Document body and block-level content

use crate::document::{Paragraph, SectionProperties, Table};
use crate::error::Result;
use crate::xml::{attributes_of, unexpected_eof, RawXmlElement, RawXmlNode};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::io::BufRead;

/// Block-level content in a document body or table cell
#[derive(Clone, Debug, PartialEq)]
pub enum BlockContent {
    /// Paragraph
    Paragraph(Paragraph),
    /// Table
    Table(Table),
    /// Content control or custom XML wrapping further blocks
    Group(BlockGroup),
    /// Unknown element (preserved for round-trip)
    Unknown(RawXmlNode),
}

/// Wrapper elements whose children are ordinary blocks
const BLOCK_GROUPS: &[&[u8]] = &[b"sdt", b"sdtContent", b"customXml"];

/// Block-level wrapper (`w:sdt`, `w:sdtContent`, `w:customXml`). Word puts a
/// generated table of contents in one of these.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockGroup {
    /// Element name as written
    pub name: String,
    /// Attributes (preserved)
    pub attrs: Vec<(String, String)>,
    /// Wrapped blocks; `sdtPr` and similar stay raw among them
    pub content: Vec<BlockContent>,
}

/// Document body (w:body)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Body {
    /// Block-level content
    pub content: Vec<BlockContent>,
    /// Final section properties (last sectPr in body)
    pub section_properties: Option<SectionProperties>,
}

impl Body {
    /// Parse body from XML reader (after w:body start tag)
    pub fn from_reader<R: BufRead>(reader: &mut Reader<R>) -> Result<Self> {
        let (content, section_properties) = read_blocks(reader, b"body")?;
        Ok(Body {
            content,
            section_properties,
        })
    }

    /// Get top-level paragraphs, including those inside content controls
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        outer_paragraphs(&self.content)
    }

    /// Get top-level tables
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.content.iter().filter_map(|c| match c {
            BlockContent::Table(t) => Some(t),
            _ => None,
        })
    }

    /// Section properties in document order: breaks carried by top-level
    /// paragraphs, then the final body section
    pub fn sections(&self) -> Vec<&SectionProperties> {
        let mut sections: Vec<&SectionProperties> = self
            .paragraphs()
            .filter_map(|p| p.properties.as_ref()?.section.as_ref())
            .collect();
        sections.extend(self.section_properties.as_ref());
        sections
    }

    /// Section properties in document order, mutably
    pub fn sections_mut(&mut self) -> Vec<&mut SectionProperties> {
        let mut sections = Vec::new();
        collect_sections_mut(&mut self.content, &mut sections);
        sections.extend(self.section_properties.as_mut());
        sections
    }

    /// Write body to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        writer.write_event(Event::Start(BytesStart::new("w:body")))?;

        for content in &self.content {
            content.write_to(writer)?;
        }

        if let Some(sect_pr) = &self.section_properties {
            sect_pr.to_raw().write_to(writer)?;
        }

        writer.write_event(Event::End(BytesEnd::new("w:body")))?;
        Ok(())
    }

    /// Add a paragraph
    pub fn add_paragraph(&mut self, para: Paragraph) {
        self.content.push(BlockContent::Paragraph(para));
    }

    /// Add a table
    pub fn add_table(&mut self, table: Table) {
        self.content.push(BlockContent::Table(table));
    }
}

impl BlockContent {
    /// Write to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        match self {
            BlockContent::Paragraph(para) => para.write_to(writer),
            BlockContent::Table(table) => table.write_to(writer),
            BlockContent::Group(group) => group.write_to(writer),
            BlockContent::Unknown(node) => node.write_to(writer),
        }
    }
}

impl BlockGroup {
    /// Parse from reader (after the wrapper's start tag)
    pub fn from_reader<R: BufRead>(reader: &mut Reader<R>, start: &BytesStart) -> Result<Self> {
        let local = start.local_name();
        let (content, _) = read_blocks(reader, local.as_ref())?;
        Ok(BlockGroup {
            name: String::from_utf8_lossy(start.name().as_ref()).to_string(),
            attrs: attributes_of(start),
            content,
        })
    }

    /// Write to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attrs {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.content.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        for block in &self.content {
            block.write_to(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}

pub(crate) type Paragraphs<'a> = Box<dyn Iterator<Item = &'a Paragraph> + 'a>;

/// Paragraphs of `blocks` outside tables, in document order
pub(crate) fn outer_paragraphs<'a>(blocks: &'a [BlockContent]) -> Paragraphs<'a> {
    Box::new(blocks.iter().flat_map(|block| -> Paragraphs<'a> {
        match block {
            BlockContent::Paragraph(p) => Box::new(std::iter::once(p)),
            BlockContent::Group(group) => outer_paragraphs(&group.content),
            _ => Box::new(std::iter::empty()),
        }
    }))
}

fn collect_sections_mut<'a>(
    blocks: &'a mut [BlockContent],
    out: &mut Vec<&'a mut SectionProperties>,
) {
    for block in blocks {
        match block {
            BlockContent::Paragraph(p) => {
                if let Some(section) = p.properties.as_mut().and_then(|pp| pp.section.as_mut()) {
                    out.push(section);
                }
            }
            BlockContent::Group(group) => collect_sections_mut(&mut group.content, out),
            _ => {}
        }
    }
}

/// Read block content up to the end tag `end` (`body` or `tc`).
/// A `w:sectPr` is only split out at body level.
pub(crate) fn read_blocks<R: BufRead>(
    reader: &mut Reader<R>,
    end: &[u8],
) -> Result<(Vec<BlockContent>, Option<SectionProperties>)> {
    let mut content = Vec::new();
    let mut section = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().local_name().as_ref() {
                b"p" => {
                    let para = Paragraph::from_reader(reader, &e)?;
                    content.push(BlockContent::Paragraph(para));
                }
                b"tbl" => {
                    let table = Table::from_reader(reader, &e)?;
                    content.push(BlockContent::Table(table));
                }
                b"sectPr" if end == b"body" => {
                    let raw = RawXmlElement::from_reader(reader, &e)?;
                    section = Some(SectionProperties::from_raw(&raw));
                }
                name if BLOCK_GROUPS.contains(&name) => {
                    let group = BlockGroup::from_reader(reader, &e)?;
                    content.push(BlockContent::Group(group));
                }
                _ => {
                    let raw = RawXmlElement::from_reader(reader, &e)?;
                    content.push(BlockContent::Unknown(RawXmlNode::Element(raw)));
                }
            },
            Event::Empty(e) => match e.name().local_name().as_ref() {
                b"p" => content.push(BlockContent::Paragraph(Paragraph::from_empty(&e))),
                b"sectPr" if end == b"body" => {
                    section = Some(SectionProperties::from_raw(&RawXmlElement::from_empty(&e)));
                }
                _ => {
                    let raw = RawXmlElement::from_empty(&e);
                    content.push(BlockContent::Unknown(RawXmlNode::Element(raw)));
                }
            },
            Event::End(e) => {
                if e.name().local_name().as_ref() == end {
                    break;
                }
            }
            Event::Eof => return Err(unexpected_eof(&String::from_utf8_lossy(end))),
            _ => {}
        }
        buf.clear();
    }

    Ok((content, section))
}
