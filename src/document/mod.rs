//! Document model - high-level API for DOCX documents

pub(crate) mod body;
mod fonts;
mod paragraph;
mod run;
mod section;
mod styles;
mod table;

pub use body::{BlockContent, BlockGroup, Body};
pub use fonts::{FontScript, RunFonts};
pub use paragraph::{
    Hyperlink, InlineGroup, Paragraph, ParagraphContent, ParagraphProperties, Spacing,
};
pub use run::{BreakType, Run, RunContent, RunProperties};
pub use section::{inches_to_twips, twips_to_inches, PageMargins, SectionProperties};
pub use styles::{Style, StyleType, Styles, StylesChild};
pub use table::{RowContent, Table, TableCell, TableContent, TableRow};

use crate::error::{Error, Result};
use crate::package::{rel_types, Package};
use crate::xml::{self, RawXmlElement, RawXmlNode};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::io::Cursor;
use std::path::Path;

const DEFAULT_DOCUMENT_PART: &str = "word/document.xml";
const DEFAULT_STYLES_PART: &str = "word/styles.xml";

/// A DOCX document
#[derive(Clone, Debug)]
pub struct Document {
    /// Underlying package
    package: Package,
    /// Entry name of the main document part
    document_part: String,
    /// Entry name of the styles part, if the package has one
    styles_part: Option<String>,
    /// `w:document` element name and attributes (namespace declarations)
    root_name: String,
    root_attrs: Vec<(String, String)>,
    /// Children of `w:document` before the body (`w:background`)
    prelude: Vec<RawXmlNode>,
    /// Parsed document body
    pub(crate) body: Body,
    /// Parsed styles
    pub(crate) styles: Styles,
}

impl Document {
    /// Open a document from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let package = Package::open(path)?;
        Self::from_package(package)
    }

    /// Open a document from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let package = Package::from_bytes(bytes)?;
        Self::from_package(package)
    }

    /// Create document from a package
    fn from_package(package: Package) -> Result<Self> {
        let document_part = package.main_document_path()?;
        let xml = package
            .part_str(&document_part)?
            .ok_or_else(|| Error::MissingPart(document_part.clone()))?;
        let main = parse_document_xml(xml)?;

        let styles_part = package.related_part_path(&document_part, rel_types::STYLES)?;
        let styles = match &styles_part {
            Some(path) => match package.part_str(path)? {
                Some(xml) => Styles::from_xml(xml)?,
                None => Styles::blank(),
            },
            None => {
                log::debug!("{} has no styles part", document_part);
                Styles::blank()
            }
        };

        Ok(Self {
            package,
            document_part,
            styles_part,
            root_name: main.root_name,
            root_attrs: main.root_attrs,
            prelude: main.prelude,
            body: main.body,
            styles,
        })
    }

    /// Create a new empty document
    pub fn new() -> Self {
        Self {
            package: Package::blank(),
            document_part: DEFAULT_DOCUMENT_PART.to_string(),
            styles_part: Some(DEFAULT_STYLES_PART.to_string()),
            root_name: "w:document".to_string(),
            root_attrs: xml::document_namespaces(),
            prelude: Vec::new(),
            body: Body::default(),
            styles: Styles::blank(),
        }
    }

    /// Save the document to a file
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.update_package()?;
        self.package.save(path)
    }

    /// Save the document to bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.update_package()?;
        self.package.to_bytes()
    }

    /// Write the re-serialized parts back into the package
    fn update_package(&mut self) -> Result<()> {
        let xml = self.serialize_document_xml()?;
        self.package.set_part(&self.document_part, xml.into_bytes());

        if let Some(path) = &self.styles_part {
            self.package.set_part(path, self.styles.to_xml()?.into_bytes());
        }

        Ok(())
    }

    fn serialize_document_xml(&self) -> Result<String> {
        let mut buffer = Cursor::new(Vec::new());
        let mut writer = Writer::new(&mut buffer);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

        let mut doc_start = BytesStart::new(self.root_name.as_str());
        for (key, value) in &self.root_attrs {
            doc_start.push_attribute((key.as_str(), value.as_str()));
        }
        writer.write_event(Event::Start(doc_start))?;

        for node in &self.prelude {
            node.write_to(&mut writer)?;
        }
        self.body.write_to(&mut writer)?;

        writer.write_event(Event::End(BytesEnd::new(self.root_name.as_str())))?;

        String::from_utf8(buffer.into_inner()).map_err(|e| Error::InvalidDocument(e.to_string()))
    }

    /// Get top-level paragraphs
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.body.paragraphs()
    }

    /// Get top-level paragraph count
    pub fn paragraph_count(&self) -> usize {
        self.body.paragraphs().count()
    }

    /// Get paragraph by index
    pub fn paragraph(&self, index: usize) -> Option<&Paragraph> {
        self.body.paragraphs().nth(index)
    }

    /// Get top-level tables
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.body.tables()
    }

    /// Get top-level table count
    pub fn table_count(&self) -> usize {
        self.body.tables().count()
    }

    /// Get table by index
    pub fn table(&self, index: usize) -> Option<&Table> {
        self.body.tables().nth(index)
    }

    /// Get the text of the top-level paragraphs, one per line
    pub fn text(&self) -> String {
        self.body
            .paragraphs()
            .map(|p| p.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Get the underlying package
    pub fn package(&self) -> &Package {
        &self.package
    }

    /// Get the body
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Get mutable body
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Get the styles
    pub fn styles(&self) -> &Styles {
        &self.styles
    }

    /// Get mutable styles
    pub fn styles_mut(&mut self) -> &mut Styles {
        &mut self.styles
    }

    /// Section properties in document order
    pub fn sections(&self) -> Vec<&SectionProperties> {
        self.body.sections()
    }

    /// Section properties in document order, mutably
    pub fn sections_mut(&mut self) -> Vec<&mut SectionProperties> {
        self.body.sections_mut()
    }

    /// Add a paragraph with text
    pub fn add_paragraph(&mut self, text: impl Into<String>) -> &mut Paragraph {
        self.push_paragraph(Paragraph::new(text))
    }

    /// Add an empty paragraph
    pub fn add_empty_paragraph(&mut self) -> &mut Paragraph {
        self.push_paragraph(Paragraph::default())
    }

    fn push_paragraph(&mut self, para: Paragraph) -> &mut Paragraph {
        self.body.add_paragraph(para);
        match self.body.content.last_mut() {
            Some(BlockContent::Paragraph(p)) => p,
            _ => unreachable!("paragraph was just pushed"),
        }
    }

    /// Add a table
    pub fn add_table(&mut self, table: Table) {
        self.body.add_table(table);
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Parsed `w:document` root
struct MainPart {
    root_name: String,
    root_attrs: Vec<(String, String)>,
    prelude: Vec<RawXmlNode>,
    body: Body,
}

/// Parse document.xml content
fn parse_document_xml(xml: &str) -> Result<MainPart> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut root: Option<(String, Vec<(String, String)>)> = None;
    let mut prelude = Vec::new();
    let mut body = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match (root.is_some(), e.name().local_name().as_ref()) {
                (false, b"document") => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    root = Some((name, xml::attributes_of(&e)));
                }
                (true, b"body") => body = Some(Body::from_reader(&mut reader)?),
                (true, _) => {
                    let raw = RawXmlElement::from_reader(&mut reader, &e)?;
                    prelude.push(RawXmlNode::Element(raw));
                }
                (false, _) => {
                    return Err(Error::InvalidDocument(format!(
                        "unexpected root <{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    )))
                }
            },
            Event::Empty(e) if root.is_some() => {
                if e.name().local_name().as_ref() == b"body" {
                    body = Some(Body::default());
                } else {
                    prelude.push(RawXmlNode::Element(RawXmlElement::from_empty(&e)));
                }
            }
            Event::End(e) if root.is_some() && e.name().local_name().as_ref() == b"document" => {
                break
            }
            Event::Eof => match &root {
                Some((name, _)) => return Err(xml::unexpected_eof(name)),
                None => break,
            },
            _ => {}
        }
        buf.clear();
    }

    let (root_name, root_attrs) =
        root.ok_or_else(|| Error::InvalidDocument("Missing w:document element".into()))?;
    let body = body.ok_or_else(|| Error::InvalidDocument("Missing w:body element".into()))?;

    Ok(MainPart {
        root_name,
        root_attrs,
        prelude,
        body,
    })
}
