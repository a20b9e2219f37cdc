//! Run element (w:r) - a contiguous run of text with uniform formatting

use crate::document::fonts::{FontScript, RunFonts};
use crate::error::Result;
use crate::xml::{get_attr, sort_children, unexpected_eof, RawXmlElement, RawXmlNode, RPR_ORDER};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::BufRead;

/// Run element (w:r)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Run {
    /// Run properties
    pub properties: Option<RunProperties>,
    /// Run content
    pub content: Vec<RunContent>,
    /// Unknown attributes (preserved)
    pub unknown_attrs: Vec<(String, String)>,
}

/// Content within a run
#[derive(Clone, Debug, PartialEq)]
pub enum RunContent {
    /// Text (w:t)
    Text(String),
    /// Tab (w:tab)
    Tab,
    /// Break (w:br)
    Break(BreakType),
    /// Carriage return (w:cr)
    CarriageReturn,
    /// Unknown (preserved)
    Unknown(RawXmlNode),
}

/// Break type
#[derive(Clone, Debug, Default, PartialEq)]
pub enum BreakType {
    #[default]
    TextWrapping,
    Page,
    Column,
}

/// Run properties (w:rPr)
///
/// Also used for paragraph-mark properties (`w:pPr/w:rPr`) and for the run
/// formatting of styles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunProperties {
    /// Character style ID
    pub style: Option<String>,
    /// Fonts per script
    pub fonts: Option<RunFonts>,
    /// Font size in half-points (24 = 12pt)
    pub size: Option<u32>,
    /// Complex-script font size in half-points
    pub size_cs: Option<u32>,
    /// Unknown children (preserved)
    pub unknown_children: Vec<RawXmlNode>,
}

impl Run {
    /// Parse from reader (after w:r start tag)
    pub fn from_reader<R: BufRead>(reader: &mut Reader<R>, start: &BytesStart) -> Result<Self> {
        let mut run = Run::from_empty(start);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.name().local_name().as_ref() {
                    b"rPr" => {
                        let raw = RawXmlElement::from_reader(reader, &e)?;
                        run.properties = Some(RunProperties::from_raw(&raw));
                    }
                    b"t" => {
                        let text = read_text_content(reader)?;
                        run.content.push(RunContent::Text(text));
                    }
                    _ => {
                        let raw = RawXmlElement::from_reader(reader, &e)?;
                        run.content.push(RunContent::Unknown(RawXmlNode::Element(raw)));
                    }
                },
                Event::Empty(e) => match e.name().local_name().as_ref() {
                    b"rPr" => run.properties = Some(RunProperties::default()),
                    b"t" => run.content.push(RunContent::Text(String::new())),
                    b"tab" => run.content.push(RunContent::Tab),
                    b"cr" => run.content.push(RunContent::CarriageReturn),
                    b"br" => {
                        let break_type = match get_attr(&e, "type").as_deref() {
                            Some("page") => BreakType::Page,
                            Some("column") => BreakType::Column,
                            _ => BreakType::TextWrapping,
                        };
                        run.content.push(RunContent::Break(break_type));
                    }
                    _ => {
                        let raw = RawXmlElement::from_empty(&e);
                        run.content.push(RunContent::Unknown(RawXmlNode::Element(raw)));
                    }
                },
                Event::End(e) => {
                    if e.name().local_name().as_ref() == b"r" {
                        break;
                    }
                }
                Event::Eof => return Err(unexpected_eof("w:r")),
                _ => {}
            }
            buf.clear();
        }

        Ok(run)
    }

    /// Create from empty element
    pub fn from_empty(start: &BytesStart) -> Self {
        Run {
            unknown_attrs: crate::xml::attributes_of(start),
            ..Default::default()
        }
    }

    /// Create a new run with text
    pub fn new(text: impl Into<String>) -> Self {
        Run {
            content: vec![RunContent::Text(text.into())],
            ..Default::default()
        }
    }

    /// Get all text in this run
    pub fn text(&self) -> String {
        let mut result = String::new();
        for content in &self.content {
            match content {
                RunContent::Text(t) => result.push_str(t),
                RunContent::Tab => result.push('\t'),
                RunContent::Break(BreakType::TextWrapping) => result.push('\n'),
                RunContent::CarriageReturn => result.push('\n'),
                _ => {}
            }
        }
        result
    }

    /// Explicit font name (`w:ascii`, falling back to `w:hAnsi`)
    pub fn font_name(&self) -> Option<&str> {
        let fonts = self.properties.as_ref()?.fonts.as_ref()?;
        fonts
            .family(FontScript::Ascii)
            .or_else(|| fonts.family(FontScript::HighAnsi))
    }

    /// Set the explicit Latin font name (`w:ascii` and `w:hAnsi`)
    pub fn set_font_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        let fonts = self
            .properties
            .get_or_insert_with(Default::default)
            .fonts
            .get_or_insert_with(Default::default);
        fonts.ascii = Some(name.clone());
        fonts.h_ansi = Some(name);
    }

    /// Get font size in points (None if not specified)
    pub fn font_size_pt(&self) -> Option<f32> {
        self.properties.as_ref()?.font_size_pt()
    }

    /// Set font size in points
    pub fn set_font_size_pt(&mut self, size: f32) {
        self.properties
            .get_or_insert_with(Default::default)
            .set_font_size_pt(size);
    }

    /// Whether the run carries Office Math markup (`m:oMath`, `m:oMathPara`)
    pub fn contains_math(&self) -> bool {
        let is_math = |e: &RawXmlElement| e.local_name().starts_with("oMath");
        self.content.iter().any(|c| match c {
            RunContent::Unknown(RawXmlNode::Element(e)) => e.any_descendant(&is_math),
            _ => false,
        })
    }

    /// Write to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new("w:r");
        for (key, value) in &self.unknown_attrs {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        let props = self.properties.as_ref().filter(|p| !p.is_empty());
        if props.is_none() && self.content.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        if let Some(props) = props {
            props.to_raw().write_to(writer)?;
        }
        for content in &self.content {
            content.write_to(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new("w:r")))?;

        Ok(())
    }
}

impl RunContent {
    /// Write to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        match self {
            RunContent::Text(text) => {
                let mut start = BytesStart::new("w:t");
                if text.starts_with(char::is_whitespace)
                    || text.ends_with(char::is_whitespace)
                    || text.contains("  ")
                {
                    start.push_attribute(("xml:space", "preserve"));
                }
                writer.write_event(Event::Start(start))?;
                writer.write_event(Event::Text(BytesText::new(text)))?;
                writer.write_event(Event::End(BytesEnd::new("w:t")))?;
            }
            RunContent::Tab => {
                writer.write_event(Event::Empty(BytesStart::new("w:tab")))?;
            }
            RunContent::Break(break_type) => {
                let mut start = BytesStart::new("w:br");
                match break_type {
                    BreakType::Page => start.push_attribute(("w:type", "page")),
                    BreakType::Column => start.push_attribute(("w:type", "column")),
                    BreakType::TextWrapping => {}
                }
                writer.write_event(Event::Empty(start))?;
            }
            RunContent::CarriageReturn => {
                writer.write_event(Event::Empty(BytesStart::new("w:cr")))?;
            }
            RunContent::Unknown(node) => {
                node.write_to(writer)?;
            }
        }
        Ok(())
    }
}

impl RunProperties {
    /// Build from a parsed `w:rPr` element
    pub fn from_raw(raw: &RawXmlElement) -> Self {
        let mut props = RunProperties::default();

        for child in &raw.children {
            let Some(elem) = child.as_element() else {
                continue;
            };
            match elem.name.as_str() {
                "w:rStyle" => props.style = elem.val().map(str::to_string),
                "w:rFonts" => props.fonts = Some(RunFonts::from_raw(elem)),
                "w:sz" => props.size = elem.val().and_then(|v| v.parse().ok()),
                "w:szCs" => props.size_cs = elem.val().and_then(|v| v.parse().ok()),
                _ => props.unknown_children.push(child.clone()),
            }
        }

        props
    }

    /// Convert back to a `w:rPr` element with children in schema order
    pub fn to_raw(&self) -> RawXmlElement {
        let mut elem = RawXmlElement::new("w:rPr");

        if let Some(style) = &self.style {
            elem = elem.with_child(RawXmlElement::empty("w:rStyle").with_attr("w:val", style));
        }
        if let Some(fonts) = self.fonts.as_ref().filter(|f| !f.is_empty()) {
            elem = elem.with_child(fonts.to_raw());
        }
        if let Some(size) = self.size {
            elem = elem.with_child(RawXmlElement::empty("w:sz").with_attr("w:val", size.to_string()));
        }
        if let Some(size) = self.size_cs {
            elem = elem
                .with_child(RawXmlElement::empty("w:szCs").with_attr("w:val", size.to_string()));
        }
        elem.children.extend(self.unknown_children.iter().cloned());

        sort_children(&mut elem.children, RPR_ORDER);
        elem
    }

    /// Whether nothing would be written
    pub fn is_empty(&self) -> bool {
        self.style.is_none()
            && self.fonts.as_ref().map_or(true, RunFonts::is_empty)
            && self.size.is_none()
            && self.size_cs.is_none()
            && self.unknown_children.is_empty()
    }

    /// Font size in points
    pub fn font_size_pt(&self) -> Option<f32> {
        self.size.map(|s| s as f32 / 2.0)
    }

    /// Set the font size in points for both Latin and complex scripts
    pub fn set_font_size_pt(&mut self, size: f32) {
        let half_points = (size * 2.0).round().max(1.0) as u32;
        self.size = Some(half_points);
        self.size_cs = Some(half_points);
    }

    /// Fonts, created if absent
    pub fn fonts_mut(&mut self) -> &mut RunFonts {
        self.fonts.get_or_insert_with(Default::default)
    }
}

/// Read text content from w:t element
fn read_text_content<R: BufRead>(reader: &mut Reader<R>) -> Result<String> {
    let mut text = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Text(t) => {
                text.push_str(&t.unescape()?);
            }
            Event::CData(c) => {
                text.push_str(&String::from_utf8_lossy(&c));
            }
            Event::End(e) => {
                if e.name().local_name().as_ref() == b"t" {
                    break;
                }
            }
            Event::Eof => return Err(unexpected_eof("w:t")),
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}
