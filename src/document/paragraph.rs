//! Paragraph element (w:p)

use crate::document::{Run, RunProperties, SectionProperties};
use crate::error::Result;
use crate::xml::{
    attributes_of, local_of, sort_children, unexpected_eof, RawXmlElement, RawXmlNode, PPR_ORDER,
};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::io::BufRead;

/// `w:line` value of single line spacing under `w:lineRule="auto"`
pub const SINGLE_LINE: f32 = 240.0;

/// Paragraph element (w:p)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Paragraph {
    /// Paragraph properties
    pub properties: Option<ParagraphProperties>,
    /// Paragraph content (runs, hyperlinks, etc.)
    pub content: Vec<ParagraphContent>,
    /// Unknown attributes (preserved for round-trip)
    pub unknown_attrs: Vec<(String, String)>,
}

/// Content within a paragraph
#[derive(Clone, Debug, PartialEq)]
pub enum ParagraphContent {
    /// Text run
    Run(Run),
    /// Hyperlink
    Hyperlink(Hyperlink),
    /// Tracked change, content control or other wrapper around runs
    Group(InlineGroup),
    /// Unknown element (preserved)
    Unknown(RawXmlNode),
}

/// Hyperlink element (w:hyperlink)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hyperlink {
    /// Attributes (r:id, w:anchor, ...)
    pub attrs: Vec<(String, String)>,
    /// Content runs and preserved markup
    pub content: Vec<ParagraphContent>,
}

/// Inline wrappers whose children are ordinary paragraph content
const INLINE_GROUPS: &[&[u8]] = &[
    b"ins",
    b"del",
    b"moveFrom",
    b"moveTo",
    b"sdt",
    b"sdtContent",
    b"smartTag",
    b"fldSimple",
    b"customXml",
    b"dir",
    b"bdo",
];

/// Inline wrapper around runs (`w:ins`, `w:del`, `w:sdt`, `w:smartTag`,
/// `w:fldSimple`, ...)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InlineGroup {
    /// Element name as written
    pub name: String,
    /// Attributes (author, date, field instruction, preserved)
    pub attrs: Vec<(String, String)>,
    /// Wrapped content; `sdtPr`, `smartTagPr` and similar stay raw
    pub content: Vec<ParagraphContent>,
}

/// Paragraph line spacing (w:spacing)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Spacing {
    /// Line spacing (240ths of a line when the rule is "auto", twips otherwise)
    pub line: Option<i32>,
    /// Line rule: "auto", "exact" or "atLeast"
    pub line_rule: Option<String>,
    /// Unknown attributes (before/after spacing, preserved)
    pub unknown_attrs: Vec<(String, String)>,
}

/// Paragraph properties (w:pPr)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParagraphProperties {
    /// Style ID
    pub style: Option<String>,
    /// Spacing
    pub spacing: Option<Spacing>,
    /// Paragraph mark run properties
    pub run_properties: Option<RunProperties>,
    /// Section break carried by this paragraph
    pub section: Option<SectionProperties>,
    /// Unknown children (preserved)
    pub unknown_children: Vec<RawXmlNode>,
}

impl Paragraph {
    /// Parse paragraph from reader (after w:p start tag)
    pub fn from_reader<R: BufRead>(reader: &mut Reader<R>, start: &BytesStart) -> Result<Self> {
        let mut para = Paragraph::from_empty(start);
        para.content = read_inline_content(reader, b"p", &mut para.properties)?;
        Ok(para)
    }

    /// Create from empty element
    pub fn from_empty(start: &BytesStart) -> Self {
        Paragraph {
            unknown_attrs: attributes_of(start),
            ..Default::default()
        }
    }

    /// Create a new paragraph with text
    pub fn new(text: impl Into<String>) -> Self {
        Paragraph {
            content: vec![ParagraphContent::Run(Run::new(text))],
            ..Default::default()
        }
    }

    /// Get all text in this paragraph
    pub fn text(&self) -> String {
        let mut result = String::new();
        push_text(&self.content, &mut result);
        result
    }

    /// Get style ID
    pub fn style(&self) -> Option<&str> {
        self.properties.as_ref()?.style.as_deref()
    }

    /// Set style
    pub fn set_style(&mut self, style: impl Into<String>) {
        self.properties.get_or_insert_with(Default::default).style = Some(style.into());
    }

    /// Direct child runs
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.content.iter().filter_map(|c| match c {
            ParagraphContent::Run(r) => Some(r),
            _ => None,
        })
    }

    /// Every run of the paragraph, including runs nested in hyperlinks,
    /// tracked changes and content controls
    pub fn all_runs_mut(&mut self) -> Vec<&mut Run> {
        let mut runs = Vec::new();
        collect_runs_mut(&mut self.content, &mut runs);
        runs
    }

    /// Add a run to this paragraph
    pub fn add_run(&mut self, run: Run) {
        self.content.push(ParagraphContent::Run(run));
    }

    /// Line spacing as a multiple of single spacing, if set as one
    pub fn line_spacing(&self) -> Option<f32> {
        self.properties.as_ref()?.spacing.as_ref()?.line_multiple()
    }

    /// Set line spacing as a multiple of single spacing
    pub fn set_line_spacing(&mut self, multiple: f32) {
        self.properties
            .get_or_insert_with(Default::default)
            .spacing
            .get_or_insert_with(Default::default)
            .set_line_multiple(multiple);
    }

    /// Paragraph-mark run properties, created if absent
    pub fn mark_properties_mut(&mut self) -> &mut RunProperties {
        self.properties
            .get_or_insert_with(Default::default)
            .run_properties
            .get_or_insert_with(Default::default)
    }

    /// Write to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new("w:p");
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
        writer.write_event(Event::End(BytesEnd::new("w:p")))?;

        Ok(())
    }
}

impl ParagraphContent {
    /// Write to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        match self {
            ParagraphContent::Run(run) => run.write_to(writer),
            ParagraphContent::Hyperlink(link) => link.write_to(writer),
            ParagraphContent::Group(group) => group.write_to(writer),
            ParagraphContent::Unknown(node) => node.write_to(writer),
        }
    }
}

impl InlineGroup {
    /// Parse from reader (after the wrapper's start tag)
    pub fn from_reader<R: BufRead>(reader: &mut Reader<R>, start: &BytesStart) -> Result<Self> {
        let mut ignored = None;
        let local = start.local_name();
        let content = read_inline_content(reader, local.as_ref(), &mut ignored)?;
        Ok(InlineGroup {
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
        } else {
            writer.write_event(Event::Start(start))?;
            for content in &self.content {
                content.write_to(writer)?;
            }
            writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        }

        Ok(())
    }
}

impl Hyperlink {
    /// Parse from reader (after w:hyperlink start tag)
    pub fn from_reader<R: BufRead>(reader: &mut Reader<R>, start: &BytesStart) -> Result<Self> {
        // A pPr cannot appear inside a hyperlink; anything resembling one is kept raw.
        let mut ignored = None;
        let content = read_inline_content(reader, b"hyperlink", &mut ignored)?;
        Ok(Hyperlink {
            attrs: attributes_of(start),
            content,
        })
    }

    /// Write to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new("w:hyperlink");
        for (key, value) in &self.attrs {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.content.is_empty() {
            writer.write_event(Event::Empty(start))?;
        } else {
            writer.write_event(Event::Start(start))?;
            for content in &self.content {
                content.write_to(writer)?;
            }
            writer.write_event(Event::End(BytesEnd::new("w:hyperlink")))?;
        }

        Ok(())
    }
}

impl Spacing {
    /// Build from a parsed `w:spacing` element
    pub fn from_raw(raw: &RawXmlElement) -> Self {
        let mut spacing = Spacing::default();
        for (key, value) in &raw.attributes {
            match (local_of(key), value.parse::<i32>()) {
                ("line", Ok(line)) => spacing.line = Some(line),
                ("lineRule", _) => spacing.line_rule = Some(value.clone()),
                _ => spacing.unknown_attrs.push((key.clone(), value.clone())),
            }
        }
        spacing
    }

    /// Convert back to a `w:spacing` element
    pub fn to_raw(&self) -> RawXmlElement {
        let mut elem = RawXmlElement::empty("w:spacing");
        elem.attributes = self.unknown_attrs.clone();
        if let Some(line) = self.line {
            elem.set_attr("w:line", line.to_string());
        }
        if let Some(rule) = &self.line_rule {
            elem.set_attr("w:lineRule", rule.as_str());
        }
        elem
    }

    /// Line spacing as a multiple, when the rule is "auto" (the default)
    pub fn line_multiple(&self) -> Option<f32> {
        match self.line_rule.as_deref() {
            None | Some("auto") => self.line.map(|l| l as f32 / SINGLE_LINE),
            _ => None,
        }
    }

    /// Set line spacing as a multiple of single spacing
    pub fn set_line_multiple(&mut self, multiple: f32) {
        self.unknown_attrs
            .retain(|(k, _)| !matches!(local_of(k), "line" | "lineRule"));
        self.line = Some((multiple * SINGLE_LINE).round() as i32);
        self.line_rule = Some("auto".to_string());
    }
}

impl ParagraphProperties {
    /// Build from a parsed `w:pPr` element
    pub fn from_raw(raw: &RawXmlElement) -> Self {
        let mut props = ParagraphProperties::default();

        for child in &raw.children {
            let Some(elem) = child.as_element() else {
                continue;
            };
            match elem.name.as_str() {
                "w:pStyle" => props.style = elem.val().map(str::to_string),
                "w:spacing" => props.spacing = Some(Spacing::from_raw(elem)),
                "w:rPr" => props.run_properties = Some(RunProperties::from_raw(elem)),
                "w:sectPr" => props.section = Some(SectionProperties::from_raw(elem)),
                _ => props.unknown_children.push(child.clone()),
            }
        }

        props
    }

    /// Convert back to a `w:pPr` element with children in schema order
    pub fn to_raw(&self) -> RawXmlElement {
        let mut elem = RawXmlElement::new("w:pPr");

        if let Some(style) = &self.style {
            elem = elem.with_child(RawXmlElement::empty("w:pStyle").with_attr("w:val", style));
        }
        if let Some(spacing) = &self.spacing {
            elem = elem.with_child(spacing.to_raw());
        }
        if let Some(rpr) = self.run_properties.as_ref().filter(|r| !r.is_empty()) {
            elem = elem.with_child(rpr.to_raw());
        }
        if let Some(section) = &self.section {
            elem = elem.with_child(section.to_raw());
        }
        elem.children.extend(self.unknown_children.iter().cloned());

        sort_children(&mut elem.children, PPR_ORDER);
        elem
    }

    /// Whether nothing would be written
    pub fn is_empty(&self) -> bool {
        self.style.is_none()
            && self.spacing.is_none()
            && self.run_properties.as_ref().map_or(true, RunProperties::is_empty)
            && self.section.is_none()
            && self.unknown_children.is_empty()
    }
}

/// Read the inline children of a `w:p`, `w:hyperlink` or inline wrapper up
/// to its end tag.
/// `pPr` is stored through `properties`; everything unrecognised is kept raw.
fn read_inline_content<R: BufRead>(
    reader: &mut Reader<R>,
    end: &[u8],
    properties: &mut Option<ParagraphProperties>,
) -> Result<Vec<ParagraphContent>> {
    let mut content = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.name().local_name().as_ref() {
                b"pPr" if end == b"p" => {
                    let raw = RawXmlElement::from_reader(reader, &e)?;
                    *properties = Some(ParagraphProperties::from_raw(&raw));
                }
                b"r" if e.name().as_ref() != b"m:r" => {
                    content.push(ParagraphContent::Run(Run::from_reader(reader, &e)?));
                }
                b"hyperlink" => {
                    let link = Hyperlink::from_reader(reader, &e)?;
                    content.push(ParagraphContent::Hyperlink(link));
                }
                name if INLINE_GROUPS.contains(&name) => {
                    let group = InlineGroup::from_reader(reader, &e)?;
                    content.push(ParagraphContent::Group(group));
                }
                _ => {
                    let raw = RawXmlElement::from_reader(reader, &e)?;
                    content.push(ParagraphContent::Unknown(RawXmlNode::Element(raw)));
                }
            },
            Event::Empty(e) => match e.name().local_name().as_ref() {
                b"pPr" if end == b"p" => {
                    *properties = Some(ParagraphProperties::default());
                }
                b"r" if e.name().as_ref() != b"m:r" => {
                    content.push(ParagraphContent::Run(Run::from_empty(&e)));
                }
                _ => {
                    let raw = RawXmlElement::from_empty(&e);
                    content.push(ParagraphContent::Unknown(RawXmlNode::Element(raw)));
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

    Ok(content)
}

fn push_text(content: &[ParagraphContent], out: &mut String) {
    for item in content {
        match item {
            ParagraphContent::Run(run) => out.push_str(&run.text()),
            ParagraphContent::Hyperlink(link) => push_text(&link.content, out),
            ParagraphContent::Group(group) => push_text(&group.content, out),
            ParagraphContent::Unknown(_) => {}
        }
    }
}

fn collect_runs_mut<'a>(content: &'a mut [ParagraphContent], out: &mut Vec<&'a mut Run>) {
    for item in content {
        match item {
            ParagraphContent::Run(run) => out.push(run),
            ParagraphContent::Hyperlink(link) => collect_runs_mut(&mut link.content, out),
            ParagraphContent::Group(group) => collect_runs_mut(&mut group.content, out),
            ParagraphContent::Unknown(_) => {}
        }
    }
}
