//! Style definitions part (word/styles.xml)

use crate::document::RunProperties;
use crate::error::{Error, Result};
use crate::xml::{self, local_of, read_root, sort_children, RawXmlElement, RawXmlNode, STYLE_ORDER};
use quick_xml::events::{BytesDecl, Event};
use quick_xml::Writer;
use std::io::Cursor;

/// Built-in styles Word stores under a lowercase name but shows capitalized
const LOWERCASE_BUILTINS: &[(&str, &str)] = &[
    ("caption", "Caption"),
    ("footer", "Footer"),
    ("header", "Header"),
    ("heading 1", "Heading 1"),
    ("heading 2", "Heading 2"),
    ("heading 3", "Heading 3"),
    ("heading 4", "Heading 4"),
    ("heading 5", "Heading 5"),
    ("heading 6", "Heading 6"),
    ("heading 7", "Heading 7"),
    ("heading 8", "Heading 8"),
    ("heading 9", "Heading 9"),
];

/// Style type (`w:type`)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StyleType {
    #[default]
    Paragraph,
    Character,
    Table,
    Numbering,
}

impl StyleType {
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("character") => StyleType::Character,
            Some("table") => StyleType::Table,
            Some("numbering") => StyleType::Numbering,
            _ => StyleType::Paragraph,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            StyleType::Paragraph => "paragraph",
            StyleType::Character => "character",
            StyleType::Table => "table",
            StyleType::Numbering => "numbering",
        }
    }
}

/// A style definition (w:style)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Style {
    /// Style ID referenced by `w:pStyle`/`w:rStyle`
    pub style_id: Option<String>,
    pub style_type: StyleType,
    /// Stored name (`w:name`)
    pub name: Option<String>,
    /// Whether this is the default style of its type
    pub is_default: bool,
    /// Parent style ID
    pub based_on: Option<String>,
    /// Run formatting of the style
    pub run_properties: Option<RunProperties>,
    /// Unknown attributes (preserved)
    pub unknown_attrs: Vec<(String, String)>,
    /// Unknown children (preserved)
    pub unknown_children: Vec<RawXmlNode>,
}

impl Style {
    /// Create a style of the given type
    pub fn new(style_type: StyleType, style_id: impl Into<String>, name: impl Into<String>) -> Self {
        Style {
            style_id: Some(style_id.into()),
            style_type,
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Build from a parsed `w:style` element
    pub fn from_raw(raw: &RawXmlElement) -> Self {
        let mut style = Style::default();

        for (key, value) in &raw.attributes {
            match local_of(key) {
                "type" => style.style_type = StyleType::parse(Some(value.as_str())),
                "styleId" => style.style_id = Some(value.clone()),
                "default" => style.is_default = xml::parse_on_off(Some(value.as_str())),
                _ => style.unknown_attrs.push((key.clone(), value.clone())),
            }
        }

        for child in &raw.children {
            let Some(elem) = child.as_element() else {
                continue;
            };
            match elem.name.as_str() {
                "w:name" => style.name = elem.val().map(str::to_string),
                "w:basedOn" => style.based_on = elem.val().map(str::to_string),
                "w:rPr" => style.run_properties = Some(RunProperties::from_raw(elem)),
                _ => style.unknown_children.push(child.clone()),
            }
        }

        style
    }

    /// Convert back to a `w:style` element with children in schema order
    pub fn to_raw(&self) -> RawXmlElement {
        let mut elem = RawXmlElement::new("w:style").with_attr("w:type", self.style_type.as_str());
        if self.is_default {
            elem = elem.with_attr("w:default", "1");
        }
        if let Some(id) = &self.style_id {
            elem = elem.with_attr("w:styleId", id);
        }
        elem.attributes.extend(self.unknown_attrs.iter().cloned());

        if let Some(name) = &self.name {
            elem = elem.with_child(RawXmlElement::empty("w:name").with_attr("w:val", name));
        }
        if let Some(based_on) = &self.based_on {
            elem = elem.with_child(RawXmlElement::empty("w:basedOn").with_attr("w:val", based_on));
        }
        if let Some(rpr) = self.run_properties.as_ref().filter(|r| !r.is_empty()) {
            elem = elem.with_child(rpr.to_raw());
        }
        elem.children.extend(self.unknown_children.iter().cloned());

        sort_children(&mut elem.children, STYLE_ORDER);
        elem
    }

    /// Name as shown in Word's UI. Lowercase built-in names are capitalized;
    /// a style without a name falls back to its ID.
    pub fn ui_name(&self) -> Option<&str> {
        let name = self.name.as_deref().or(self.style_id.as_deref())?;
        Some(
            LOWERCASE_BUILTINS
                .iter()
                .find(|(stored, _)| *stored == name)
                .map_or(name, |(_, ui)| *ui),
        )
    }

    /// Whether the style can carry run formatting. Numbering styles only
    /// hold numbering properties.
    pub fn has_font_facet(&self) -> bool {
        self.style_type != StyleType::Numbering
    }

    /// Run properties, created if absent
    pub fn run_properties_mut(&mut self) -> &mut RunProperties {
        self.run_properties.get_or_insert_with(Default::default)
    }
}

/// Child of the styles root
#[derive(Clone, Debug, PartialEq)]
pub enum StylesChild {
    Style(Style),
    /// docDefaults, latentStyles and anything else (preserved)
    Unknown(RawXmlNode),
}

/// Styles part (w:styles)
#[derive(Clone, Debug, PartialEq)]
pub struct Styles {
    /// Root element name as written (normally `w:styles`)
    root_name: String,
    /// Root attributes, namespace declarations included
    root_attrs: Vec<(String, String)>,
    /// Children in part order
    pub children: Vec<StylesChild>,
}

impl Styles {
    /// Parse a styles part
    pub fn from_xml(xml: &str) -> Result<Self> {
        let root = read_root(xml)?
            .ok_or_else(|| Error::InvalidDocument("styles part has no root element".into()))?;
        if root.local_name() != "styles" {
            return Err(Error::InvalidDocument(format!(
                "unexpected styles root <{}>",
                root.name
            )));
        }

        let children = root
            .children
            .into_iter()
            .filter_map(|child| match child {
                RawXmlNode::Element(e) if e.name == "w:style" => {
                    Some(StylesChild::Style(Style::from_raw(&e)))
                }
                RawXmlNode::Text(_) => None,
                other => Some(StylesChild::Unknown(other)),
            })
            .collect();

        Ok(Styles {
            root_name: root.name,
            root_attrs: root.attributes,
            children,
        })
    }

    /// Minimal styles part for a new document: a default "Normal" paragraph style
    pub fn blank() -> Self {
        let mut normal = Style::new(StyleType::Paragraph, "Normal", "Normal");
        normal.is_default = true;
        Styles {
            root_name: "w:styles".into(),
            root_attrs: xml::document_namespaces(),
            children: vec![StylesChild::Style(normal)],
        }
    }

    /// Serialize the part
    pub fn to_xml(&self) -> Result<String> {
        let mut buffer = Cursor::new(Vec::new());
        let mut writer = Writer::new(&mut buffer);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

        let mut root = RawXmlElement::new(self.root_name.as_str());
        root.attributes = self.root_attrs.clone();
        root.children = self
            .children
            .iter()
            .map(|child| match child {
                StylesChild::Style(style) => RawXmlNode::Element(style.to_raw()),
                StylesChild::Unknown(node) => node.clone(),
            })
            .collect();
        root.write_to(&mut writer)?;

        String::from_utf8(buffer.into_inner()).map_err(|e| Error::InvalidDocument(e.to_string()))
    }

    /// Iterate over style definitions
    pub fn iter(&self) -> impl Iterator<Item = &Style> {
        self.children.iter().filter_map(|c| match c {
            StylesChild::Style(s) => Some(s),
            _ => None,
        })
    }

    /// Iterate over style definitions mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Style> {
        self.children.iter_mut().filter_map(|c| match c {
            StylesChild::Style(s) => Some(s),
            _ => None,
        })
    }

    /// Look up a style by ID
    pub fn get(&self, style_id: &str) -> Option<&Style> {
        self.iter().find(|s| s.style_id.as_deref() == Some(style_id))
    }

    /// Add a style definition
    pub fn add(&mut self, style: Style) {
        self.children.push(StylesChild::Style(style));
    }

    /// Default paragraph style
    pub fn default_paragraph_style(&self) -> Option<&Style> {
        self.iter()
            .find(|s| s.is_default && s.style_type == StyleType::Paragraph)
    }

    /// UI name of the paragraph style a `w:pStyle` reference resolves to.
    /// No reference means the default paragraph style; an ID with no
    /// matching paragraph style resolves to the ID itself.
    pub fn paragraph_style_name<'a>(&'a self, style_id: Option<&'a str>) -> Option<&'a str> {
        match style_id {
            Some(id) => Some(
                self.iter()
                    .find(|s| {
                        s.style_type == StyleType::Paragraph && s.style_id.as_deref() == Some(id)
                    })
                    .and_then(Style::ui_name)
                    .unwrap_or(id),
            ),
            None => self.default_paragraph_style().and_then(Style::ui_name),
        }
    }
}

impl Default for Styles {
    fn default() -> Self {
        Self::blank()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:w14="http://schemas.microsoft.com/office/word/2010/wordml" mc:Ignorable="w14">
  <w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:asciiTheme="minorHAnsi"/></w:rPr></w:rPrDefault></w:docDefaults>
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/><w:rPr><w:rFonts w:ascii="Calibri" w:asciiTheme="minorHAnsi"/></w:rPr></w:style>
  <w:style w:type="paragraph" w:styleId="Caption"><w:name w:val="caption"/><w:basedOn w:val="Normal"/></w:style>
  <w:style w:type="numbering" w:styleId="NoList"><w:name w:val="No List"/></w:style>
</w:styles>"#;

    #[test]
    fn test_parse_styles() {
        let styles = Styles::from_xml(STYLES).unwrap();

        assert_eq!(styles.iter().count(), 3);
        assert_eq!(styles.children.len(), 4);

        let normal = styles.get("Normal").unwrap();
        assert!(normal.is_default);
        assert!(normal.run_properties.as_ref().unwrap().fonts.is_some());

        let caption = styles.get("Caption").unwrap();
        assert_eq!(caption.ui_name(), Some("Caption"));
        assert_eq!(caption.based_on.as_deref(), Some("Normal"));

        assert!(!styles.get("NoList").unwrap().has_font_facet());
    }

    #[test]
    fn test_paragraph_style_resolution() {
        let styles = Styles::from_xml(STYLES).unwrap();

        assert_eq!(styles.paragraph_style_name(None), Some("Normal"));
        assert_eq!(styles.paragraph_style_name(Some("Caption")), Some("Caption"));
        assert_eq!(styles.paragraph_style_name(Some("Missing")), Some("Missing"));
    }

    #[test]
    fn test_roundtrip_keeps_root_and_unknown_children() {
        let styles = Styles::from_xml(STYLES).unwrap();
        let xml = styles.to_xml().unwrap();

        assert!(xml.contains(r#"mc:Ignorable="w14""#), "{}", xml);
        assert!(xml.contains("<w:docDefaults>"));
        assert!(xml.contains("<w:qFormat/>"));

        let reparsed = Styles::from_xml(&xml).unwrap();
        assert_eq!(reparsed, styles);
    }

    #[test]
    fn test_style_children_written_in_schema_order() {
        let mut style = Style::new(StyleType::Paragraph, "Body", "Body");
        style.unknown_children.push(RawXmlNode::Element(RawXmlElement::empty("w:qFormat")));
        style.run_properties_mut().set_font_size_pt(12.0);
        style.based_on = Some("Normal".into());

        let order: Vec<String> = style
            .to_raw()
            .elements()
            .map(|e| e.local_name().to_string())
            .collect();
        assert_eq!(order, vec!["name", "basedOn", "qFormat", "rPr"]);
    }

    #[test]
    fn test_rejects_foreign_root() {
        assert!(matches!(
            Styles::from_xml("<w:document/>"),
            Err(Error::InvalidDocument(_))
        ));
    }
}
