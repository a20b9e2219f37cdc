//! Section properties (w:sectPr) and page margins

use crate::xml::{local_of, sort_children, RawXmlElement, RawXmlNode, SECTPR_ORDER};

/// Twips per inch (1 twip = 1/20 pt)
pub const TWIPS_PER_INCH: f64 = 1440.0;

/// Header/footer distance given to a newly created `w:pgMar` (0.5in)
const DEFAULT_HEADER_FOOTER_TWIPS: i32 = 720;

/// Convert inches to twips, rounding to the nearest twip
pub fn inches_to_twips(inches: f64) -> i32 {
    (inches * TWIPS_PER_INCH).round() as i32
}

/// Convert twips to inches
pub fn twips_to_inches(twips: i32) -> f64 {
    f64::from(twips) / TWIPS_PER_INCH
}

/// Page margins (w:pgMar), all values in twips
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageMargins {
    pub top: Option<i32>,
    pub right: Option<i32>,
    pub bottom: Option<i32>,
    pub left: Option<i32>,
    pub header: Option<i32>,
    pub footer: Option<i32>,
    pub gutter: Option<i32>,
    /// Unknown attributes (preserved)
    pub unknown_attrs: Vec<(String, String)>,
}

impl PageMargins {
    /// Build from a parsed `w:pgMar` element
    pub fn from_raw(raw: &RawXmlElement) -> Self {
        let mut margins = PageMargins::default();

        for (key, value) in &raw.attributes {
            let slot = match local_of(key) {
                "top" => &mut margins.top,
                "right" => &mut margins.right,
                "bottom" => &mut margins.bottom,
                "left" => &mut margins.left,
                "header" => &mut margins.header,
                "footer" => &mut margins.footer,
                "gutter" => &mut margins.gutter,
                _ => {
                    margins.unknown_attrs.push((key.clone(), value.clone()));
                    continue;
                }
            };
            // Values with unit suffixes (strict OOXML) are kept verbatim.
            match value.parse() {
                Ok(v) => *slot = Some(v),
                Err(_) => margins.unknown_attrs.push((key.clone(), value.clone())),
            }
        }

        margins
    }

    /// Convert back to a `w:pgMar` element
    pub fn to_raw(&self) -> RawXmlElement {
        let mut elem = RawXmlElement::empty("w:pgMar");
        let slots = [
            ("w:top", self.top),
            ("w:right", self.right),
            ("w:bottom", self.bottom),
            ("w:left", self.left),
            ("w:header", self.header),
            ("w:footer", self.footer),
            ("w:gutter", self.gutter),
        ];
        for (name, value) in slots {
            if let Some(v) = value {
                elem.attributes.push((name.to_string(), v.to_string()));
            }
        }
        elem.attributes.extend(self.unknown_attrs.iter().cloned());
        elem
    }
}

/// Section properties (w:sectPr)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SectionProperties {
    /// Page margins
    pub page_margins: Option<PageMargins>,
    /// Attributes (rsids, preserved)
    pub attrs: Vec<(String, String)>,
    /// Unknown children (preserved)
    pub unknown_children: Vec<RawXmlNode>,
}

impl SectionProperties {
    /// Build from a parsed `w:sectPr` element
    pub fn from_raw(raw: &RawXmlElement) -> Self {
        let mut section = SectionProperties {
            attrs: raw.attributes.clone(),
            ..Default::default()
        };

        for child in &raw.children {
            match child.as_element() {
                Some(elem) if elem.name == "w:pgMar" => {
                    section.page_margins = Some(PageMargins::from_raw(elem));
                }
                Some(_) => section.unknown_children.push(child.clone()),
                None => {}
            }
        }

        section
    }

    /// Convert back to a `w:sectPr` element with children in schema order
    pub fn to_raw(&self) -> RawXmlElement {
        let mut elem = RawXmlElement::new("w:sectPr");
        elem.attributes = self.attrs.clone();
        if let Some(margins) = &self.page_margins {
            elem = elem.with_child(margins.to_raw());
        }
        elem.children.extend(self.unknown_children.iter().cloned());
        sort_children(&mut elem.children, SECTPR_ORDER);
        elem
    }

    /// Set top/bottom/left/right margins in inches. A missing `w:pgMar` is
    /// created with the header/footer/gutter values Word requires.
    pub fn set_margins_inch(&mut self, top: f64, bottom: f64, left: f64, right: f64) {
        let margins = self.page_margins.get_or_insert_with(|| PageMargins {
            header: Some(DEFAULT_HEADER_FOOTER_TWIPS),
            footer: Some(DEFAULT_HEADER_FOOTER_TWIPS),
            gutter: Some(0),
            ..Default::default()
        });
        margins
            .unknown_attrs
            .retain(|(k, _)| !matches!(local_of(k), "top" | "bottom" | "left" | "right"));
        margins.top = Some(inches_to_twips(top));
        margins.bottom = Some(inches_to_twips(bottom));
        margins.left = Some(inches_to_twips(left));
        margins.right = Some(inches_to_twips(right));
    }

    /// Top/bottom/left/right margins in twips, where set
    pub fn margins_twips(&self) -> Option<[Option<i32>; 4]> {
        let m = self.page_margins.as_ref()?;
        Some([m.top, m.bottom, m.left, m.right])
    }
}
