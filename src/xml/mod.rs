//! XML utilities and raw element preservation for round-trip support

mod namespace;
mod order;
mod raw;

pub use namespace::*;
pub use order::{sort_children, PPR_ORDER, RPR_ORDER, SECTPR_ORDER, STYLE_ORDER};
pub use raw::{RawXmlElement, RawXmlNode};

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Strip the namespace prefix from a qualified name
pub fn local_of(name: &str) -> &str {
    name.rsplit_once(':').map(|(_, local)| local).unwrap_or(name)
}

/// Collect all attributes of a tag as unescaped (name, value) pairs
pub fn attributes_of(element: &BytesStart) -> Vec<(String, String)> {
    element
        .attributes()
        .filter_map(|a| a.ok())
        .map(|a| {
            let key = String::from_utf8_lossy(a.key.as_ref()).to_string();
            let value = match a.unescape_value() {
                Ok(v) => v.into_owned(),
                Err(_) => String::from_utf8_lossy(&a.value).to_string(),
            };
            (key, value)
        })
        .collect()
}

/// Helper to get attribute value from BytesStart by local name
pub fn get_attr(element: &BytesStart, local: &str) -> Option<String> {
    attributes_of(element)
        .into_iter()
        .find(|(k, _)| local_of(k) == local)
        .map(|(_, v)| v)
}

/// Parse an OOXML on/off value ("1", "true", "on"; a missing value means on)
pub fn parse_on_off(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(v) => matches!(v, "1" | "true" | "on"),
    }
}

/// Error for a part that ends while `element` is still open
pub fn unexpected_eof(element: &str) -> Error {
    Error::InvalidDocument(format!("Unexpected EOF inside <{}>", element))
}

/// Read a whole XML part into a raw tree rooted at its document element
pub fn read_root(xml: &str) -> Result<Option<RawXmlElement>> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => return RawXmlElement::from_reader(&mut reader, &e).map(Some),
            Event::Empty(e) => return Ok(Some(RawXmlElement::from_empty(&e))),
            Event::Eof => return Ok(None),
            _ => {}
        }
        buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_element_roundtrip() {
        let xml = r#"<w:custom foo="bar"><w:child>text</w:child></w:custom>"#;
        let elem = read_root(xml).unwrap().unwrap();

        assert_eq!(elem.name, "w:custom");
        assert_eq!(elem.local_name(), "custom");
        assert_eq!(elem.attr("foo"), Some("bar"));
        assert_eq!(elem.children.len(), 1);
    }

    #[test]
    fn test_attribute_values_are_unescaped_once() {
        let xml = r#"<w:rFonts w:ascii="A &amp; B"/>"#;
        let elem = read_root(xml).unwrap().unwrap();
        assert_eq!(elem.attr("ascii"), Some("A & B"));

        let mut out = Vec::new();
        let mut writer = quick_xml::Writer::new(&mut out);
        elem.write_to(&mut writer).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"<w:rFonts w:ascii="A &amp; B"/>"#
        );
    }

    #[test]
    fn test_truncated_part_is_rejected() {
        let err = read_root(r#"<w:styles><w:style w:styleId="a">"#).unwrap_err();
        assert!(err.to_string().contains("Unexpected EOF"), "{}", err);
    }

    #[test]
    fn test_local_of() {
        assert_eq!(local_of("w:sz"), "sz");
        assert_eq!(local_of("sz"), "sz");
        assert_eq!(local_of("w14:ligatures"), "ligatures");
    }

    #[test]
    fn test_parse_on_off() {
        assert!(parse_on_off(None));
        assert!(parse_on_off(Some("1")));
        assert!(!parse_on_off(Some("0")));
        assert!(!parse_on_off(Some("false")));
    }

    #[test]
    fn test_namespace_constants() {
        assert!(W.contains("wordprocessingml"));
        assert!(M.contains("math"));
    }
}
