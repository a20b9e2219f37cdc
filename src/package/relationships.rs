//! Relationship parts (`.rels`)
//!
//! Only reading is needed: the normalizer rewrites existing parts and never
//! adds or removes relationships.

use crate::error::{Error, Result};
use crate::xml::{attributes_of, local_of};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Well-known relationship types
pub mod rel_types {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    pub const THEME: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
}

/// A single relationship
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path as written (relative to the source part's directory)
    pub target: String,
    /// Whether the target lives outside the package
    pub external: bool,
}

/// Relationships of one source part, in document order
#[derive(Clone, Debug, Default)]
pub struct Relationships {
    items: Vec<Relationship>,
}

impl Relationships {
    /// Parse from XML string
    pub fn from_xml(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut rels = Self::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Empty(e) | Event::Start(e)
                    if e.name().local_name().as_ref() == b"Relationship" =>
                {
                    rels.items.push(parse_relationship(&attributes_of(&e))?);
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Get a relationship by type (returns first match)
    pub fn by_type(&self, rel_type: &str) -> Option<&Relationship> {
        self.items.iter().find(|r| r.rel_type == rel_type)
    }

    /// Iterate over all relationships
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.items.iter()
    }

    /// Number of relationships
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn parse_relationship(attrs: &[(String, String)]) -> Result<Relationship> {
    let find = |name: &str| {
        attrs
            .iter()
            .find(|(k, _)| local_of(k) == name)
            .map(|(_, v)| v.clone())
    };
    let require = |name: &str| {
        find(name).ok_or_else(|| Error::MissingAttribute {
            element: "Relationship".into(),
            attr: name.into(),
        })
    };

    Ok(Relationship {
        id: require("Id")?,
        rel_type: require("Type")?,
        target: require("Target")?,
        external: find("TargetMode").as_deref() == Some("External"),
    })
}

/// Zip entry name of the `.rels` part describing `part`.
///
/// `word/document.xml` -> `word/_rels/document.xml.rels`, and the package
/// itself (empty source) -> `_rels/.rels`.
pub fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against the directory of its source part,
/// producing a zip entry name without a leading '/'.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let base_dir = source_part.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();

    for segment in target.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_relationships() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com" TargetMode="External"/>
</Relationships>"#;

        let rels = Relationships::from_xml(xml).unwrap();
        assert_eq!(rels.len(), 2);
        assert_eq!(rels.by_type(rel_types::STYLES).unwrap().target, "styles.xml");
        assert!(rels.iter().any(|r| r.external));
    }

    #[test]
    fn test_missing_target_is_an_error() {
        let xml = r#"<Relationships><Relationship Id="rId1" Type="t"/></Relationships>"#;
        assert!(matches!(
            Relationships::from_xml(xml),
            Err(Error::MissingAttribute { .. })
        ));
    }

    #[test]
    fn test_rels_path_for() {
        assert_eq!(rels_path_for("word/document.xml"), "word/_rels/document.xml.rels");
        assert_eq!(rels_path_for(""), "_rels/.rels");
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("word/document.xml", "styles.xml"), "word/styles.xml");
        assert_eq!(resolve_target("word/document.xml", "../media/a.png"), "media/a.png");
        assert_eq!(resolve_target("", "word/document.xml"), "word/document.xml");
        assert_eq!(resolve_target("word/document.xml", "/word/styles.xml"), "word/styles.xml");
    }
}
